use std::time::Duration;

use sea_orm_migration::MigratorTrait as _;
use tracing::{error, info, warn};

use folio_contact::config::ContactConfig;
use folio_contact::infra::db::connect_options;
use folio_contact::infra::mail::SmtpNotifier;
use folio_contact::router::build_router;
use folio_contact::state::AppState;
use folio_contact_migration::Migrator;
use folio_core::storage::Storage;
use folio_core::tracing::init_tracing;

const STORAGE_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let config = ContactConfig::from_env();

    let storage = Storage::new();
    storage.spawn_event_logger();

    match connect_options(&config) {
        Some(options) => {
            let storage = storage.clone();
            let ping_every = Duration::from_secs(config.database_ping_interval_secs);
            tokio::spawn(async move {
                let connected = storage
                    .connect_with(options, |db| async move { Migrator::up(&db, None).await })
                    .await;
                if connected.is_ok() {
                    storage.spawn_monitor(ping_every);
                }
            });
        }
        None => warn!("DATABASE_URL not set; submissions will not be stored"),
    }

    let notifier = match &config.mail {
        Some(mail) => match SmtpNotifier::from_config(mail) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                error!(error = ?e, "failed to configure mail relay; email disabled");
                None
            }
        },
        None => {
            warn!("EMAIL_USER/EMAIL_PASS not set; email notifications disabled");
            None
        }
    };

    let state = AppState {
        storage: storage.clone(),
        notifier,
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("contact service listening on {http_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("shutting down");
    match tokio::time::timeout(STORAGE_CLOSE_TIMEOUT, storage.close()).await {
        Ok(Ok(())) => info!("storage closed"),
        Ok(Err(e)) => error!(error = %e, "failed to close storage"),
        Err(_) => warn!("timed out closing storage"),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
