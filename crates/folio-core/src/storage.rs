//! Database connection handle with an observable lifecycle.
//!
//! The store is optional: a service keeps serving when it was never configured,
//! failed to connect, or dropped off mid-run. Handlers ask [`Storage::connection`]
//! for a live connection and treat `None` as "unavailable".

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Connection lifecycle as reported by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Connecting,
    Disconnecting,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Disconnecting => "disconnecting",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

struct Inner {
    db: OnceLock<DatabaseConnection>,
    state: watch::Sender<ConnectionState>,
}

/// Cloneable handle shared by every handler through axum `State`.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Inner>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    /// A handle with no connection yet, in the `disconnected` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                db: OnceLock::new(),
                state,
            }),
        }
    }

    /// A handle over a pool that is already open, in the `connected` state.
    pub fn connected(db: DatabaseConnection) -> Self {
        let storage = Self::new();
        let _ = storage.inner.db.set(db);
        storage.set_state(ConnectionState::Connected);
        storage
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Receiver that yields every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// The live connection, or `None` unless the state is `connected`.
    pub fn connection(&self) -> Option<DatabaseConnection> {
        if !self.is_connected() {
            return None;
        }
        self.inner.db.get().cloned()
    }

    fn set_state(&self, next: ConnectionState) {
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Connect once, run `setup` (migrations) on the fresh pool, then publish
    /// `connected`. Any failure leaves the handle `disconnected`; the error is
    /// logged and returned so the caller may ignore it.
    pub async fn connect_with<F, Fut>(
        &self,
        options: ConnectOptions,
        setup: F,
    ) -> Result<(), DbErr>
    where
        F: FnOnce(DatabaseConnection) -> Fut,
        Fut: Future<Output = Result<(), DbErr>>,
    {
        if self.inner.db.get().is_some() {
            info!("storage already connected");
            return Ok(());
        }

        self.set_state(ConnectionState::Connecting);
        let db = match Database::connect(options).await {
            Ok(db) => db,
            Err(e) => {
                error!(error = %e, "storage connection failed; continuing without database");
                self.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        if let Err(e) = setup(db.clone()).await {
            error!(error = %e, "storage setup failed; continuing without database");
            self.set_state(ConnectionState::Disconnected);
            if let Err(close_err) = db.close().await {
                warn!(error = %close_err, "failed to close storage pool after setup error");
            }
            return Err(e);
        }

        info!(backend = ?db.get_database_backend(), "storage connected");
        let _ = self.inner.db.set(db);
        self.set_state(ConnectionState::Connected);
        Ok(())
    }

    /// Ping the pool every `every` and flip between `connected` and
    /// `disconnected` as the store comes and goes.
    pub fn spawn_monitor(&self, every: Duration) -> JoinHandle<()> {
        let storage = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(db) = storage.inner.db.get() else {
                    continue;
                };
                let before = storage.state();
                if before == ConnectionState::Disconnecting {
                    continue;
                }
                match db.ping().await {
                    Ok(()) if before == ConnectionState::Disconnected => {
                        info!("storage reconnected");
                        storage.set_state(ConnectionState::Connected);
                    }
                    Ok(()) => {}
                    Err(e) if before == ConnectionState::Connected => {
                        error!(error = %e, "storage ping failed");
                        storage.set_state(ConnectionState::Disconnected);
                    }
                    Err(_) => {}
                }
            }
        })
    }

    /// Log every state transition until the last handle is dropped.
    pub fn spawn_event_logger(&self) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = *rx.borrow_and_update();
                let state_name = state.as_str();
                match state {
                    ConnectionState::Connected => {
                        info!(state = state_name, "storage connection established")
                    }
                    ConnectionState::Connecting => info!(state = state_name, "storage connecting"),
                    ConnectionState::Disconnecting => {
                        info!(state = state_name, "storage disconnecting")
                    }
                    ConnectionState::Disconnected => {
                        warn!(state = state_name, "storage disconnected")
                    }
                }
            }
        })
    }

    /// Release the pool. No-op when never connected.
    pub async fn close(&self) -> Result<(), DbErr> {
        let Some(db) = self.inner.db.get().cloned() else {
            return Ok(());
        };
        self.set_state(ConnectionState::Disconnecting);
        let result = db.close().await;
        self.set_state(ConnectionState::Disconnected);
        result
    }
}
