use std::fmt;
use std::str::FromStr;

/// Outbound mail relay settings. Present only when both `EMAIL_USER` and
/// `EMAIL_PASS` are set.
#[derive(Clone)]
pub struct MailConfig {
    /// SMTP relay host (default "smtp.gmail.com"). Env var: `SMTP_HOST`.
    pub smtp_host: String,
    /// Relay account identity. Env var: `EMAIL_USER`.
    pub username: String,
    /// Relay account credential. Env var: `EMAIL_PASS`.
    pub password: String,
    /// Where notifications are delivered (default: the relay account). Env var: `CONTACT_RECIPIENT`.
    pub recipient: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Contact service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ContactConfig {
    /// PostgreSQL connection URL. Optional; without it the service runs email-only.
    pub database_url: Option<String>,
    /// Seconds to wait for the initial connection (default 10). Env var: `DATABASE_CONNECT_TIMEOUT_SECS`.
    pub database_connect_timeout_secs: u64,
    /// Seconds between liveness pings (default 30). Env var: `DATABASE_PING_INTERVAL_SECS`.
    pub database_ping_interval_secs: u64,
    pub mail: Option<MailConfig>,
    /// TCP port for the HTTP server (default 5000). Env var: `PORT`.
    pub port: u16,
}

impl ContactConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mail = match (get("EMAIL_USER"), get("EMAIL_PASS")) {
            (Some(username), Some(password)) => Some(MailConfig {
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_owned()),
                recipient: get("CONTACT_RECIPIENT").unwrap_or_else(|| username.clone()),
                username,
                password,
            }),
            _ => None,
        };

        Self {
            database_url: get("DATABASE_URL"),
            database_connect_timeout_secs: parse_or(get("DATABASE_CONNECT_TIMEOUT_SECS"), 10),
            database_ping_interval_secs: parse_or(get("DATABASE_PING_INTERVAL_SECS"), 30),
            mail,
            port: parse_or(get("PORT"), 5000),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
