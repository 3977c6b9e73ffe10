use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::{ConnectionState, Storage};

/// Handler for `GET /healthz`: bare liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: ConnectionState,
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub success: bool,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
}

impl HealthReport {
    pub fn snapshot(storage: &Storage) -> Self {
        let status = storage.state();
        Self {
            success: true,
            timestamp: Utc::now(),
            database: DatabaseHealth {
                status,
                connected: status.is_connected(),
            },
        }
    }
}

/// Handler for `GET /health`: process liveness plus storage state. Always 200.
pub async fn health(State(storage): State<Storage>) -> Json<HealthReport> {
    Json(HealthReport::snapshot(&storage))
}
