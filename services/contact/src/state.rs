use axum::extract::FromRef;

use folio_core::storage::Storage;

use crate::error::ContactServiceError;
use crate::infra::db::DbSubmissionRepository;
use crate::infra::mail::SmtpNotifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub storage: Storage,
    /// `None` when mail relay credentials are not configured.
    pub notifier: Option<SmtpNotifier>,
}

impl AppState {
    /// Repository over the live connection, if there is one.
    pub fn connected_submission_repo(&self) -> Option<DbSubmissionRepository> {
        self.storage
            .connection()
            .map(|db| DbSubmissionRepository { db })
    }

    /// Repository for handlers that cannot work without storage.
    pub fn submission_repo(&self) -> Result<DbSubmissionRepository, ContactServiceError> {
        self.connected_submission_repo()
            .ok_or(ContactServiceError::StorageUnavailable)
    }
}
