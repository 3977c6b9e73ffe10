#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use folio_domain::id::SubmissionId;
use folio_domain::pagination::PageRequest;
use folio_domain::submission::SubmissionStatus;

use crate::domain::types::{ContactForm, NewSubmission, Submission, SubmissionPage, SubmissionStats};
use crate::error::ContactServiceError;

/// Repository for stored contact submissions.
pub trait SubmissionRepository: Send + Sync {
    /// Store a new submission. The repository assigns the id.
    async fn create(&self, submission: &NewSubmission) -> Result<Submission, ContactServiceError>;

    /// Newest first, optionally filtered by status. `total` counts every match.
    async fn list(
        &self,
        status: Option<SubmissionStatus>,
        page: PageRequest,
    ) -> Result<SubmissionPage, ContactServiceError>;

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, ContactServiceError>;

    /// Set `status` and `updated_at`. Returns `None` if no row matched.
    async fn update_status(
        &self,
        id: SubmissionId,
        status: SubmissionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Submission>, ContactServiceError>;

    /// Delete a submission. Returns `true` if a row was deleted.
    async fn delete(&self, id: SubmissionId) -> Result<bool, ContactServiceError>;

    async fn stats(&self) -> Result<SubmissionStats, ContactServiceError>;
}

/// Port for relaying a submission to the site owner.
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, form: &ContactForm) -> Result<(), ContactServiceError>;
}
