use chrono::Utc;
use tracing::{error, info, warn};

use folio_domain::id::SubmissionId;
use folio_domain::pagination::{PageRequest, Pagination};
use folio_domain::submission::SubmissionStatus;

use crate::domain::repository::{NotificationPort, SubmissionRepository};
use crate::domain::types::{
    ContactForm, NewSubmission, Submission, SubmissionPage, SubmissionStats,
};
use crate::error::ContactServiceError;

/// Parse a path id. Malformed ids are a client error, not a lookup miss.
pub fn parse_submission_id(raw: &str) -> Result<SubmissionId, ContactServiceError> {
    raw.parse().map_err(|_| ContactServiceError::InvalidId)
}

/// Parse a status coming from a request. Missing counts as invalid.
pub fn parse_status(raw: Option<&str>) -> Result<SubmissionStatus, ContactServiceError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or(ContactServiceError::InvalidStatus)
}

// ── CreateSubmission ─────────────────────────────────────────────────────────

/// What happened to each best-effort step of a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateSubmissionOutcome {
    pub id: Option<SubmissionId>,
    pub saved_to_database: bool,
    pub email_sent: bool,
}

/// Persist, then notify. Either side may be absent (not configured or not
/// connected) or fail; neither outcome affects the other.
pub struct CreateSubmissionUseCase<R, N>
where
    R: SubmissionRepository,
    N: NotificationPort,
{
    pub repo: Option<R>,
    pub notifier: Option<N>,
}

impl<R, N> CreateSubmissionUseCase<R, N>
where
    R: SubmissionRepository,
    N: NotificationPort,
{
    pub async fn execute(&self, form: ContactForm) -> CreateSubmissionOutcome {
        let id = match &self.repo {
            Some(repo) => {
                let new = NewSubmission::received(form.clone(), Utc::now());
                match repo.create(&new).await {
                    Ok(saved) => {
                        info!(id = %saved.id, "submission saved");
                        Some(saved.id)
                    }
                    Err(e) => {
                        error!(error = ?e, "failed to save submission");
                        None
                    }
                }
            }
            None => {
                warn!("database not connected; submission not saved");
                None
            }
        };

        let email_sent = match &self.notifier {
            Some(notifier) => match notifier.notify(&form).await {
                Ok(()) => {
                    info!(from = %form.email, "notification email sent");
                    true
                }
                Err(e) => {
                    error!(error = ?e, "failed to send notification email");
                    false
                }
            },
            None => false,
        };

        CreateSubmissionOutcome {
            id,
            saved_to_database: id.is_some(),
            email_sent,
        }
    }
}

// ── ListSubmissions ──────────────────────────────────────────────────────────

pub struct ListSubmissionsUseCase<R: SubmissionRepository> {
    pub repo: R,
}

impl<R: SubmissionRepository> ListSubmissionsUseCase<R> {
    pub async fn execute(
        &self,
        status: Option<SubmissionStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Submission>, Pagination), ContactServiceError> {
        let page = page.clamped();
        let SubmissionPage { items, total } = self.repo.list(status, page).await?;
        Ok((items, Pagination::new(page, total)))
    }
}

// ── GetSubmission ────────────────────────────────────────────────────────────

pub struct GetSubmissionUseCase<R: SubmissionRepository> {
    pub repo: R,
}

impl<R: SubmissionRepository> GetSubmissionUseCase<R> {
    pub async fn execute(&self, id: SubmissionId) -> Result<Submission, ContactServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ContactServiceError::SubmissionNotFound)
    }
}

// ── UpdateSubmissionStatus ───────────────────────────────────────────────────

pub struct UpdateStatusInput {
    pub status: Option<String>,
}

pub struct UpdateSubmissionStatusUseCase<R: SubmissionRepository> {
    pub repo: R,
}

impl<R: SubmissionRepository> UpdateSubmissionStatusUseCase<R> {
    pub async fn execute(
        &self,
        id: SubmissionId,
        input: UpdateStatusInput,
    ) -> Result<Submission, ContactServiceError> {
        let status = parse_status(input.status.as_deref())?;
        self.repo
            .update_status(id, status, Utc::now())
            .await?
            .ok_or(ContactServiceError::SubmissionNotFound)
    }
}

// ── DeleteSubmission ─────────────────────────────────────────────────────────

pub struct DeleteSubmissionUseCase<R: SubmissionRepository> {
    pub repo: R,
}

impl<R: SubmissionRepository> DeleteSubmissionUseCase<R> {
    pub async fn execute(&self, id: SubmissionId) -> Result<(), ContactServiceError> {
        let deleted = self.repo.delete(id).await?;
        if !deleted {
            return Err(ContactServiceError::SubmissionNotFound);
        }
        Ok(())
    }
}

// ── SubmissionStats ──────────────────────────────────────────────────────────

pub struct SubmissionStatsUseCase<R: SubmissionRepository> {
    pub repo: R,
}

impl<R: SubmissionRepository> SubmissionStatsUseCase<R> {
    pub async fn execute(&self) -> Result<SubmissionStats, ContactServiceError> {
        self.repo.stats().await
    }
}
