use chrono::{DateTime, Utc};

use folio_domain::id::SubmissionId;
use folio_domain::submission::SubmissionStatus;

/// A contact-form message that passed validation. Fields are exactly what the
/// visitor sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A submission about to be stored; the repository assigns its id.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub form: ContactForm,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    pub fn received(form: ContactForm, now: DateTime<Utc>) -> Self {
        Self {
            form,
            status: SubmissionStatus::New,
            created_at: now,
        }
    }
}

/// One page of a filtered list, newest first.
#[derive(Debug, Clone)]
pub struct SubmissionPage {
    pub items: Vec<Submission>,
    pub total: u64,
}

/// Per-status counts across all stored submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionStats {
    pub total: u64,
    pub new: u64,
    pub read: u64,
    pub replied: u64,
    pub archived: u64,
}

impl SubmissionStats {
    /// Build from `(status, count)` rows. Statuses without rows count as zero.
    pub fn from_counts(counts: impl IntoIterator<Item = (SubmissionStatus, u64)>) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            match status {
                SubmissionStatus::New => stats.new += count,
                SubmissionStatus::Read => stats.read += count,
                SubmissionStatus::Replied => stats.replied += count,
                SubmissionStatus::Archived => stats.archived += count,
            }
            stats.total += count;
        }
        stats
    }
}
