use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

use folio_domain::pagination::{PageRequest, Pagination};
use folio_domain::submission::SubmissionStatus;

use crate::domain::types::{Submission, SubmissionStats};
use crate::domain::validation::{RawContact, validate_contact};
use crate::error::ContactServiceError;
use crate::state::AppState;
use crate::usecase::submission::{
    CreateSubmissionUseCase, DeleteSubmissionUseCase, GetSubmissionUseCase,
    ListSubmissionsUseCase, SubmissionStatsUseCase, UpdateStatusInput,
    UpdateSubmissionStatusUseCase, parse_status, parse_submission_id,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: SubmissionStatus,
    #[serde(serialize_with = "folio_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "folio_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id.to_string(),
            name: submission.name,
            email: submission.email,
            message: submission.message,
            status: submission.status,
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

// ── POST /submissions ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CreateSubmissionRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub saved_to_database: bool,
    pub email_sent: bool,
}

pub async fn create_submission(
    State(state): State<AppState>,
    body: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<Json<CreateSubmissionResponse>, ContactServiceError> {
    let Json(body) = body.map_err(|_| ContactServiceError::InvalidBody)?;
    let form = validate_contact(RawContact {
        name: body.name,
        email: body.email,
        message: body.message,
    })
    .map_err(ContactServiceError::Validation)?;

    let usecase = CreateSubmissionUseCase {
        repo: state.connected_submission_repo(),
        notifier: state.notifier.clone(),
    };
    let outcome = usecase.execute(form).await;

    let message = if outcome.email_sent {
        "Message sent successfully!"
    } else {
        "Message received successfully!"
    };
    Ok(Json(CreateSubmissionResponse {
        success: true,
        message,
        id: outcome.id.map(|id| id.to_string()),
        saved_to_database: outcome.saved_to_database,
        email_sent: outcome.email_sent,
    }))
}

// ── GET /submissions ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct SubmissionListResponse {
    pub success: bool,
    pub data: Vec<SubmissionResponse>,
    pub pagination: Pagination,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    filter: Result<Query<StatusFilter>, QueryRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<SubmissionListResponse>, ContactServiceError> {
    let repo = state.submission_repo()?;
    let Query(filter) = filter.map_err(|_| ContactServiceError::InvalidQuery)?;
    let Query(page) = page.map_err(|_| ContactServiceError::InvalidQuery)?;

    let status = match filter.status.as_deref() {
        None | Some("") => None,
        raw => Some(parse_status(raw)?),
    };

    let usecase = ListSubmissionsUseCase { repo };
    let (items, pagination) = usecase.execute(status, page).await?;
    Ok(Json(SubmissionListResponse {
        success: true,
        data: items.into_iter().map(SubmissionResponse::from).collect(),
        pagination,
    }))
}

// ── GET /submissions/{id} ────────────────────────────────────────────────────

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<SubmissionResponse>>, ContactServiceError> {
    let repo = state.submission_repo()?;
    let id = parse_submission_id(&id)?;
    let usecase = GetSubmissionUseCase { repo };
    let submission = usecase.execute(id).await?;
    Ok(DataResponse::ok(submission.into()))
}

// ── PATCH /submissions/{id} ──────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_submission_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<DataResponse<SubmissionResponse>>, ContactServiceError> {
    let repo = state.submission_repo()?;
    let id = parse_submission_id(&id)?;
    let Json(body) = body.map_err(|_| ContactServiceError::InvalidStatus)?;
    let usecase = UpdateSubmissionStatusUseCase { repo };
    let submission = usecase
        .execute(
            id,
            UpdateStatusInput {
                status: body.status,
            },
        )
        .await?;
    Ok(DataResponse::ok(submission.into()))
}

// ── DELETE /submissions/{id} ─────────────────────────────────────────────────

pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ContactServiceError> {
    let repo = state.submission_repo()?;
    let id = parse_submission_id(&id)?;
    let usecase = DeleteSubmissionUseCase { repo };
    usecase.execute(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Submission deleted",
    }))
}

// ── GET /submissions/stats ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub new: u64,
    pub read: u64,
    pub replied: u64,
    pub archived: u64,
}

impl From<SubmissionStats> for StatsResponse {
    fn from(stats: SubmissionStats) -> Self {
        Self {
            total: stats.total,
            new: stats.new,
            read: stats.read,
            replied: stats.replied,
            archived: stats.archived,
        }
    }
}

pub async fn submission_stats(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<StatsResponse>>, ContactServiceError> {
    let usecase = SubmissionStatsUseCase {
        repo: state.submission_repo()?,
    };
    let stats = usecase.execute().await?;
    Ok(DataResponse::ok(stats.into()))
}
