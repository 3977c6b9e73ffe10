use std::time::Duration;

use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, IntoActiveModel as _, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};

use folio_contact_schema::submissions;
use folio_domain::id::SubmissionId;
use folio_domain::pagination::PageRequest;
use folio_domain::submission::SubmissionStatus;

use crate::config::ContactConfig;
use crate::domain::repository::SubmissionRepository;
use crate::domain::types::{NewSubmission, Submission, SubmissionPage, SubmissionStats};
use crate::error::ContactServiceError;

/// Pool options for the contact database. `None` when no URL is configured.
pub fn connect_options(config: &ContactConfig) -> Option<ConnectOptions> {
    let url = config.database_url.as_ref()?;
    let timeout = Duration::from_secs(config.database_connect_timeout_secs);
    let mut options = ConnectOptions::new(url.clone());
    options
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .max_connections(10)
        .sqlx_logging(false);
    Some(options)
}

#[derive(Clone)]
pub struct DbSubmissionRepository {
    pub db: DatabaseConnection,
}

impl SubmissionRepository for DbSubmissionRepository {
    async fn create(&self, submission: &NewSubmission) -> Result<Submission, ContactServiceError> {
        let model = submissions::ActiveModel {
            id: Set(SubmissionId::generate().0),
            name: Set(submission.form.name.clone()),
            email: Set(submission.form.email.clone()),
            message: Set(submission.form.message.clone()),
            status: Set(submission.status.as_str().to_owned()),
            created_at: Set(submission.created_at),
            updated_at: Set(submission.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert submission")?;
        submission_from_model(model)
    }

    async fn list(
        &self,
        status: Option<SubmissionStatus>,
        page: PageRequest,
    ) -> Result<SubmissionPage, ContactServiceError> {
        let page = page.clamped();
        let mut query = submissions::Entity::find();
        if let Some(status) = status {
            query = query.filter(submissions::Column::Status.eq(status.as_str()));
        }
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count submissions")?;
        let models = query
            .order_by_desc(submissions::Column::CreatedAt)
            .order_by_desc(submissions::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list submissions")?;
        let items = models
            .into_iter()
            .map(submission_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SubmissionPage { items, total })
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, ContactServiceError> {
        let model = submissions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find submission by id")?;
        model.map(submission_from_model).transpose()
    }

    async fn update_status(
        &self,
        id: SubmissionId,
        status: SubmissionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Submission>, ContactServiceError> {
        let Some(existing) = submissions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find submission for status update")?
        else {
            return Ok(None);
        };
        let mut submission = existing.into_active_model();
        submission.status = Set(status.as_str().to_owned());
        submission.updated_at = Set(updated_at);
        match submission.update(&self.db).await {
            Ok(model) => submission_from_model(model).map(Some),
            // deleted between the lookup and the update
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context("update submission status")
                .into()),
        }
    }

    async fn delete(&self, id: SubmissionId) -> Result<bool, ContactServiceError> {
        let result = submissions::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete submission")?;
        Ok(result.rows_affected > 0)
    }

    async fn stats(&self) -> Result<SubmissionStats, ContactServiceError> {
        let rows = submissions::Entity::find()
            .select_only()
            .column(submissions::Column::Status)
            .column_as(
                SimpleExpr::FunctionCall(Func::count(Expr::col(submissions::Column::Id))),
                "count",
            )
            .group_by(submissions::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await
            .context("count submissions by status")?;

        let counts = rows
            .into_iter()
            .map(|row| {
                let status = parse_stored_status(&row.status)?;
                Ok((status, u64::try_from(row.count).unwrap_or_default()))
            })
            .collect::<Result<Vec<_>, ContactServiceError>>()?;
        Ok(SubmissionStats::from_counts(counts))
    }
}

#[derive(Debug, FromQueryResult)]
struct StatusCount {
    status: String,
    count: i64,
}

fn parse_stored_status(raw: &str) -> Result<SubmissionStatus, ContactServiceError> {
    raw.parse()
        .map_err(|e| ContactServiceError::Internal(anyhow!("corrupt submission row: {e}")))
}

fn submission_from_model(model: submissions::Model) -> Result<Submission, ContactServiceError> {
    Ok(Submission {
        id: SubmissionId(model.id),
        status: parse_stored_status(&model.status)?,
        name: model.name,
        email: model.email,
        message: model.message,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
