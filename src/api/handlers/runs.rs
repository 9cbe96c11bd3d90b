use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::errors::{api_error, internal_error, ApiError};
use crate::api::handlers::{enqueue_or_fail, LIST_LIMIT};
use crate::constants::MIN_QUERY_CHARS;
use crate::core::{
    Artifacts, PipelineJob, PipelineQueue, RunArtifacts, SourceInputs, TaskKind, TaskRecord,
};
use crate::db::{Database, TaskRepository};

/// Create payload shared by runs and briefs.
#[derive(Debug, Deserialize)]
pub struct RunCreateRequest {
    pub query: String,
    #[serde(default)]
    pub seed_urls: Vec<String>,
    #[serde(default)]
    pub ai_citations_text: String,
    #[serde(default)]
    pub ai_overview_text: String,
}

impl RunCreateRequest {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        if self.query.trim().chars().count() < MIN_QUERY_CHARS {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "query must be at least 3 characters",
            ));
        }
        Ok(())
    }

    pub(crate) fn source_inputs(&self) -> SourceInputs {
        SourceInputs {
            query: self.query.trim().to_string(),
            seed_urls: self.seed_urls.clone(),
            ai_citations_text: self.ai_citations_text.clone(),
            ai_overview_text: self.ai_overview_text.clone(),
        }
    }
}

#[axum::debug_handler]
pub async fn create_run(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
    Extension(queue): Extension<PipelineQueue>,
    Json(payload): Json<RunCreateRequest>,
) -> Result<Json<TaskRecord>, ApiError> {
    payload.validate()?;

    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let record = repo
        .create_task(
            &user.id,
            TaskKind::Run,
            payload.query.trim(),
            Artifacts::Run(RunArtifacts::default()),
        )
        .map_err(internal_error)?;

    enqueue_or_fail(
        &mut repo,
        &queue,
        PipelineJob::Run {
            task_id: record.id.clone(),
            inputs: payload.source_inputs(),
        },
    )?;

    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn list_runs(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let records = repo
        .list_tasks(&user.id, TaskKind::Run, LIST_LIMIT)
        .map_err(internal_error)?;
    Ok(Json(records))
}

#[axum::debug_handler]
pub async fn get_run(
    CurrentUser(user): CurrentUser,
    Path(run_id): Path<String>,
    Extension(database): Extension<Database>,
) -> Result<Json<TaskRecord>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let record = repo
        .get_task(&user.id, TaskKind::Run, &run_id)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Run not found"))?;
    Ok(Json(record))
}
