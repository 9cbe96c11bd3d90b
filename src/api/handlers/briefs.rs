use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::errors::{api_error, internal_error, ApiError};
use crate::api::handlers::runs::RunCreateRequest;
use crate::api::handlers::{enqueue_or_fail, LIST_LIMIT};
use crate::constants::{MIN_BRIEF_MARKDOWN_CHARS, STAGE_EDITED_DRAFT};
use crate::core::{
    Artifacts, BriefArtifacts, PipelineJob, PipelineQueue, TaskKind, TaskPatch, TaskRecord,
};
use crate::db::{Database, TaskRepository};

#[derive(Debug, Deserialize)]
pub struct BriefUpdateRequest {
    pub brief_markdown: String,
}

#[axum::debug_handler]
pub async fn create_brief(
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
            TaskKind::Brief,
            payload.query.trim(),
            Artifacts::Brief(BriefArtifacts::default()),
        )
        .map_err(internal_error)?;

    enqueue_or_fail(
        &mut repo,
        &queue,
        PipelineJob::Brief {
            task_id: record.id.clone(),
            inputs: payload.source_inputs(),
        },
    )?;

    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn list_briefs(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let records = repo
        .list_tasks(&user.id, TaskKind::Brief, LIST_LIMIT)
        .map_err(internal_error)?;
    Ok(Json(records))
}

#[axum::debug_handler]
pub async fn get_brief(
    CurrentUser(user): CurrentUser,
    Path(brief_id): Path<String>,
    Extension(database): Extension<Database>,
) -> Result<Json<TaskRecord>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let record = repo
        .get_task(&user.id, TaskKind::Brief, &brief_id)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Brief not found"))?;
    Ok(Json(record))
}

/// Overwrites the editable brief markdown and marks the record as an edited
/// draft. Length is checked before the store is touched.
#[axum::debug_handler]
pub async fn update_brief(
    CurrentUser(user): CurrentUser,
    Path(brief_id): Path<String>,
    Extension(database): Extension<Database>,
    Json(payload): Json<BriefUpdateRequest>,
) -> Result<Json<TaskRecord>, ApiError> {
    if payload.brief_markdown.chars().count() < MIN_BRIEF_MARKDOWN_CHARS {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "brief_markdown must be at least 20 characters",
        ));
    }

    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let record = repo
        .get_task(&user.id, TaskKind::Brief, &brief_id)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Brief not found"))?;

    let Artifacts::Brief(mut artifacts) = record.artifacts else {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Record is not a brief",
        ));
    };
    artifacts.brief_markdown = payload.brief_markdown;

    let updated = repo
        .update_task(
            &record.id,
            TaskPatch::new()
                .stage(STAGE_EDITED_DRAFT)
                .artifacts(Artifacts::Brief(artifacts)),
        )
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "Unable to update brief"))?;
    Ok(Json(updated))
}
