pub mod articles;
pub mod auth;
pub mod briefs;
pub mod runs;
pub mod settings;

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::api::errors::{api_error, ApiError};
use crate::constants::STAGE_FAILED;
use crate::core::{PipelineJob, PipelineQueue, TaskPatch, TaskStatus};
use crate::db::TaskRepository;

/// Upper bound on list endpoints; clients poll recent records, not history.
pub(crate) const LIST_LIMIT: i64 = 50;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Hands a created record to the worker pool. When the queue is full the
/// record is marked failed (it will never be picked up) and the caller gets
/// a 503 to retry later.
pub(crate) fn enqueue_or_fail(
    repo: &mut TaskRepository<'_>,
    queue: &PipelineQueue,
    job: PipelineJob,
) -> Result<(), ApiError> {
    let task_id = job.task_id().to_string();
    if let Err(err) = queue.enqueue(job) {
        let patch = TaskPatch::new()
            .status(TaskStatus::Failed)
            .stage(STAGE_FAILED)
            .progress(100)
            .error(&err.to_string());
        if let Err(store_err) = repo.update_task(&task_id, patch) {
            tracing::error!(task_id = %task_id, "Failed to fail rejected task: {}", store_err);
        }
        return Err(api_error(StatusCode::SERVICE_UNAVAILABLE, &err.to_string()));
    }
    Ok(())
}
