use serde::Serialize;

use crate::core::{Artifacts, TaskKind, TaskStatus};

/// A persisted unit of pipeline work, as seen by orchestrators and the API.
///
/// Rows are stored flat in sqlite (see `db::models::TaskRow`); this is the
/// decoded form with typed status, kind and artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: String,
    pub owner_id: String,
    pub kind: TaskKind,
    pub query: String,
    pub status: TaskStatus,
    pub stage: String,
    pub progress_percent: i32,
    pub error: Option<String>,
    pub artifacts: Artifacts,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update applied to a task record.
///
/// Only supplied fields are touched; `updated_at` is always refreshed by the
/// repository. `error` is doubly optional so a patch can explicitly clear it
/// (`Some(None)`) when a run starts.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub stage: Option<String>,
    pub progress_percent: Option<i32>,
    pub error: Option<Option<String>>,
    pub artifacts: Option<Artifacts>,
}

impl TaskPatch {
    pub fn new() -> Self {
        TaskPatch::default()
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stage(mut self, stage: &str) -> Self {
        self.stage = Some(stage.to_string());
        self
    }

    pub fn progress(mut self, percent: i32) -> Self {
        self.progress_percent = Some(percent);
        self
    }

    pub fn error(mut self, message: &str) -> Self {
        self.error = Some(Some(message.to_string()));
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }

    pub fn artifacts(mut self, artifacts: Artifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }
}
