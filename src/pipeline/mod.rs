//! Background orchestrators for the three pipeline variants.
//!
//! Each orchestrator advances a task record through its stages, persisting
//! stage/progress/artifacts at every boundary, and converts any error into a
//! terminal `failed` state on that one record. Nothing below this layer
//! crashes a worker.

mod article;
mod brief;
mod run;
mod source_analysis;

use std::sync::Arc;

use tracing::error;

use crate::config::Settings;
use crate::constants::STAGE_FAILED;
use crate::core::{TaskPatch, TaskRecord, TaskStatus};
use crate::db::{Database, TaskRepository, UserRepository, UserSettings};
use crate::errors::Error;
use crate::llm::LlmClient;

pub use article::*;
pub use brief::*;
pub use run::*;
pub use source_analysis::*;

/// Shared handles every orchestrator needs; constructed once in `main` and
/// cloned into each worker.
#[derive(Clone)]
pub struct PipelineContext {
    pub db: Database,
    pub settings: Arc<Settings>,
    pub llm: Arc<LlmClient>,
}

/// Applies a patch to a task record, propagating store failures.
pub(crate) fn update_task(
    ctx: &PipelineContext,
    task_id: &str,
    patch: TaskPatch,
) -> Result<TaskRecord, Error> {
    let mut conn = ctx.db.get_conn()?;
    let mut repo = TaskRepository::new(&mut conn);
    repo.update_task(task_id, patch)
}

/// Loads the record a worker is processing; the id came from the enqueue
/// path so a miss is a store-level inconsistency.
pub(crate) fn load_task(ctx: &PipelineContext, task_id: &str) -> Result<TaskRecord, Error> {
    let mut conn = ctx.db.get_conn()?;
    let mut repo = TaskRepository::new(&mut conn);
    repo.get_task_by_id(task_id)?
        .ok_or_else(|| Error::StoreError(format!("Task {} not found", task_id)))
}

/// Brand/prompt customization for a record's owner, with empty defaults when
/// the owner has no settings row.
pub(crate) fn owner_settings(ctx: &PipelineContext, owner_id: &str) -> Option<UserSettings> {
    let mut conn = match ctx.db.get_conn() {
        Ok(conn) => conn,
        Err(err) => {
            error!("Failed to load owner settings: {}", err);
            return None;
        }
    };
    let mut repo = UserRepository::new(&mut conn);
    repo.get_user_settings(owner_id).ok().flatten()
}

/// Terminal failure path shared by all orchestrators: record the message and
/// stop. A store failure here can only be logged.
pub(crate) fn fail_task(ctx: &PipelineContext, task_id: &str, err: &Error) {
    error!(task_id, "Pipeline failed: {}", err);
    let patch = TaskPatch::new()
        .status(TaskStatus::Failed)
        .stage(STAGE_FAILED)
        .progress(100)
        .error(&err.to_string());
    if let Err(store_err) = update_task(ctx, task_id, patch) {
        error!(task_id, "Failed to record pipeline failure: {}", store_err);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::PipelineContext;
    use crate::db::Database;
    use crate::llm::{ChatMessage, LlmClient, LlmProvider};
    use crate::utils::random_hex;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Deterministic stand-in for a model backend: echoes the tail of the
    /// prompt so assertions can check which path produced the text.
    #[derive(Debug)]
    pub struct StubProvider;

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn complete(
            &self,
            model: &str,
            messages: Vec<ChatMessage>,
        ) -> Result<String, crate::errors::Error> {
            let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            let head: String = prompt.chars().take(60).collect();
            Ok(format!("[{}] {}", model, head))
        }
    }

    /// In-memory database, stubbed model and a throwaway export directory.
    pub fn stub_context(tag: &str) -> PipelineContext {
        let mut settings = crate::config::Settings::from_env();
        settings.export_dir = std::env::temp_dir()
            .join(format!("seoforge-test-{}-{}", tag, random_hex(4)))
            .to_string_lossy()
            .into_owned();
        PipelineContext {
            db: Database::new(":memory:"),
            settings: Arc::new(settings),
            llm: Arc::new(LlmClient::with_provider(Box::new(StubProvider))),
        }
    }
}
