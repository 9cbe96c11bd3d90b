use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::core::{Artifacts, TaskKind, TaskPatch, TaskRecord, TaskStatus};
use crate::db::models::TaskRow;
use crate::errors::Error;

/// Repository for the staged task records shared by all pipeline variants.
pub struct TaskRepository<'a> {
    pub conn: &'a mut SqliteConnection,
}

impl<'a> TaskRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        TaskRepository { conn }
    }

    /// Inserts a fresh `queued` record and returns its decoded form.
    pub fn create_task(
        &mut self,
        owner_id: &str,
        kind: TaskKind,
        query: &str,
        artifacts: Artifacts,
    ) -> Result<TaskRecord, Error> {
        use crate::schema::tasks;

        let now = Utc::now().to_rfc3339();
        let row = TaskRow {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            kind: kind.to_string(),
            query: query.to_string(),
            status: TaskStatus::Queued.to_string(),
            stage: TaskStatus::Queued.to_string(),
            progress_percent: 0,
            error: None,
            artifacts: serde_json::to_string(&artifacts)?,
            created_at: now.clone(),
            updated_at: now,
        };

        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(self.conn)?;

        row.into_record()
    }

    /// Owner- and kind-scoped lookup used by the API.
    pub fn get_task(
        &mut self,
        owner_id: &str,
        kind: TaskKind,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, Error> {
        use crate::schema::tasks;

        let row = tasks::table
            .filter(tasks::id.eq(task_id))
            .filter(tasks::owner_id.eq(owner_id))
            .filter(tasks::kind.eq(kind.as_str()))
            .first::<TaskRow>(self.conn)
            .optional()?;

        row.map(TaskRow::into_record).transpose()
    }

    /// Unscoped lookup for orchestrator-internal use; the worker holds the
    /// id it was handed at enqueue time and does not re-derive the owner.
    pub fn get_task_by_id(&mut self, task_id: &str) -> Result<Option<TaskRecord>, Error> {
        use crate::schema::tasks;

        let row = tasks::table
            .filter(tasks::id.eq(task_id))
            .first::<TaskRow>(self.conn)
            .optional()?;

        row.map(TaskRow::into_record).transpose()
    }

    /// Owner's records of one kind, newest first, bounded by `limit`.
    pub fn list_tasks(
        &mut self,
        owner_id: &str,
        kind: TaskKind,
        limit: i64,
    ) -> Result<Vec<TaskRecord>, Error> {
        use crate::schema::tasks;

        let rows = tasks::table
            .filter(tasks::owner_id.eq(owner_id))
            .filter(tasks::kind.eq(kind.as_str()))
            .order_by(tasks::created_at.desc())
            .limit(limit)
            .load::<TaskRow>(self.conn)?;

        rows.into_iter().map(TaskRow::into_record).collect()
    }

    /// Records still `queued` or `running`, across all owners. Used by the
    /// startup sweep that fails over interrupted work.
    pub fn list_unfinished(&mut self) -> Result<Vec<TaskRecord>, Error> {
        use crate::schema::tasks;

        let rows = tasks::table
            .filter(tasks::status.eq_any([
                TaskStatus::Queued.as_str(),
                TaskStatus::Running.as_str(),
            ]))
            .load::<TaskRow>(self.conn)?;

        rows.into_iter().map(TaskRow::into_record).collect()
    }

    /// Applies a partial update, touching only supplied fields.
    ///
    /// Enforced here rather than in callers: status transitions are
    /// forward-only, `progress_percent` never decreases, and `updated_at`
    /// is refreshed on every mutation. The read-modify-write runs inside a
    /// transaction so concurrent updates to the same record serialize.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<TaskRecord, Error> {
        use crate::schema::tasks;

        let task_id = task_id.to_string();
        let row = self.conn.transaction::<TaskRow, Error, _>(|conn| {
            let mut row = tasks::table
                .filter(tasks::id.eq(&task_id))
                .first::<TaskRow>(conn)
                .optional()?
                .ok_or_else(|| Error::StoreError(format!("Task {} not found", task_id)))?;

            if let Some(next) = patch.status {
                let current: TaskStatus = row.status.parse().map_err(|_| {
                    Error::StoreError(format!("Unknown task status '{}'", row.status))
                })?;
                if !current.can_transition(next) {
                    return Err(Error::StoreError(format!(
                        "Illegal status transition {} -> {} for task {}",
                        current, next, task_id
                    )));
                }
                row.status = next.to_string();
            }
            if let Some(stage) = &patch.stage {
                row.stage = stage.clone();
            }
            if let Some(percent) = patch.progress_percent {
                row.progress_percent = row.progress_percent.max(percent.clamp(0, 100));
            }
            if let Some(error) = &patch.error {
                row.error = error.clone();
            }
            if let Some(artifacts) = &patch.artifacts {
                if artifacts.kind().as_str() != row.kind {
                    return Err(Error::StoreError(format!(
                        "Refusing to store {} artifacts on {} record {}",
                        artifacts.kind(),
                        row.kind,
                        task_id
                    )));
                }
                row.artifacts = serde_json::to_string(artifacts)?;
            }
            row.updated_at = Utc::now().to_rfc3339();

            diesel::update(tasks::table.filter(tasks::id.eq(&task_id)))
                .set(&row)
                .execute(conn)?;

            Ok(row)
        })?;

        row.into_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BriefArtifacts, RunArtifacts};
    use crate::db::Database;

    fn test_db() -> Database {
        Database::new(":memory:")
    }

    #[test]
    fn create_then_get_returns_equal_record() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let created = repo
            .create_task(
                "owner-1",
                TaskKind::Run,
                "best espresso machines",
                Artifacts::Run(RunArtifacts::default()),
            )
            .unwrap();
        assert_eq!(created.status, TaskStatus::Queued);
        assert_eq!(created.progress_percent, 0);

        let fetched = repo
            .get_task("owner-1", TaskKind::Run, &created.id)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.query, created.query);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn get_is_owner_and_kind_scoped() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let created = repo
            .create_task(
                "owner-1",
                TaskKind::Brief,
                "query",
                Artifacts::Brief(BriefArtifacts::default()),
            )
            .unwrap();

        assert!(repo
            .get_task("owner-2", TaskKind::Brief, &created.id)
            .unwrap()
            .is_none());
        assert!(repo
            .get_task("owner-1", TaskKind::Run, &created.id)
            .unwrap()
            .is_none());
        assert!(repo.get_task_by_id(&created.id).unwrap().is_some());
    }

    #[test]
    fn list_returns_newest_first_with_limit() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let mut ids = Vec::new();
        for i in 0..3 {
            let record = repo
                .create_task(
                    "owner-1",
                    TaskKind::Run,
                    &format!("query {}", i),
                    Artifacts::Run(RunArtifacts::default()),
                )
                .unwrap();
            ids.push(record.id);
            // keep created_at strictly increasing
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let listed = repo.list_tasks("owner-1", TaskKind::Run, 2).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, ids[2]);
        assert_eq!(listed[1].id, ids[1]);
    }

    #[test]
    fn progress_never_decreases_and_updated_at_refreshes() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let created = repo
            .create_task(
                "owner-1",
                TaskKind::Run,
                "query",
                Artifacts::Run(RunArtifacts::default()),
            )
            .unwrap();

        let updated = repo
            .update_task(
                &created.id,
                TaskPatch::new().status(TaskStatus::Running).progress(40),
            )
            .unwrap();
        assert_eq!(updated.progress_percent, 40);
        assert!(updated.updated_at >= created.updated_at);

        let lowered = repo
            .update_task(&created.id, TaskPatch::new().progress(10))
            .unwrap();
        assert_eq!(lowered.progress_percent, 40);
        assert!(lowered.updated_at >= updated.updated_at);
    }

    #[test]
    fn terminal_records_cannot_be_resurrected() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let created = repo
            .create_task(
                "owner-1",
                TaskKind::Run,
                "query",
                Artifacts::Run(RunArtifacts::default()),
            )
            .unwrap();
        repo.update_task(&created.id, TaskPatch::new().status(TaskStatus::Running))
            .unwrap();
        repo.update_task(
            &created.id,
            TaskPatch::new()
                .status(TaskStatus::Failed)
                .error("fetch failed"),
        )
        .unwrap();

        let err = repo
            .update_task(&created.id, TaskPatch::new().status(TaskStatus::Running))
            .unwrap_err();
        assert!(err.to_string().contains("Illegal status transition"));
    }

    #[test]
    fn error_can_be_set_and_cleared() {
        let db = test_db();
        let mut conn = db.get_conn().unwrap();
        let mut repo = TaskRepository::new(&mut conn);

        let created = repo
            .create_task(
                "owner-1",
                TaskKind::Brief,
                "query",
                Artifacts::Brief(BriefArtifacts::default()),
            )
            .unwrap();

        let with_error = repo
            .update_task(&created.id, TaskPatch::new().error("boom"))
            .unwrap();
        assert_eq!(with_error.error.as_deref(), Some("boom"));

        let cleared = repo
            .update_task(
                &created.id,
                TaskPatch::new().status(TaskStatus::Running).clear_error(),
            )
            .unwrap();
        assert!(cleared.error.is_none());
    }
}
