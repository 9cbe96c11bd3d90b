use crate::core::{Artifacts, TaskKind, TaskRecord, TaskStatus};
use crate::errors::Error;
use crate::schema::{sessions, tasks, user_settings, users};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::Serialize;

/// Flat task row as stored in sqlite. Status, kind and the artifacts JSON
/// blob are decoded into [`TaskRecord`] before leaving the db layer.
///
/// `treat_none_as_null` lets an update clear the error column when a run
/// restarts; the repository rewrites whole rows, never partial changesets.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    pub id: String,
    pub owner_id: String,
    pub kind: String,
    pub query: String,
    pub status: String,
    pub stage: String,
    pub progress_percent: i32,
    pub error: Option<String>,
    pub artifacts: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskRow {
    pub fn into_record(self) -> Result<TaskRecord, Error> {
        let kind: TaskKind = self
            .kind
            .parse()
            .map_err(|_| Error::StoreError(format!("Unknown task kind '{}'", self.kind)))?;
        let status: TaskStatus = self
            .status
            .parse()
            .map_err(|_| Error::StoreError(format!("Unknown task status '{}'", self.status)))?;
        let artifacts: Artifacts = serde_json::from_str(&self.artifacts)?;
        if artifacts.kind() != kind {
            return Err(Error::StoreError(format!(
                "Task {} carries {} artifacts but is a {} record",
                self.id,
                artifacts.kind(),
                kind
            )));
        }

        Ok(TaskRecord {
            id: self.id,
            owner_id: self.owner_id,
            kind,
            query: self.query,
            status,
            stage: self.stage,
            progress_percent: self.progress_percent,
            error: self.error,
            artifacts,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Registered account row.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: String,
}

impl User {
    pub fn into_public(self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

/// Account shape exposed over the API; never carries credential material.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

/// Opaque session token row.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Per-owner brand and prompt customization consumed by the brief builder
/// and writer.
#[derive(Debug, Clone, Queryable, Identifiable, Insertable, AsChangeset, Serialize)]
#[diesel(table_name = user_settings)]
#[diesel(primary_key(user_id))]
pub struct UserSettings {
    pub user_id: String,
    pub name: String,
    pub brand_name: String,
    pub brand_url: String,
    pub brief_prompt_override: String,
    pub writer_prompt_override: String,
    pub updated_at: String,
}
