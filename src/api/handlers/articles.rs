use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::auth::CurrentUser;
use crate::api::errors::{api_error, internal_error, ApiError};
use crate::api::handlers::{enqueue_or_fail, LIST_LIMIT};
use crate::core::{
    ArticleArtifacts, ArticleMode, Artifacts, PipelineJob, PipelineQueue, SourceInputs, TaskKind,
    TaskRecord,
};
use crate::db::{Database, TaskRepository};

#[derive(Debug, Deserialize)]
pub struct ArticleCreateRequest {
    pub mode: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub seed_urls: Vec<String>,
    #[serde(default)]
    pub ai_citations_text: String,
    #[serde(default)]
    pub ai_overview_text: String,
    #[serde(default)]
    pub brief_id: Option<String>,
    #[serde(default)]
    pub custom_brief_markdown: String,
}

/// Creates an article record in one of three modes and schedules its
/// pipeline. Mode-specific validation happens here, before any background
/// work starts.
#[axum::debug_handler]
pub async fn create_article(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
    Extension(queue): Extension<PipelineQueue>,
    Json(payload): Json<ArticleCreateRequest>,
) -> Result<Json<TaskRecord>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);

    match payload.mode.as_str() {
        "from_brief" => {
            let Some(brief_id) = payload.brief_id.as_deref().filter(|id| !id.is_empty()) else {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "brief_id is required for from_brief mode",
                ));
            };
            let brief = repo
                .get_task(&user.id, TaskKind::Brief, brief_id)
                .map_err(internal_error)?
                .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Brief not found"))?;
            let brief_markdown = brief
                .artifacts
                .as_brief()
                .map(|b| b.brief_markdown.trim().to_string())
                .unwrap_or_default();
            if brief_markdown.is_empty() {
                return Err(api_error(StatusCode::BAD_REQUEST, "Brief content is empty"));
            }

            let mut artifacts = ArticleArtifacts::new(ArticleMode::FromBrief);
            artifacts.source_brief_id = Some(brief.id.clone());
            artifacts.source_brief_markdown = brief_markdown.clone();

            let record = repo
                .create_task(
                    &user.id,
                    TaskKind::Article,
                    &brief.query,
                    Artifacts::Article(artifacts),
                )
                .map_err(internal_error)?;

            enqueue_or_fail(
                &mut repo,
                &queue,
                PipelineJob::Article {
                    task_id: record.id.clone(),
                    query: brief.query.clone(),
                    source_brief_id: Some(brief.id),
                    brief_markdown,
                },
            )?;
            Ok(Json(record))
        }
        "from_custom_brief" => {
            let custom_brief = payload.custom_brief_markdown.trim().to_string();
            if custom_brief.is_empty() {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "custom_brief_markdown is required",
                ));
            }
            let query = payload.query.trim().to_string();
            if query.is_empty() {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "query is required for custom brief mode",
                ));
            }

            let mut artifacts = ArticleArtifacts::new(ArticleMode::FromCustomBrief);
            artifacts.source_brief_markdown = custom_brief.clone();

            let record = repo
                .create_task(&user.id, TaskKind::Article, &query, Artifacts::Article(artifacts))
                .map_err(internal_error)?;

            enqueue_or_fail(
                &mut repo,
                &queue,
                PipelineJob::Article {
                    task_id: record.id.clone(),
                    query,
                    source_brief_id: None,
                    brief_markdown: custom_brief,
                },
            )?;
            Ok(Json(record))
        }
        "quick_draft" => {
            let query = payload.query.trim().to_string();
            if query.is_empty() {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "query is required for quick draft mode",
                ));
            }

            let record = repo
                .create_task(
                    &user.id,
                    TaskKind::Article,
                    &query,
                    Artifacts::Article(ArticleArtifacts::new(ArticleMode::QuickDraft)),
                )
                .map_err(internal_error)?;

            enqueue_or_fail(
                &mut repo,
                &queue,
                PipelineJob::QuickDraft {
                    task_id: record.id.clone(),
                    inputs: SourceInputs {
                        query,
                        seed_urls: payload.seed_urls.clone(),
                        ai_citations_text: payload.ai_citations_text.clone(),
                        ai_overview_text: payload.ai_overview_text.clone(),
                    },
                },
            )?;
            Ok(Json(record))
        }
        _ => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Unsupported article mode",
        )),
    }
}

#[axum::debug_handler]
pub async fn list_articles(
    CurrentUser(user): CurrentUser,
    Extension(database): Extension<Database>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let records = repo
        .list_tasks(&user.id, TaskKind::Article, LIST_LIMIT)
        .map_err(internal_error)?;
    Ok(Json(records))
}

#[axum::debug_handler]
pub async fn get_article(
    CurrentUser(user): CurrentUser,
    Path(article_id): Path<String>,
    Extension(database): Extension<Database>,
) -> Result<Json<TaskRecord>, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = TaskRepository::new(&mut conn);
    let record = repo
        .get_task(&user.id, TaskKind::Article, &article_id)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Article not found"))?;
    Ok(Json(record))
}
