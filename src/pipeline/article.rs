use tracing::info;

use crate::constants::{
    STAGE_BUILDING_INTERNAL_BRIEF, STAGE_COLLECTING_SOURCES, STAGE_COMPLETED,
    STAGE_EXPORTING_OUTPUT, STAGE_WRITING_ARTICLE,
};
use crate::core::{ArticleArtifacts, Artifacts, SourceInputs, TaskPatch, TaskStatus};
use crate::errors::Error;
use crate::pipeline::{
    build_source_analysis, fail_task, load_task, owner_settings, update_task, PipelineContext,
    SourceOutcome,
};
use crate::services::brief_builder::{build_brief, build_brief_from_query};
use crate::services::exporter::export_to_local_doc;
use crate::services::writer::write_article_from_brief;

/// Splits a loaded record into the artifacts the HTTP layer seeded at
/// creation (mode, brief back-reference) and its owner id.
fn article_record(
    ctx: &PipelineContext,
    task_id: &str,
) -> Result<(ArticleArtifacts, String), Error> {
    let record = load_task(ctx, task_id)?;
    match record.artifacts {
        Artifacts::Article(artifacts) => Ok((artifacts, record.owner_id)),
        _ => Err(Error::StoreError(format!(
            "Task {} is not an article record",
            task_id
        ))),
    }
}

/// Writes an article from an existing brief (persisted or caller-supplied).
/// The source brief record, when there is one, is never mutated.
pub async fn process_article_from_brief(
    ctx: &PipelineContext,
    task_id: &str,
    query: &str,
    source_brief_id: Option<String>,
    brief_markdown: &str,
) {
    if let Err(err) =
        article_from_brief_inner(ctx, task_id, query, source_brief_id, brief_markdown).await
    {
        fail_task(ctx, task_id, &err);
    }
}

async fn article_from_brief_inner(
    ctx: &PipelineContext,
    task_id: &str,
    query: &str,
    source_brief_id: Option<String>,
    brief_markdown: &str,
) -> Result<(), Error> {
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Running)
            .stage(STAGE_WRITING_ARTICLE)
            .progress(15)
            .clear_error(),
    )?;

    let (mut artifacts, owner_id) = article_record(ctx, task_id)?;
    let settings = owner_settings(ctx, &owner_id);
    let (brand_name, brand_url, writer_override) = settings
        .map(|s| (s.brand_name, s.brand_url, s.writer_prompt_override))
        .unwrap_or_default();

    let article_markdown = write_article_from_brief(
        &ctx.llm,
        &ctx.settings,
        query,
        brief_markdown,
        &brand_name,
        &brand_url,
        &writer_override,
    )
    .await?;
    artifacts.source_brief_id = source_brief_id;
    artifacts.source_brief_markdown = brief_markdown.to_string();
    artifacts.article_markdown = article_markdown.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_EXPORTING_OUTPUT)
            .progress(90)
            .artifacts(Artifacts::Article(artifacts.clone())),
    )?;

    let slug_query = if query.is_empty() { "content-article" } else { query };
    let export_link =
        export_to_local_doc(&ctx.settings.export_dir, slug_query, &article_markdown).await?;
    artifacts.export_link = Some(export_link);

    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Completed)
            .stage(STAGE_COMPLETED)
            .progress(100)
            .artifacts(Artifacts::Article(artifacts)),
    )?;
    info!(task_id, "Article pipeline completed");
    Ok(())
}

/// Quick draft: the full collect-to-write chain inline, building an internal
/// brief that is never persisted as its own record.
pub async fn process_quick_draft(ctx: &PipelineContext, task_id: &str, inputs: SourceInputs) {
    if let Err(err) = quick_draft_inner(ctx, task_id, &inputs).await {
        fail_task(ctx, task_id, &err);
    }
}

async fn quick_draft_inner(
    ctx: &PipelineContext,
    task_id: &str,
    inputs: &SourceInputs,
) -> Result<(), Error> {
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Running)
            .stage(STAGE_COLLECTING_SOURCES)
            .progress(10)
            .clear_error(),
    )?;

    let (mut artifacts, owner_id) = article_record(ctx, task_id)?;
    let settings = owner_settings(ctx, &owner_id);
    let (brand_name, brand_url, brief_override, writer_override) = settings
        .map(|s| {
            (
                s.brand_name,
                s.brand_url,
                s.brief_prompt_override,
                s.writer_prompt_override,
            )
        })
        .unwrap_or_default();

    let brief_markdown = match build_source_analysis(ctx, inputs).await? {
        SourceOutcome::Analyzed(analysis) => {
            update_task(
                ctx,
                task_id,
                TaskPatch::new()
                    .stage(STAGE_BUILDING_INTERNAL_BRIEF)
                    .progress(72),
            )?;
            build_brief(
                &ctx.llm,
                &ctx.settings,
                &inputs.query,
                &analysis.summaries,
                &analysis.seo_analysis,
                &brand_name,
                &brand_url,
                &brief_override,
            )
            .await?
        }
        SourceOutcome::NoUsableSources { reason } => {
            info!(task_id, reason = %reason, "Degrading to query-only draft");
            update_task(
                ctx,
                task_id,
                TaskPatch::new()
                    .stage(STAGE_BUILDING_INTERNAL_BRIEF)
                    .progress(72),
            )?;
            build_brief_from_query(
                &ctx.llm,
                &ctx.settings,
                &inputs.query,
                &brand_name,
                &brand_url,
                &brief_override,
            )
            .await?
        }
    };

    artifacts.source_brief_id = None;
    artifacts.source_brief_markdown = brief_markdown.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_WRITING_ARTICLE)
            .progress(84)
            .artifacts(Artifacts::Article(artifacts.clone())),
    )?;

    let article_markdown = write_article_from_brief(
        &ctx.llm,
        &ctx.settings,
        &inputs.query,
        &brief_markdown,
        &brand_name,
        &brand_url,
        &writer_override,
    )
    .await?;
    artifacts.article_markdown = article_markdown.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_EXPORTING_OUTPUT)
            .progress(95)
            .artifacts(Artifacts::Article(artifacts.clone())),
    )?;

    let slug_query = if inputs.query.is_empty() {
        "quick-draft"
    } else {
        inputs.query.as_str()
    };
    let export_link =
        export_to_local_doc(&ctx.settings.export_dir, slug_query, &article_markdown).await?;
    artifacts.export_link = Some(export_link);

    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Completed)
            .stage(STAGE_COMPLETED)
            .progress(100)
            .artifacts(Artifacts::Article(artifacts)),
    )?;
    info!(task_id, "Quick draft pipeline completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArticleMode, TaskKind};
    use crate::db::TaskRepository;
    use crate::pipeline::tests::stub_context;

    #[tokio::test]
    async fn quick_draft_without_sources_completes_with_export() {
        let ctx = stub_context("quick-draft");
        let task = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .create_task(
                    "owner-1",
                    TaskKind::Article,
                    "best espresso machines",
                    Artifacts::Article(ArticleArtifacts::new(ArticleMode::QuickDraft)),
                )
                .unwrap()
        };

        let inputs = SourceInputs {
            query: "best espresso machines".to_string(),
            seed_urls: Vec::new(),
            ai_citations_text: String::new(),
            ai_overview_text: String::new(),
        };
        process_quick_draft(&ctx, &task.id, inputs).await;

        let record = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .get_task_by_id(&task.id)
                .unwrap()
                .unwrap()
        };
        assert_eq!(record.status, TaskStatus::Completed);
        let Artifacts::Article(artifacts) = record.artifacts else {
            panic!("expected article artifacts");
        };
        assert_eq!(artifacts.mode, ArticleMode::QuickDraft);
        assert!(artifacts.source_brief_id.is_none());
        assert!(!artifacts.source_brief_markdown.is_empty());
        assert!(!artifacts.article_markdown.is_empty());

        let export_link = artifacts.export_link.expect("export link set");
        assert!(std::path::Path::new(&export_link).exists());

        tokio::fs::remove_dir_all(&ctx.settings.export_dir)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn article_from_custom_brief_completes() {
        let ctx = stub_context("custom-brief");
        let task = {
            let mut conn = ctx.db.get_conn().unwrap();
            let mut artifacts = ArticleArtifacts::new(ArticleMode::FromCustomBrief);
            artifacts.source_brief_markdown = "# My Brief\nWrite about espresso.".to_string();
            TaskRepository::new(&mut conn)
                .create_task(
                    "owner-1",
                    TaskKind::Article,
                    "espresso guide",
                    Artifacts::Article(artifacts),
                )
                .unwrap()
        };

        process_article_from_brief(
            &ctx,
            &task.id,
            "espresso guide",
            None,
            "# My Brief\nWrite about espresso.",
        )
        .await;

        let record = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .get_task_by_id(&task.id)
                .unwrap()
                .unwrap()
        };
        assert_eq!(record.status, TaskStatus::Completed);
        let Artifacts::Article(artifacts) = record.artifacts else {
            panic!("expected article artifacts");
        };
        assert_eq!(artifacts.mode, ArticleMode::FromCustomBrief);
        assert!(artifacts.source_brief_id.is_none());
        assert!(!artifacts.article_markdown.is_empty());

        tokio::fs::remove_dir_all(&ctx.settings.export_dir)
            .await
            .unwrap();
    }
}
