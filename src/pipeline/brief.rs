use tracing::info;

use crate::constants::{
    FALLBACK_ANALYSIS_NOTE, STAGE_BUILDING_BRIEF, STAGE_COLLECTING_SOURCES, STAGE_COMPLETED,
};
use crate::core::{Artifacts, BriefArtifacts, SourceInputs, TaskPatch, TaskStatus};
use crate::errors::Error;
use crate::pipeline::{
    build_source_analysis, fail_task, load_task, owner_settings, update_task, PipelineContext,
    SourceOutcome,
};
use crate::services::brief_builder::{build_brief, build_brief_from_query};

/// Brief pipeline: source analysis followed by an editable markdown brief.
/// Degrades to a query-only brief when no sources qualify.
pub async fn process_brief(ctx: &PipelineContext, task_id: &str, inputs: SourceInputs) {
    if let Err(err) = brief_inner(ctx, task_id, &inputs).await {
        fail_task(ctx, task_id, &err);
    }
}

async fn brief_inner(
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

    let record = load_task(ctx, task_id)?;
    let settings = owner_settings(ctx, &record.owner_id);
    let (brand_name, brand_url, prompt_override) = settings
        .map(|s| (s.brand_name, s.brand_url, s.brief_prompt_override))
        .unwrap_or_default();

    let artifacts = match build_source_analysis(ctx, inputs).await? {
        SourceOutcome::Analyzed(analysis) => {
            update_task(
                ctx,
                task_id,
                TaskPatch::new()
                    .stage(STAGE_BUILDING_BRIEF)
                    .progress(78)
                    .artifacts(Artifacts::Brief(BriefArtifacts {
                        sources: analysis.sources.clone(),
                        extracted_articles: analysis.extracted.clone(),
                        summaries: analysis.summaries.clone(),
                        seo_analysis: analysis.seo_analysis.clone(),
                        brief_markdown: String::new(),
                    })),
            )?;

            let brief_markdown = build_brief(
                &ctx.llm,
                &ctx.settings,
                &inputs.query,
                &analysis.summaries,
                &analysis.seo_analysis,
                &brand_name,
                &brand_url,
                &prompt_override,
            )
            .await?;

            BriefArtifacts {
                sources: analysis.sources,
                extracted_articles: analysis.extracted,
                summaries: analysis.summaries,
                seo_analysis: analysis.seo_analysis,
                brief_markdown,
            }
        }
        SourceOutcome::NoUsableSources { reason } => {
            info!(task_id, reason = %reason, "Degrading to query-only brief");
            update_task(
                ctx,
                task_id,
                TaskPatch::new().stage(STAGE_BUILDING_BRIEF).progress(78),
            )?;

            let brief_markdown = build_brief_from_query(
                &ctx.llm,
                &ctx.settings,
                &inputs.query,
                &brand_name,
                &brand_url,
                &prompt_override,
            )
            .await?;

            BriefArtifacts {
                seo_analysis: FALLBACK_ANALYSIS_NOTE.to_string(),
                brief_markdown,
                ..BriefArtifacts::default()
            }
        }
    };

    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Completed)
            .stage(STAGE_COMPLETED)
            .progress(100)
            .artifacts(Artifacts::Brief(artifacts)),
    )?;
    info!(task_id, "Brief pipeline completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskKind;
    use crate::db::TaskRepository;
    use crate::pipeline::tests::stub_context;

    #[tokio::test]
    async fn brief_without_sources_degrades_to_query_only() {
        let ctx = stub_context("brief-fallback");
        let task = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .create_task(
                    "owner-1",
                    TaskKind::Brief,
                    "best espresso machines",
                    Artifacts::Brief(BriefArtifacts::default()),
                )
                .unwrap()
        };

        let inputs = SourceInputs {
            query: "best espresso machines".to_string(),
            seed_urls: Vec::new(),
            ai_citations_text: "no links here".to_string(),
            ai_overview_text: String::new(),
        };
        process_brief(&ctx, &task.id, inputs).await;

        let record = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .get_task_by_id(&task.id)
                .unwrap()
                .unwrap()
        };
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.progress_percent, 100);
        assert!(record.error.is_none());

        let Artifacts::Brief(artifacts) = record.artifacts else {
            panic!("expected brief artifacts");
        };
        assert!(artifacts.sources.is_empty());
        assert!(!artifacts.brief_markdown.is_empty());
        assert_eq!(artifacts.seo_analysis, FALLBACK_ANALYSIS_NOTE);
    }
}
