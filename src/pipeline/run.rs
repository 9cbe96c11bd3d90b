use tracing::info;

use crate::constants::{
    STAGE_ANALYZING_COMPETITORS, STAGE_COLLECTING_SOURCES, STAGE_COMPLETED,
    STAGE_EXPORTING_OUTPUT, STAGE_EXTRACTING_CONTENT, STAGE_SUMMARIZING_SOURCES,
    STAGE_WRITING_ARTICLE,
};
use crate::core::{Artifacts, RunArtifacts, SourceInputs, TaskPatch, TaskStatus};
use crate::errors::Error;
use crate::pipeline::{fail_task, update_task, PipelineContext};
use crate::services::analyzer::analyze_summaries;
use crate::services::exporter::export_to_local_doc;
use crate::services::extractor::extract_all;
use crate::services::source_collector::collect_seed_urls;
use crate::services::summarizer::summarize_article;
use crate::services::url_validator::select_top_urls;
use crate::services::writer::write_article;

/// Full run: collect -> extract -> summarize -> analyze -> write -> export.
///
/// Unlike the brief and quick-draft pipelines there is no query-only
/// fallback; a run without usable sources fails.
pub async fn process_run(ctx: &PipelineContext, task_id: &str, inputs: SourceInputs) {
    if let Err(err) = run_inner(ctx, task_id, &inputs).await {
        fail_task(ctx, task_id, &err);
    }
}

async fn run_inner(
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

    let candidates = collect_seed_urls(
        &inputs.query,
        &inputs.seed_urls,
        &inputs.ai_citations_text,
        &inputs.ai_overview_text,
    );
    let top_urls = select_top_urls(&candidates, ctx.settings.max_urls);
    if top_urls.is_empty() {
        return Err(Error::PipelineError(
            "No qualifying URLs found. Provide seed URLs or citation text containing links."
                .to_string(),
        ));
    }

    let mut artifacts = RunArtifacts {
        sources: top_urls.clone(),
        ..RunArtifacts::default()
    };
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_EXTRACTING_CONTENT)
            .progress(30)
            .artifacts(Artifacts::Run(artifacts.clone())),
    )?;

    let extracted = extract_all(&top_urls).await;
    if extracted.is_empty() {
        return Err(Error::PipelineError(
            "Could not extract content from selected URLs.".to_string(),
        ));
    }
    artifacts.extracted_articles = extracted.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_SUMMARIZING_SOURCES)
            .progress(55)
            .artifacts(Artifacts::Run(artifacts.clone())),
    )?;

    let mut summaries = Vec::with_capacity(extracted.len());
    for article in &extracted {
        summaries.push(summarize_article(&ctx.llm, &ctx.settings, article).await?);
    }
    artifacts.summaries = summaries.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_ANALYZING_COMPETITORS)
            .progress(70)
            .artifacts(Artifacts::Run(artifacts.clone())),
    )?;

    let seo_analysis =
        analyze_summaries(&ctx.llm, &ctx.settings, &inputs.query, &summaries).await?;
    artifacts.seo_analysis = seo_analysis.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_WRITING_ARTICLE)
            .progress(82)
            .artifacts(Artifacts::Run(artifacts.clone())),
    )?;

    let article_markdown = write_article(&ctx.llm, &ctx.settings, &inputs.query, &seo_analysis).await?;
    artifacts.article_markdown = article_markdown.clone();
    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .stage(STAGE_EXPORTING_OUTPUT)
            .progress(92)
            .artifacts(Artifacts::Run(artifacts.clone())),
    )?;

    let export_link =
        export_to_local_doc(&ctx.settings.export_dir, &inputs.query, &article_markdown).await?;
    artifacts.export_link = Some(export_link);

    update_task(
        ctx,
        task_id,
        TaskPatch::new()
            .status(TaskStatus::Completed)
            .stage(STAGE_COMPLETED)
            .progress(100)
            .artifacts(Artifacts::Run(artifacts)),
    )?;
    info!(task_id, "Run pipeline completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskKind;
    use crate::db::TaskRepository;
    use crate::pipeline::tests::stub_context;

    /// Serves one competitor article page on a loopback port.
    async fn serve_competitor_page() -> String {
        use axum::{routing::get, Router};

        let html = format!(
            "<html><head><title>Competitor</title></head><body><article>{}</article></body></html>",
            "<p>espresso machines deliver consistent pressure and temperature for great shots</p>"
                .repeat(60)
        );
        let app = Router::new().route(
            "/a",
            get(move || {
                let html = html.clone();
                async move { axum::response::Html(html) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/a", addr)
    }

    #[tokio::test]
    async fn run_with_reachable_seed_completes_end_to_end() {
        let seed = serve_competitor_page().await;
        let ctx = stub_context("run-e2e");
        let task = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .create_task(
                    "owner-1",
                    TaskKind::Run,
                    "best espresso machines",
                    Artifacts::Run(RunArtifacts::default()),
                )
                .unwrap()
        };

        let inputs = SourceInputs {
            query: "best espresso machines".to_string(),
            seed_urls: vec![seed.clone()],
            ai_citations_text: String::new(),
            ai_overview_text: String::new(),
        };
        process_run(&ctx, &task.id, inputs).await;

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

        let Artifacts::Run(artifacts) = record.artifacts else {
            panic!("expected run artifacts");
        };
        assert_eq!(artifacts.sources, vec![seed]);
        assert_eq!(artifacts.extracted_articles.len(), 1);
        assert_eq!(artifacts.extracted_articles[0].title, "Competitor");
        assert!(!artifacts.summaries.is_empty());
        assert!(!artifacts.seo_analysis.is_empty());
        assert!(!artifacts.article_markdown.is_empty());

        let export_link = artifacts.export_link.expect("export link set");
        assert!(std::path::Path::new(&export_link).exists());

        tokio::fs::remove_dir_all(&ctx.settings.export_dir)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_without_qualifying_urls_fails() {
        let ctx = stub_context("run-no-urls");
        let task = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .create_task(
                    "owner-1",
                    TaskKind::Run,
                    "best espresso machines",
                    Artifacts::Run(RunArtifacts::default()),
                )
                .unwrap()
        };

        let inputs = SourceInputs {
            query: "best espresso machines".to_string(),
            seed_urls: vec!["https://reddit.com/r/espresso".to_string()],
            ai_citations_text: String::new(),
            ai_overview_text: String::new(),
        };
        process_run(&ctx, &task.id, inputs).await;

        let record = {
            let mut conn = ctx.db.get_conn().unwrap();
            TaskRepository::new(&mut conn)
                .get_task_by_id(&task.id)
                .unwrap()
                .unwrap()
        };
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.stage, "failed");
        assert_eq!(record.progress_percent, 100);
        assert!(record
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("No qualifying URLs"));
    }
}
