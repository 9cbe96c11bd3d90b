use tracing::info;

use crate::core::{ArticleSummary, SourceInputs, UrlContent};
use crate::errors::Error;
use crate::pipeline::PipelineContext;
use crate::services::analyzer::analyze_summaries;
use crate::services::extractor::extract_all;
use crate::services::source_collector::collect_seed_urls;
use crate::services::summarizer::summarize_article;
use crate::services::url_validator::select_top_urls;

/// Everything the collect-to-analyze chain produced for one record.
#[derive(Debug, Clone)]
pub struct SourceAnalysis {
    pub sources: Vec<String>,
    pub extracted: Vec<UrlContent>,
    pub summaries: Vec<ArticleSummary>,
    pub seo_analysis: String,
}

/// Outcome of the shared source-analysis step.
///
/// Insufficient input is not an error: the brief and quick-draft pipelines
/// branch on `NoUsableSources` to degrade to query-only generation, while
/// the run pipeline treats it as fatal. Real failures (store, model) stay in
/// the `Err` channel.
#[derive(Debug)]
pub enum SourceOutcome {
    Analyzed(SourceAnalysis),
    NoUsableSources { reason: String },
}

/// Collects and filters candidate URLs, extracts their content concurrently,
/// summarizes each article and produces the competitive analysis.
pub async fn build_source_analysis(
    ctx: &PipelineContext,
    inputs: &SourceInputs,
) -> Result<SourceOutcome, Error> {
    let candidates = collect_seed_urls(
        &inputs.query,
        &inputs.seed_urls,
        &inputs.ai_citations_text,
        &inputs.ai_overview_text,
    );
    let top_urls = select_top_urls(&candidates, ctx.settings.max_urls);
    if top_urls.is_empty() {
        return Ok(SourceOutcome::NoUsableSources {
            reason: "No qualifying URLs found. Provide seed URLs or citation text containing links."
                .to_string(),
        });
    }

    let extracted = extract_all(&top_urls).await;
    if extracted.is_empty() {
        return Ok(SourceOutcome::NoUsableSources {
            reason: "Could not extract content from selected URLs.".to_string(),
        });
    }
    info!(
        selected = top_urls.len(),
        extracted = extracted.len(),
        "Source extraction finished"
    );

    let mut summaries = Vec::with_capacity(extracted.len());
    for article in &extracted {
        summaries.push(summarize_article(&ctx.llm, &ctx.settings, article).await?);
    }

    let seo_analysis =
        analyze_summaries(&ctx.llm, &ctx.settings, &inputs.query, &summaries).await?;

    Ok(SourceOutcome::Analyzed(SourceAnalysis {
        sources: top_urls,
        extracted,
        summaries,
        seo_analysis,
    }))
}
