use crate::config::Settings;
use crate::constants::ANALYSIS_INSTRUCTION;
use crate::core::ArticleSummary;
use crate::errors::Error;
use crate::llm::LlmClient;

/// Produces the cross-source competitive analysis from per-article summaries.
pub async fn analyze_summaries(
    llm: &LlmClient,
    settings: &Settings,
    query: &str,
    summaries: &[ArticleSummary],
) -> Result<String, Error> {
    let joined = summaries
        .iter()
        .map(|s| format!("Source: {}\n{}", s.url, s.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    llm.complete(
        &settings.analyst_model,
        ANALYSIS_INSTRUCTION,
        &format!("Query: {}\n\n{}", query, joined),
    )
    .await
}
