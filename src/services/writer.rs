use crate::config::Settings;
use crate::constants::{BRIEF_WRITER_INSTRUCTION, WRITER_INSTRUCTION};
use crate::errors::Error;
use crate::llm::LlmClient;
use crate::services::brief_builder::{brand_note, customized_instruction};

/// Writes the final article directly from a raw competitive analysis.
pub async fn write_article(
    llm: &LlmClient,
    settings: &Settings,
    query: &str,
    seo_analysis: &str,
) -> Result<String, Error> {
    llm.complete(
        &settings.writer_model,
        WRITER_INSTRUCTION,
        &format!("Primary query: {}\n\nSEO analysis:\n{}", query, seo_analysis),
    )
    .await
}

/// Writes the final article from an editable brief, applying the owner's
/// brand fields and writer prompt override.
pub async fn write_article_from_brief(
    llm: &LlmClient,
    settings: &Settings,
    query: &str,
    brief_markdown: &str,
    brand_name: &str,
    brand_url: &str,
    prompt_override: &str,
) -> Result<String, Error> {
    llm.complete(
        &settings.writer_model,
        &customized_instruction(BRIEF_WRITER_INSTRUCTION, prompt_override),
        &format!(
            "Primary query: {}\n\nContent brief:\n{}{}",
            query,
            brief_markdown,
            brand_note(brand_name, brand_url)
        ),
    )
    .await
}
