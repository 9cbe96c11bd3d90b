use crate::config::Settings;
use crate::constants::{BRIEF_INSTRUCTION, FALLBACK_BRIEF_INSTRUCTION};
use crate::core::ArticleSummary;
use crate::errors::Error;
use crate::llm::LlmClient;

/// Appends a per-owner prompt override to a base instruction when present.
pub(crate) fn customized_instruction(base: &str, prompt_override: &str) -> String {
    let extra = prompt_override.trim();
    if extra.is_empty() {
        base.to_string()
    } else {
        format!("{}\n\nAdditional instructions from the editor:\n{}", base, extra)
    }
}

/// Brand line appended to the model input when the owner configured one.
pub(crate) fn brand_note(brand_name: &str, brand_url: &str) -> String {
    match (brand_name.trim(), brand_url.trim()) {
        ("", "") => String::new(),
        (name, "") => format!("\n\nBrand to write for: {}", name),
        ("", url) => format!("\n\nBrand site: {}", url),
        (name, url) => format!("\n\nBrand to write for: {} ({})", name, url),
    }
}

/// Builds the editable markdown brief from the competitor analysis.
#[allow(clippy::too_many_arguments)]
pub async fn build_brief(
    llm: &LlmClient,
    settings: &Settings,
    query: &str,
    summaries: &[ArticleSummary],
    seo_analysis: &str,
    brand_name: &str,
    brand_url: &str,
    prompt_override: &str,
) -> Result<String, Error> {
    let joined = summaries
        .iter()
        .map(|s| format!("Source: {}\n{}", s.url, s.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    llm.complete(
        &settings.analyst_model,
        &customized_instruction(BRIEF_INSTRUCTION, prompt_override),
        &format!(
            "Primary query: {}\n\nCompetitor summaries:\n{}\n\nSEO analysis:\n{}{}",
            query,
            joined,
            seo_analysis,
            brand_note(brand_name, brand_url)
        ),
    )
    .await
}

/// Query-only fallback brief, used when no sources qualified.
pub async fn build_brief_from_query(
    llm: &LlmClient,
    settings: &Settings,
    query: &str,
    brand_name: &str,
    brand_url: &str,
    prompt_override: &str,
) -> Result<String, Error> {
    llm.complete(
        &settings.analyst_model,
        &customized_instruction(FALLBACK_BRIEF_INSTRUCTION, prompt_override),
        &format!(
            "Primary query: {}{}",
            query,
            brand_note(brand_name, brand_url)
        ),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_appended_only_when_present() {
        assert_eq!(customized_instruction("Base.", ""), "Base.");
        assert_eq!(customized_instruction("Base.", "   "), "Base.");
        let customized = customized_instruction("Base.", "Always use British spelling.");
        assert!(customized.starts_with("Base."));
        assert!(customized.ends_with("Always use British spelling."));
    }

    #[test]
    fn brand_note_handles_partial_configuration() {
        assert_eq!(brand_note("", ""), "");
        assert!(brand_note("Acme", "").contains("Acme"));
        assert!(brand_note("", "https://acme.test").contains("https://acme.test"));
        let both = brand_note("Acme", "https://acme.test");
        assert!(both.contains("Acme") && both.contains("https://acme.test"));
    }
}
