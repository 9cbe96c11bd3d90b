use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s)\]>"']+"#).expect("URL regex is valid"));

/// Pulls every http(s) URL out of a free-text block.
pub fn extract_urls_from_text(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Merges explicit seed URLs with URLs scraped out of the citation and
/// overview text blocks, in that priority order, deduplicated keeping the
/// first occurrence.
pub fn collect_seed_urls(
    query: &str,
    seed_urls: &[String],
    ai_citations_text: &str,
    ai_overview_text: &str,
) -> Vec<String> {
    // Reserved for future optional search integration.
    let _ = query;

    let mut collected: Vec<String> = seed_urls.to_vec();
    collected.extend(extract_urls_from_text(ai_citations_text));
    collected.extend(extract_urls_from_text(ai_overview_text));

    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    for url in collected {
        let cleaned = url.trim().trim_end_matches(['/', ' ']).to_string();
        if !cleaned.is_empty() && seen.insert(cleaned.clone()) {
            unique.push(cleaned);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_urls_and_stops_at_punctuation() {
        let urls = extract_urls_from_text(
            "See https://example.com/a) and (https://example.com/b] plus \"https://example.com/c\"",
        );
        assert_eq!(
            urls,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }

    #[test]
    fn seeds_come_first_and_duplicates_are_dropped() {
        let seeds = vec![
            "https://example.com/a/".to_string(),
            "https://example.com/b".to_string(),
        ];
        let citations = "https://example.com/c https://example.com/a";
        let overview = "https://example.com/b https://example.com/d";

        let collected = collect_seed_urls("query", &seeds, citations, overview);
        assert_eq!(
            collected,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
                "https://example.com/d"
            ]
        );
    }

    #[test]
    fn empty_inputs_produce_empty_output() {
        assert!(collect_seed_urls("query", &[], "", "").is_empty());
        assert!(extract_urls_from_text("").is_empty());
    }

    #[test]
    fn trailing_slashes_and_whitespace_are_trimmed() {
        let collected = collect_seed_urls(
            "q",
            &["  https://example.com/path// ".to_string()],
            "",
            "",
        );
        assert_eq!(collected, vec!["https://example.com/path"]);
    }
}
