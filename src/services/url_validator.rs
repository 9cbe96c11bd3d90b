use url::Url;

/// Hosts with consistently low SEO-competitive value (social, video, Q&A,
/// wiki, pin boards). Checked case-insensitively, with and without `www.`.
const BLOCKED_DOMAINS: &[&str] = &[
    "reddit.com",
    "www.reddit.com",
    "quora.com",
    "www.quora.com",
    "youtube.com",
    "www.youtube.com",
    "youtu.be",
    "pinterest.com",
    "www.pinterest.com",
    "wikipedia.org",
    "www.wikipedia.org",
];

/// Path fragments that indicate forum threads or shop/category listings
/// rather than competitor articles.
const BLOCKED_PATH_HINTS: &[&str] = &["/forum", "/forums", "/products", "/shop", "/category", "/tag"];

/// Whether a candidate URL is worth fetching for competitive analysis.
pub fn is_acceptable_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    if BLOCKED_DOMAINS.contains(&host.as_str()) {
        return false;
    }

    let path = parsed.path().to_lowercase();
    if BLOCKED_PATH_HINTS.iter().any(|hint| path.contains(hint)) {
        return false;
    }

    true
}

/// Filters the candidate list, preserving order, and truncates to `max_urls`.
/// An empty result is not an error here; the caller decides how to degrade.
pub fn select_top_urls(urls: &[String], max_urls: usize) -> Vec<String> {
    urls.iter()
        .filter(|u| is_acceptable_url(u))
        .take(max_urls)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn blocked_domains_are_rejected_with_and_without_www() {
        assert!(!is_acceptable_url("https://reddit.com/r/espresso"));
        assert!(!is_acceptable_url("https://www.reddit.com/r/espresso"));
        assert!(!is_acceptable_url("https://YouTube.com/watch?v=abc"));
        assert!(!is_acceptable_url("https://youtu.be/abc"));
        assert!(!is_acceptable_url("https://www.wikipedia.org/wiki/Espresso"));
    }

    #[test]
    fn blocked_path_hints_are_rejected() {
        assert!(!is_acceptable_url("https://example.com/forum/thread-12"));
        assert!(!is_acceptable_url("https://example.com/Shop/espresso"));
        assert!(!is_acceptable_url("https://example.com/blog/category/coffee"));
        assert!(!is_acceptable_url("https://example.com/tag/espresso"));
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(!is_acceptable_url("ftp://example.com/file"));
        assert!(!is_acceptable_url("mailto:someone@example.com"));
        assert!(!is_acceptable_url("not a url"));
        assert!(is_acceptable_url("http://example.com/article"));
        assert!(is_acceptable_url("https://example.com/article"));
    }

    #[test]
    fn selection_preserves_order_and_respects_max() {
        let urls = strings(&[
            "https://example.com/one",
            "https://reddit.com/r/espresso",
            "https://example.com/two",
            "https://example.com/three",
        ]);
        let selected = select_top_urls(&urls, 2);
        assert_eq!(
            selected,
            vec!["https://example.com/one", "https://example.com/two"]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(select_top_urls(&[], 5).is_empty());
    }
}
