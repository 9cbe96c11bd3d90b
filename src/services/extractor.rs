//! Fetches candidate URLs and extracts readable title/text from their HTML.
//!
//! Extraction runs in two tiers: a readability-style pass over the page's
//! `article`/`main` content blocks, and a whole-page flatten used when the
//! primary pass comes back too thin (heavily templated or js-rendered pages).

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::debug;

use crate::constants::{FETCH_TIMEOUT_SECS, MAX_EXTRACTED_CHARS, MIN_PRIMARY_EXTRACTION_WORDS};
use crate::core::UrlContent;
use crate::errors::Error;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; seoforge/0.1; +https://github.com/seoforge)";

async fn fetch_html(url: &str) -> Result<String, Error> {
    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;

    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

fn page_title(document: &Html) -> Option<String> {
    let og_title = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
    if let Some(content) = document
        .select(&og_title)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let title = compact_ws(content);
        if !title.is_empty() {
            return Some(title);
        }
    }

    let title_sel = Selector::parse("title").ok()?;
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| compact_ws(&el.text().collect::<Vec<_>>().join(" ")))?;
    (!title.is_empty()).then_some(title)
}

/// Readability-style pass: block text from the page's main content element.
fn extract_primary(document: &Html) -> (String, String) {
    let title = page_title(document).unwrap_or_else(|| "Untitled".to_string());

    let root = ["article", "main", "body"]
        .iter()
        .filter_map(|name| Selector::parse(name).ok())
        .find_map(|sel| document.select(&sel).next());
    let Some(root) = root else {
        return (title, String::new());
    };

    let Ok(block_sel) = Selector::parse("p, li") else {
        return (title, String::new());
    };

    let blocks: Vec<String> = root
        .select(&block_sel)
        .map(|el| compact_ws(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|block| !block.is_empty())
        .collect();

    (title, blocks.join("\n"))
}

fn flatten_element(el: ElementRef, out: &mut String) {
    if matches!(el.value().name(), "script" | "style" | "noscript" | "svg") {
        return;
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push('\n');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            flatten_element(child_el, out);
        }
    }
}

/// Whole-page fallback: every text node outside script/style/noscript/svg,
/// one line per node, blank lines dropped.
fn extract_fallback(document: &Html) -> (String, String) {
    let title_sel = Selector::parse("title").ok();
    let title = title_sel
        .as_ref()
        .and_then(|sel| document.select(sel).next())
        .map(|el| compact_ws(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let mut raw = String::new();
    flatten_element(document.root_element(), &mut raw);

    let text = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    (title, text)
}

/// Sync extraction over already-fetched HTML; kept separate from the fetch so
/// the non-Send parsed document never lives across an await point.
fn extract_from_html(url: &str, html: &str) -> UrlContent {
    let document = Html::parse_document(html);

    let (mut title, mut text) = extract_primary(&document);
    if word_count(&text) < MIN_PRIMARY_EXTRACTION_WORDS {
        (title, text) = extract_fallback(&document);
    }

    UrlContent {
        url: url.to_string(),
        title,
        text: truncate_chars(text, MAX_EXTRACTED_CHARS),
    }
}

/// Fetches one URL and extracts its readable content.
pub async fn extract_url_content(url: &str) -> Result<UrlContent, Error> {
    let html = fetch_html(url).await?;
    Ok(extract_from_html(url, &html))
}

/// Fetches all URLs concurrently. Per-URL failures are logged and dropped;
/// the caller decides whether an empty result is fatal. Output preserves the
/// input order of the URLs that survived.
pub async fn extract_all(urls: &[String]) -> Vec<UrlContent> {
    let mut set = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let url = url.clone();
        set.spawn(async move { (index, extract_url_content(&url).await) });
    }

    let mut extracted: Vec<(usize, UrlContent)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, Ok(content))) => extracted.push((index, content)),
            Ok((index, Err(err))) => {
                debug!(url = %urls[index], "Dropping URL after extraction failure: {}", err);
            }
            Err(err) => debug!("Extraction task panicked: {}", err),
        }
    }

    extracted.sort_by_key(|(index, _)| *index);
    extracted.into_iter().map(|(_, content)| content).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_html(paragraph: &str, repeats: usize) -> String {
        let body = format!("<p>{}</p>", paragraph).repeat(repeats);
        format!(
            "<html><head><title>Page Title</title></head>\
             <body><nav>Menu Item</nav><article>{}</article></body></html>",
            body
        )
    }

    #[test]
    fn primary_extraction_uses_article_blocks() {
        let html = article_html("espresso grind size matters a lot for flavor", 40);
        let content = extract_from_html("https://example.com/a", &html);
        assert_eq!(content.title, "Page Title");
        assert!(content.text.contains("espresso grind size"));
        assert!(!content.text.contains("Menu Item"));
    }

    #[test]
    fn og_title_wins_over_title_tag() {
        let html = format!(
            "<html><head><title>Tab Title</title>\
             <meta property=\"og:title\" content=\"Social Title\"></head>\
             <body><article>{}</article></body></html>",
            "<p>word word word word word word word word word word</p>".repeat(20)
        );
        let content = extract_from_html("https://example.com/a", &html);
        assert_eq!(content.title, "Social Title");
    }

    #[test]
    fn thin_primary_content_falls_back_to_whole_page() {
        let html = "<html><head><title>Thin Page</title>\
             <script>var tracking = true;</script></head>\
             <body><p>short intro</p><div>sidebar text outside blocks</div></body></html>";
        let content = extract_from_html("https://example.com/a", html);
        assert!(content.text.contains("sidebar text outside blocks"));
        assert!(!content.text.contains("tracking"));
        assert!(!content.text.contains("\n\n"));
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let content = extract_from_html("https://example.com/a", "<html><body><p>x</p></body></html>");
        assert_eq!(content.title, "Untitled");
    }

    #[test]
    fn text_is_truncated_to_the_character_cap() {
        let html = article_html(&"word ".repeat(200), 400);
        let content = extract_from_html("https://example.com/a", &html);
        assert!(content.text.chars().count() <= MAX_EXTRACTED_CHARS);
    }

    #[tokio::test]
    async fn batch_extraction_drops_unreachable_urls() {
        // .invalid never resolves, so the fetch fails at DNS time and the
        // batch simply comes back empty.
        let urls = vec!["http://nonexistent.invalid/nope".to_string()];
        let extracted = extract_all(&urls).await;
        assert!(extracted.is_empty());
    }
}
