use serde::{Deserialize, Serialize};

use crate::core::TaskKind;

/// Readable content pulled out of one fetched URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlContent {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Per-source summary produced by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub url: String,
    pub summary: String,
}

/// Accumulated outputs of a full run (analysis + final article).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunArtifacts {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub extracted_articles: Vec<UrlContent>,
    #[serde(default)]
    pub summaries: Vec<ArticleSummary>,
    #[serde(default)]
    pub seo_analysis: String,
    #[serde(default)]
    pub article_markdown: String,
    #[serde(default)]
    pub export_link: Option<String>,
}

/// Accumulated outputs of a brief run (analysis + editable brief).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BriefArtifacts {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub extracted_articles: Vec<UrlContent>,
    #[serde(default)]
    pub summaries: Vec<ArticleSummary>,
    #[serde(default)]
    pub seo_analysis: String,
    #[serde(default)]
    pub brief_markdown: String,
}

/// How an article record was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleMode {
    /// Written from a previously completed brief record
    FromBrief,
    /// Written from caller-supplied brief markdown
    FromCustomBrief,
    /// Full collect-to-write chain inline, no persisted brief
    QuickDraft,
}

/// Accumulated outputs of an article run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleArtifacts {
    pub mode: ArticleMode,
    #[serde(default)]
    pub source_brief_id: Option<String>,
    #[serde(default)]
    pub source_brief_markdown: String,
    #[serde(default)]
    pub article_markdown: String,
    #[serde(default)]
    pub export_link: Option<String>,
}

impl ArticleArtifacts {
    pub fn new(mode: ArticleMode) -> Self {
        ArticleArtifacts {
            mode,
            source_brief_id: None,
            source_brief_markdown: String::new(),
            article_markdown: String::new(),
            export_link: None,
        }
    }
}

/// Typed artifacts payload persisted as a JSON blob on the task row.
///
/// Later stages add fields without erasing ones written by earlier stages;
/// a full replacement only happens when a run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Artifacts {
    Run(RunArtifacts),
    Brief(BriefArtifacts),
    Article(ArticleArtifacts),
}

impl Artifacts {
    pub fn kind(&self) -> TaskKind {
        match self {
            Artifacts::Run(_) => TaskKind::Run,
            Artifacts::Brief(_) => TaskKind::Brief,
            Artifacts::Article(_) => TaskKind::Article,
        }
    }

    pub fn as_brief(&self) -> Option<&BriefArtifacts> {
        match self {
            Artifacts::Brief(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_json_is_tagged_by_kind() {
        let payload = Artifacts::Brief(BriefArtifacts {
            brief_markdown: "# Brief".to_string(),
            ..BriefArtifacts::default()
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "brief");
        assert_eq!(json["brief_markdown"], "# Brief");

        let back: Artifacts = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), TaskKind::Brief);
    }

    #[test]
    fn article_mode_uses_snake_case() {
        let artifacts = Artifacts::Article(ArticleArtifacts::new(ArticleMode::FromCustomBrief));
        let json = serde_json::to_value(&artifacts).unwrap();
        assert_eq!(json["mode"], "from_custom_brief");
    }
}
