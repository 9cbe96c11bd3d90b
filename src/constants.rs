/// Instruction for per-article summarization (small model).
pub const SUMMARY_INSTRUCTION: &str = "You are an SEO analyst. Summarize article with sections: intent, key topics, strengths, \
missing points, tone, structure, estimated word count, likely target keywords. \
Return concise markdown.";

/// Instruction for the cross-source competitive analysis (analyst model).
pub const ANALYSIS_INSTRUCTION: &str = "You are a senior SEO strategist. Given article summaries, produce: \
1) common coverage, 2) common gaps, 3) tone/style pattern, 4) structural pattern, \
5) recommended outranking outline, 6) key entities/phrases to include.";

/// Instruction for building an editable content brief from the analysis.
pub const BRIEF_INSTRUCTION: &str = "You are an SEO brief strategist. Create an editable markdown content brief using the competitor analysis and source summaries. \
Include these sections with markdown headings: Primary Query, Search Intent, Target Audience, Recommended Title, Meta Description, \
Core Keywords, Questions To Answer, Competitor Gaps To Win, Recommended Outline, Tone And Brand Notes, CTA Notes. \
Keep the brief practical so a human editor can modify it before writing.";

/// Instruction for the query-only brief used when no sources qualified.
pub const FALLBACK_BRIEF_INSTRUCTION: &str = "You are an SEO strategist creating a provisional content brief from only a search query. \
State reasonable assumptions clearly. Return editable markdown with headings: Primary Query, Search Intent, \
Target Audience, Recommended Title, Meta Description, Core Keywords, Questions To Answer, \
Recommended Outline, Tone And Brand Notes, CTA Notes.";

/// Instruction for writing the final article from a raw analysis.
pub const WRITER_INSTRUCTION: &str = "You are an expert SEO writer. Write a new, original article that is factual and grounded in the source analysis. \
Constraints: 1500-2000 words, clear H2/H3 structure, intro, actionable steps, FAQ, conclusion, \
meta title and meta description at top. Return markdown only.";

/// Instruction for writing the final article from an editable brief.
pub const BRIEF_WRITER_INSTRUCTION: &str = "You are an expert SEO writer. Write a new, original article that follows the provided content brief. \
Honor the outline, keywords and tone notes in the brief. Constraints: 1500-2000 words, clear H2/H3 structure, \
intro, actionable steps, FAQ, conclusion, meta title and meta description at top. Return markdown only.";

/// Placeholder summary when an article is too short to summarize reliably.
pub const SHORT_CONTENT_SUMMARY: &str = "Content too short for reliable SEO summary.";

/// Analysis text recorded when the pipeline degrades to query-only generation.
pub const FALLBACK_ANALYSIS_NOTE: &str =
    "No competitor sources were provided. This brief is based on the query only and should be reviewed.";

/// Minimum word count before an article is worth a model summary.
pub const MIN_SUMMARY_WORDS: usize = 80;

/// Below this word count the primary extraction is considered too thin and
/// the whole-page fallback runs instead.
pub const MIN_PRIMARY_EXTRACTION_WORDS: usize = 150;

/// Hard cap on extracted article text, in characters.
pub const MAX_EXTRACTED_CHARS: usize = 120_000;

/// Per-URL fetch timeout, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 20;

/// Minimum accepted query length on create requests.
pub const MIN_QUERY_CHARS: usize = 3;

/// Minimum accepted brief markdown length on PATCH.
pub const MIN_BRIEF_MARKDOWN_CHARS: usize = 20;

// Stage labels persisted on task records while they run.
pub const STAGE_COLLECTING_SOURCES: &str = "collecting_sources";
pub const STAGE_EXTRACTING_CONTENT: &str = "extracting_content";
pub const STAGE_SUMMARIZING_SOURCES: &str = "summarizing_sources";
pub const STAGE_ANALYZING_COMPETITORS: &str = "analyzing_competitors";
pub const STAGE_BUILDING_BRIEF: &str = "building_brief";
pub const STAGE_BUILDING_INTERNAL_BRIEF: &str = "building_internal_brief";
pub const STAGE_WRITING_ARTICLE: &str = "writing_article";
pub const STAGE_EXPORTING_OUTPUT: &str = "exporting_output";
pub const STAGE_EDITED_DRAFT: &str = "edited_draft";
pub const STAGE_COMPLETED: &str = "completed";
pub const STAGE_FAILED: &str = "failed";
