//! Keyword search over a corpus of Markdown documents
//!
//! Scoring is plain substring counting: every non-overlapping occurrence of
//! every query term in the lowercased body adds one. There is no stemming
//! and no word-boundary handling.

mod excerpt;
mod format;

pub use excerpt::{excerpts, group_lines, matching_lines};
pub use format::{format_json, format_text};

use crate::audit::{is_markdown, DOCS_DIR};
use crate::config::SearchConfig;
use crate::document::{frontmatter, FETCHED_AT_KEY, SOURCE_URL_KEY, TITLE_KEY};
use crate::report::Reporter;
use crate::{Result, SkillError};
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// Tunables for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of documents returned
    pub max_results: usize,
    /// Lines of context on each side of a match group
    pub context_radius: usize,
    /// Maximum excerpts per document
    pub max_excerpts: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            context_radius: config.context_radius,
            max_excerpts: config.max_excerpts,
        }
    }
}

/// One ranked document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Path relative to the corpus root, with forward slashes
    pub file: String,
    pub title: String,
    /// Relevance score
    pub matches: usize,
    pub excerpts: Vec<String>,
    pub source_url: String,
    pub fetched_at: String,
}

/// Splits a query into lowercase terms
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Sums non-overlapping occurrences of every term in `text`
pub fn score_text(text: &str, terms: &[String]) -> usize {
    let lower = text.to_lowercase();
    terms
        .iter()
        .map(|term| lower.matches(term.as_str()).count())
        .sum()
}

/// Searches every Markdown document under `root`
///
/// When `root` contains a `docs/` directory only that subtree is searched,
/// so a bundle's `SKILL.md` never ranks as a document. Unreadable files are
/// reported and skipped.
///
/// # Returns
///
/// * `Ok(Vec<SearchResult>)` - Results by descending score, ties by path
/// * `Err(SkillError)` - The corpus root does not exist
pub fn search_corpus(
    root: &Path,
    query: &str,
    options: &SearchOptions,
    reporter: &dyn Reporter,
) -> Result<Vec<SearchResult>> {
    if !root.is_dir() {
        return Err(SkillError::MissingDirectory(root.to_path_buf()));
    }

    let terms = query_terms(query);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let docs = root.join(DOCS_DIR);
    let search_root = if docs.is_dir() { docs } else { root.to_path_buf() };

    let mut results = Vec::new();
    for entry in WalkDir::new(&search_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                reporter.warn(&format!("Skipping unreadable entry: {}", e));
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let text = match std::fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(e) => {
                reporter.warn(&format!("Error reading {}: {}", entry.path().display(), e));
                continue;
            }
        };

        if let Some(result) = score_document(root, entry.path(), &text, &terms, options) {
            results.push(result);
        }
    }

    results.sort_by(|a, b| b.matches.cmp(&a.matches).then_with(|| a.file.cmp(&b.file)));
    results.truncate(options.max_results);
    Ok(results)
}

fn score_document(
    root: &Path,
    path: &Path,
    text: &str,
    terms: &[String],
    options: &SearchOptions,
) -> Option<SearchResult> {
    let (meta, body) = frontmatter::parse(text);
    let matches = score_text(body, terms);
    if matches == 0 {
        return None;
    }

    let title = meta
        .get_non_empty(TITLE_KEY)
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    Some(SearchResult {
        file: relative_path(root, path),
        title,
        matches,
        excerpts: excerpts(body, terms, options.context_radius, options.max_excerpts),
        source_url: meta.get(SOURCE_URL_KEY).unwrap_or_default().to_string(),
        fetched_at: meta.get(FETCHED_AT_KEY).unwrap_or_default().to_string(),
    })
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
