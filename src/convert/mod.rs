//! HTML-to-document conversion
//!
//! This module turns one mirrored HTML page into a frontmatter-tagged
//! Markdown document:
//! - Raw bytes are decoded using the page's declared charset
//! - Non-content tags and site chrome are removed
//! - The primary content container is selected
//! - The title is extracted
//! - The content is rendered to Markdown and tidied

mod charset;
mod clean;
mod render;

pub use charset::{decode_html, detect_meta_charset};
pub use clean::{clean_document, BOILERPLATE_SELECTORS, NON_CONTENT_TAGS};
pub use render::render_markdown;

use crate::document::Document;
use crate::report::Reporter;
use crate::{Result, SkillError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::sync::OnceLock;

/// Title used when a page has neither `<title>` nor `<h1>`
pub const UNTITLED: &str = "Untitled";

/// Content containers, tried in order
const CONTENT_ROOTS: &[&str] = &["main", "article", ".content", "body"];

/// Converts an HTML page to a document
///
/// Returns `None` when the page has no content container at all (for
/// example a frameset page); the caller reports the skip.
///
/// # Example
///
/// ```
/// use site2skill::convert::convert_html;
///
/// let html = "<html><body><h1>Getting Started</h1><p>Install it.</p></body></html>";
/// let doc = convert_html(html, Some("https://example.com/start"), None).unwrap();
/// assert_eq!(doc.title, "Getting Started");
/// assert!(doc.body.contains("Install it."));
/// ```
pub fn convert_html(
    html: &str,
    source_url: Option<&str>,
    fetched_at: Option<&str>,
) -> Option<Document> {
    let mut document = Html::parse_document(html);

    // Read before cleaning so a heading inside the page header still counts
    let title = extract_title(&document);

    clean_document(&mut document);

    let root = select_content_root(&document)?;
    let body = post_process_markdown(&render_markdown(root));

    Some(Document {
        title,
        body,
        source_url: source_url.map(str::to_string),
        fetched_at: fetched_at.map(str::to_string),
    })
}

/// Extracts the page title from `<title>`, then the first `<h1>`
fn extract_title(document: &Html) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Picks the first content container that exists
fn select_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS.iter().find_map(|s| {
        let selector = Selector::parse(s).ok()?;
        document.select(&selector).next()
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn blank_lines_regex() -> Option<&'static Regex> {
    static BLANK_LINES_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BLANK_LINES_REGEX
        .get_or_init(|| Regex::new(r"\n{3,}").ok())
        .as_ref()
}

/// Tidies rendered Markdown
///
/// Trailing whitespace is stripped from every line and runs of blank lines
/// collapse to one. The result has no leading blank lines and ends with a
/// single newline unless it is empty.
pub fn post_process_markdown(markdown: &str) -> String {
    let stripped = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    let collapsed = match blank_lines_regex() {
        Some(re) => re.replace_all(&stripped, "\n\n").into_owned(),
        None => stripped,
    };

    let mut out = collapsed.trim_matches('\n').to_string();
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Converts one HTML file and writes the resulting document
///
/// Returns `Ok(false)` when the page was skipped (reported through
/// `reporter`). Read and write failures are returned to the caller.
pub fn convert_file(
    html_path: &Path,
    md_path: &Path,
    source_url: Option<&str>,
    fetched_at: Option<&str>,
    reporter: &dyn Reporter,
) -> Result<bool> {
    let bytes = std::fs::read(html_path).map_err(|e| SkillError::file("read", html_path, e))?;
    let html = decode_html(&bytes);

    let Some(document) = convert_html(&html, source_url, fetched_at) else {
        reporter.warn(&format!(
            "No main content found in {}, skipping",
            html_path.display()
        ));
        return Ok(false);
    };

    if let Some(parent) = md_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SkillError::file("create", parent, e))?;
    }
    std::fs::write(md_path, document.to_text())
        .map_err(|e| SkillError::file("write", md_path, e))?;

    tracing::debug!("Converted: {} -> {}", html_path.display(), md_path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::frontmatter;
    use crate::report::MemoryReporter;

    #[test]
    fn test_title_from_title_tag() {
        let html = "<html><head><title> API  Reference </title></head><body><h1>Other</h1></body></html>";
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.title, "API Reference");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = "<html><body><h1>Getting Started</h1><p>Text</p></body></html>";
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.title, "Getting Started");
    }

    #[test]
    fn test_title_untitled() {
        let html = "<html><body><p>No headings here</p></body></html>";
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.title, "Untitled");
    }

    #[test]
    fn test_nav_removed_and_main_selected() {
        let html = r#"<html><body>
            <nav class="nav"><a href="/">Home</a> Secret navigation</nav>
            <p>Outside main</p>
            <main><h2>Install</h2><p>Run the installer.</p></main>
        </body></html>"#;
        let doc = convert_html(html, None, None).unwrap();
        assert!(!doc.body.contains("Secret navigation"));
        assert!(!doc.body.contains("Home"));
        assert!(!doc.body.contains("Outside main"));
        assert_eq!(doc.body, "## Install\n\nRun the installer.\n");
    }

    #[test]
    fn test_content_root_order() {
        let html = r#"<body><div class="content"><p>From div</p></div><article><p>From article</p></article></body>"#;
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.body, "From article\n");

        let html = r#"<body><p>Noise</p><div class="content"><p>From div</p></div></body>"#;
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.body, "From div\n");

        let html = r#"<body><p>Only body</p></body>"#;
        let doc = convert_html(html, None, None).unwrap();
        assert_eq!(doc.body, "Only body\n");
    }

    #[test]
    fn test_frameset_page_is_skipped() {
        let html = r#"<html><head><title>Frames</title></head><frameset><frame src="a.html"></frameset></html>"#;
        assert!(convert_html(html, None, None).is_none());
    }

    #[test]
    fn test_post_process_collapses_blank_lines() {
        let input = "First line   \n\n\n\n\nSecond line\t\nThird";
        assert_eq!(
            post_process_markdown(input),
            "First line\n\nSecond line\nThird\n"
        );
    }

    #[test]
    fn test_post_process_whitespace_only_lines() {
        let input = "\n\nA\n   \n  \n \nB  \n\n";
        assert_eq!(post_process_markdown(input), "A\n\nB\n");
        assert_eq!(post_process_markdown("  \n \n"), "");
    }

    #[test]
    fn test_frontmatter_attached() {
        let html = "<html><head><title>Say \"hi\"</title></head><body><p>x</p></body></html>";
        let doc = convert_html(
            html,
            Some("https://example.com/hi"),
            Some("2024-01-02T03:04:05Z"),
        )
        .unwrap();

        let text = doc.to_text();
        let (fm, body) = frontmatter::parse(&text);
        assert_eq!(fm.get("title"), Some("Say \"hi\""));
        assert_eq!(fm.get("source_url"), Some("https://example.com/hi"));
        assert_eq!(fm.get("fetched_at"), Some("2024-01-02T03:04:05Z"));
        assert_eq!(body, "x\n");
    }

    #[test]
    fn test_convert_file_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("page.html");
        let md_path = dir.path().join("out/nested/page.md");
        std::fs::write(&html_path, "<html><body><main><p>Body</p></main></body></html>").unwrap();

        let reporter = MemoryReporter::new();
        let written =
            convert_file(&html_path, &md_path, Some("https://e.com/page"), None, &reporter)
                .unwrap();

        assert!(written);
        let text = std::fs::read_to_string(&md_path).unwrap();
        assert!(text.starts_with("---\ntitle: \"Untitled\"\nsource_url: \"https://e.com/page\"\n---\n\n"));
        assert!(text.ends_with("Body\n"));
    }

    #[test]
    fn test_convert_file_decodes_declared_charset() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("ja.html");
        let md_path = dir.path().join("ja.md");

        let mut bytes =
            br#"<html><head><meta charset="Shift_JIS"></head><body><main><p>"#.to_vec();
        bytes.extend_from_slice(&[0x93, 0xfa, 0x96, 0x7b, 0x8c, 0xea]);
        bytes.extend_from_slice(b"</p></main></body></html>");
        std::fs::write(&html_path, bytes).unwrap();

        let reporter = MemoryReporter::new();
        assert!(convert_file(&html_path, &md_path, None, None, &reporter).unwrap());

        let text = std::fs::read_to_string(&md_path).unwrap();
        assert!(text.ends_with("日本語\n"));
        assert!(!text.contains('\u{fffd}'));
    }

    #[test]
    fn test_convert_file_reports_skip() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("frames.html");
        let md_path = dir.path().join("frames.md");
        std::fs::write(&html_path, "<frameset><frame src=\"x\"></frameset>").unwrap();

        let reporter = MemoryReporter::new();
        assert!(!convert_file(&html_path, &md_path, None, None, &reporter).unwrap());
        assert!(!md_path.exists());
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let reporter = MemoryReporter::new();
        let result = convert_file(
            Path::new("/nonexistent/page.html"),
            Path::new("/tmp/never.md"),
            None,
            None,
            &reporter,
        );
        assert!(result.is_err());
    }
}
