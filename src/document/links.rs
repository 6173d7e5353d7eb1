//! Link normalization
//!
//! Rewrites relative Markdown link targets to absolute URLs using the
//! `source_url` recorded in the document's frontmatter. Targets that are
//! already absolute (`http:`, `https:`, `mailto:`) and in-page anchors are
//! left alone, which makes the rewrite idempotent.

use crate::document::{frontmatter, SOURCE_URL_KEY};
use crate::report::Reporter;
use crate::{Result, SkillError};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

const ABSOLUTE_PREFIXES: &[&str] = &["http:", "https:", "mailto:"];

fn link_regex() -> Option<&'static Regex> {
    static LINK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    LINK_REGEX
        .get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").ok())
        .as_ref()
}

/// Returns true if a link target must not be rewritten
fn is_kept(target: &str) -> bool {
    target.starts_with('#') || ABSOLUTE_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// Rewrites every relative `[label](target)` in `text` against `base`
///
/// Targets that cannot be resolved are kept unchanged.
///
/// # Example
///
/// ```
/// use site2skill::document::normalize_links;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/guide/intro.html").unwrap();
/// let out = normalize_links("[x](../api/ref.md)", &base);
/// assert_eq!(out, "[x](https://example.com/docs/api/ref.md)");
/// ```
pub fn normalize_links(text: &str, base: &Url) -> String {
    let Some(re) = link_regex() else {
        return text.to_string();
    };

    re.replace_all(text, |caps: &Captures| {
        let label = &caps[1];
        let target = &caps[2];

        if is_kept(target) {
            return caps[0].to_string();
        }

        match base.join(target) {
            Ok(absolute) => format!("[{}]({})", label, absolute),
            Err(_) => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// Normalizes the links of a full document text
///
/// The frontmatter block is kept byte for byte; only the body is rewritten.
/// Returns `None` after warning through `reporter` when the document has no
/// usable `source_url`. `label` names the document in warnings.
pub fn normalize_document(text: &str, reporter: &dyn Reporter, label: &str) -> Option<String> {
    let (fm, body) = frontmatter::parse(text);

    let Some(source_url) = fm.get_non_empty(SOURCE_URL_KEY) else {
        reporter.warn(&format!(
            "No source_url found in {}, skipping link normalization",
            label
        ));
        return None;
    };

    let base = match Url::parse(source_url) {
        Ok(base) => base,
        Err(e) => {
            reporter.warn(&format!(
                "Invalid source_url '{}' in {}: {}, skipping link normalization",
                source_url, label, e
            ));
            return None;
        }
    };

    let header = &text[..text.len() - body.len()];
    let mut out = String::with_capacity(text.len());
    out.push_str(header);
    out.push_str(&normalize_links(body, &base));
    Some(out)
}

/// Normalizes a Markdown file in place
///
/// Returns whether the links were normalized. Read and write failures are
/// returned to the caller, which decides whether the surrounding batch
/// continues.
pub fn normalize_file(input: &Path, output: &Path, reporter: &dyn Reporter) -> Result<bool> {
    let content =
        std::fs::read_to_string(input).map_err(|e| SkillError::file("read", input, e))?;

    let label = input.display().to_string();
    let (normalized, changed) = match normalize_document(&content, reporter, &label) {
        Some(text) => (text, true),
        None => (content, false),
    };

    std::fs::write(output, normalized).map_err(|e| SkillError::file("write", output, e))?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;

    fn base() -> Url {
        Url::parse("https://example.com/docs/guide/intro.html").unwrap()
    }

    #[test]
    fn test_relative_parent_link() {
        let out = normalize_links("See [x](../api/ref.md).", &base());
        assert_eq!(out, "See [x](https://example.com/docs/api/ref.md).");
    }

    #[test]
    fn test_anchor_and_absolute_untouched() {
        let text = "[y](#section) and [z](https://other.com/a) and [m](mailto:a@b.c)";
        assert_eq!(normalize_links(text, &base()), text);
    }

    #[test]
    fn test_root_relative_and_sibling() {
        let out = normalize_links("[a](/) [b](setup.html) [c](./faq.html#top)", &base());
        assert_eq!(
            out,
            "[a](https://example.com/) [b](https://example.com/docs/guide/setup.html) \
             [c](https://example.com/docs/guide/faq.html#top)"
        );
    }

    #[test]
    fn test_query_preserved() {
        let out = normalize_links("[q](search?q=cache&page=2)", &base());
        assert_eq!(out, "[q](https://example.com/docs/guide/search?q=cache&page=2)");
    }

    #[test]
    fn test_image_links_are_resolved() {
        let out = normalize_links("![diagram](img/arch.png)", &base());
        assert_eq!(out, "![diagram](https://example.com/docs/guide/img/arch.png)");
    }

    #[test]
    fn test_idempotent() {
        let text = "[a](../x.md) [b](#s) [c](https://o.com) [d](y/z.html?k=v#f)";
        let once = normalize_links(text, &base());
        let twice = normalize_links(&once, &base());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_document_keeps_frontmatter() {
        let reporter = MemoryReporter::new();
        let text = "---\ntitle: \"Intro\"\nsource_url: \"https://example.com/docs/guide/intro.html\"\n---\n\n[next](next.html)\n";
        let out = normalize_document(text, &reporter, "intro.md").unwrap();
        assert!(out.starts_with(
            "---\ntitle: \"Intro\"\nsource_url: \"https://example.com/docs/guide/intro.html\"\n---\n\n"
        ));
        assert!(out.ends_with("[next](https://example.com/docs/guide/next.html)\n"));
        assert!(reporter.warnings().is_empty());

        let again = normalize_document(&out, &reporter, "intro.md").unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn test_document_without_source_url_is_skipped() {
        let reporter = MemoryReporter::new();
        let text = "---\ntitle: \"Orphan\"\n---\n\n[next](next.html)\n";
        assert_eq!(normalize_document(text, &reporter, "orphan.md"), None);

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("orphan.md"));
    }

    #[test]
    fn test_normalize_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(
            &path,
            "---\nsource_url: \"https://example.com/a/b.html\"\n---\n\n[c](c.html)",
        )
        .unwrap();

        let reporter = MemoryReporter::new();
        assert!(normalize_file(&path, &path, &reporter).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[c](https://example.com/a/c.html)"));
    }

    #[test]
    fn test_normalize_missing_file_errors() {
        let reporter = MemoryReporter::new();
        let missing = Path::new("/nonexistent/page.md");
        assert!(normalize_file(missing, missing, &reporter).is_err());
    }
}
