//! Markdown documents and their metadata
//!
//! A document is persisted as a frontmatter block, a blank line and a
//! Markdown body. This module holds the codec for the block and the link
//! normalizer that rewrites the body.

pub mod frontmatter;
pub mod links;

pub use frontmatter::Frontmatter;
pub use links::{normalize_document, normalize_file, normalize_links};

/// Frontmatter key for the page title
pub const TITLE_KEY: &str = "title";

/// Frontmatter key for the URL the page was fetched from
pub const SOURCE_URL_KEY: &str = "source_url";

/// Frontmatter key for the fetch timestamp
pub const FETCHED_AT_KEY: &str = "fetched_at";

/// A converted documentation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub body: String,
    pub source_url: Option<String>,
    pub fetched_at: Option<String>,
}

impl Document {
    /// Builds the frontmatter for this document
    ///
    /// Optional fields are only emitted when present.
    pub fn frontmatter(&self) -> Frontmatter {
        let mut fm = Frontmatter::new();
        fm.insert(TITLE_KEY, self.title.as_str());
        if let Some(url) = &self.source_url {
            fm.insert(SOURCE_URL_KEY, url.as_str());
        }
        if let Some(fetched_at) = &self.fetched_at {
            fm.insert(FETCHED_AT_KEY, fetched_at.as_str());
        }
        fm
    }

    /// Serializes the document as frontmatter followed by its body
    pub fn to_text(&self) -> String {
        let mut out = frontmatter::render(&self.frontmatter());
        out.push_str(&self.body);
        out
    }

    /// Parses a persisted document
    ///
    /// A missing title falls back to `default_title`.
    pub fn from_text(text: &str, default_title: &str) -> Self {
        let (fm, body) = frontmatter::parse(text);
        Self {
            title: fm
                .get_non_empty(TITLE_KEY)
                .unwrap_or(default_title)
                .to_string(),
            body: body.to_string(),
            source_url: fm.get_non_empty(SOURCE_URL_KEY).map(str::to_string),
            fetched_at: fm.get_non_empty(FETCHED_AT_KEY).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let doc = Document {
            title: "Intro".to_string(),
            body: "# Intro\n\nHello".to_string(),
            source_url: Some("https://example.com/intro".to_string()),
            fetched_at: None,
        };

        let text = doc.to_text();
        assert!(text.starts_with("---\ntitle: \"Intro\"\nsource_url:"));
        assert!(!text.contains("fetched_at"));
        assert_eq!(Document::from_text(&text, "fallback"), doc);
    }

    #[test]
    fn test_from_text_without_frontmatter() {
        let doc = Document::from_text("plain body", "page");
        assert_eq!(doc.title, "page");
        assert_eq!(doc.body, "plain body");
        assert_eq!(doc.source_url, None);
    }
}
