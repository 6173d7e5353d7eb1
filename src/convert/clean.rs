//! Boilerplate removal
//!
//! Two fixed passes over the parsed tree: tags that never carry readable
//! content are dropped unconditionally, then elements matching the usual
//! documentation-site chrome selectors. A selector that matches nothing is
//! not an error.

use scraper::{Html, Selector};

/// Tags removed unconditionally
pub const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "noscript", "iframe", "svg",
];

/// Chrome selectors, applied in order
pub const BOILERPLATE_SELECTORS: &[&str] = &[
    ".sidebar",
    "header",
    "footer",
    ".nav",
    ".menu",
    "#sidebar",
    ".navigation",
    ".toc",
    "#toc",
    ".footer",
    "#footer",
];

/// Removes non-content tags and boilerplate from the document
///
/// Returns the number of detached subtrees.
pub fn clean_document(document: &mut Html) -> usize {
    NON_CONTENT_TAGS
        .iter()
        .chain(BOILERPLATE_SELECTORS)
        .map(|selector| remove_matching(document, selector))
        .sum()
}

/// Detaches every element matching `selector`
fn remove_matching(document: &mut Html, selector: &str) -> usize {
    let Ok(selector) = Selector::parse(selector) else {
        tracing::debug!("Skipping unparseable selector {}", selector);
        return 0;
    };

    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(document: &Html) -> String {
        document.root_element().text().collect::<String>()
    }

    #[test]
    fn test_removes_non_content_tags() {
        let mut doc = Html::parse_document(
            r#"<html><head><style>p{}</style><script>var x = 1;</script></head>
            <body><p>Keep me</p><noscript>Enable JS</noscript><svg><text>icon</text></svg></body></html>"#,
        );
        clean_document(&mut doc);
        let text = text_of(&doc);
        assert!(text.contains("Keep me"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("Enable JS"));
        assert!(!text.contains("icon"));
    }

    #[test]
    fn test_removes_boilerplate_selectors() {
        let mut doc = Html::parse_document(
            r#"<body>
                <header>Site header</header>
                <nav class="nav">Home | Docs</nav>
                <div id="sidebar">Side links</div>
                <div class="toc">On this page</div>
                <main><p>Real content</p></main>
                <div class="footer">Copyright</div>
            </body>"#,
        );
        let removed = clean_document(&mut doc);
        assert!(removed >= 5);

        let text = text_of(&doc);
        assert!(text.contains("Real content"));
        for gone in ["Site header", "Home | Docs", "Side links", "On this page", "Copyright"] {
            assert!(!text.contains(gone), "{} should be removed", gone);
        }
    }

    #[test]
    fn test_nested_matches_are_harmless() {
        let mut doc = Html::parse_document(
            r#"<body><div class="sidebar"><div class="menu"><ul class="nav"><li>x</li></ul></div></div><p>ok</p></body>"#,
        );
        clean_document(&mut doc);
        assert_eq!(text_of(&doc).trim(), "ok");
    }

    #[test]
    fn test_nothing_to_remove() {
        let mut doc = Html::parse_document("<body><p>plain</p></body>");
        assert_eq!(clean_document(&mut doc), 0);
    }
}
