//! Frontmatter codec
//!
//! A frontmatter block is a `---` line, one `key: value` line per entry and a
//! closing `---` line at the very start of a document. Parsing never fails:
//! a missing or malformed block yields an empty mapping and the whole input
//! as body.

use regex::Regex;
use std::sync::OnceLock;

/// Delimiter line that opens and closes a block
pub const DELIMITER: &str = "---";

/// Insertion-ordered key/value metadata of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, String)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value under `key` if it is present and not blank
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Inserts or replaces a value
    ///
    /// Replacing keeps the key at its original position so rendering stays
    /// deterministic.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut frontmatter = Frontmatter::new();
        for (key, value) in iter {
            frontmatter.insert(key, value);
        }
        frontmatter
    }
}

fn block_regex() -> Option<&'static Regex> {
    static BLOCK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BLOCK_REGEX
        .get_or_init(|| {
            Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").ok()
        })
        .as_ref()
}

/// Splits a document into its frontmatter and the remaining body
///
/// The first closing delimiter ends the block. One blank line directly after
/// the block belongs to the block, so `parse(&render(m))` returns `(m, "")`.
///
/// # Example
///
/// ```
/// use site2skill::document::frontmatter::parse;
///
/// let (fm, body) = parse("---\ntitle: \"Intro\"\n---\n\n# Intro\n");
/// assert_eq!(fm.get("title"), Some("Intro"));
/// assert_eq!(body, "# Intro\n");
/// ```
pub fn parse(text: &str) -> (Frontmatter, &str) {
    let Some(captures) = block_regex().and_then(|re| re.captures(text)) else {
        return (Frontmatter::new(), text);
    };

    let mut frontmatter = Frontmatter::new();
    if let Some(inner) = captures.get(1) {
        for line in inner.as_str().lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            frontmatter.insert(key, unquote(value.trim()));
        }
    }

    let end = captures.get(0).map_or(0, |m| m.end());
    let rest = &text[end..];
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    (frontmatter, rest)
}

/// Renders a frontmatter block followed by a blank line
pub fn render(frontmatter: &Frontmatter) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in frontmatter.iter() {
        out.push_str(key);
        out.push_str(": \"");
        out.push_str(&escape(value));
        out.push_str("\"\n");
    }
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Strips one layer of double quotes and undoes the escapes `render` adds
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
