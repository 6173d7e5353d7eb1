//! Character encoding detection for mirrored pages
//!
//! Mirrored pages are stored as raw bytes. The declared charset is read from
//! the page's own `<meta charset>` or `<meta http-equiv="Content-Type">` tag
//! and the bytes are decoded with it. Pages without a usable declaration are
//! read as UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Maximum bytes scanned for a charset declaration
const META_SCAN_LIMIT: usize = 1024;

fn meta_charset_regex() -> Option<&'static Regex> {
    static META_CHARSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    META_CHARSET_REGEX
        .get_or_init(|| Regex::new(r#"(?i-u)<meta[^>]+charset\s*=\s*["']?([^"'\s;/>]+)"#).ok())
        .as_ref()
}

/// Finds the encoding declared by a meta tag near the start of the page
///
/// Covers both `<meta charset="...">` and the `charset=` parameter inside a
/// `http-equiv="Content-Type"` content attribute. Unknown labels yield `None`.
pub fn detect_meta_charset(html: &[u8]) -> Option<&'static Encoding> {
    let head = &html[..html.len().min(META_SCAN_LIMIT)];
    let captures = meta_charset_regex()?.captures(head)?;
    Encoding::for_label(captures.get(1)?.as_bytes())
}

/// Decodes raw page bytes to UTF-8 text
///
/// A byte order mark wins over the declared charset. Invalid sequences are
/// replaced with U+FFFD rather than failing the page.
///
/// # Example
///
/// ```
/// use site2skill::convert::decode_html;
///
/// let page = b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>";
/// assert!(decode_html(page).contains("caf\u{e9}"));
/// ```
pub fn decode_html(html: &[u8]) -> Cow<'_, str> {
    let encoding = detect_meta_charset(html).unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!("Replaced invalid {} sequences while decoding", used.name());
    }
    text
}
