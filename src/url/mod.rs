//! URL handling module for site2skill
//!
//! This module validates crawl targets, extracts the host used to bound a
//! crawl, and maps files in a crawl mirror back to the URLs they came from.

mod domain;
mod source;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use source::{reconstruct_source_url, sanitize_filename};

/// Parses and checks a crawl target URL
///
/// The scheme must be `http` or `https` and the URL must name a host.
///
/// # Examples
///
/// ```
/// use site2skill::url::validate_target_url;
///
/// assert!(validate_target_url("https://docs.example.com/guide/").is_ok());
/// assert!(validate_target_url("ftp://example.com/").is_err());
/// ```
pub fn validate_target_url(target: &str) -> UrlResult<Url> {
    let url = Url::parse(target).map_err(|source| match source {
        ::url::ParseError::EmptyHost => UrlError::MissingDomain(target.to_string()),
        source => UrlError::Parse {
            url: target.to_string(),
            source,
        },
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain(target.to_string())),
    }
}
