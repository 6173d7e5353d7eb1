use std::path::{Component, Path};

/// Rebuilds the URL a mirrored page was fetched from
///
/// The fetcher mirrors `https://host/a/b` as `host/a/b.html` below the crawl
/// directory, so the URL is the scheme joined with the crawl-relative path
/// minus the `.html` suffix it added.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use site2skill::url::reconstruct_source_url;
///
/// let url = reconstruct_source_url("https", Path::new("docs.example.com/guide/intro.html"));
/// assert_eq!(url, "https://docs.example.com/guide/intro");
/// ```
pub fn reconstruct_source_url(scheme: &str, relative: &Path) -> String {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let trimmed = joined.strip_suffix(".html").unwrap_or(&joined);
    format!("{}://{}", scheme, trimmed)
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
