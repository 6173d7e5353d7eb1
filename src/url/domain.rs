use url::Url;

/// Extracts the domain from a URL
///
/// This is the value handed to the fetcher's domain restriction, so the port
/// is not part of it.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site2skill::url::extract_domain;
///
/// let url = Url::parse("https://Docs.Example.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
