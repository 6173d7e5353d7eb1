use serde::Deserialize;

/// Identifying user agent sent by the fetcher
pub const DEFAULT_USER_AGENT: &str = "site2skill/0.1 (+https://github.com/f4ah6o/site2skill)";

/// Size budget of the `docs/` tree (8 MiB)
pub const DEFAULT_SIZE_BUDGET: u64 = 8 * 1024 * 1024;

/// File extensions the fetcher rejects
///
/// Rejecting rather than accepting keeps extensionless URLs, which are
/// usually HTML pages.
pub const DEFAULT_REJECT: &[&str] = &[
    "css", "js", "png", "jpg", "jpeg", "gif", "svg", "ico", "woff", "woff2", "ttf", "eot", "zip",
    "tar", "gz", "pdf", "xml", "json", "txt",
];

/// Main configuration structure for site2skill
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub audit: AuditConfig,
    pub search: SearchConfig,
}

/// Crawl orchestration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Fetcher executable, resolved on PATH unless it contains a separator
    pub program: String,

    /// Recursion depth handed to the fetcher
    pub max_depth: u32,

    /// Base delay between requests (seconds); the fetcher adds jitter
    pub wait_seconds: u32,

    /// User agent string sent with every request
    pub user_agent: String,

    /// Rejected file extensions
    pub reject: Vec<String>,

    /// Maximum silence on the fetcher's output before the crawl is aborted
    pub line_timeout_secs: u64,

    /// Wall-clock limit for the whole crawl (0 = unlimited)
    pub overall_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            program: "wget".to_string(),
            max_depth: 5,
            wait_seconds: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reject: DEFAULT_REJECT.iter().map(|s| s.to_string()).collect(),
            line_timeout_secs: 300,
            overall_timeout_secs: 0,
        }
    }
}

/// Corpus audit settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuditConfig {
    /// Maximum total size of `docs/` in bytes
    pub size_budget_bytes: u64,

    /// Treat an oversized corpus as a hard failure
    pub strict_size: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            size_budget_bytes: DEFAULT_SIZE_BUDGET,
            strict_size: false,
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    pub max_results: usize,

    /// Lines of context kept around each match
    pub context_radius: usize,

    /// Excerpts kept per document
    pub max_excerpts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            context_radius: 3,
            max_excerpts: 3,
        }
    }
}
