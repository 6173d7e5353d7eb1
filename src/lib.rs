//! site2skill: turns a documentation website into a portable skill bundle
//!
//! The crate implements the ingestion pipeline (crawl, convert, normalize,
//! audit, package) and a keyword search engine that runs over the resulting
//! corpus of Markdown documents.

pub mod audit;
pub mod bundle;
pub mod config;
pub mod convert;
pub mod crawler;
pub mod document;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for site2skill operations
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetcher executable not found: {program}. Please install it or set crawler.program")]
    FetcherNotFound { program: String },

    #[error("Crawl timed out after {seconds}s without {what}")]
    CrawlTimeout { seconds: u64, what: &'static str },

    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Invalid skill name '{0}': must be a single non-empty path component")]
    InvalidSkillName(String),

    #[error("Failed to {action} {path}: {source}")]
    File {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    /// Wraps an I/O error with the action and path it failed on
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid URL scheme: {0}. Only 'http' and 'https' are supported")]
    InvalidScheme(String),

    #[error("Invalid URL: {0}. Domain is missing")]
    MissingDomain(String),
}

/// Result type alias for site2skill operations
pub type Result<T> = std::result::Result<T, SkillError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use document::{Document, Frontmatter};
pub use report::{MemoryReporter, Reporter, TracingReporter};
