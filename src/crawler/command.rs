//! Fetcher command construction
//!
//! Builds the argument list for a recursive, domain-bounded mirror and
//! resolves the fetcher executable before anything touches the disk.

use crate::config::CrawlerConfig;
use crate::{Result, SkillError};
use std::path::{Path, PathBuf};

/// Resolves the fetcher executable
///
/// A program containing a path separator is checked as given; a bare name is
/// looked up on `PATH` (honouring `PATHEXT` on Windows).
pub fn resolve_program(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|e| {
        tracing::debug!("Fetcher lookup for {} failed: {}", program, e);
        SkillError::FetcherNotFound {
            program: program.to_string(),
        }
    })
}

/// Builds the fetcher arguments for one crawl
///
/// The crawl stays on `domain`, never ascends above the start URL, honours
/// robots.txt and waits a randomized delay between requests.
pub fn build_fetch_args(
    url: &str,
    domain: &str,
    crawl_dir: &Path,
    config: &CrawlerConfig,
) -> Vec<String> {
    vec![
        "--recursive".to_string(),
        format!("--level={}", config.max_depth),
        "--no-parent".to_string(),
        format!("--domains={}", domain),
        "--adjust-extension".to_string(),
        "--convert-links".to_string(),
        format!("--reject={}", config.reject.join(",")),
        format!("--user-agent={}", config.user_agent),
        "--execute".to_string(),
        "robots=on".to_string(),
        format!("--wait={}", config.wait_seconds),
        "--random-wait".to_string(),
        "-P".to_string(),
        crawl_dir.display().to_string(),
        "--".to_string(),
        url.to_string(),
    ]
}
