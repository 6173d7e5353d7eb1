//! Configuration module for site2skill
//!
//! This module handles loading, parsing, and validating the optional TOML
//! settings file. Every key has a default, so an absent file or an empty
//! table yields the stock behaviour.
//!
//! # Example
//!
//! ```no_run
//! use site2skill::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site2skill.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuditConfig, Config, CrawlerConfig, SearchConfig, DEFAULT_REJECT, DEFAULT_SIZE_BUDGET,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
