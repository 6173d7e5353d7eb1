//! Crawler module for mirroring a documentation site
//!
//! The crawl itself is delegated to an external recursive fetcher. This
//! module contains:
//! - Fetcher resolution and argument construction
//! - Output parsing and live progress
//! - Exit status classification
//! - Overall crawl orchestration with timeouts and interrupt handling

mod command;
mod orchestrator;
mod progress;
mod status;

pub use command::{build_fetch_args, resolve_program};
pub use orchestrator::{run_crawl, CrawlOrchestrator, CrawlOutcome, CRAWL_DIR_NAME};
pub use progress::{format_elapsed, parse_line, CrawlProgress, LineEvent};
pub use status::ExitClass;
