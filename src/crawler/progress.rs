//! Fetcher output parsing and live progress
//!
//! The fetcher logs a timestamped line for every request it starts and a
//! "saved" line for every file it writes. The parser tracks the URL in
//! flight and promotes it to the downloaded set when the save line arrives.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use std::time::Duration;

/// Characters of the current URL shown in the progress line
const SHORT_URL_CHARS: usize = 40;

fn request_regex() -> Option<&'static Regex> {
    static REQUEST_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REQUEST_REGEX
        .get_or_init(|| Regex::new(r"--\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}--\s+(\S+)").ok())
        .as_ref()
}

/// What a single output line announced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A request for this URL started
    Request(String),
    /// The current file was written
    Saved,
}

/// Classifies one line of fetcher output
pub fn parse_line(line: &str) -> Option<LineEvent> {
    if let Some(caps) = request_regex().and_then(|re| re.captures(line)) {
        return Some(LineEvent::Request(caps[1].to_string()));
    }
    if line.contains("Saving to:") || line.to_lowercase().contains("saved") {
        return Some(LineEvent::Saved);
    }
    None
}

/// Running crawl statistics
#[derive(Debug, Default)]
pub struct CrawlProgress {
    current_url: String,
    downloaded: BTreeSet<String>,
}

impl CrawlProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one output line
    ///
    /// Returns true when the line completed a save.
    pub fn observe(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Some(LineEvent::Request(url)) => {
                self.current_url = url;
                false
            }
            Some(LineEvent::Saved) => {
                if !self.current_url.is_empty() {
                    self.downloaded.insert(self.current_url.clone());
                }
                true
            }
            None => false,
        }
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn count(&self) -> usize {
        self.downloaded.len()
    }

    pub fn into_downloaded(self) -> BTreeSet<String> {
        self.downloaded
    }

    /// Formats the overwriting progress line
    ///
    /// `[<n> pages | <m>m<ss>s | <rate>/s] <last 40 chars of the URL>`
    pub fn status_line(&self, elapsed: Duration) -> String {
        let count = self.count();
        let seconds = elapsed.as_secs_f64();
        let rate = if seconds > 0.0 {
            count as f64 / seconds
        } else {
            0.0
        };
        format!(
            "\r[{} pages | {} | {:.1}/s] {:<width$}",
            count,
            format_elapsed(elapsed),
            rate,
            short_url(&self.current_url),
            width = SHORT_URL_CHARS
        )
    }
}

/// Formats a duration as `<minutes>m<seconds>s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}m{:02}s", total / 60, total % 60)
}

fn short_url(url: &str) -> &str {
    let count = url.chars().count();
    if count <= SHORT_URL_CHARS {
        return url;
    }
    let skip = count - SHORT_URL_CHARS;
    let start = url
        .char_indices()
        .nth(skip)
        .map_or(url.len(), |(index, _)| index);
    &url[start..]
}
