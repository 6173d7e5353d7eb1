//! End-to-end skill generation
//!
//! Runs fetch, convert, normalize, generate, validate and package in order
//! over a scratch directory:
//!
//! ```text
//! <temp>/download/crawl/   mirrored site
//! <temp>/markdown/         converted documents
//! ```
//!
//! Per-file failures are reported and skipped. Only a failed precondition,
//! a crawl timeout, a failed bundle generation or a failed package aborts.

use crate::audit::{audit_corpus, AuditReport};
use crate::bundle::{generate, package, SkillFormat};
use crate::config::Config;
use crate::convert::convert_file;
use crate::crawler::{run_crawl, CrawlOutcome, CRAWL_DIR_NAME};
use crate::document::normalize_file;
use crate::report::Reporter;
use crate::url::{reconstruct_source_url, sanitize_filename, validate_target_url};
use crate::{Result, SkillError};
use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subdirectory of the temp dir receiving the crawl
pub const DOWNLOAD_DIR: &str = "download";

/// Subdirectory of the temp dir receiving converted documents
pub const MARKDOWN_DIR: &str = "markdown";

/// Inputs of one `generate` run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Documentation site to mirror
    pub url: String,
    /// Skill bundle name
    pub skill_name: String,
    /// Parent directory of the bundle
    pub output: PathBuf,
    /// Directory receiving the `.skill` archive
    pub skill_output: PathBuf,
    /// Scratch directory
    pub temp_dir: PathBuf,
    /// Reuse an existing crawl in the scratch directory
    pub skip_fetch: bool,
    /// Remove the scratch directory afterwards
    pub clean: bool,
    pub format: SkillFormat,
}

impl GenerateOptions {
    /// Options with the conventional default locations
    pub fn new(url: impl Into<String>, skill_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            skill_name: skill_name.into(),
            output: PathBuf::from(".claude/skills"),
            skill_output: PathBuf::from("."),
            temp_dir: PathBuf::from("build"),
            skip_fetch: false,
            clean: false,
            format: SkillFormat::default(),
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.temp_dir.join(DOWNLOAD_DIR)
    }

    pub fn crawl_dir(&self) -> PathBuf {
        self.download_dir().join(CRAWL_DIR_NAME)
    }

    pub fn markdown_dir(&self) -> PathBuf {
        self.temp_dir.join(MARKDOWN_DIR)
    }
}

/// Counts for a per-file batch step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Files fully processed
    pub processed: usize,
    /// Files left unchanged with a warning
    pub skipped: usize,
    /// Files that failed with an I/O error
    pub failed: usize,
}

/// What a `generate` run produced
#[derive(Debug)]
pub struct GenerateSummary {
    pub skill_dir: PathBuf,
    pub archive: PathBuf,
    /// `None` when the fetch step was skipped
    pub crawl: Option<CrawlOutcome>,
    pub converted: BatchStats,
    pub normalized: BatchStats,
    pub audit: AuditReport,
}

/// Runs the full pipeline
///
/// # Arguments
///
/// * `options` - Target, names and directories for this run
/// * `config` - Crawler, audit and search settings
/// * `reporter` - Sink for progress and warnings
///
/// # Returns
///
/// * `Ok(GenerateSummary)` - The bundle was generated and packaged
/// * `Err(SkillError)` - A fatal step failed
pub async fn run_generate(
    options: &GenerateOptions,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<GenerateSummary> {
    let url = validate_target_url(&options.url)?;
    let fetched_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let crawl_outcome = if options.skip_fetch {
        reporter.info(&format!(
            "=== Step 1: Skipped fetching (using {}) ===",
            options.download_dir().display()
        ));
        None
    } else {
        reporter.info(&format!("=== Step 1: Fetching {} ===", url));
        remove_dir_if_present(&options.temp_dir, reporter);
        let outcome = run_crawl(
            url.as_str(),
            &options.download_dir(),
            &config.crawler,
            reporter,
        )
        .await?;
        Some(outcome)
    };

    reporter.info("=== Step 2: Converting HTML to Markdown ===");
    let converted = convert_tree(
        &options.crawl_dir(),
        &options.markdown_dir(),
        url.scheme(),
        &fetched_at,
        reporter,
    )?;

    reporter.info("=== Step 3: Normalizing Markdown ===");
    let normalized = normalize_tree(&options.markdown_dir(), reporter)?;

    reporter.info(&format!(
        "=== Step 4: Generating skill structure ({} format) ===",
        options.format
    ));
    let skill_dir = generate(
        &options.skill_name,
        &options.markdown_dir(),
        &options.output,
        options.format,
        reporter,
    )?;

    reporter.info("=== Step 5: Validating skill ===");
    let audit = audit_corpus(&skill_dir, &config.audit, reporter);
    if !audit.valid {
        reporter.warn("Validation failed. Please check errors.");
    }

    reporter.info("=== Step 6: Packaging skill ===");
    let archive = package(&skill_dir, &options.skill_output, reporter)?;

    reporter.info("=== Done! ===");
    reporter.info(&format!("Skill directory: {}", skill_dir.display()));
    reporter.info(&format!("Skill package: {}", archive.display()));

    if options.clean {
        remove_dir_if_present(&options.temp_dir, reporter);
        reporter.info(&format!(
            "Temporary files removed from {}",
            options.temp_dir.display()
        ));
    } else {
        reporter.info(&format!(
            "Temporary files kept in {}",
            options.temp_dir.display()
        ));
    }

    Ok(GenerateSummary {
        skill_dir,
        archive,
        crawl: crawl_outcome,
        converted,
        normalized,
        audit,
    })
}

/// Converts every `.html` file under `crawl_dir` into `markdown_dir`
///
/// The markdown directory is recreated first. Each document's `source_url` is
/// rebuilt from its crawl-relative path and every document shares one
/// `fetched_at` timestamp. Output names are the sanitized file stems, so
/// pages with the same name in different directories collide; the later one
/// wins with a warning.
pub fn convert_tree(
    crawl_dir: &Path,
    markdown_dir: &Path,
    scheme: &str,
    fetched_at: &str,
    reporter: &dyn Reporter,
) -> Result<BatchStats> {
    if !crawl_dir.is_dir() {
        return Err(SkillError::MissingDirectory(crawl_dir.to_path_buf()));
    }
    if markdown_dir.exists() {
        std::fs::remove_dir_all(markdown_dir)
            .map_err(|e| SkillError::file("remove directory", markdown_dir, e))?;
    }
    std::fs::create_dir_all(markdown_dir)
        .map_err(|e| SkillError::file("create directory", markdown_dir, e))?;

    let html_files: Vec<PathBuf> = WalkDir::new(crawl_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                reporter.warn(&format!("Skipping unreadable entry: {}", e));
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "html")
        })
        .map(|entry| entry.into_path())
        .collect();
    reporter.info(&format!("Found {} HTML files.", html_files.len()));

    let mut stats = BatchStats::default();
    let mut written: HashSet<String> = HashSet::new();

    for html_path in &html_files {
        let Ok(relative) = html_path.strip_prefix(crawl_dir) else {
            reporter.warn(&format!("Skipping file outside crawl dir: {}", html_path.display()));
            stats.skipped += 1;
            continue;
        };
        let source_url = reconstruct_source_url(scheme, relative);

        let stem = html_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let md_name = format!("{}.md", sanitize_filename(&stem));
        if !written.insert(md_name.clone()) {
            reporter.warn(&format!("Name collision for {}. Overwriting.", md_name));
        }

        match convert_file(
            html_path,
            &markdown_dir.join(&md_name),
            Some(&source_url),
            Some(fetched_at),
            reporter,
        ) {
            Ok(true) => stats.processed += 1,
            Ok(false) => stats.skipped += 1,
            Err(e) => {
                reporter.warn(&format!("Error converting {}: {}", html_path.display(), e));
                stats.failed += 1;
            }
        }
    }

    reporter.info(&format!(
        "Converted {} files ({} skipped, {} failed)",
        stats.processed, stats.skipped, stats.failed
    ));
    Ok(stats)
}

/// Normalizes the links of every `.md` file directly in `markdown_dir`
pub fn normalize_tree(markdown_dir: &Path, reporter: &dyn Reporter) -> Result<BatchStats> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(markdown_dir)
        .map_err(|e| SkillError::file("read directory", markdown_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    let mut stats = BatchStats::default();
    for path in &paths {
        match normalize_file(path, path, reporter) {
            Ok(true) => stats.processed += 1,
            Ok(false) => stats.skipped += 1,
            Err(e) => {
                reporter.warn(&format!("Error normalizing {}: {}", path.display(), e));
                stats.failed += 1;
            }
        }
    }

    reporter.info(&format!(
        "Normalized {} files ({} skipped, {} failed)",
        stats.processed, stats.skipped, stats.failed
    ));
    Ok(stats)
}

fn remove_dir_if_present(dir: &Path, reporter: &dyn Reporter) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        reporter.warn(&format!("Could not remove {}: {}", dir.display(), e));
    }
}
