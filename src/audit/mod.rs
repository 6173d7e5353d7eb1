//! Corpus auditor
//!
//! Validates the layout of a skill bundle and measures the size of its
//! documentation. Both checks always run and their findings are merged into
//! one [`AuditReport`].

mod size;
mod structure;

pub use size::{measure, FileSize, SizeReport, LARGEST_FILES};
pub use structure::{check_structure, is_markdown, DOCS_DIR, SCRIPTS_DIR, SKILL_FILE};

use crate::config::AuditConfig;
use crate::report::Reporter;
use serde::Serialize;
use std::path::Path;

/// Errors and warnings collected while auditing
#[derive(Debug, Default)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Outcome of auditing one skill bundle
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// False if any hard error was found
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub size: SizeReport,
}

/// Audits the skill bundle at `skill_dir`
///
/// A missing root directory or a missing `docs/` directory makes the report
/// invalid. Everything else, including an oversized corpus unless
/// `strict_size` is set, is a warning.
///
/// # Arguments
///
/// * `skill_dir` - Root of the skill bundle
/// * `config` - Size budget and strictness
/// * `reporter` - Sink for progress and findings
pub fn audit_corpus(skill_dir: &Path, config: &AuditConfig, reporter: &dyn Reporter) -> AuditReport {
    reporter.info(&format!("Validating skill in: {}", skill_dir.display()));

    if !skill_dir.is_dir() {
        let message = format!("Directory not found: {}", skill_dir.display());
        reporter.error(&message);
        return AuditReport {
            valid: false,
            errors: vec![message],
            warnings: Vec::new(),
            size: SizeReport::default(),
        };
    }

    let mut findings = Findings::default();
    check_structure(skill_dir, &mut findings, reporter);

    let size = measure(skill_dir, &skill_dir.join(DOCS_DIR));
    report_size(&size, reporter);

    for skipped in &size.skipped {
        findings.warn(format!("Could not read {}", skipped));
    }

    if size.exceeds(config.size_budget_bytes) {
        let message = format!(
            "Skill uncompressed size ({:.2} MiB) exceeds the {:.2} MiB budget and may fail to load in size-constrained consumers",
            size.total_mib,
            config.size_budget_bytes as f64 / (1024.0 * 1024.0)
        );
        if config.strict_size {
            findings.error(message);
        } else {
            findings.warn(message);
        }
    }

    let report = AuditReport {
        valid: findings.errors.is_empty(),
        errors: findings.errors,
        warnings: findings.warnings,
        size,
    };
    report_outcome(&report, reporter);
    report
}

fn report_size(size: &SizeReport, reporter: &dyn Reporter) {
    reporter.info(&format!("Total uncompressed size: {:.2} MiB", size.total_mib));
    if size.largest.is_empty() {
        return;
    }
    reporter.info(&format!("Top {} largest files:", LARGEST_FILES));
    for file in &size.largest {
        reporter.info(&format!(
            "  {:.1} KB - {}",
            file.bytes as f64 / 1024.0,
            file.path
        ));
    }
}

fn report_outcome(report: &AuditReport, reporter: &dyn Reporter) {
    for warning in &report.warnings {
        reporter.warn(warning);
    }

    if report.valid {
        reporter.info("Validation passed!");
    } else {
        reporter.error("VALIDATION FAILED:");
        for error in &report.errors {
            reporter.error(&format!("  - {}", error));
        }
    }
}
