//! Structural checks on a skill bundle
//!
//! Required layout: a `docs/` directory with at least one Markdown file.
//! `SKILL.md` is optional but, when present, must carry a frontmatter block
//! with a non-empty `name` and `description`.

use crate::audit::Findings;
use crate::document::frontmatter;
use crate::report::Reporter;
use std::path::Path;
use walkdir::WalkDir;

/// Descriptor file at the bundle root
pub const SKILL_FILE: &str = "SKILL.md";

/// Directory holding the Markdown corpus
pub const DOCS_DIR: &str = "docs";

/// Optional directory of helper scripts
pub const SCRIPTS_DIR: &str = "scripts";

const REQUIRED_SKILL_KEYS: [&str; 2] = ["name", "description"];

/// Runs every structural check, recording problems in `findings`
pub fn check_structure(skill_dir: &Path, findings: &mut Findings, reporter: &dyn Reporter) {
    check_skill_file(&skill_dir.join(SKILL_FILE), findings, reporter);
    check_docs_dir(&skill_dir.join(DOCS_DIR), findings, reporter);

    if skill_dir.join(SCRIPTS_DIR).is_dir() {
        reporter.info("Found scripts/ (optional)");
    }
}

fn check_skill_file(path: &Path, findings: &mut Findings, reporter: &dyn Reporter) {
    if !path.is_file() {
        findings.warn("SKILL.md not found");
        return;
    }
    reporter.info("Found SKILL.md");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            findings.warn(format!("Could not validate SKILL.md: {}", e));
            return;
        }
    };

    if !content.starts_with("---") {
        findings.warn("SKILL.md missing frontmatter");
        return;
    }

    let (meta, _) = frontmatter::parse(&content);
    if meta.is_empty() {
        findings.warn("SKILL.md has incomplete frontmatter");
        return;
    }

    for key in REQUIRED_SKILL_KEYS {
        if meta.get_non_empty(key).is_none() {
            findings.warn(format!("SKILL.md frontmatter missing '{}' field", key));
        }
    }
}

fn check_docs_dir(docs: &Path, findings: &mut Findings, reporter: &dyn Reporter) {
    if !docs.is_dir() {
        findings.error("docs/ directory not found");
        return;
    }
    reporter.info("Found docs/");

    let markdown_files = WalkDir::new(docs)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_markdown(entry.path()))
        .count();

    if markdown_files == 0 {
        findings.warn("docs/ directory is empty (no .md files)");
    } else {
        reporter.info(&format!("  {} markdown files", markdown_files));
    }
}

/// Returns true for paths with a `.md` extension
pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}
