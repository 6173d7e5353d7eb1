//! Skill bundle layout
//!
//! Creates `<output_base>/<name>/` with a `SKILL.md` descriptor for the
//! requested consumer and a flat `docs/` directory of Markdown documents.

use crate::audit::{is_markdown, DOCS_DIR, SKILL_FILE};
use crate::document::frontmatter::{self, Frontmatter};
use crate::report::Reporter;
use crate::{Result, SkillError};
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// Consumer the bundle descriptor is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillFormat {
    /// Descriptor with `name`/`description` frontmatter
    #[default]
    Claude,
    /// Plain Markdown descriptor without frontmatter
    Codex,
}

impl FromStr for SkillFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            other => Err(format!(
                "unknown skill format '{}' (expected 'claude' or 'codex')",
                other
            )),
        }
    }
}

impl fmt::Display for SkillFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claude => write!(f, "claude"),
            Self::Codex => write!(f, "codex"),
        }
    }
}

/// Generates a skill bundle from a directory of Markdown documents
///
/// # Arguments
///
/// * `skill_name` - Bundle directory name, also used in the descriptor
/// * `source_dir` - Directory searched recursively for `.md` files
/// * `output_base` - Parent directory of the bundle
/// * `format` - Descriptor flavour
/// * `reporter` - Sink for progress and collision warnings
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the generated bundle directory
/// * `Err(SkillError)` - The name is invalid, the source is missing or a write failed
pub fn generate(
    skill_name: &str,
    source_dir: &Path,
    output_base: &Path,
    format: SkillFormat,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    validate_skill_name(skill_name)?;
    if !source_dir.is_dir() {
        return Err(SkillError::MissingDirectory(source_dir.to_path_buf()));
    }

    let skill_dir = output_base.join(skill_name);
    let docs_dir = skill_dir.join(DOCS_DIR);
    std::fs::create_dir_all(&docs_dir)
        .map_err(|e| SkillError::file("create directory", &docs_dir, e))?;

    let descriptor = skill_dir.join(SKILL_FILE);
    std::fs::write(&descriptor, skill_descriptor(skill_name, format))
        .map_err(|e| SkillError::file("write", &descriptor, e))?;
    reporter.info(&format!("Created {}", descriptor.display()));

    let copied = copy_markdown_files(source_dir, &docs_dir, reporter)?;
    reporter.info(&format!("Copied {} files to docs/", copied));

    Ok(skill_dir)
}

fn validate_skill_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SkillError::InvalidSkillName(name.to_string())),
    }
}

fn copy_markdown_files(source_dir: &Path, docs_dir: &Path, reporter: &dyn Reporter) -> Result<usize> {
    let mut origins: HashMap<PathBuf, PathBuf> = HashMap::new();

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let destination = docs_dir.join(entry.file_name());
        if let Some(previous) = origins.get(&destination) {
            reporter.warn(&format!(
                "{} overwrites {} in docs/",
                entry.path().display(),
                previous.display()
            ));
        }

        std::fs::copy(entry.path(), &destination)
            .map_err(|e| SkillError::file("copy", entry.path(), e))?;
        origins.insert(destination, entry.path().to_path_buf());
    }

    Ok(origins.len())
}

/// Renders the `SKILL.md` descriptor for a format
pub fn skill_descriptor(skill_name: &str, format: SkillFormat) -> String {
    let display_name = skill_name.to_uppercase();
    match format {
        SkillFormat::Claude => {
            let meta: Frontmatter = [
                ("name", skill_name.to_string()),
                ("description", format!("{} documentation assistant", display_name)),
            ]
            .into_iter()
            .collect();
            format!(
                "{}{}",
                frontmatter::render(&meta),
                claude_instructions(&display_name)
            )
        }
        SkillFormat::Codex => codex_instructions(&display_name),
    }
}

fn claude_instructions(display_name: &str) -> String {
    format!(
        r#"# {name} Skill

This skill provides access to {name} documentation.

## Documentation

All documentation files are in the `docs/` directory as Markdown files.

## Search Tool

Use the `site2skill search` command to search through documentation:

```bash
site2skill search "<query>" --skill-dir .
```

Options:
- `--json` - Output as JSON
- `--max-results N` - Limit results (default: 10)
- `--skill-dir PATH` - Path to skill directory (default: current directory)

## Usage

1. Search or read files in `docs/` for relevant information
2. Each file has frontmatter with `source_url` and `fetched_at`
3. Always cite the source URL in responses
4. Note the fetch date - documentation may have changed

## Response Format

```
[Answer based on documentation]

**Source:** [source_url]
**Fetched:** [fetched_at]
```
"#,
        name = display_name
    )
}

fn codex_instructions(display_name: &str) -> String {
    format!(
        r#"# {name} Documentation Skill

This skill provides access to {name} documentation.

## Structure

- `docs/`: Contains all documentation as Markdown files

## Search Documentation

Use the `site2skill search` command to find relevant documentation:

```bash
site2skill search "your query here" --skill-dir .
```

Options:
- `--json`: Output results as JSON
- `--max-results N`: Limit number of results (default: 10)
- `--skill-dir PATH`: Path to skill directory (default: current directory)

## Documentation Files

Each file in `docs/` contains:
- **Frontmatter**: metadata with `title`, `source_url`, and `fetched_at`
- **Content**: Markdown-formatted documentation

## Best Practices

1. Search for relevant topics first
2. Read the full documentation file for context
3. Always reference the source URL when providing information
4. Note the fetch date as documentation may have been updated
"#,
        name = display_name
    )
}
