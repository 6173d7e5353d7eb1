//! Reproducible `.skill` archives
//!
//! Entries are written in sorted path order with a fixed timestamp and fixed
//! permissions, so packaging the same bundle twice yields identical bytes.

use crate::report::Reporter;
use crate::{Result, SkillError};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// File extension of packaged bundles
pub const ARCHIVE_EXTENSION: &str = "skill";

struct ArchiveEntry {
    name: String,
    source: PathBuf,
    is_dir: bool,
}

/// Packages `skill_dir` into `<output_dir>/<basename>.skill`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written archive
/// * `Err(SkillError)` - The bundle is missing or the archive could not be written
pub fn package(skill_dir: &Path, output_dir: &Path, reporter: &dyn Reporter) -> Result<PathBuf> {
    if !skill_dir.is_dir() {
        return Err(SkillError::MissingDirectory(skill_dir.to_path_buf()));
    }

    let base_name = skill_dir
        .canonicalize()
        .map_err(|e| SkillError::file("resolve", skill_dir, e))?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "skill".to_string());

    std::fs::create_dir_all(output_dir)
        .map_err(|e| SkillError::file("create directory", output_dir, e))?;
    let archive_path = output_dir.join(format!("{}.{}", base_name, ARCHIVE_EXTENSION));
    reporter.info(&format!(
        "Packaging {} to {}...",
        skill_dir.display(),
        archive_path.display()
    ));

    let entries = collect_entries(skill_dir, &archive_path)?;
    write_archive(&archive_path, &entries)?;

    let digest = archive_digest(&archive_path)?;
    reporter.info(&format!("Successfully created: {}", archive_path.display()));
    tracing::info!("SHA-256 {}  {}", digest, archive_path.display());

    Ok(archive_path)
}

/// Hex-encoded SHA-256 of a file
pub fn archive_digest(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| SkillError::file("read", path, e))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn collect_entries(skill_dir: &Path, archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let skip = archive_path.canonicalize().ok();
    let mut entries = Vec::new();

    for entry in WalkDir::new(skill_dir).min_depth(1) {
        let entry = entry?;
        if skip.as_deref().is_some_and(|skip| {
            entry.path().canonicalize().ok().as_deref() == Some(skip)
        }) {
            continue;
        }

        let relative = entry.path().strip_prefix(skill_dir).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let is_dir = entry.file_type().is_dir();

        entries.push(ArchiveEntry {
            name: if is_dir { format!("{}/", name) } else { name },
            source: entry.path().to_path_buf(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn write_archive(archive_path: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let file = File::create(archive_path).map_err(|e| SkillError::file("create", archive_path, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    let dir_options = SimpleFileOptions::default()
        .last_modified_time(DateTime::default())
        .unix_permissions(0o755);
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    for entry in entries {
        if entry.is_dir {
            writer.add_directory(entry.name.as_str(), dir_options)?;
            continue;
        }
        let content =
            std::fs::read(&entry.source).map_err(|e| SkillError::file("read", &entry.source, e))?;
        writer.start_file(entry.name.as_str(), file_options)?;
        writer.write_all(&content)?;
    }

    let mut inner = writer.finish()?;
    inner.flush()?;
    Ok(())
}
