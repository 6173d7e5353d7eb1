//! Size analysis of the docs/ corpus

use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// Number of files listed in the largest-files table
pub const LARGEST_FILES: usize = 10;

const MIB: f64 = 1024.0 * 1024.0;

/// One entry of the largest-files table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSize {
    /// Path relative to the bundle root, with forward slashes
    pub path: String,
    pub bytes: u64,
}

/// Total size of the corpus and its largest files
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizeReport {
    pub total_bytes: u64,
    pub total_mib: f64,
    /// Largest files, descending by size then ascending by path
    pub largest: Vec<FileSize>,
    /// Entries that could not be read
    pub skipped: Vec<String>,
}

impl SizeReport {
    /// Returns true if the corpus is larger than `budget` bytes
    pub fn exceeds(&self, budget: u64) -> bool {
        self.total_bytes > budget
    }
}

/// Measures every file under `docs`
///
/// Paths in the report are relative to `skill_dir`. A missing `docs`
/// directory yields an empty report.
pub fn measure(skill_dir: &Path, docs: &Path) -> SizeReport {
    let mut report = SizeReport::default();
    if !docs.is_dir() {
        return report;
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(docs) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.skipped.push(
                    e.path()
                        .map(|p| relative_display(skill_dir, p))
                        .unwrap_or_else(|| e.to_string()),
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(metadata) => {
                report.total_bytes += metadata.len();
                files.push(FileSize {
                    path: relative_display(skill_dir, entry.path()),
                    bytes: metadata.len(),
                });
            }
            Err(_) => report
                .skipped
                .push(relative_display(skill_dir, entry.path())),
        }
    }

    files.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
    files.truncate(LARGEST_FILES);

    report.total_mib = report.total_bytes as f64 / MIB;
    report.largest = files;
    report
}

fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
