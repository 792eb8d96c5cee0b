/// Project ingestion utilities
///
/// This module turns uploaded bytes (a ZIP archive, individually selected
/// files or a project directory) into source records. Files with other
/// extensions are ignored; files that are not valid UTF-8 are skipped with a
/// warning.

use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::AnalysisLimits;
use crate::core::report::SourceRecord;

/// Suffixes of the files kept for analysis
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[".py", ".txt", ".toml", ".env", ".cfg", ".ini"];

/// Directories never descended into when walking a project
const IGNORED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "node_modules",
    ".mypy_cache",
    ".pytest_cache",
];

/// Check whether a file name has one of the recognized suffixes.
///
/// This is a suffix test rather than an extension lookup so that a file
/// named exactly `.env` is kept.
pub fn is_recognized_file(name: &str) -> bool {
    RECOGNIZED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Decode bytes as UTF-8, logging and returning `None` on failure
pub fn decode_text(name: &str, bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Skipping {}: not valid UTF-8 text ({})", name, e.utf8_error());
            None
        }
    }
}

/// Extract recognized text files from a ZIP archive
///
/// # Arguments
///
/// * `reader` - Archive bytes
/// * `limits` - Per-file size, file count and total size caps
///
/// # Returns
///
/// Records named after the final path component, keeping the in-archive path
pub fn extract_files_from_zip<R: Read + Seek>(
    reader: R,
    limits: &AnalysisLimits,
) -> Result<Vec<SourceRecord>> {
    let mut archive = zip::ZipArchive::new(reader).context("Failed to open ZIP archive")?;
    let mut records = Vec::new();
    let mut total_bytes = 0;

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping archive entry {}: {}", index, e);
                continue;
            }
        };

        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        if !is_recognized_file(&entry_name) {
            debug!("Ignoring {}: unrecognized extension", entry_name);
            continue;
        }

        if records.len() >= limits.max_files {
            warn!("Reached maximum file limit ({})", limits.max_files);
            break;
        }

        // The declared size can lie, so the read itself is capped too
        let mut buffer = Vec::new();
        let read = entry
            .by_ref()
            .take(limits.max_file_size + 1)
            .read_to_end(&mut buffer);
        match read {
            Ok(_) if buffer.len() as u64 > limits.max_file_size => {
                warn!(
                    "Skipping {}: exceeds maximum file size ({} bytes)",
                    entry_name, limits.max_file_size
                );
            }
            Ok(_) => {
                if let Some(content) = decode_text(&entry_name, buffer) {
                    if !within_total_size(&mut total_bytes, &entry_name, &content, limits) {
                        break;
                    }
                    records.push(SourceRecord::from_path(entry_name, content));
                }
            }
            Err(e) => warn!("Skipping {}: {}", entry_name, e),
        }
    }

    Ok(records)
}

/// Extract recognized text files from a ZIP archive on disk
pub fn extract_files_from_zip_path(
    zip_path: &Path,
    limits: &AnalysisLimits,
) -> Result<Vec<SourceRecord>> {
    let file = File::open(zip_path)
        .context(format!("Failed to open archive: {}", zip_path.display()))?;
    extract_files_from_zip(file, limits)
        .context(format!("Failed to extract archive: {}", zip_path.display()))
}

/// Read individually uploaded files. Name and path are both the file name.
pub fn read_uploaded_files(paths: &[PathBuf], limits: &AnalysisLimits) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    let mut total_bytes = 0;

    for path in paths {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                warn!("Skipping {}: not a file", path.display());
                continue;
            }
        };

        if !is_recognized_file(&name) {
            debug!("Ignoring {}: unrecognized extension", path.display());
            continue;
        }

        if records.len() >= limits.max_files {
            warn!("Reached maximum file limit ({})", limits.max_files);
            break;
        }

        if let Some(content) = read_text_file(path, &name, limits) {
            if !within_total_size(&mut total_bytes, &name, &content, limits) {
                break;
            }
            records.push(SourceRecord::new(name, content));
        }
    }

    records
}

/// Walk a project directory recursively.
///
/// Records are named after the file and keep the path relative to `dir`,
/// the same way archive entries are.
pub fn read_directory(dir: &Path, limits: &AnalysisLimits) -> Result<Vec<SourceRecord>> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }

    let mut records = Vec::new();
    let mut total_bytes = 0;

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() && e.depth() > 0 {
                if let Some(name) = e.file_name().to_str() {
                    return !IGNORED_DIRS.contains(&name);
                }
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_path = entry.path();
        let relative = file_path
            .strip_prefix(dir)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");

        if !is_recognized_file(&relative) {
            continue;
        }

        if records.len() >= limits.max_files {
            warn!("Reached maximum file limit ({})", limits.max_files);
            break;
        }

        if let Some(content) = read_text_file(file_path, &relative, limits) {
            if !within_total_size(&mut total_bytes, &relative, &content, limits) {
                break;
            }
            records.push(SourceRecord::from_path(relative, content));
        }
    }

    Ok(records)
}

/// Add `content` to the running total, or report that it would pass the cap
fn within_total_size(
    total_bytes: &mut u64,
    name: &str,
    content: &str,
    limits: &AnalysisLimits,
) -> bool {
    let next = *total_bytes + content.len() as u64;
    if next > limits.max_total_bytes {
        warn!(
            "Reached maximum total size ({} bytes), stopping before {}",
            limits.max_total_bytes, name
        );
        return false;
    }
    *total_bytes = next;
    true
}

fn read_text_file(path: &Path, name: &str, limits: &AnalysisLimits) -> Option<String> {
    match path.metadata() {
        Ok(metadata) if metadata.len() > limits.max_file_size => {
            warn!(
                "Skipping {}: exceeds maximum file size ({:.2} MB)",
                path.display(),
                metadata.len() as f64 / 1024.0 / 1024.0
            );
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Error reading metadata for {}: {}", path.display(), e);
            return None;
        }
    }

    match fs::read(path) {
        Ok(bytes) => decode_text(name, bytes),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}
