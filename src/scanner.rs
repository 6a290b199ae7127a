use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// Which entries a listing includes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub show_directories: bool,
    pub show_hidden: bool,
    /// Keep only entries whose [`file_type_label`] matches, ignoring case
    pub type_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub file_type: String,
}

impl FileEntry {
    pub fn new(name: String, path: PathBuf, is_dir: bool) -> Self {
        let file_type = file_type_label(&name, is_dir);
        Self {
            name,
            path,
            is_dir,
            file_type,
        }
    }
}

/// Type column shown for an entry: `Directory`, the upper-cased text after
/// the last dot, or `Unknown`.
pub fn file_type_label(name: &str, is_dir: bool) -> String {
    if is_dir {
        return "Directory".to_string();
    }

    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_uppercase(),
        _ => "Unknown".to_string(),
    }
}

pub fn scan_directory(target: &Path, options: &ListOptions) -> Result<Vec<FileEntry>, ScannerError> {
    debug!(path = ?target, ?options, "Scanning directory");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let mut entries = Vec::new();

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        trace!(entry = ?path, "Examining entry");

        let is_dir = path.is_dir();
        if !(path.is_file() || (options.show_directories && is_dir)) {
            trace!(path = ?path, "Skipping entry");
            continue;
        }

        // Entries are renamed by name, so a name that is not valid UTF-8
        // could not be mapped back to the file on disk.
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(name = ?raw, "Skipping entry whose name is not valid UTF-8");
                continue;
            }
        };

        if name.starts_with('.') && !options.show_hidden {
            trace!(name = %name, "Skipping hidden entry");
            continue;
        }

        let file_entry = FileEntry::new(name, path, is_dir);

        if let Some(filter) = &options.type_filter {
            if !file_entry.file_type.eq_ignore_ascii_case(filter) {
                trace!(name = %file_entry.name, "Skipping filtered type");
                continue;
            }
        }

        entries.push(file_entry);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = entries.len(), "Scan complete");

    Ok(entries)
}
