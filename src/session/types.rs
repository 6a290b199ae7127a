use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::filesystem::FsError;
use crate::scanner::{FileEntry, ScannerError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No valid file path in clipboard")]
    EmptyClipboard,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Scan(#[from] ScannerError),
}

/// Directory every session operation works in.
///
/// Operations receive it explicitly; navigating yields a new context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    dir: PathBuf,
}

impl Context {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Context for a user-typed path: `~` expanded, made absolute, and
    /// accepted only if it names an existing directory.
    pub fn resolve(input: &str) -> Option<Self> {
        let path = absolutize(&expand_tilde(input));
        path.is_dir().then(|| Self::new(path))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Parent directory, or the same context at the root
    pub fn parent(&self) -> Self {
        match self.dir.parent() {
            Some(parent) => Self::new(parent),
            None => self.clone(),
        }
    }
}

pub fn expand_tilde(input: &str) -> PathBuf {
    let rest = if input == "~" {
        Some("")
    } else {
        input.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// One listed file and the name the current rules would give it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub original_name: String,
    /// Empty until previewed; only selected entries are previewed
    pub computed_name: String,
    pub selected: bool,
}

impl RenameEntry {
    pub fn new(original_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            computed_name: String::new(),
            selected: false,
        }
    }

    pub fn from_listing(listing: &[FileEntry]) -> Vec<Self> {
        listing.iter().map(|e| Self::new(e.name.as_str())).collect()
    }

    pub fn is_changed(&self) -> bool {
        self.computed_name != self.original_name
    }
}

/// What paste does with the clipboard paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasteMode {
    #[default]
    Copy,
    Move,
}

#[derive(Debug)]
pub enum Outcome {
    Done,
    /// Nothing to do: the target is the source itself
    Unchanged,
    Failed(FsError),
    /// Not attempted because an earlier item failed
    Skipped,
}

#[derive(Debug)]
pub struct ItemReport {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub outcome: Outcome,
}

impl ItemReport {
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }

    pub fn target_name(&self) -> Option<String> {
        self.target.as_deref().map(display_name)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Rename,
    Copy,
    Move,
    Delete,
}

impl BatchKind {
    pub fn verb(&self) -> &'static str {
        match self {
            BatchKind::Rename => "rename",
            BatchKind::Copy => "copy",
            BatchKind::Move => "move",
            BatchKind::Delete => "delete",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            BatchKind::Rename => "renamed",
            BatchKind::Copy => "copied",
            BatchKind::Move => "moved",
            BatchKind::Delete => "deleted",
        }
    }
}

/// Per-item results of a batch, in the order the items were attempted
#[derive(Debug)]
pub struct BatchReport {
    pub kind: BatchKind,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn new(kind: BatchKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, source: PathBuf, target: Option<PathBuf>, outcome: Outcome) {
        self.items.push(ItemReport {
            source,
            target,
            outcome,
        });
    }

    pub fn done_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Done))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn failure(&self) -> Option<&ItemReport> {
        self.items
            .iter()
            .find(|item| matches!(item.outcome, Outcome::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_context_parent() {
        let ctx = Context::new("/home/user/photos");
        assert_eq!(ctx.parent().dir(), Path::new("/home/user"));
        assert_eq!(Context::new("/").parent().dir(), Path::new("/"));
    }

    #[test]
    fn test_context_resolve() {
        let dir = tempdir().unwrap();
        let ctx = Context::resolve(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(ctx.dir(), dir.path());

        assert!(Context::resolve(dir.path().join("missing").to_str().unwrap()).is_none());
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/docs"), home.join("docs"));
        }
        assert_eq!(expand_tilde("/abs/~x"), PathBuf::from("/abs/~x"));
        assert_eq!(expand_tilde("~other"), PathBuf::from("~other"));
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::new(BatchKind::Rename);
        report.push(PathBuf::from("/d/a"), Some(PathBuf::from("/d/b")), Outcome::Done);
        report.push(PathBuf::from("/d/c"), Some(PathBuf::from("/d/c")), Outcome::Unchanged);
        report.push(
            PathBuf::from("/d/e"),
            Some(PathBuf::from("/d/f")),
            Outcome::Failed(FsError::NotFound(PathBuf::from("/d/e"))),
        );
        report.push(PathBuf::from("/d/g"), Some(PathBuf::from("/d/h")), Outcome::Skipped);

        assert_eq!(report.done_count(), 1);
        assert_eq!(report.unchanged_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.is_success());
        assert_eq!(report.failure().unwrap().source_name(), "e");
    }

    #[test]
    fn test_paste_mode_serialization() {
        assert_eq!(serde_json::to_string(&PasteMode::Move).unwrap(), "\"move\"");
        assert_eq!(PasteMode::default(), PasteMode::Copy);
    }
}
