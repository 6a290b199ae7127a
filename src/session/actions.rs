//! Batch operations behind the session.
//!
//! Each function works in an explicit [`Context`], attempts its items in
//! order, records every successful mutation on the undo stack, and stops at
//! the first failure without rolling back what already succeeded.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{BatchKind, BatchReport, Context, Outcome, PasteMode, RenameEntry, SessionError};
use crate::clipboard::{decode_paths, encode_paths, Clipboard};
use crate::filesystem::{FileSystem, FsError};
use crate::history::{OperationRecord, UndoStack};
use crate::rules::{compute_name, RuleConfiguration};

/// Recompute names for selected entries; unselected ones are cleared.
pub fn preview(entries: &mut [RenameEntry], rules: &RuleConfiguration) {
    for entry in entries.iter_mut() {
        entry.computed_name = if entry.selected {
            compute_name(&entry.original_name, rules)
        } else {
            String::new()
        };
    }

    debug!(
        selected = entries.iter().filter(|e| e.selected).count(),
        "Preview computed"
    );
}

/// Rename every selected entry to its computed name.
pub fn rename_selected(
    ctx: &Context,
    entries: &[RenameEntry],
    fs: &dyn FileSystem,
    undo: &mut UndoStack,
) -> BatchReport {
    let jobs = entries
        .iter()
        .filter(|e| e.selected)
        .map(|e| (ctx.join(&e.original_name), ctx.join(&e.computed_name)))
        .collect();

    let report = run_batch(BatchKind::Rename, jobs, undo, |from, to| {
        fs.rename(from, to).map(|()| OperationRecord::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        })
    });

    info!("Renaming completed: {} renamed", report.done_count());
    report
}

/// Put paths on the clipboard, one per line. Returns how many were placed.
pub fn copy_to_clipboard(
    paths: &[PathBuf],
    clipboard: &mut dyn Clipboard,
) -> Result<usize, SessionError> {
    clipboard.set_text(&encode_paths(paths))?;
    info!("Copied files: {:?}", paths);
    Ok(paths.len())
}

/// Copy or move every existing clipboard path into the context directory.
pub fn paste(
    ctx: &Context,
    mode: PasteMode,
    clipboard: &dyn Clipboard,
    fs: &dyn FileSystem,
    undo: &mut UndoStack,
) -> Result<BatchReport, SessionError> {
    let text = clipboard.get_text()?;

    let jobs: Vec<(PathBuf, PathBuf)> = decode_paths(&text)
        .into_iter()
        .filter(|path| {
            let usable = fs.exists(path);
            if !usable {
                debug!(?path, "Ignoring clipboard entry that does not exist");
            }
            usable
        })
        .filter_map(|path| {
            let target = ctx.dir().join(path.file_name()?);
            Some((path, target))
        })
        .collect();

    if jobs.is_empty() {
        warn!("Paste error: no valid file path in clipboard");
        return Err(SessionError::EmptyClipboard);
    }

    let report = match mode {
        PasteMode::Move => run_batch(BatchKind::Move, jobs, undo, |from, to| {
            fs.move_path(from, to).map(|()| OperationRecord::Move {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            })
        }),
        PasteMode::Copy => run_batch(BatchKind::Copy, jobs, undo, |from, to| {
            fs.copy(from, to).map(|()| OperationRecord::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            })
        }),
    };

    info!(
        "Pasted {} item(s) into {:?}",
        report.done_count(),
        ctx.dir()
    );
    Ok(report)
}

/// Send each path to the trash.
pub fn delete(paths: &[PathBuf], fs: &dyn FileSystem, undo: &mut UndoStack) -> BatchReport {
    let mut report = BatchReport::new(BatchKind::Delete);
    let mut failed = false;

    for path in paths {
        if failed {
            report.push(path.clone(), None, Outcome::Skipped);
            continue;
        }

        let record = OperationRecord::Delete { path: path.clone() };
        let outcome = match undo.record_and_apply(record, || fs.delete_to_trash(path)) {
            Ok(()) => Outcome::Done,
            Err(e) => {
                warn!("Failed to delete {:?}: {}", path, e);
                failed = true;
                Outcome::Failed(e)
            }
        };
        report.push(path.clone(), None, outcome);
    }

    report
}

fn run_batch(
    kind: BatchKind,
    jobs: Vec<(PathBuf, PathBuf)>,
    undo: &mut UndoStack,
    apply: impl Fn(&Path, &Path) -> Result<OperationRecord, FsError>,
) -> BatchReport {
    let mut report = BatchReport::new(kind);
    let mut failed = false;

    for (from, to) in jobs {
        let outcome = if failed {
            Outcome::Skipped
        } else if from == to {
            debug!(?from, "Source and target are the same, skipping");
            Outcome::Unchanged
        } else {
            match apply(&from, &to) {
                Ok(record) => {
                    undo.push(record);
                    Outcome::Done
                }
                Err(e) => {
                    warn!("Failed to {:?} {:?}: {}", kind, from, e);
                    failed = true;
                    Outcome::Failed(e)
                }
            }
        };
        report.push(from, Some(to), outcome);
    }

    report
}
