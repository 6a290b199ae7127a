//! Presentation-side adapter over the rule engine and the operation log.
//!
//! A [`Session`] owns the current listing, the clipboard, the pending paste
//! mode and the single undo stack, and turns user actions into calls on the
//! pure functions in [`actions`].

pub mod actions;
mod store;
mod types;

pub use store::{
    read_session, write_session, SessionFile, StateDir, StoreError, SESSION_VERSION,
};
pub use types::{
    absolutize, expand_tilde, BatchKind, BatchReport, Context, ItemReport, Outcome, PasteMode,
    RenameEntry, SessionError,
};

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::filesystem::FileSystem;
use crate::history::{OperationRecord, UndoError, UndoStack};
use crate::rules::RuleConfiguration;
use crate::scanner::ListOptions;

pub struct Session<F: FileSystem, C: Clipboard> {
    fs: F,
    clipboard: C,
    context: Context,
    list_options: ListOptions,
    entries: Vec<RenameEntry>,
    paste_mode: PasteMode,
    undo: UndoStack,
}

impl<F: FileSystem, C: Clipboard> Session<F, C> {
    /// Session with an empty listing
    pub fn new(fs: F, clipboard: C, context: Context) -> Self {
        Self {
            fs,
            clipboard,
            context,
            list_options: ListOptions::default(),
            entries: Vec::new(),
            paste_mode: PasteMode::default(),
            undo: UndoStack::new(),
        }
    }

    /// Session with the context directory already listed
    pub fn open(
        fs: F,
        clipboard: C,
        context: Context,
        list_options: ListOptions,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(fs, clipboard, context);
        session.list_options = list_options;
        session.refresh()?;
        Ok(session)
    }

    /// Restore the undo stack and paste mode saved by an earlier run
    pub fn with_state(mut self, state: SessionFile) -> Self {
        self.paste_mode = state.paste_mode;
        self.undo = state.undo;
        self
    }

    pub fn to_state(&self) -> SessionFile {
        SessionFile::new(self.paste_mode, self.undo.clone())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn paste_mode(&self) -> PasteMode {
        self.paste_mode
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Re-list the context directory. Selection and previews are discarded.
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        let listing = self
            .fs
            .list_entries(self.context.dir(), &self.list_options)?;
        self.entries = RenameEntry::from_listing(&listing);
        debug!(dir = ?self.context.dir(), count = self.entries.len(), "Listing refreshed");
        Ok(())
    }

    pub fn set_list_options(&mut self, options: ListOptions) -> Result<(), SessionError> {
        self.list_options = options;
        self.refresh()
    }

    /// Switch to a user-typed directory. Returns false, leaving the
    /// session where it was, if the input is not an existing directory.
    pub fn navigate_to(&mut self, input: &str) -> Result<bool, SessionError> {
        match Context::resolve(input) {
            Some(context) => {
                self.context = context;
                self.refresh()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn navigate_up(&mut self) -> Result<(), SessionError> {
        self.context = self.context.parent();
        self.refresh()
    }

    /// Select entries by name. Returns the names that are not listed.
    pub fn select<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref();
            match self.entries.iter_mut().find(|e| e.original_name == name) {
                Some(entry) => entry.selected = true,
                None => unknown.push(name.to_string()),
            }
        }
        unknown
    }

    pub fn select_all(&mut self) {
        for entry in &mut self.entries {
            entry.selected = true;
        }
    }

    pub fn clear_selection(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| self.context.join(&e.original_name))
            .collect()
    }

    pub fn preview(&mut self, rules: &RuleConfiguration) -> &[RenameEntry] {
        actions::preview(&mut self.entries, rules);
        &self.entries
    }

    /// Preview, rename the selected entries, then re-list.
    pub fn rename_selected(&mut self, rules: &RuleConfiguration) -> BatchReport {
        actions::preview(&mut self.entries, rules);
        let report = actions::rename_selected(&self.context, &self.entries, &self.fs, &mut self.undo);
        self.reload();
        report
    }

    pub fn copy_paths(&mut self, paths: &[PathBuf]) -> Result<usize, SessionError> {
        let count = actions::copy_to_clipboard(paths, &mut self.clipboard)?;
        self.paste_mode = PasteMode::Copy;
        Ok(count)
    }

    pub fn cut_paths(&mut self, paths: &[PathBuf]) -> Result<usize, SessionError> {
        let count = actions::copy_to_clipboard(paths, &mut self.clipboard)?;
        self.paste_mode = PasteMode::Move;
        info!("Cut files: {:?}", paths);
        Ok(count)
    }

    pub fn copy_selected(&mut self) -> Result<usize, SessionError> {
        let paths = self.selected_paths();
        self.copy_paths(&paths)
    }

    pub fn cut_selected(&mut self) -> Result<usize, SessionError> {
        let paths = self.selected_paths();
        self.cut_paths(&paths)
    }

    /// Paste the clipboard into the context directory. A pending cut is
    /// consumed by a paste that completes; after a failure the remaining
    /// clipboard paths are still moved by the next paste.
    pub fn paste(&mut self) -> Result<BatchReport, SessionError> {
        let report = actions::paste(
            &self.context,
            self.paste_mode,
            &self.clipboard,
            &self.fs,
            &mut self.undo,
        )?;
        if report.is_success() {
            self.paste_mode = PasteMode::Copy;
        }
        self.reload();
        Ok(report)
    }

    pub fn delete_paths(&mut self, paths: &[PathBuf]) -> BatchReport {
        let report = actions::delete(paths, &self.fs, &mut self.undo);
        self.reload();
        report
    }

    pub fn delete_selected(&mut self) -> BatchReport {
        let paths = self.selected_paths();
        self.delete_paths(&paths)
    }

    pub fn undo(&mut self) -> Result<OperationRecord, UndoError> {
        let result = self.undo.undo(&self.fs);
        self.reload();
        result
    }

    fn reload(&mut self) {
        if let Err(e) = self.refresh() {
            warn!("Could not refresh listing: {}", e);
        }
    }
}
