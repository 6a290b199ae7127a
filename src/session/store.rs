use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::PasteMode;
use crate::history::UndoStack;

pub const SESSION_VERSION: &str = "1.0";
pub const SESSION_FILENAME: &str = "session.json";
pub const CLIPBOARD_FILENAME: &str = "clipboard.txt";

/// Error types for session state persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write session state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to serialize session state: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to read session state: {0}")]
    ReadError(String),

    #[error("Session state version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// State carried between runs: the undo stack and whether the clipboard
/// holds a pending cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version for compatibility
    pub version: String,

    pub saved_at: DateTime<Utc>,

    /// Tool version that wrote this state
    pub tool_version: String,

    pub paste_mode: PasteMode,

    /// Applied operations, oldest first
    pub undo: UndoStack,
}

impl SessionFile {
    pub fn new(paste_mode: PasteMode, undo: UndoStack) -> Self {
        Self {
            version: SESSION_VERSION.to_string(),
            saved_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            paste_mode,
            undo,
        }
    }
}

impl Default for SessionFile {
    fn default() -> Self {
        Self::new(PasteMode::default(), UndoStack::new())
    }
}

/// Files making up the persisted state inside a state directory
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data-local-dir>/renamr`, falling back to the working directory
    pub fn default_location() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("renamr"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILENAME)
    }

    pub fn clipboard_path(&self) -> PathBuf {
        self.root.join(CLIPBOARD_FILENAME)
    }
}

/// Read session state; a missing file is a fresh session
pub fn read_session(path: &Path) -> Result<SessionFile, StoreError> {
    if !path.exists() {
        debug!(?path, "No session state yet");
        return Ok(SessionFile::default());
    }

    let file = File::open(path)
        .map_err(|e| StoreError::ReadError(format!("Cannot open file: {}", e)))?;

    let session: SessionFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| StoreError::ReadError(format!("Invalid JSON: {}", e)))?;

    if session.version != SESSION_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: SESSION_VERSION.to_string(),
            found: session.version,
        });
    }

    debug!(?path, operations = session.undo.len(), "Session state loaded");
    Ok(session)
}

pub fn write_session(session: &SessionFile, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to temporary file first
    let temp_path = path.with_extension("json.tmp");

    {
        let file = File::create(&temp_path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), session)?;
    }

    fs::rename(&temp_path, path)?;

    info!("Session state written to: {:?}", path);
    Ok(())
}
