use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::OperationRecord;
use crate::filesystem::{FileSystem, FsError};

#[derive(Error, Debug)]
pub enum UndoError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Undo of delete is not supported: {path}")]
    Unsupported { path: PathBuf },

    #[error("Undo of {} failed: {source}", .record.kind())]
    Filesystem {
        record: OperationRecord,
        #[source]
        source: FsError,
    },
}

/// Last-in-first-out log of applied operations.
///
/// Records are only ever appended after the mutation succeeded, and only
/// ever removed by [`UndoStack::undo`]. There is no redo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UndoStack {
    records: Vec<OperationRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<OperationRecord>) -> Self {
        Self { records }
    }

    /// Oldest first
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn peek(&self) -> Option<&OperationRecord> {
        self.records.last()
    }

    pub fn push(&mut self, record: OperationRecord) {
        debug!(operation = %record.description(), depth = self.records.len() + 1, "Recorded");
        self.records.push(record);
    }

    /// Run `apply` and record `op` only if it succeeded.
    pub fn record_and_apply<E>(
        &mut self,
        op: OperationRecord,
        apply: impl FnOnce() -> Result<(), E>,
    ) -> Result<(), E> {
        apply()?;
        self.push(op);
        Ok(())
    }

    /// Pop the newest record and invert it.
    ///
    /// The record is consumed whatever the outcome: a failed inversion is
    /// reported, not retried, and deletes cannot be brought back.
    pub fn undo(&mut self, fs: &dyn FileSystem) -> Result<OperationRecord, UndoError> {
        let record = self.records.pop().ok_or(UndoError::NothingToUndo)?;

        let result = match &record {
            OperationRecord::Rename { from, to } => fs.rename(to, from),
            OperationRecord::Move { from, to } => fs.move_path(to, from),
            OperationRecord::Copy { to, .. } => fs.remove(to),
            OperationRecord::Delete { path } => {
                warn!("Undo delete not supported: {:?}", path);
                return Err(UndoError::Unsupported { path: path.clone() });
            }
        };

        match result {
            Ok(()) => {
                info!("Undid {}", record.description());
                Ok(record)
            }
            Err(source) => {
                warn!(operation = %record.description(), error = %source, "Undo failed");
                Err(UndoError::Filesystem { record, source })
            }
        }
    }
}
