use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One filesystem mutation, recorded so it can be inverted later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationRecord {
    Rename { from: PathBuf, to: PathBuf },
    Move { from: PathBuf, to: PathBuf },
    Copy { from: PathBuf, to: PathBuf },
    Delete { path: PathBuf },
}

impl OperationRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            OperationRecord::Rename { .. } => "rename",
            OperationRecord::Move { .. } => "move",
            OperationRecord::Copy { .. } => "copy",
            OperationRecord::Delete { .. } => "delete",
        }
    }

    /// Path the operation produced, if it left one behind
    pub fn target(&self) -> Option<&Path> {
        match self {
            OperationRecord::Rename { to, .. }
            | OperationRecord::Move { to, .. }
            | OperationRecord::Copy { to, .. } => Some(to),
            OperationRecord::Delete { .. } => None,
        }
    }

    pub fn description(&self) -> String {
        match self {
            OperationRecord::Rename { from, to }
            | OperationRecord::Move { from, to }
            | OperationRecord::Copy { from, to } => {
                format!("{} {} -> {}", self.kind(), from.display(), to.display())
            }
            OperationRecord::Delete { path } => format!("delete {}", path.display()),
        }
    }
}
