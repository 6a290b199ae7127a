mod codes;

pub use codes::ExitCode;

use crate::clipboard::ClipboardError;
use crate::config::ConfigError;
use crate::history::UndoError;
use crate::rules::RuleError;
use crate::scanner::ScannerError;
use crate::session::{SessionError, StoreError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Invalid rule file: {message}")]
    RuleFile {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid regex pattern: {pattern}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Not in listing: {}", .names.join(", "))]
    UnknownEntries { names: Vec<String> },

    #[error("Failed to {action} {from}")]
    OperationFailed {
        action: String,
        from: String,
        to: Option<String>,
        message: String,
        completed: usize,
        skipped: usize,
    },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Undo of delete is not supported: {path}")]
    UndoUnsupported { path: PathBuf },

    #[error("Undo failed: {operation}")]
    UndoFailed { operation: String, message: String },

    #[error("No valid file path in clipboard")]
    EmptyClipboard,

    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    #[error("Session state error: {message}")]
    State {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::RuleFile { .. } => ExitCode::InvalidConfiguration,
            AppError::InvalidPattern { .. } => ExitCode::InvalidConfiguration,
            AppError::UnknownEntries { .. } => ExitCode::InvalidArguments,
            AppError::OperationFailed { .. } => ExitCode::OperationFailed,
            AppError::NothingToUndo => ExitCode::NothingToUndo,
            AppError::UndoUnsupported { .. } => ExitCode::UndoUnsupported,
            AppError::UndoFailed { .. } => ExitCode::OperationFailed,
            AppError::EmptyClipboard => ExitCode::ClipboardError,
            AppError::Clipboard { .. } => ExitCode::ClipboardError,
            AppError::State { .. } => ExitCode::StateError,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::RuleFile { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Could not use rule file:\n  {}\n{}\n\
                     Rule files are JSON objects with string values.",
                    message, path_info
                )
            }

            AppError::InvalidPattern { pattern, message } => {
                format!(
                    "The find pattern is not a valid regular expression:\n  {}\n\n{}",
                    pattern, message
                )
            }

            AppError::UnknownEntries { names } => {
                let mut msg = String::from("These names are not in the listing:\n");
                for name in names.iter().take(10) {
                    msg.push_str(&format!("  - {}\n", name));
                }
                if names.len() > 10 {
                    msg.push_str(&format!("  ... and {} more\n", names.len() - 10));
                }
                msg.push_str("\nCheck the listing filters (--dirs, --hidden, --type).");
                msg
            }

            AppError::OperationFailed {
                action,
                from,
                to,
                message,
                completed,
                skipped,
            } => {
                let mut msg = format!("Failed to {}:\nFrom: {}\n", action, from);
                if let Some(to) = to {
                    msg.push_str(&format!("To:   {}\n", to));
                }
                msg.push_str(&format!("Error: {}\n\n", message));
                msg.push_str(&format!(
                    "{} item(s) completed before the failure were kept.\n",
                    completed
                ));
                if *skipped > 0 {
                    msg.push_str(&format!("{} remaining item(s) were not attempted.\n", skipped));
                }
                msg.push_str("Run `renamr undo` to step back through completed changes.");
                msg
            }

            AppError::NothingToUndo => "Nothing to undo: the undo history is empty.".to_string(),

            AppError::UndoUnsupported { path } => {
                format!(
                    "Cannot undo a delete:\n  {}\n\n\
                     The entry was removed from the undo history. \
                     Restore the file from your system trash if needed.",
                    path.display()
                )
            }

            AppError::UndoFailed { operation, message } => {
                format!(
                    "Failed to undo {}:\n  {}\n\n\
                     The entry was removed from the undo history and will not be retried.",
                    operation, message
                )
            }

            AppError::EmptyClipboard => {
                "The clipboard holds no existing file path.\n\n\
                 Copy or cut files first with `renamr copy` or `renamr cut`."
                    .to_string()
            }

            AppError::Clipboard { message } => format!("Clipboard error:\n  {}", message),

            AppError::State { path, message } => {
                let path_info = path
                    .as_ref()
                    .map(|p| format!("File: {}\n", p.display()))
                    .unwrap_or_default();

                format!(
                    "Session state error:\n  {}\n{}\n\
                     Delete the session file to start over.",
                    message, path_info
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<RuleError> for AppError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidPattern { pattern, source } => AppError::InvalidPattern {
                pattern,
                message: source.to_string(),
            },
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Rules(e) => e.into(),
            ConfigError::Io { path, source } => AppError::RuleFile {
                path: Some(path),
                message: source.to_string(),
            },
            ConfigError::Parse { path, source } => AppError::RuleFile {
                path: Some(path),
                message: source.to_string(),
            },
        }
    }
}

impl From<ClipboardError> for AppError {
    fn from(err: ClipboardError) -> Self {
        AppError::Clipboard {
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyClipboard => AppError::EmptyClipboard,
            SessionError::Clipboard(e) => e.into(),
            SessionError::Scan(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::State {
            path: None,
            message: err.to_string(),
        }
    }
}

impl From<UndoError> for AppError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::NothingToUndo => AppError::NothingToUndo,
            UndoError::Unsupported { path } => AppError::UndoUnsupported { path },
            UndoError::Filesystem { record, source } => AppError::UndoFailed {
                operation: record.description(),
                message: source.to_string(),
            },
        }
    }
}
