pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod history;
pub mod logging;
pub mod output;
pub mod progress;
pub mod rules;
pub mod scanner;
pub mod session;

pub use clipboard::{Clipboard, ClipboardError, FileClipboard, MemoryClipboard};
pub use config::{load_config, save_config, ConfigError, RawRules};
pub use error::{AppError, ExitCode};
pub use filesystem::{DeleteMode, FileSystem, FsError, RealFileSystem};
pub use history::{OperationRecord, UndoError, UndoStack};
pub use rules::{compute_name, recognize_date, split_name, DateError, RuleConfiguration, RuleError};
pub use scanner::{file_type_label, scan_directory, FileEntry, ListOptions, ScannerError};
pub use session::{BatchReport, Context, PasteMode, RenameEntry, Session, SessionError};
