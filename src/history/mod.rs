mod stack;
mod types;

pub use stack::{UndoError, UndoStack};
pub use types::OperationRecord;
