mod date;
mod engine;
mod types;

pub use date::{recognize_date, DateError};
pub use engine::{compute_name, split_name};
pub use types::{parse_count, FindPattern, RuleConfiguration, RuleError};
