mod reader;
mod types;
mod writer;

pub use reader::{load_config, read_raw_rules};
pub use types::{ConfigError, RawRules};
pub use writer::save_config;
