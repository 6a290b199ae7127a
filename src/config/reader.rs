use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use super::types::{ConfigError, RawRules};
use crate::rules::RuleConfiguration;

/// Read a rule file without validating it
pub fn read_raw_rules(path: &Path) -> Result<RawRules, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate a rule file
pub fn load_config(path: &Path) -> Result<RuleConfiguration, ConfigError> {
    let rules = read_raw_rules(path)?.to_rules()?;
    info!("Configuration imported from {:?}", path);
    Ok(rules)
}
