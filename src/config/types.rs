use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{parse_count, RuleConfiguration, RuleError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rule file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Rule set as stored on disk: every value is text, counts included.
///
/// Missing keys read back as empty strings and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRules {
    pub prefix: String,
    pub suffix: String,
    pub remove_start: String,
    pub remove_end: String,
    pub extension: String,
    pub regex_find: String,
    pub regex_replace: String,
    pub date_format: String,
}

impl RawRules {
    /// Validate into a [`RuleConfiguration`]. Unparseable counts become zero;
    /// an invalid find pattern is an error.
    pub fn to_rules(&self) -> Result<RuleConfiguration, RuleError> {
        RuleConfiguration::default()
            .with_prefix(self.prefix.as_str())
            .with_suffix(self.suffix.as_str())
            .with_remove_from_start(parse_count(&self.remove_start))
            .with_remove_from_end(parse_count(&self.remove_end))
            .with_extension(self.extension.as_str())
            .with_date_format(self.date_format.as_str())
            .with_regex(&self.regex_find, self.regex_replace.as_str())
    }

    pub fn from_rules(rules: &RuleConfiguration) -> Self {
        Self {
            prefix: rules.prefix().to_string(),
            suffix: rules.suffix().to_string(),
            remove_start: rules.remove_from_start().to_string(),
            remove_end: rules.remove_from_end().to_string(),
            extension: rules.add_extension().unwrap_or_default().to_string(),
            regex_find: rules
                .regex_find()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            regex_replace: rules.regex_replace().unwrap_or_default().to_string(),
            date_format: rules.date_format().unwrap_or_default().to_string(),
        }
    }
}
