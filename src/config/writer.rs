use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::types::{ConfigError, RawRules};
use crate::rules::RuleConfiguration;

/// Write a rule file, replacing any existing one.
///
/// The file is written next to the target and renamed into place; on any
/// failure the temporary file is removed and the target is left untouched.
pub fn save_config(rules: &RuleConfiguration, path: &Path) -> Result<(), ConfigError> {
    let temp_path = path.with_extension("json.tmp");

    let result = write_rules(&RawRules::from_rules(rules), &temp_path)
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(source) = result {
        if fs::remove_file(&temp_path).is_ok() {
            debug!(path = ?temp_path, "Removed temporary rule file");
        }
        return Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    info!("Configuration saved to {:?}", path);
    Ok(())
}

fn write_rules(raw: &RawRules, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, raw)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_failed_save_is_io_error_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.json");
        // A non-empty directory cannot be replaced by the written file
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "").unwrap();

        let result = save_config(&RuleConfiguration::default().with_prefix("x"), &path);

        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_save_then_load_is_equal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let rules = RuleConfiguration::default()
            .with_prefix("IMG-")
            .with_remove_from_start(4)
            .with_regex("_+", " ")
            .unwrap()
            .with_date_format("%Y-%m-%d")
            .with_extension(".jpeg");

        save_config(&rules, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), rules);
    }

    #[test]
    fn test_identity_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.json");

        save_config(&RuleConfiguration::default(), &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), RuleConfiguration::default());
    }

    #[test]
    fn test_all_values_are_strings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let rules = RuleConfiguration::default().with_remove_from_end(7);
        save_config(&rules, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert!(object.values().all(|v| v.is_string()));
        assert_eq!(object["remove_end"], "7");
    }

    #[test]
    fn test_no_temp_file_left() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.json");

        save_config(&RuleConfiguration::default(), &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }
}
