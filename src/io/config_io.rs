use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::WeaverConfig;

pub const CONFIG_FILE: &str = "weaver.toml";

/// Error type for reading and writing weaver.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {CONFIG_FILE}: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize {CONFIG_FILE}: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Read weaver.toml from the data directory. A missing file yields the
/// defaults.
pub fn read_config(data_dir: &Path) -> Result<WeaverConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(WeaverConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write a config file to the data directory.
pub fn write_config(data_dir: &Path, config: &WeaverConfig) -> Result<(), ConfigError> {
    fs::create_dir_all(data_dir)?;
    let text = toml::to_string_pretty(config)?;
    fs::write(data_dir.join(CONFIG_FILE), text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.history.max, 50);
        assert_eq!(config.prompt.separator, ", ");
        assert_eq!(config.prompt.log_limit, 50);
        assert!(config.storage.autosave);
        assert_eq!(config.storage.data_file, "data.json");
        assert_eq!(config.uploads.dir, "uploads");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[history]\nmax = 5\n\n[prompt]\nseparator = \" | \"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.history.max, 5);
        assert_eq!(config.prompt.separator, " | ");
        assert_eq!(config.prompt.log_limit, 50);
        assert!(config.storage.autosave);
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let mut config = WeaverConfig::default();
        config.storage.autosave = false;
        write_config(tmp.path(), &config).unwrap();
        let back = read_config(tmp.path()).unwrap();
        assert!(!back.storage.autosave);
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[history\nmax = ").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
