//! Settings persistence.
//!
//! Settings live in `<config dir>/crosstui/config.toml`. Every key is optional;
//! anything missing takes its default. Override hierarchy: defaults → config file →
//! CLI flags. Toggling a setting in the app writes the file back.

use crossfill::Settings;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
  #[serde(default)]
  pub settings: Settings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("config I/O error: {0}")]
  Io(#[from] std::io::Error),
  #[error("config parse error: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("config serialize error: {0}")]
  Serialize(#[from] toml::ser::Error),
}

/// Returns the path to `<config dir>/crosstui/config.toml`.
pub fn config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|d| d.join("crosstui").join("config.toml"))
}

/// Loads the config at `path`. A missing file is not an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
  if !path.exists() {
    info!("No config file at {}, using defaults", path.display());
    return Ok(Config::default());
  }

  let contents = fs::read_to_string(path)?;
  let config: Config = toml::from_str(&contents)?;
  info!("Loaded config from {}", path.display());
  debug!("Config: {:?}", config);
  Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, toml::to_string(config)?)?;
  debug!("Saved config to {}", path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossfill::{EndOfWord, RevealMode};

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn sparse_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[settings]\nerror_check = true\nend_of_word = \"stay\"\n").unwrap();

    let settings = load_config(&path).unwrap().settings;
    assert!(settings.error_check);
    assert_eq!(settings.end_of_word, EndOfWord::Stay);
    assert!(!settings.skip_filled);
    assert!(settings.reveal_enabled);
  }

  #[test]
  fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
      settings: Settings {
        skip_filled: true,
        reveal_mode: RevealMode::Word,
        ..Settings::default()
      },
    };

    save_config(&path, &config).unwrap();
    assert_eq!(load_config(&path).unwrap(), config);
  }

  #[test]
  fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[settings\n").unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
  }
}
