use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
  /// Base URL of the Rate Pro API (e.g. "https://api.example.com/api")
  pub url: String,
  /// Request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

impl SettingsConfig {
  /// Parse `url`, rejecting anything that cannot carry a path.
  pub fn base_url(&self) -> Result<Url> {
    let url = Url::parse(&self.url)
      .map_err(|e| eyre!("Invalid settings url '{}': {}", self.url, e))?;
    if url.cannot_be_a_base() {
      return Err(eyre!("Settings url '{}' cannot be used as a base", self.url));
    }
    Ok(url)
  }
}

const NO_CONFIG_MESSAGE: &str =
  "No configuration file found. Create one at ~/.config/rate-pro/config.yaml (see config.example.yaml)";

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./rate-pro.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/rate-pro/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!("{}", NO_CONFIG_MESSAGE)),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("rate-pro.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("rate-pro").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  /// Parse and validate YAML configuration.
  pub fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))?;
    config.settings.base_url()?;
    Ok(config)
  }

  /// Get the API token from the environment, if set.
  ///
  /// Checks RATE_PRO_API_TOKEN. Requests are sent without authorization
  /// when it is missing or empty.
  pub fn get_api_token() -> Option<String> {
    std::env::var("RATE_PRO_API_TOKEN")
      .ok()
      .filter(|t| !t.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_minimal_config() {
    let config = Config::parse("settings:\n  url: https://api.example.com/api\n").unwrap();
    assert_eq!(config.settings.url, "https://api.example.com/api");
    assert_eq!(config.settings.timeout_secs, 30);
  }

  #[test]
  fn test_parse_timeout_override() {
    let config =
      Config::parse("settings:\n  url: http://localhost:5000\n  timeout_secs: 5\n").unwrap();
    assert_eq!(config.settings.timeout_secs, 5);
  }

  #[test]
  fn test_parse_rejects_invalid_url() {
    assert!(Config::parse("settings:\n  url: not a url\n").is_err());
    assert!(Config::parse("settings:\n  url: \"mailto:someone@example.com\"\n").is_err());
  }

  #[test]
  fn test_parse_requires_settings_section() {
    assert!(Config::parse("title: dashboard\n").is_err());
  }

  #[test]
  fn test_load_missing_explicit_path_fails() {
    let err = Config::load(Some(Path::new("/nonexistent/rate-pro.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_unparseable_file_names_the_path() {
    let path = std::env::temp_dir().join(format!("rate-pro-bad-{}.yaml", std::process::id()));
    std::fs::write(&path, "settings: [").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    let message = err.to_string();
    assert!(message.starts_with("Failed to parse config file"));
    assert!(message.contains(&path.display().to_string()));
  }
}
