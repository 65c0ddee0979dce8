//! Configuration loading and management
//!
//! Handles parsing of `.tasksheet.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up next to the workbook when no `--config` is given
pub const CONFIG_FILENAME: &str = ".tasksheet.toml";

const MAX_TIMEOUT_SECS: u64 = 300;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Row store configuration
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Task derivation configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Row store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Workbook path, relative paths resolve against the working directory
    #[serde(default = "default_sheet_path")]
    pub path: PathBuf,

    /// Explicit sheet name; empty means the first sheet of the workbook
    #[serde(default)]
    pub name: String,

    /// Timeout applied to every store call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sheet_path() -> PathBuf {
    PathBuf::from("tasks.sheet.json")
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: default_sheet_path(),
            name: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SheetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Explicit sheet name, if one is configured
    pub fn explicit_name(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Task derivation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Developer recorded for rows whose developer cell is blank
    #[serde(default = "default_developer")]
    pub default_developer: String,
}

fn default_developer() -> String {
    "unassigned".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_developer: default_developer(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tasksheet.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), %err, "ignoring invalid config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.sheet.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

impl SheetConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "sheet.path cannot be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(crate::error::Error::InvalidConfig(format!(
                "sheet.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.default_developer.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.default_developer cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sheet.timeout(), Duration::from_secs(15));
        assert_eq!(config.tasks.default_developer, "unassigned");
        assert_eq!(config.sheet.explicit_name(), None);
    }

    #[test]
    fn parses_partial_config() {
        let config: Config = toml::from_str(
            r#"
[sheet]
name = "Form Responses 1"
"#,
        )
        .unwrap();
        assert_eq!(config.sheet.explicit_name(), Some("Form Responses 1"));
        assert_eq!(config.sheet.path, PathBuf::from("tasks.sheet.json"));
        assert_eq!(config.sheet.timeout_secs, 15);
    }

    #[test]
    fn rejects_zero_timeout() {
        let config: Config = toml::from_str("[sheet]\ntimeout_secs = 0").unwrap();
        assert!(config.validate().is_err());
    }
}
