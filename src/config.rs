//! TOML configuration.
//!
//! Looked up at `.shelf/config.toml` in the working directory, then
//! `~/.shelf/config.toml`. Every field has a default; CLI flags override
//! file values.

use crate::state::SortKey;
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Table rendering options
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_true")]
    pub show_icons: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            show_icons: default_true(),
        }
    }
}

/// Session log options
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SessionLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Replacement catalogue file, same role as `--data`.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Where session logs go; defaults to `.shelf/sessions`.
    #[serde(default)]
    pub sessions_dir: Option<PathBuf>,
    /// Initial sort, e.g. "name" or "name:desc".
    #[serde(default)]
    pub default_sort: Option<String>,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub session_log: SessionLogConfig,
}

impl Config {
    /// Load from the project config, falling back to the user config,
    /// then to defaults.
    pub fn load() -> Result<Self> {
        let project = Path::new(".shelf").join("config.toml");
        if project.exists() {
            return Self::load_from(&project);
        }

        if let Some(home) = dirs::home_dir() {
            let user = home.join(".shelf").join("config.toml");
            if user.exists() {
                return Self::load_from(&user);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check field values, collecting every problem rather than stopping
    /// at the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(sort) = &self.default_sort {
            let (key, dir) = match sort.split_once(':') {
                Some((key, dir)) => (key, Some(dir)),
                None => (sort.as_str(), None),
            };
            if SortKey::parse(key).is_none() {
                errors.push(ValidationError {
                    field: "default_sort".to_string(),
                    message: format!("unknown sort key: {}. Use: id, name, category, user", key),
                });
            }
            if let Some(dir) = dir {
                if dir != "asc" && dir != "desc" {
                    errors.push(ValidationError {
                        field: "default_sort".to_string(),
                        message: format!("unknown sort direction: {}. Use: asc, desc", dir),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.data_file.is_none());
        assert!(config.default_sort.is_none());
        assert!(config.table.show_icons);
        assert!(config.session_log.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            data_file = "catalog.json"
            default_sort = "name:desc"

            [table]
            show_icons = false

            [session_log]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.default_sort.as_deref(), Some("name:desc"));
        assert!(!config.table.show_icons);
        assert!(!config.session_log.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_sort_key() {
        let config = Config {
            default_sort: Some("price".to_string()),
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("default_sort"));
        assert!(errors[0].message.contains("unknown sort key"));
    }

    #[test]
    fn test_validate_bad_sort_direction() {
        let config = Config {
            default_sort: Some("name:down".to_string()),
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unknown sort direction"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "default_sort = \"id\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.default_sort.as_deref(), Some("id"));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "default_sort = [").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
