//! User configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (KAISTMENU_*)
//! 2. TOML rc file (`KAISTMENU_CONFIG_FILE`, or `~/.config/kaistmenu/config.toml`)
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cafeteria::Cafeteria;

/// Environment variable naming an explicit rc file
pub const CONFIG_FILE_ENV: &str = "KAISTMENU_CONFIG_FILE";

/// Narrowest table the renderer is asked for
const MIN_MAX_LENGTH: usize = 12;

/// Errors raised while loading, validating or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or parsed
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    /// A value is out of range
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Writing the rc file failed
    #[error("failed to save configuration to {path}: {reason}")]
    SaveFailed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cafeteria shown when none is given on the command line.
    ///
    /// Set via KAISTMENU_TARGET.
    #[serde(default = "default_target")]
    pub target: String,

    /// Total width budget for the menu table, in terminal cells.
    ///
    /// Set via KAISTMENU_MAX_LENGTH.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// HTTP request timeout in seconds.
    ///
    /// Set via KAISTMENU_TIMEOUT_SECS.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the cache file location.
    ///
    /// Set via KAISTMENU_CACHE_PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

fn default_target() -> String {
    Cafeteria::default().code().to_string()
}

fn default_max_length() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            max_length: default_max_length(),
            timeout_secs: default_timeout_secs(),
            cache_path: None,
        }
    }
}

/// Fields persisted by `--save-rc`
#[derive(Debug, Serialize)]
struct RcFile<'a> {
    target: &'a str,
    max_length: usize,
    timeout_secs: u64,
}

impl AppConfig {
    /// Path of the rc file: `KAISTMENU_CONFIG_FILE` if set, else the XDG config dir.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "kaistmenu").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the rc file is malformed, an environment
    /// variable cannot be parsed, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path().as_deref())
    }

    /// Like [`load`](Self::load) with an explicit rc file (missing files are skipped).
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("KAISTMENU_").ignore(&["config_file"]));

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Cafeteria::from_str(&self.target).is_none() {
            return Err(ConfigError::Invalid {
                field: "target",
                reason: format!(
                    "unknown cafeteria '{}', expected one of: {}",
                    self.target,
                    Cafeteria::valid_codes()
                ),
            });
        }
        if self.max_length < MIN_MAX_LENGTH {
            return Err(ConfigError::Invalid {
                field: "max_length",
                reason: format!("must be at least {}", MIN_MAX_LENGTH),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The default cafeteria; falls back to N6 if `target` was never validated.
    pub fn target_cafeteria(&self) -> Cafeteria {
        Cafeteria::from_str(&self.target).unwrap_or_default()
    }

    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Writes target, table width and timeout to the rc file at `path`.
    pub fn save_rc(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |reason: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            reason,
        };

        let rc = RcFile {
            target: &self.target,
            max_length: self.max_length,
            timeout_secs: self.timeout_secs,
        };
        let content = toml::to_string(&rc).map_err(|e| save_failed(e.to_string()))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.target, "n6");
        assert_eq!(config.max_length, 100);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.cache_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_unknown_target() {
        let config = AppConfig {
            target: "library".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("library"));
        assert!(err.to_string().contains("n6"));
    }

    #[test]
    fn test_validate_small_max_length() {
        let config = AppConfig {
            max_length: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "max_length", .. })
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = AppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "timeout_secs", .. })
        ));
    }

    #[test]
    fn test_target_cafeteria() {
        let config = AppConfig {
            target: "West".into(),
            ..Default::default()
        };
        assert_eq!(config.target_cafeteria(), Cafeteria::West);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "target = \"north\"\nmax_length = 80\n").unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.target, "north");
        assert_eq!(config.max_length, 80);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.target, "n6");
    }

    #[test]
    fn test_load_from_invalid_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "max_length = \"wide\"\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(Some(&path)),
            Err(ConfigError::LoadFailed(_))
        ));
    }

    #[test]
    fn test_save_rc_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            target: "hwaam".into(),
            max_length: 72,
            timeout_secs: 3,
            cache_path: Some(PathBuf::from("/tmp/ignored.json")),
        };

        config.save_rc(&path).expect("save should succeed");
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("cache_path"));

        let loaded = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.target, "hwaam");
        assert_eq!(loaded.max_length, 72);
        assert_eq!(loaded.timeout_secs, 3);
    }
}
