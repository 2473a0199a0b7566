//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$DAGPATH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dagpath/config.toml`
//! 3. `~/.dagpath/config.toml` (canonical write location)
//!
//! A missing file is not an error; defaults apply.
//!
//! # Example
//!
//! ```no_run
//! use dagpath::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_url());
//! println!("Naming enabled: {}", config.naming_enabled());
//! ```

pub mod schema;

pub use schema::{ApiConfig, LoggingConfig, NamingConfig, Settings};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "DAGPATH_CONFIG";

/// Default RPC API base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";

/// Default maximum number of name record hops.
pub const DEFAULT_NAMING_DEPTH: u32 = 32;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for unset values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub settings: Settings,
    /// Path the settings were loaded from (if any)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Create a configuration from already-parsed settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the settings fail validation.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            loaded_from: None,
        })
    }

    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        let located = locate_config(
            std::env::var(CONFIG_ENV).ok(),
            std::env::var("XDG_CONFIG_HOME").ok(),
            dirs::home_dir(),
        );

        match located {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;

        Ok(Self {
            settings,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Get the canonical config path (`~/.dagpath/config.toml`).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".dagpath/config.toml"))
    }

    /// Write settings atomically to `path`.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it into place.
    pub fn write(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
        settings.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(settings)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the RPC API base URL.
    ///
    /// Defaults to `http://127.0.0.1:5001`.
    pub fn api_url(&self) -> &str {
        self.settings
            .api
            .as_ref()
            .and_then(|a| a.url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Get the `Authorization` header value for the RPC API, if configured.
    pub fn api_auth(&self) -> Option<&str> {
        self.settings.api.as_ref().and_then(|a| a.auth.as_deref())
    }

    /// Get the per-request RPC timeout, if configured.
    pub fn api_timeout(&self) -> Option<Duration> {
        self.settings
            .api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .map(Duration::from_secs)
    }

    /// Check if mutable name resolution is enabled.
    ///
    /// Defaults to `true`.
    pub fn naming_enabled(&self) -> bool {
        self.settings
            .naming
            .as_ref()
            .and_then(|n| n.enabled)
            .unwrap_or(true)
    }

    /// Get the maximum number of name record hops.
    ///
    /// Defaults to 32.
    pub fn naming_max_depth(&self) -> u32 {
        self.settings
            .naming
            .as_ref()
            .and_then(|n| n.max_depth)
            .unwrap_or(DEFAULT_NAMING_DEPTH)
    }

    /// Get the logging settings (defaults if unset).
    pub fn logging(&self) -> LoggingConfig {
        self.settings.logging.clone().unwrap_or_default()
    }

    /// Get the path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

/// Pick the first existing config file in precedence order.
fn locate_config(
    explicit: Option<String>,
    xdg_config_home: Option<String>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let candidates = [
        explicit.map(PathBuf::from),
        xdg_config_home.map(|xdg| PathBuf::from(xdg).join("dagpath/config.toml")),
        home.map(|h| h.join(".dagpath/config.toml")),
    ];

    candidates.into_iter().flatten().find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_unset() {
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert!(config.api_auth().is_none());
        assert!(config.api_timeout().is_none());
        assert!(config.naming_enabled());
        assert_eq!(config.naming_max_depth(), DEFAULT_NAMING_DEPTH);
        assert_eq!(config.logging(), LoggingConfig::default());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [api]
            url = "http://10.0.0.1:5001"
            timeout_secs = 12

            [naming]
            enabled = false
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url(), "http://10.0.0.1:5001");
        assert_eq!(config.api_timeout(), Some(Duration::from_secs(12)));
        assert!(!config.naming_enabled());
        assert_eq!(config.naming_max_depth(), DEFAULT_NAMING_DEPTH);
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load_from(&temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn parse_error_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[api\nurl = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        match err {
            ConfigError::ParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_values_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[naming]\nmax_depth = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn write_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/config.toml");

        let settings = Settings {
            api: Some(ApiConfig {
                url: Some("https://rpc.example.com".to_string()),
                auth: Some("Basic dXNlcjpwYXNz".to_string()),
                timeout_secs: None,
            }),
            ..Default::default()
        };

        Config::write(&path, &settings).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings, settings);
        assert_eq!(loaded.api_auth(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn write_rejects_invalid_settings() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            naming: Some(NamingConfig {
                enabled: None,
                max_depth: Some(0),
            }),
            ..Default::default()
        };
        assert!(Config::write(&temp.path().join("c.toml"), &settings).is_err());
    }

    mod locate {
        use super::*;

        #[test]
        fn explicit_path_wins() {
            let temp = TempDir::new().unwrap();
            let explicit = temp.path().join("explicit.toml");
            fs::write(&explicit, "").unwrap();
            let xdg = temp.path().join("xdg");
            fs::create_dir_all(xdg.join("dagpath")).unwrap();
            fs::write(xdg.join("dagpath/config.toml"), "").unwrap();

            let found = locate_config(
                Some(explicit.to_string_lossy().into_owned()),
                Some(xdg.to_string_lossy().into_owned()),
                None,
            );
            assert_eq!(found, Some(explicit));
        }

        #[test]
        fn falls_back_to_xdg_then_home() {
            let temp = TempDir::new().unwrap();
            let home = temp.path().join("home");
            fs::create_dir_all(home.join(".dagpath")).unwrap();
            fs::write(home.join(".dagpath/config.toml"), "").unwrap();

            let found = locate_config(
                Some(temp.path().join("missing.toml").to_string_lossy().into_owned()),
                Some(temp.path().join("no-xdg").to_string_lossy().into_owned()),
                Some(home.clone()),
            );
            assert_eq!(found, Some(home.join(".dagpath/config.toml")));
        }

        #[test]
        fn none_when_nothing_exists() {
            let temp = TempDir::new().unwrap();
            assert_eq!(
                locate_config(None, None, Some(temp.path().to_path_buf())),
                None
            );
        }
    }
}
