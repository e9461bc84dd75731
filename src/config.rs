//! Configuration management for hncli
//!
//! Configuration is a single JSON object stored at `~/.config/hncli/config.json`.
//! Missing keys fall back to defaults, unknown keys are kept as they are, and a
//! file that cannot be read or parsed is treated as if it held the defaults.

use directories::ProjectDirs;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Name of the config file inside the config directory
const CONFIG_FILE_NAME: &str = "config.json";

pub const STORIES_PER_PAGE: &str = "stories_per_page";
pub const MAX_COMMENT_DEPTH: &str = "max_comment_depth";
pub const OPEN_LINKS_IN_BROWSER: &str = "open_links_in_browser";
pub const COLOR_THEME: &str = "color_theme";
pub const CACHE_TIMEOUT_MINUTES: &str = "cache_timeout_minutes";

const DEFAULT_STORIES_PER_PAGE: u64 = 10;
const DEFAULT_MAX_COMMENT_DEPTH: u64 = 3;
const DEFAULT_OPEN_LINKS_IN_BROWSER: bool = true;
const DEFAULT_COLOR_THEME: &str = "default";
const DEFAULT_CACHE_TIMEOUT_MINUTES: u64 = 5;

/// Errors that can occur while reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory could be determined
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// Reading or writing the file failed
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file holds JSON that is not an object
    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// User settings, defaults merged with whatever the file contains
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert(STORIES_PER_PAGE.into(), json!(DEFAULT_STORIES_PER_PAGE));
        values.insert(MAX_COMMENT_DEPTH.into(), json!(DEFAULT_MAX_COMMENT_DEPTH));
        values.insert(OPEN_LINKS_IN_BROWSER.into(), json!(DEFAULT_OPEN_LINKS_IN_BROWSER));
        values.insert(COLOR_THEME.into(), json!(DEFAULT_COLOR_THEME));
        values.insert(CACHE_TIMEOUT_MINUTES.into(), json!(DEFAULT_CACHE_TIMEOUT_MINUTES));
        Self { values }
    }
}

impl Config {
    /// Overlays the keys of `user` on top of the defaults
    pub fn merged(user: Map<String, Value>) -> Self {
        let mut config = Self::default();
        config.values.extend(user);
        config
    }

    /// Raw value of a setting
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Replaces or adds a setting
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// All settings in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.get(key).and_then(Value::as_u64).unwrap_or(default)
    }

    /// Whether links open without asking first
    pub fn open_links_in_browser(&self) -> bool {
        self.get(OPEN_LINKS_IN_BROWSER)
            .and_then(Value::as_bool)
            .unwrap_or(DEFAULT_OPEN_LINKS_IN_BROWSER)
    }

    /// Name of the color theme
    pub fn color_theme(&self) -> &str {
        self.get(COLOR_THEME)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_COLOR_THEME)
    }

    /// How long cached API responses stay fresh
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.u64_or(CACHE_TIMEOUT_MINUTES, DEFAULT_CACHE_TIMEOUT_MINUTES) * 60)
    }

    /// Pretty-printed JSON of all settings
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.values).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Renders a setting the way `config-get` prints it
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads and writes the config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Uses the XDG-compliant config directory (`~/.config/hncli/` on Linux)
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("", "", "hncli").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    /// Uses a custom file location
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults on any error
    ///
    /// A missing file is created with the defaults.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            let config = Config::default();
            if let Err(e) = self.save(&config) {
                warn!(error = %e, "could not create default config file");
            }
            return config;
        }

        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default configuration");
                Config::default()
            }
        }
    }

    /// Loads the configuration, reporting what went wrong
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        match value {
            Value::Object(map) => Ok(Config::merged(map)),
            _ => Err(ConfigError::NotAnObject(self.path.clone())),
        }
    }

    /// Writes the configuration as indented JSON
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&self.path, config.to_json()).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Current value of one setting
    pub fn get_setting(&self, key: &str) -> Option<Value> {
        self.load().get(key).cloned()
    }

    /// Changes one setting and saves the file
    pub fn update_setting(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut config = self.load();
        config.set(key, value);
        self.save(&config)
    }

    /// Overwrites the file with the defaults
    pub fn reset(&self) -> Result<(), ConfigError> {
        self.save(&Config::default())
    }
}
