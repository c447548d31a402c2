//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_DB_PATH=/tmp/storefront.db                              │
//! │     STOREFRONT_IN_MEMORY=true                                          │
//! │     STOREFRONT_COMMAND_BUFFER=128                                      │
//! │     STOREFRONT_LOG=debug                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.storefront.app/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! path = "/var/lib/storefront/storefront.db"
//! max_connections = 4
//! in_memory = false
//!
//! [runtime]
//! command_buffer = 64
//!
//! [logging]
//! filter = "info,storefront=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use storefront_store::DbConfig;

use crate::error::{StateError, StateResult};
use crate::orchestrator::DEFAULT_COMMAND_BUFFER;

const DATABASE_FILE: &str = "storefront.db";
const CONFIG_FILE: &str = "config.toml";

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. Falls back to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Keep everything in memory. Nothing survives a restart.
    #[serde(default)]
    pub in_memory: bool,
}

fn default_max_connections() -> u32 {
    4
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            max_connections: default_max_connections(),
            in_memory: false,
        }
    }
}

// =============================================================================
// Runtime Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Capacity of the orchestrator's command mailbox.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

fn default_command_buffer() -> usize {
    DEFAULT_COMMAND_BUFFER
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        RuntimeSettings {
            command_buffer: default_command_buffer(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,storefront=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub runtime: RuntimeSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StateResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StateResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StateError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StateError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> StateResult<()> {
        if self.storage.max_connections == 0 {
            return Err(StateError::InvalidConfig(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.runtime.command_buffer == 0 {
            return Err(StateError::InvalidConfig(
                "runtime.command_buffer must be greater than 0".into(),
            ));
        }

        if let Some(ref path) = self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(StateError::InvalidConfig("storage.path must not be empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Applies overrides from an arbitrary variable source.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STOREFRONT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("STOREFRONT_IN_MEMORY") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.storage.in_memory = true,
                "0" | "false" | "no" => self.storage.in_memory = false,
                _ => warn!(value = %flag, "Unknown STOREFRONT_IN_MEMORY value"),
            }
        }

        if let Some(buffer) = lookup("STOREFRONT_COMMAND_BUFFER") {
            if let Ok(n) = buffer.parse::<usize>() {
                self.runtime.command_buffer = n;
            }
        }

        if let Some(filter) = lookup("STOREFRONT_LOG") {
            self.logging.filter = filter;
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "storefront", "app")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved database file: explicit path, else the platform data dir,
    /// else the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.storage.path {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    /// Pool settings for the durable store.
    ///
    /// An in-memory store keeps its single connection; every extra
    /// connection would open a separate empty database.
    pub fn db_config(&self) -> DbConfig {
        if self.storage.in_memory {
            return DbConfig::in_memory();
        }
        DbConfig::new(self.database_path()).max_connections(self.storage.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.max_connections, 4);
        assert_eq!(config.runtime.command_buffer, DEFAULT_COMMAND_BUFFER);
        assert!(!config.storage.in_memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.runtime.command_buffer = 0;
        assert!(matches!(config.validate(), Err(StateError::InvalidConfig(_))));

        config.runtime.command_buffer = 8;
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());

        config.storage.max_connections = 1;
        config.storage.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[runtime]\ncommand_buffer = 16\n").unwrap();
        assert_eq!(config.runtime.command_buffer, 16);
        assert_eq!(config.storage, StorageSettings::default());
        assert_eq!(config.logging.filter, "info,storefront=debug,sqlx=warn");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(lookup(&[
            ("STOREFRONT_DB_PATH", "/tmp/custom.db"),
            ("STOREFRONT_IN_MEMORY", "yes"),
            ("STOREFRONT_COMMAND_BUFFER", "not-a-number"),
            ("STOREFRONT_LOG", "warn"),
        ]));

        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/custom.db")));
        assert!(config.storage.in_memory);
        assert_eq!(config.runtime.command_buffer, DEFAULT_COMMAND_BUFFER);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.storage.path = Some(dir.path().join("store.db"));
        config.runtime.command_buffer = 32;
        config.save(Some(path.clone())).unwrap();

        let loaded: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runtime]\ncommand_buffer = \"lots\"\n").unwrap();

        let err = AppConfig::load(Some(path.clone())).unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(
            AppConfig::load_or_default(Some(path)).runtime.command_buffer,
            DEFAULT_COMMAND_BUFFER
        );
    }

    #[test]
    fn test_db_config() {
        let mut config = AppConfig::default();
        config.storage.path = Some(PathBuf::from("/data/shop.db"));
        config.storage.max_connections = 2;

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/data/shop.db"));
        assert_eq!(db.max_connections, 2);

        config.storage.in_memory = true;
        let db = config.db_config();
        assert!(db.is_in_memory());
        assert_eq!(db.max_connections, 1);
    }
}
