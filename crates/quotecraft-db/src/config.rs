//! # QuoteCraft Configuration
//!
//! Settings shared by the storage layer and the seed binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUOTECRAFT_DB_PATH=/srv/quotecraft/quotes.db                       │
//! │     QUOTECRAFT_DB_MAX_CONNECTIONS=8                                    │
//! │     QUOTECRAFT_CATALOG_FILE=./catalogs.json                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/quotecraft/quotecraft.toml (Linux)                       │
//! │     ~/Library/Application Support/com.quotecraft.quotecraft/... (mac) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     database in the platform data dir, 5 connections, "$"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/quotecraft/quotes.db"
//! max_connections = 5
//!
//! [catalog]
//! seed_file = "catalogs.json"   # JSON array of catalog definitions
//!
//! [display]
//! currency_symbol = "$"
//! ```

use std::path::PathBuf;

use quotecraft_core::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::pool::DbConfig;

const CONFIG_FILE_NAME: &str = "quotecraft.toml";
const DATABASE_FILE_NAME: &str = "quotecraft.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

fn default_max_connections() -> u32 {
    5
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON file of catalog definitions imported by the seed binary.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// QuoteConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quotecraft.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
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

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database.path must not be empty".into()));
            }
        }

        if self.display.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "display.currency_symbol must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `QUOTECRAFT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("QUOTECRAFT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("QUOTECRAFT_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric QUOTECRAFT_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(file) = lookup("QUOTECRAFT_CATALOG_FILE") {
            debug!(file = %file, "Overriding catalog seed file from environment");
            self.catalog.seed_file = Some(PathBuf::from(file));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "quotecraft", "quotecraft")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Configured database file, or `quotecraft.db` in the platform data
    /// directory (current directory as last resort).
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "quotecraft", "quotecraft")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Pool settings for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }

    /// Formats an amount with the configured currency symbol: `€382.00`.
    pub fn format_money(&self, amount: Money) -> String {
        let symbol = &self.display.currency_symbol;
        if amount.rounded().is_negative() {
            format!("-{}{}", symbol, amount.abs().display_amount())
        } else {
            format!("{}{}", symbol, amount.display_amount())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = QuoteConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.display.currency_symbol, "$");
        assert!(config.catalog.seed_file.is_none());
        assert!(config.validate().is_ok());
        assert!(config.database_path().ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: QuoteConfig = toml::from_str(
            r#"
            [database]
            path = "/srv/quotecraft/quotes.db"

            [display]
            currency_symbol = "€"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/srv/quotecraft/quotes.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.format_money(Money::from_cents(38200)), "€382.00");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("QUOTECRAFT_DB_PATH", "/tmp/override.db"),
            ("QUOTECRAFT_DB_MAX_CONNECTIONS", "8"),
            ("QUOTECRAFT_CATALOG_FILE", "catalogs.json"),
        ]
        .into_iter()
        .collect();

        let mut config = QuoteConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/override.db")));
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.catalog.seed_file, Some(PathBuf::from("catalogs.json")));
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_bad_override_is_ignored() {
        let mut config = QuoteConfig::default();
        config.apply_overrides(|key| {
            (key == "QUOTECRAFT_DB_MAX_CONNECTIONS").then(|| "many".to_string())
        });
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_validation() {
        let mut config = QuoteConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = QuoteConfig::default();
        config.display.currency_symbol = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_negative() {
        let config = QuoteConfig::default();
        assert_eq!(config.format_money(Money::from_cents(-1500)), "-$15.00");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = QuoteConfig::default();
        config.catalog.seed_file = Some(PathBuf::from("catalogs.json"));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: QuoteConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
