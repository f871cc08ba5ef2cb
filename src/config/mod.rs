//! Configuration management for the dojo.
//!
//! TOML configuration organized into logical sections:
//!
//! - [`DojoConfig`] - dojo identity (name, sensei authority)
//! - [`StorageConfig`] - data persistence settings
//! - [`LoggingConfig`] - logging settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use defidojo::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Dojo: {}", config.dojo.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration file format
//!
//! ```toml
//! [dojo]
//! name = "DeFi Dojo"
//! sensei = "sensei"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "defidojo.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::validation::validate_participant_id;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dojo: DojoConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DojoConfig {
    /// Display name of this dojo instance.
    pub name: String,
    /// The dojo authority: the only principal allowed to mint badges.
    /// Recorded in the store on first open and immutable afterwards.
    pub sensei: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_participant_id(&self.dojo.sensei)
            .map_err(|e| anyhow!("Invalid sensei name '{}': {}", self.dojo.sensei, e))?;
        if self.storage.data_dir.is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(anyhow!("Unknown logging level '{}'", other)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dojo: DojoConfig {
                name: "DeFi Dojo".to_string(),
                sensei: "sensei".to_string(),
                description: "Learn DeFi concepts through simulated training quests".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("defidojo.log".to_string()),
            },
        }
    }
}
