//! Engine configuration via a toml file
//!
//! The embedding process can keep the worker cadence in a small toml file
//! next to the database. Missing keys fall back to the defaults below.

use metadb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_cycle_wait_ms() -> u64 {
    10
}

fn default_save_period_ms() -> u64 {
    1000
}

fn default_save_on_stop() -> bool {
    true
}

/// Worker loop settings.
///
/// # Example
///
/// ```toml
/// cycle_wait_ms = 10
/// save_period_ms = 1000
/// save_on_stop = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sleep between loop iterations, in milliseconds.
    ///
    /// Lower bound on the latency of a submitted command.
    #[serde(default = "default_cycle_wait_ms")]
    pub cycle_wait_ms: u64,
    /// Full save cadence, in milliseconds. Must be non-zero.
    #[serde(default = "default_save_period_ms")]
    pub save_period_ms: u64,
    /// Save once more after the loop exits.
    #[serde(default = "default_save_on_stop")]
    pub save_on_stop: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_wait_ms: default_cycle_wait_ms(),
            save_period_ms: default_save_period_ms(),
            save_on_stop: default_save_on_stop(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.save_period_ms == 0 {
            return Err(Error::Config(
                "save_period_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# MetaDB engine configuration
#
# Sleep between worker loop iterations (milliseconds).
# Commands wait at least this long before they run.
cycle_wait_ms = 10

# Full database save cadence (milliseconds).
save_period_ms = 1000

# Save once more when the engine stops.
save_on_stop = true
"#
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to toml and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
