//! Engine configuration loading
//!
//! Resolution priority, highest first:
//! 1. Environment variables (`PODFEED_STALENESS_DAYS`, `PODFEED_LOG_LEVEL`)
//! 2. TOML config file (`PODFEED_CONFIG` path override, else the platform
//!    config directory, e.g. `~/.config/podfeed/config.toml`)
//! 3. Compiled defaults
//!
//! A missing or unparsable config file never aborts: the engine logs a
//! warning and runs on defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default staleness cutoff: ended pods older than this leave the feed
pub const DEFAULT_STALENESS_CUTOFF_DAYS: i64 = 7;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Days after `ends_at` that an ended pod remains in the feed
    pub staleness_cutoff_days: i64,
    /// Log level directive handed to the subscriber at startup
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staleness_cutoff_days: DEFAULT_STALENESS_CUTOFF_DAYS,
            log_level: "info".to_string(),
        }
    }
}

/// On-disk TOML shape; every field optional so partial files still load
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    staleness_cutoff_days: Option<i64>,
    log_level: Option<String>,
}

impl EngineConfig {
    /// Load configuration with full resolution priority.
    pub fn load() -> Self {
        let path = std::env::var("PODFEED_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_path);

        let mut config = match path {
            Some(ref p) if p.exists() => Self::load_from(p),
            Some(ref p) => {
                warn!("Config file not found at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config
    }

    /// Load configuration from a specific TOML file, degrading to defaults
    /// on any read or parse failure.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let parsed: TomlConfig = match toml::from_str(&content) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to parse config file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let defaults = Self::default();
        Self {
            staleness_cutoff_days: parsed
                .staleness_cutoff_days
                .unwrap_or(defaults.staleness_cutoff_days),
            log_level: parsed.log_level.unwrap_or(defaults.log_level),
        }
    }

    /// Staleness cutoff as a chrono duration
    pub fn staleness_cutoff(&self) -> chrono::Duration {
        chrono::Duration::days(self.staleness_cutoff_days)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(days) = std::env::var("PODFEED_STALENESS_DAYS") {
            match days.parse::<i64>() {
                Ok(d) if d > 0 => self.staleness_cutoff_days = d,
                _ => warn!("Ignoring invalid PODFEED_STALENESS_DAYS: {}", days),
            }
        }
        if let Ok(level) = std::env::var("PODFEED_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}

/// Platform config file location (`<config_dir>/podfeed/config.toml`)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("podfeed").join("config.toml"))
}
