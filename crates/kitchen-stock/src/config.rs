//! # Stock Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KITCHEN_STOCK_ACTOR=kitchen-terminal-2                             │
//! │     KITCHEN_SYNC_TOLERANCE=0.001                                       │
//! │     KITCHEN_LOCK_INGREDIENTS=false                                     │
//! │                                                                         │
//! │  2. TOML Config File (stock.toml)                                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stock.toml
//! actor = "System"
//! sync_tolerance = 0.0001
//! mirror_category = "ingredient"
//! mirror_status = "active"
//! lock_ingredients = true
//! ```

use std::path::Path;

use kitchen_core::{DEFAULT_ACTOR, MIRROR_CATEGORY, MIRROR_STATUS_ACTIVE, SYNC_TOLERANCE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StockError, StockResult};

/// Settings for the deduction workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConfig {
    /// Responsible actor written on movements when the caller names none.
    #[serde(default = "default_actor")]
    pub actor: String,

    /// Mirror/ingredient difference above which a drift event is emitted.
    #[serde(default = "default_sync_tolerance")]
    pub sync_tolerance: f64,

    /// Category stamped on newly created mirror records.
    #[serde(default = "default_mirror_category")]
    pub mirror_category: String,

    /// Status stamped on newly created mirror records.
    #[serde(default = "default_mirror_status")]
    pub mirror_status: String,

    /// Serialize read-check-write per ingredient.
    /// Off gives last-writer-wins between concurrent preparations.
    #[serde(default = "default_true")]
    pub lock_ingredients: bool,
}

fn default_actor() -> String {
    DEFAULT_ACTOR.to_string()
}

fn default_sync_tolerance() -> f64 {
    SYNC_TOLERANCE
}

fn default_mirror_category() -> String {
    MIRROR_CATEGORY.to_string()
}

fn default_mirror_status() -> String {
    MIRROR_STATUS_ACTIVE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StockConfig {
    fn default() -> Self {
        StockConfig {
            actor: default_actor(),
            sync_tolerance: default_sync_tolerance(),
            mirror_category: default_mirror_category(),
            mirror_status: default_mirror_status(),
            lock_ingredients: default_true(),
        }
    }
}

impl StockConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file, if given and present
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> StockResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading stock config from file");
                let contents = std::fs::read_to_string(path)?;
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
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load stock config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> StockResult<()> {
        if self.actor.trim().is_empty() {
            return Err(StockError::InvalidConfig("actor must not be empty".into()));
        }

        if !self.sync_tolerance.is_finite() || self.sync_tolerance < 0.0 {
            return Err(StockError::InvalidConfig(format!(
                "sync_tolerance must be a non-negative number, got {}",
                self.sync_tolerance
            )));
        }

        if self.mirror_category.trim().is_empty() || self.mirror_status.trim().is_empty() {
            return Err(StockError::InvalidConfig(
                "mirror_category and mirror_status must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(actor) = lookup("KITCHEN_STOCK_ACTOR") {
            debug!(%actor, "Overriding stock actor from environment");
            self.actor = actor;
        }

        if let Some(tolerance) = lookup("KITCHEN_SYNC_TOLERANCE") {
            match tolerance.parse::<f64>() {
                Ok(t) => self.sync_tolerance = t,
                Err(_) => warn!(%tolerance, "Ignoring unparsable KITCHEN_SYNC_TOLERANCE"),
            }
        }

        if let Some(lock) = lookup("KITCHEN_LOCK_INGREDIENTS") {
            match lock.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.lock_ingredients = true,
                "0" | "false" | "no" | "off" => self.lock_ingredients = false,
                _ => warn!(%lock, "Unknown KITCHEN_LOCK_INGREDIENTS value"),
            }
        }
    }
}
