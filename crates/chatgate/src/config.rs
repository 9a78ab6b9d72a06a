//! Gate configuration.
//!
//! Mirrors the host platform's plugin configuration. Every field has a
//! default, so an empty JSON object is a valid configuration.

use chatgate_core::{StorageKeys, DEFAULT_KEY_PREFIX};
use serde::Deserialize;

use crate::error::{GateError, Result};

/// Configuration for the gate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Whether the gate is active at startup.
    ///
    /// `ban-enable` / `ban-disable` change the running value only; a restart
    /// always starts from this setting.
    pub enable: bool,

    /// Namespace for the persisted keys.
    pub key_prefix: String,

    /// Drop the issuing admin's own id from `ban` targets.
    pub ignore_self_mention: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enable: true,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ignore_self_mention: true,
        }
    }
}

impl GateConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| GateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self =
            serde_json::from_value(value).map_err(|e| GateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.trim().is_empty() {
            return Err(GateError::Config("key_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Storage key names under this configuration's prefix.
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}
