// src/config.rs

//! Manages engine configuration: loading and per-field defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_max_packed_entries() -> usize {
    128
}

fn default_max_packed_value() -> usize {
    64
}

fn default_maxmemory() -> usize {
    0
}

/// Tuning knobs for the sorted-set encodings.
///
/// A set stays in the packed encoding while it holds at most
/// `max_packed_entries` members and every member is at most
/// `max_packed_value` bytes long. These are server-side knobs only and are
/// never exposed to clients.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortedSetConfig {
    #[serde(default = "default_max_packed_entries")]
    pub max_packed_entries: usize,
    #[serde(default = "default_max_packed_value")]
    pub max_packed_value: usize,
}

impl Default for SortedSetConfig {
    fn default() -> Self {
        Self {
            max_packed_entries: default_max_packed_entries(),
            max_packed_value: default_max_packed_value(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// Memory ceiling in bytes for DENYOOM commands. `0` disables the check.
    #[serde(default = "default_maxmemory")]
    pub maxmemory: usize,
    #[serde(default)]
    pub sorted_set: SortedSetConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_packed_thresholds() {
        let config = Config::default();
        assert_eq!(config.sorted_set.max_packed_entries, 128);
        assert_eq!(config.sorted_set.max_packed_value, 64);
        assert_eq!(config.maxmemory, 0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"sorted_set":{"max_packed_entries":16}}"#)
            .expect("valid config");
        assert_eq!(config.sorted_set.max_packed_entries, 16);
        assert_eq!(config.sorted_set.max_packed_value, 64);
    }
}
