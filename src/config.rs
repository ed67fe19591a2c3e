//! Index configuration loaded from TOML.
//!
//! ```toml
//! # Split a shard once it holds more than this many word occurrences.
//! max_shard_postings = 50000
//! # zstd level for persisted document blobs (1..=22).
//! compression_level = 3
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Default zstd level for persisted document blobs.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

const COMPRESSION_LEVELS: std::ops::RangeInclusive<i32> = 1..=22;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Occurrence count above which a shard is split automatically; `None` disables it
    pub max_shard_postings: Option<usize>,
    pub compression_level: i32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_shard_postings: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl IndexConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read index config at {}", path.display()))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid index config at {}", path.display()))?;

        tracing::debug!("Loaded index config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_shard_postings == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        if !COMPRESSION_LEVELS.contains(&self.compression_level) {
            return Err(ConfigError::CompressionLevel(self.compression_level));
        }
        Ok(())
    }
}
