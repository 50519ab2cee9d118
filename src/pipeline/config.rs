use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::shard::ShardWidth;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid thread count 0; omit the setting to use all cores")]
    ZeroThreads,
}

/// Configuration for the shard join
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Bases per shard, shared by both shard-keying policies
    pub shard_width: ShardWidth,

    /// Worker threads; `None` runs on the global rayon pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, or a parse
    /// or validation error for bad content.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON, unknown fields or a
    /// zero shard width, and `ConfigError::ZeroThreads` for `"threads": 0`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_shard_width(mut self, shard_width: ShardWidth) -> Self {
        self.shard_width = shard_width;
        self
    }

    /// Set the worker thread count; `None` uses the global rayon pool.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroThreads` for `Some(0)`.
    pub fn with_threads(mut self, threads: Option<usize>) -> Result<Self, ConfigError> {
        if threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        self.threads = threads;
        Ok(self)
    }
}
