//! # multiscan-config
//!
//! Validated, YAML-loadable configuration for the streaming ring buffer's
//! sizing, in the shape `vakthund-config::core::CoreConfig` and
//! `vakthund-core::config::runtime::RuntimeConfig` use: a `serde`-derived
//! struct with `#[serde(default = ...)]` fields, `validator`-checked ranges,
//! and a `thiserror` error for load failures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// The default ring-buffer capacity used when a [`MatcherConfig`] doesn't
/// override it and the matcher's own `2 x max_pattern_length` floor
/// (spec.md §4.4) doesn't exceed it either.
pub const DEFAULT_STREAM_CAPACITY: usize = 8192;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("invalid configuration: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("deserialization error: {0}")]
    Serde(#[from] serde_yaml::Error),
}

/// Streaming configuration for a [`Matcher`](../multiscan/struct.Matcher.html).
///
/// Both fields have defaults, so `MatcherConfig::default()` and an empty YAML
/// document produce a working configuration with no file present, matching
/// how the teacher's runtime configuration always has in-code defaults
/// independent of a config file's existence.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatcherConfig {
    /// Floor for the streaming ring buffer's capacity, before the
    /// `2 x max_pattern_length` rule from spec.md §4.4 is applied on top.
    #[serde(default = "default_stream_capacity")]
    #[validate(range(min = 64, max = 1_073_741_824))]
    pub stream_capacity: usize,

    /// Fallback contribution an unbounded regex pattern makes to
    /// `max_pattern_length` when its worst-case match length can't be
    /// inferred from its source text (spec.md §3; decided in DESIGN.md).
    #[serde(default = "default_regex_length_floor")]
    #[validate(range(min = 1, max = 65536))]
    pub regex_length_floor: usize,
}

fn default_stream_capacity() -> usize {
    DEFAULT_STREAM_CAPACITY
}

fn default_regex_length_floor() -> usize {
    64
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stream_capacity: default_stream_capacity(),
            regex_length_floor: default_regex_length_floor(),
        }
    }
}

impl MatcherConfig {
    /// Loads and validates configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MatcherConfig = serde_yaml::from_str(&content)?;
        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = MatcherConfig::load("/nonexistent/multiscan.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn out_of_range_capacity_fails_validation() {
        let config = MatcherConfig {
            stream_capacity: 1,
            ..MatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
