//! Configuration loading for lockstep.
//!
//! Configuration is read from an optional TOML file given with `--config`.
//! Every section and key may be omitted.

use lockstep_core::Detector;
use lockstep_types::NodePattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration for lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Walker selection.
    #[serde(default)]
    pub walkers: WalkersConfig,
    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Which nodes start walkers and which nodes are accepting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalkersConfig {
    /// Start node pattern (default: names ending in `A`).
    #[serde(default = "default_start")]
    pub start: NodePattern,
    /// Accepting node pattern (default: names ending in `Z`).
    #[serde(default = "default_accept")]
    pub accept: NodePattern,
}

/// Cycle detection and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    /// Cycle detector (default: hash_map).
    #[serde(default)]
    pub detector: Detector,
    /// Analyse and fold walkers in parallel (default: true).
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

// Default value functions
fn default_start() -> NodePattern {
    NodePattern::Suffix("A".to_string())
}

fn default_accept() -> NodePattern {
    NodePattern::Suffix("Z".to_string())
}

fn default_parallel() -> bool {
    true
}

impl Default for WalkersConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            accept: default_accept(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detector: Detector::default(),
            parallel: default_parallel(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
