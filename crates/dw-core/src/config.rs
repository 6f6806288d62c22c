//! Configuration structures for deepwatch.
//!
//! This module provides configuration types for the components of the workspace:
//!
//! - [`WatchConfig`] - Recursive watcher settings (channel sizes, overflow, symlinks)
//! - [`LogConfig`] - Tracing output settings for the binary
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`], and every struct is
//! `#[serde(default)]` so a configuration file only needs the fields it changes.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the dispatch loop does when the consumer's event channel is full.
///
/// The event channel is bounded. A consumer that stops draining it will
/// eventually fill it, and the policy decides who pays for that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait for the consumer to make room. No event is lost, but the
    /// consumer must drain the channel continuously or the loop stalls.
    #[default]
    Block,
    /// Drop the event that does not fit and count it.
    DropNewest,
}

/// Configuration for the recursive watcher.
///
/// # Examples
///
/// ```
/// use dw_core::{OverflowPolicy, WatchConfig};
///
/// let config = WatchConfig::default();
/// assert_eq!(config.event_capacity, 100);
/// assert_eq!(config.overflow, OverflowPolicy::Block);
/// assert!(!config.follow_symlinks);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Capacity of the consumer-facing event channel.
    pub event_capacity: usize,

    /// Capacity of the consumer-facing error channel.
    ///
    /// Errors that do not fit are dropped and counted; the error channel
    /// never blocks the dispatch loop.
    pub error_capacity: usize,

    /// Behaviour when the event channel is full.
    pub overflow: OverflowPolicy,

    /// Whether registration walks descend into symlinked directories.
    pub follow_symlinks: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            event_capacity: 100,
            error_capacity: 32,
            overflow: OverflowPolicy::Block,
            follow_symlinks: false,
        }
    }
}

impl WatchConfig {
    /// Checks that the configuration can be used to build a watcher.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if either channel capacity is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "event_capacity",
                "must be greater than zero",
            ));
        }
        if self.error_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "error_capacity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Returns a copy with a different event channel capacity.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Returns a copy with a different overflow policy.
    #[must_use]
    pub const fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

/// Configuration for log output.
///
/// # Examples
///
/// ```
/// use dw_core::LogConfig;
///
/// let config = LogConfig::default();
/// assert_eq!(config.level, "info");
/// assert!(config.ansi);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,

    /// Whether to colour log output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            ansi: true,
        }
    }
}

/// Root configuration for deepwatch.
///
/// # Examples
///
/// ```
/// use dw_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("event_capacity"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Watcher configuration.
    pub watch: WatchConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Parses a configuration from a JSON string and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidOption`] for values that fail validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.watch.validate()?;
        Ok(config)
    }

    /// Reads a configuration file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json_str`].
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
