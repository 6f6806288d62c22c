//! Configuration and shared error types for deepwatch.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`WatchConfig`] and [`OverflowPolicy`] for the recursive watcher
//! - [`LogConfig`] for the binary's tracing setup
//! - [`Config`], the root structure loadable from a JSON file
//! - [`ConfigError`] for loading and validation failures

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{Config, LogConfig, OverflowPolicy, WatchConfig};
pub use error::ConfigError;
