//! Loading and querying of the build-cache configuration.
//!
//! The configuration is read from a TOML file into a [`CacheConfig`], which is
//! either fully initialized or disabled. It answers the questions the
//! fingerprinting engine asks while it runs: which glob and include/exclude
//! paths apply, how each plugin's configuration should be scanned for paths
//! ([`PluginScanConfig`]), which digest algorithm to use, and which plugin
//! properties are tracked when comparing against a baseline.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;
pub mod scan;
pub mod types;

pub use config::{CacheConfig, DEFAULT_GLOB};
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use scan::{PluginScanConfig, ScanConfigProperties, ScanMode, TagScanConfig};
pub use types::*;
