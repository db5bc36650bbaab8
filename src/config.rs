//! Configuration Module
//!
//! Handles loading cache settings from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{DEFAULT_EXTENSION, DEFAULT_PREFIX};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding cache files, None = caching disabled
    pub cache_dir: Option<PathBuf>,
    /// Profile used when the caller does not name one
    pub profile: Option<String>,
    /// First filename segment
    pub prefix: String,
    /// Last filename segment
    pub extension: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CONFIG_CACHE_DIR` - Cache directory (default: unset, caching disabled)
    /// - `CONFIG_CACHE_PROFILE` - Default profile (default: none)
    /// - `CONFIG_CACHE_PREFIX` - Filename prefix (default: `config`)
    /// - `CONFIG_CACHE_EXTENSION` - Filename extension (default: `cache`)
    pub fn from_env() -> Self {
        Self {
            cache_dir: non_empty_var("CONFIG_CACHE_DIR").map(PathBuf::from),
            profile: non_empty_var("CONFIG_CACHE_PROFILE"),
            prefix: non_empty_var("CONFIG_CACHE_PREFIX")
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            extension: non_empty_var("CONFIG_CACHE_EXTENSION")
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            profile: None,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
