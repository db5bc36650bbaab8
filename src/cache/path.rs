//! Path Resolver Module
//!
//! Derives the on-disk filename for a profile from the cache naming scheme.

use std::path::PathBuf;

use crate::cache::{DEFAULT_EXTENSION, DEFAULT_PREFIX};

// == Cache Settings ==
/// Where cache files live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Directory holding cache files, None = caching disabled
    pub base_dir: Option<PathBuf>,
    /// First filename segment
    pub prefix: String,
    /// Last filename segment
    pub extension: String,
}

impl CacheSettings {
    // == Constructor ==
    /// Creates settings with the default `config` prefix and `cache` extension.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            base_dir,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Replaces the filename prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the filename extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    // == Base Directory ==
    /// Returns the configured base directory, treating an empty path as unset.
    pub fn base_dir(&self) -> Option<&PathBuf> {
        self.base_dir
            .as_ref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    // == Filename ==
    /// Builds `prefix[.profile].extension`.
    ///
    /// Empty segments are skipped and stray dots at segment edges are trimmed,
    /// so a missing profile collapses cleanly to `config.cache`.
    pub fn filename(&self, profile: Option<&str>) -> String {
        [Some(self.prefix.as_str()), profile, Some(self.extension.as_str())]
            .into_iter()
            .flatten()
            .map(|segment| segment.trim_matches('.'))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }

    // == Resolve ==
    /// Returns the full cache file path for a profile.
    ///
    /// Returns `None` when no base directory is configured. No I/O is performed.
    pub fn resolve(&self, profile: Option<&str>) -> Option<PathBuf> {
        self.base_dir().map(|dir| dir.join(self.filename(profile)))
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(None)
    }
}
