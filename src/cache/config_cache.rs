//! Config Cache Module
//!
//! Ties the path resolver, record codec, store and expiry check together into
//! the `load` / `save` operations used by the configuration bootstrap.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{
    store, CacheRecord, CacheSettings, Clock, ConfigMap, JsonCodec, RecordCodec, SystemClock,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Lookup Outcome ==
/// Why `load` found no usable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// No base directory configured
    NoBaseDirectory,
    /// Cache file does not exist
    NotFound,
    /// Record exists but its expiry has passed
    Expired,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A fresh record was found
    Hit(ConfigMap),
    /// No usable record
    Miss(MissReason),
}

impl CacheLookup {
    /// Returns true on a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// Returns the cached config, or an empty mapping on a miss.
    pub fn into_config(self) -> ConfigMap {
        match self {
            CacheLookup::Hit(config) => config,
            CacheLookup::Miss(_) => ConfigMap::new(),
        }
    }

    /// Splits the outcome into the config and the hit flag.
    pub fn into_parts(self) -> (ConfigMap, bool) {
        let hit = self.is_hit();
        (self.into_config(), hit)
    }
}

// == Repository Trait ==
/// Storage for assembled configuration, consumed by the bootstrap process.
pub trait ConfigCacheRepository {
    /// Loads the cached config for a profile.
    fn load(&self, profile: Option<&str>) -> Result<CacheLookup>;

    /// Saves a config for a profile, returning false when caching is disabled.
    fn save(&self, config: &ConfigMap, profile: Option<&str>, ttl: Option<u64>) -> Result<bool>;
}

// == Config Cache ==
/// File-backed configuration cache.
///
/// Stateless between calls; everything lives in the cache files.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    settings: CacheSettings,
    codec: Arc<dyn RecordCodec>,
    clock: Arc<dyn Clock>,
}

impl ConfigCache {
    // == Constructor ==
    /// Creates a cache rooted at `base_dir` with the default naming scheme,
    /// JSON codec and system clock. `None` disables caching.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self::with_settings(CacheSettings::new(base_dir))
    }

    /// Creates a cache with a custom naming scheme.
    pub fn with_settings(settings: CacheSettings) -> Self {
        Self {
            settings,
            codec: Arc::new(JsonCodec),
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a cache from environment-derived configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_settings(
            CacheSettings::new(config.cache_dir.clone())
                .with_prefix(config.prefix.clone())
                .with_extension(config.extension.clone()),
        )
    }

    /// Replaces the record codec.
    pub fn with_codec(mut self, codec: impl RecordCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Replaces the clock used for expiry.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the naming scheme in use.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // == Path ==
    /// Returns the cache file path for a profile, if caching is enabled.
    pub fn path_for(&self, profile: Option<&str>) -> Option<PathBuf> {
        self.settings.resolve(profile)
    }

    /// Returns true if a cache file exists for the profile, fresh or not.
    pub fn exists(&self, profile: Option<&str>) -> bool {
        self.path_for(profile)
            .map(|path| store::exists(&path))
            .unwrap_or(false)
    }

    // == Load ==
    /// Loads the cached config for a profile.
    ///
    /// Missing base directory, missing file and expired record are misses.
    /// Read and decode failures are errors.
    pub fn load(&self, profile: Option<&str>) -> Result<CacheLookup> {
        let Some(path) = self.path_for(profile) else {
            debug!("config cache miss: no base directory");
            return Ok(CacheLookup::Miss(MissReason::NoBaseDirectory));
        };

        let Some(bytes) = store::read_bytes(&path)? else {
            debug!(path = %path.display(), "config cache miss: file not found");
            return Ok(CacheLookup::Miss(MissReason::NotFound));
        };

        let record = self
            .codec
            .decode(&bytes)
            .map_err(|source| CacheError::DecodeFailed {
                path: path.clone(),
                source,
            })?;

        if record.is_expired(self.clock.now()) {
            debug!(
                path = %path.display(),
                expires_at = ?record.expires_at,
                "config cache miss: record expired"
            );
            return Ok(CacheLookup::Miss(MissReason::Expired));
        }

        debug!(path = %path.display(), keys = record.config.len(), "config cache hit");
        Ok(CacheLookup::Hit(record.config))
    }

    // == Save ==
    /// Saves a config for a profile.
    ///
    /// # Arguments
    /// * `config` - The assembled configuration
    /// * `profile` - Optional profile name
    /// * `ttl` - Optional TTL in seconds, `None` or `0` never expires
    ///
    /// # Returns
    /// * `Ok(false)` if no base directory is configured
    /// * `Ok(true)` once the record is written
    pub fn save(&self, config: &ConfigMap, profile: Option<&str>, ttl: Option<u64>) -> Result<bool> {
        let (Some(dir), Some(path)) = (self.settings.base_dir(), self.path_for(profile)) else {
            debug!("config cache save skipped: no base directory");
            return Ok(false);
        };

        store::ensure_dir(dir)?;

        let record = CacheRecord::new(config.clone(), ttl, self.clock.now());
        let bytes = self
            .codec
            .encode(&record)
            .map_err(|source| CacheError::EncodeFailed {
                path: path.clone(),
                source,
            })?;

        store::write_atomic(&path, &bytes)?;
        debug!(path = %path.display(), expires_at = ?record.expires_at, "config cache saved");

        Ok(true)
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ConfigCacheRepository for ConfigCache {
    fn load(&self, profile: Option<&str>) -> Result<CacheLookup> {
        ConfigCache::load(self, profile)
    }

    fn save(&self, config: &ConfigMap, profile: Option<&str>, ttl: Option<u64>) -> Result<bool> {
        ConfigCache::save(self, config, profile, ttl)
    }
}
