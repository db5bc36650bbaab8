//! Cache Module
//!
//! Persists assembled configuration to disk, keyed by an optional profile,
//! with optional TTL expiration.

mod config_cache;
mod expiry;
mod path;
mod record;
pub mod store;


// Re-export public types
pub use config_cache::{CacheLookup, ConfigCache, ConfigCacheRepository, MissReason};
pub use expiry::{is_expired, Clock, ManualClock, SystemClock};
pub use path::CacheSettings;
pub use record::{CacheRecord, JsonCodec, RecordCodec};

/// Configuration mapping being cached.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

// == Public Constants ==
/// Default first segment of cache filenames
pub const DEFAULT_PREFIX: &str = "config";

/// Default last segment of cache filenames
pub const DEFAULT_EXTENSION: &str = "cache";
