//! Config Cache - On-disk cache for assembled configuration
//!
//! Saves a configuration mapping per profile with an optional TTL and loads it
//! back while it is still fresh.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheLookup, ConfigCache, ConfigCacheRepository, ConfigMap, MissReason};
pub use config::Config;
pub use error::{CacheError, CodecError, Result};
