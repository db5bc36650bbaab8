//! Cache Record Module
//!
//! Defines the on-disk envelope wrapping a configuration mapping with its
//! expiry timestamp, and the codec that turns it into bytes.

use serde::Serialize;
use serde_json::Value;

use crate::cache::ConfigMap;
use crate::error::CodecError;

// == Cache Record ==
/// A cached configuration together with its expiry metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheRecord {
    /// Expiration timestamp (Unix seconds), None = no expiration
    #[serde(rename = "expires")]
    pub expires_at: Option<i64>,
    /// The cached configuration mapping
    pub config: ConfigMap,
}

impl CacheRecord {
    // == Constructor ==
    /// Creates a record that expires `ttl_seconds` after `now`.
    ///
    /// A TTL of `None` or `0` produces a record that never expires.
    ///
    /// # Arguments
    /// * `config` - The configuration to cache
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `now` - Current Unix timestamp in seconds
    pub fn new(config: ConfigMap, ttl_seconds: Option<u64>, now: i64) -> Self {
        let expires_at = ttl_seconds
            .filter(|ttl| *ttl > 0)
            .map(|ttl| now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)));

        Self { expires_at, config }
    }

    // == Is Expired ==
    /// Checks if the record is stale at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        super::expiry::is_expired(self.expires_at, now)
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the record has expired
    /// - `Some(remaining_seconds)` if the record has TTL and hasn't expired
    /// - `None` if the record never expires
    pub fn ttl_remaining(&self, now: i64) -> Option<u64> {
        self.expires_at
            .map(|expires| u64::try_from(expires.saturating_sub(now)).unwrap_or(0))
    }
}

// == Record Codec ==
/// Byte-level encoding of cache records.
///
/// Implementations must round-trip the configuration and the expiry exactly,
/// and must reject malformed input instead of substituting defaults.
pub trait RecordCodec: std::fmt::Debug + Send + Sync {
    /// Serializes a record to bytes.
    fn encode(&self, record: &CacheRecord) -> Result<Vec<u8>, CodecError>;

    /// Restores a record from bytes.
    fn decode(&self, bytes: &[u8]) -> Result<CacheRecord, CodecError>;
}

/// JSON envelope: `{"expires": <int|null>, "config": {...}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode(&self, record: &CacheRecord) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(record)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<CacheRecord, CodecError> {
        let mut envelope = match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => map,
            _ => return Err(CodecError::NotAnObject),
        };

        let expires_at = match envelope.get("expires") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_i64()
                    .ok_or_else(|| CodecError::InvalidExpiry(value.to_string()))?,
            ),
        };

        let config = match envelope.remove("config") {
            Some(Value::Object(config)) => config,
            _ => return Err(CodecError::InvalidConfig),
        };

        Ok(CacheRecord { expires_at, config })
    }
}
