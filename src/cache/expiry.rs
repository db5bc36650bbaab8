//! Expiry Module
//!
//! Clock abstraction and the freshness check applied to loaded records.

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

// == Clock ==
/// Source of the current Unix time in seconds.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> i64;
}

/// Wall clock backed by chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for deterministic expiry in tests.
///
/// Clones share the same time, so a handle kept by a test can move the clock
/// owned by a cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// == Is Expired ==
/// Checks whether a record with the given expiry is stale at `now`.
///
/// A record expiring exactly at `now` is still valid for that instant;
/// `None` never expires.
pub fn is_expired(expires_at: Option<i64>, now: i64) -> bool {
    match expires_at {
        Some(expires) => expires < now,
        None => false,
    }
}
