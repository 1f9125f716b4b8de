//! Time Source Abstraction
//!
//! Token lifetimes are enforced against an injectable clock so expiry
//! behavior is deterministic under test. Production code uses
//! [`SystemClock`]; tests use [`ManualClock`] and advance it explicitly.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current Unix timestamp (seconds)
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds
    fn unix_now(&self) -> i64;
}

/// Wall clock backed by `SystemTime`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default()
    }
}

/// Manually controlled clock for deterministic tests
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at the given Unix timestamp
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Move the clock to an absolute timestamp
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Advance the clock by the given number of seconds
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn unix_now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
