//! Bounded TTL/LRU store of session records.
//!
//! # Responsibilities
//! - O(1) lookup of the session record for a fingerprint
//! - Expire entries a fixed duration after their last write
//! - Evict the least-recently-used entry when capacity is exceeded
//!
//! # Design Decisions
//! - Eviction policy is strict LRU by recency of access
//! - Expired entries are purged lazily on lookup
//! - `get`/`set` are safe from any number of concurrent forwarding tasks, but
//!   no lock spans the read → request → write sequence: two concurrent calls
//!   to the same fingerprint race and the last write wins
//! - Cache operations never fail; a miss is just "no affinity data"

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

/// Library default capacity. The forwarding read path constructs its cache
/// at 5000 instead (see `AffinityConfig`).
pub const DEFAULT_CAPACITY: usize = 3000;

/// Default time-to-live measured from the last write.
pub const DEFAULT_TTL: Duration = Duration::from_secs(240);

/// Cookies and headers accumulated for one fingerprint.
///
/// Overwritten wholesale on each write, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub cookies: HashMap<String, String>,
    pub headers: HashMap<String, String>,
}

struct Entry {
    record: SessionRecord,
    written_at: Instant,
}

/// Process-wide store mapping fingerprints to session records.
///
/// Constructed once at startup and shared via `Arc` with every forwarding
/// call; tests construct isolated instances.
pub struct AffinityCache {
    entries: Mutex<LruCache<u64, Entry>>,
    ttl: Duration,
}

impl AffinityCache {
    /// Create a cache with the given capacity and time-to-live.
    /// A zero capacity is clamped to one entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Look up the record for a fingerprint.
    ///
    /// Returns `None` for unknown or expired fingerprints; an expired entry is
    /// removed on the spot. A hit counts as a use for eviction ordering.
    pub fn get(&self, fingerprint: u64) -> Option<SessionRecord> {
        let mut entries = self.entries.lock();
        let fresh = match entries.peek(&fingerprint) {
            Some(entry) => entry.written_at.elapsed() < self.ttl,
            None => return None,
        };
        if !fresh {
            entries.pop(&fingerprint);
            return None;
        }
        entries.get(&fingerprint).map(|entry| entry.record.clone())
    }

    /// Write or delete the record for a fingerprint.
    ///
    /// `Some` creates or replaces the entry and resets its expiry clock;
    /// `None` deletes it (affinity invalidation on auth failure).
    pub fn set(&self, fingerprint: u64, record: Option<SessionRecord>) {
        let mut entries = self.entries.lock();
        match record {
            Some(record) => {
                entries.put(
                    fingerprint,
                    Entry {
                        record,
                        written_at: Instant::now(),
                    },
                );
            }
            None => {
                entries.pop(&fingerprint);
            }
        }
    }

    /// Number of resident entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AffinityCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
