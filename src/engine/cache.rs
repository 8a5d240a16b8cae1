//! Memoization cache for decision reports.
//!
//! An explicit cache object injected into the engine, rather than
//! process-wide static state: callers construct one, choose its TTL, and
//! share it between engines if they want shared memoization. The map is
//! mutex-guarded; the check-then-insert race between two threads
//! evaluating the same blueprint is benign (both store equivalent
//! reports).

use crate::engine::decision::DecisionReport;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    report: DecisionReport,
    expires_at: Instant,
}

/// TTL-bounded report cache.
pub struct MemoCache {
    ttl: Duration,
    entries: Mutex<HashMap<u64, Entry>>,
}

impl MemoCache {
    /// Create a cache whose entries live for `ttl`.
    ///
    /// A zero TTL makes every entry expire immediately: lookups always
    /// miss and evaluation always reruns.
    pub fn new(ttl: Duration) -> Self {
        MemoCache { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch an unexpired report; an expired entry is evicted and reads
    /// as a miss.
    pub fn get(&self, key: u64) -> Option<DecisionReport> {
        let mut entries = self.lock();
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.report.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a report under `key` with expiry `now + ttl`.
    pub fn put(&self, key: u64, report: DecisionReport) {
        let expires_at = Instant::now() + self.ttl;
        self.lock().insert(key, Entry { report, expires_at });
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Entry>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still a valid cache.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
