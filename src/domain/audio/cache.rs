use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

use super::job::AudioJobKey;

struct CacheEntry {
    asset_id: String,
    completed_at: Instant,
}

/// Completed-synthesis cache with deterministic eviction.
///
/// Capacity eviction removes the least-recently-completed entry; lookups
/// do not refresh recency. Expired entries are dropped lazily on access.
/// Mutated only under the pipeline's cache lock.
pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<AudioJobKey, CacheEntry>,
    completion_order: VecDeque<AudioJobKey>,
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: HashMap::new(),
            completion_order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &AudioJobKey) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.completed_at.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            self.remove(key);
            return None;
        }

        self.entries.get(key).map(|e| e.asset_id.clone())
    }

    pub fn insert(&mut self, key: AudioJobKey, asset_id: String) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.remove(&key).is_some() {
            self.completion_order.retain(|k| k != &key);
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                asset_id,
                completed_at: Instant::now(),
            },
        );
        self.completion_order.push_back(key);

        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.completion_order.pop_front() {
                self.entries.remove(&oldest);
                tracing::debug!(key = %oldest, "Result cache evicted oldest completion");
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &AudioJobKey) {
        if self.entries.remove(key).is_some() {
            self.completion_order.retain(|k| k != key);
        }
    }
}
