//! Bounded in-process cache with TTL and insertion-order eviction
//!
//! Values are stored as serialized JSON so one cache can hold listings and
//! details side by side.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

struct Entry {
    data: Vec<u8>,
    expires_at: Instant,
}

/// In-memory cache owned by one service instance; never persisted
pub struct MemoryCache {
    entries: HashMap<String, Entry>,
    /// Keys from oldest to newest
    order: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            ttl,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`.
    ///
    /// An expired entry is removed and reported as a miss. A hit moves the
    /// key to the newest position without extending its expiry.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        let expired = now >= self.entries.get(key)?.expires_at;
        if expired {
            self.remove(key);
            return None;
        }

        self.touch(key);
        self.entries.get(key).map(|entry| entry.data.clone())
    }

    pub fn put(&mut self, key: &str, data: Vec<u8>) {
        self.put_at(key, data, Instant::now());
    }

    /// Store `data` under `key`, evicting the oldest entries beyond capacity.
    pub fn put_at(&mut self, key: &str, data: Vec<u8>, now: Instant) {
        let entry = Entry {
            data,
            expires_at: now + self.ttl,
        };
        if self.entries.insert(key.to_string(), entry).is_some() {
            self.forget_order(key);
        }
        self.order.push_back(key.to_string());

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            log::debug!("Evicting cache entry {}", oldest);
            self.entries.remove(&oldest);
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.forget_order(key);
            true
        } else {
            false
        }
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        self.forget_order(key);
        self.order.push_back(key.to_string());
    }

    fn forget_order(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}
