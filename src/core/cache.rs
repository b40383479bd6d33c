//! Short-lived memoization of read-style calls.
//!
//! Entries are keyed by the JSON serialization of the wrapped call's full argument tuple, expire
//! by TTL measured from insertion, and are evicted least-recently-used first once the cache grows
//! past its size bound. Only successful results are stored; stored values are never modified.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const DEFAULT_TTL: Duration = Duration::from_secs(120);
const DEFAULT_MAX_ENTRIES: usize = 100;

/// Defines the behavior of the in-memory cache for an API call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present; otherwise, fetch from the network
    /// and write the response to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry, and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

/// TTL and size bound for one cached call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum age of a usable entry. Zero disables caching.
    pub ttl: Duration,
    /// Maximum number of entries kept. Zero disables caching.
    pub max_entries: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheOptions {
    /// Options with the given TTL and the default size bound.
    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    const fn is_disabled(&self) -> bool {
        self.ttl.is_zero() || self.max_entries == 0
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    response: V,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Debug)]
struct LruState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    // recency order: lowest sequence number is least recently used
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V: Clone> LruState<V> {
    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn lookup(&mut self, key: &str, now: Instant, ttl: Duration) -> Option<V> {
        let (fresh, old_seq) = {
            let entry = self.entries.get(key)?;
            (now.duration_since(entry.inserted_at) < ttl, entry.seq)
        };
        self.order.remove(&old_seq);

        if !fresh {
            self.entries.remove(key);
            return None;
        }

        let seq = self.bump();
        self.order.insert(seq, key.to_string());
        let entry = self.entries.get_mut(key)?;
        entry.seq = seq;
        Some(entry.response.clone())
    }

    fn store(&mut self, key: String, response: V, inserted_at: Instant, max_entries: usize) {
        let seq = self.bump();
        if let Some(prev) = self.entries.insert(
            key.clone(),
            CacheEntry {
                response,
                inserted_at,
                seq,
            },
        ) {
            self.order.remove(&prev.seq);
        }
        self.order.insert(seq, key);

        if self.entries.len() > max_entries
            && let Some((_, oldest)) = self.order.pop_first()
        {
            self.entries.remove(&oldest);
        }
    }
}

/// A TTL + LRU cache in front of fallible async calls.
#[derive(Debug)]
pub struct ResponseCache<V> {
    state: Mutex<LruState<V>>,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self {
            state: Mutex::new(LruState {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                next_seq: 0,
            }),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `call` unless a fresh entry for `args` exists.
    ///
    /// A fresh hit is promoted to most-recently-used and returned without invoking `call`. A stale
    /// hit is dropped. On a miss the result of `call` is stored if it succeeded, evicting the
    /// least-recently-used entry when the cache exceeds `options.max_entries`.
    ///
    /// Caching is skipped entirely when `options` disables it or `args` cannot be serialized.
    ///
    /// # Errors
    ///
    /// Returns whatever error `call` returns; the cache adds none of its own.
    pub async fn perform<A, F, Fut, E>(
        &self,
        args: &A,
        options: CacheOptions,
        call: F,
    ) -> Result<V, E>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if options.is_disabled() {
            return call().await;
        }
        let Ok(key) = serde_json::to_string(args) else {
            return call().await;
        };

        let now = Instant::now();
        if let Some(hit) = self.state.lock().await.lookup(&key, now, options.ttl) {
            return Ok(hit);
        }

        let response = call().await?;
        self.state
            .lock()
            .await
            .store(key, response.clone(), now, options.max_entries);
        Ok(response)
    }

    /// Always runs `call` and stores a successful result, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns whatever error `call` returns.
    pub async fn refresh<A, F, Fut, E>(
        &self,
        args: &A,
        options: CacheOptions,
        call: F,
    ) -> Result<V, E>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let now = Instant::now();
        let response = call().await?;
        if !options.is_disabled()
            && let Ok(key) = serde_json::to_string(args)
        {
            self.state
                .lock()
                .await
                .store(key, response.clone(), now, options.max_entries);
        }
        Ok(response)
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.order.clear();
    }
}
