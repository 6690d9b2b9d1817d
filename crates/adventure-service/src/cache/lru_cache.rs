//! Fixed-capacity least-recently-used cache.
//!
//! Entries live in a slab of nodes threaded into a doubly-linked recency list
//! (head is most recently used, tail is the eviction candidate) with a
//! `HashMap` index from key to slot. Every operation takes the cache's own
//! mutex once, so no caller can observe a half-updated list.

use adventure_core::{AdventureError, AdventureResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Hit, miss, and eviction counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Inner<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    fn node(&self, slot: usize) -> &Node<K, V> {
        self.slots[slot]
            .as_ref()
            .unwrap_or_else(|| unreachable!("indexed slot {slot} is vacant"))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<K, V> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("indexed slot {slot} is vacant"))
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(slot);
        node.prev = None;
        node.next = None;
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.node_mut(old_head).prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn touch(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn take(&mut self, slot: usize) -> Node<K, V> {
        self.unlink(slot);
        self.free.push(slot);
        self.slots[slot]
            .take()
            .unwrap_or_else(|| unreachable!("indexed slot {slot} is vacant"))
    }

    fn allocate(&mut self, node: Node<K, V>) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            slot
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }
}

/// A thread-safe LRU cache with a capacity fixed at construction.
///
/// `get`, `put`, and `remove` are O(1). Values are cloned out so a reader never
/// holds a reference into the cache after the lock is released.
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::with_capacity(capacity.get())),
        }
    }

    /// Creates an empty cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> AdventureResult<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or_else(|| AdventureError::Cache("cache capacity must be at least 1".to_string()))
    }

    /// Returns a copy of the cached value and marks the key most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        match inner.index.get(key).copied() {
            Some(slot) => {
                inner.hits += 1;
                inner.touch(slot);
                Some(inner.node(slot).value.clone())
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Inserts or overwrites a value and marks the key most recently used.
    ///
    /// Inserting a new key into a full cache first evicts the least recently
    /// used entry, whose key is returned.
    pub fn put(&self, key: K, value: V) -> Option<K> {
        let mut inner = self.inner.lock();

        if let Some(slot) = inner.index.get(&key).copied() {
            inner.node_mut(slot).value = value;
            inner.touch(slot);
            return None;
        }

        let mut evicted = None;
        if inner.index.len() >= self.capacity.get() {
            if let Some(tail) = inner.tail {
                let node = inner.take(tail);
                inner.index.remove(&node.key);
                inner.evictions += 1;
                evicted = Some(node.key);
            }
        }

        let slot = inner.allocate(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        inner.push_front(slot);
        inner.index.insert(key, slot);

        evicted
    }

    /// Removes an entry, returning its value. Missing keys are a no-op.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let slot = inner.index.remove(key)?;
        Some(inner.take(slot).value)
    }

    /// Returns a copy of every cached value, least recently used first.
    ///
    /// Reading the snapshot does not change recency.
    pub fn values(&self) -> Vec<V> {
        let inner = self.inner.lock();
        let mut values = Vec::with_capacity(inner.index.len());
        let mut cursor = inner.tail;
        while let Some(slot) = cursor {
            let node = inner.node(slot);
            values.push(node.value.clone());
            cursor = node.prev;
        }
        values
    }

    /// Returns true if the key is cached, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().index.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.index.clear();
        inner.slots.clear();
        inner.free.clear();
        inner.head = None;
        inner.tail = None;
    }

    /// Returns the current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            len: inner.index.len(),
            capacity: self.capacity.get(),
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.inner.lock().index.len())
            .finish()
    }
}
