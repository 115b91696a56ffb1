// src/core/storage/db/shard.rs

//! Defines the `DbShard` and `ShardCache` structs, the fundamental storage
//! units within a `Db`.

use crate::core::storage::data_types::{DataValue, StoredValue};
use bytes::Bytes;
use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A `DbShard` is a single concurrent slice of the keyspace. It contains a
/// mutex-guarded `ShardCache` and atomic counters readable without the lock.
#[derive(Debug)]
pub struct DbShard {
    pub entries: Mutex<ShardCache>,
    /// Total memory used by this shard in bytes.
    pub current_memory: Arc<AtomicUsize>,
    /// Number of keys in this shard.
    pub key_count: Arc<AtomicUsize>,
}

/// `ShardCache` wraps the key-value map and manages memory accounting, key
/// counting, and the shard-local scratch buffer.
#[derive(Debug)]
pub struct ShardCache {
    store: HashMap<Bytes, StoredValue>,
    /// Reusable byte buffer exclusive to the shard, used when copying
    /// values out (e.g. serialization).
    scratch: Vec<u8>,
    memory_counter: Arc<AtomicUsize>,
    key_counter: Arc<AtomicUsize>,
}

impl DbShard {
    pub(super) fn new() -> Self {
        let current_memory = Arc::new(AtomicUsize::new(0));
        let key_count = Arc::new(AtomicUsize::new(0));
        Self {
            entries: Mutex::new(ShardCache::new(current_memory.clone(), key_count.clone())),
            current_memory,
            key_count,
        }
    }

    /// Atomically updates the shard's memory counter by a given delta.
    pub fn update_memory(&self, diff: isize) {
        if diff > 0 {
            self.current_memory
                .fetch_add(diff as usize, Ordering::Relaxed);
        } else {
            self.current_memory
                .fetch_sub((-diff) as usize, Ordering::Relaxed);
        }
    }
}

impl ShardCache {
    fn new(memory_counter: Arc<AtomicUsize>, key_counter: Arc<AtomicUsize>) -> Self {
        Self {
            store: HashMap::new(),
            scratch: Vec::new(),
            memory_counter,
            key_counter,
        }
    }

    /// Puts a key-value pair into the cache, handling memory and key count
    /// accounting. Returns the old value if the key already existed.
    pub fn put(&mut self, key: Bytes, mut value: StoredValue) -> Option<StoredValue> {
        value.size = value.data.memory_usage();
        let new_item_mem = key.len() + value.size;

        let old_value = self.store.insert(key.clone(), value);

        if let Some(ref old) = old_value {
            let old_item_mem = key.len() + old.size;
            self.update_memory(new_item_mem as isize - old_item_mem as isize);
        } else {
            self.update_memory(new_item_mem as isize);
            self.key_counter.fetch_add(1, Ordering::Relaxed);
        }
        old_value
    }

    /// Removes a key, returning its value if present. Handles all memory
    /// and key count decrements.
    pub fn pop(&mut self, key: &Bytes) -> Option<StoredValue> {
        if let Some(popped) = self.store.remove(key) {
            let mem_to_free = key.len() + popped.size;
            self.update_memory(-(mem_to_free as isize));
            self.key_counter.fetch_sub(1, Ordering::Relaxed);
            Some(popped)
        } else {
            None
        }
    }

    fn update_memory(&self, diff: isize) {
        if diff > 0 {
            self.memory_counter
                .fetch_add(diff as usize, Ordering::Relaxed);
        } else {
            self.memory_counter
                .fetch_sub((-diff) as usize, Ordering::Relaxed);
        }
    }

    /// Gets a mutable reference to a value, inserting a new one if absent.
    pub fn get_or_insert_with_mut<F>(&mut self, key: Bytes, f: F) -> &mut StoredValue
    where
        F: FnOnce() -> StoredValue,
    {
        if !self.store.contains_key(&key) {
            self.put(key.clone(), f());
        }
        self.store.get_mut(&key).expect("key inserted above")
    }

    pub fn get(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }

    pub fn get_mut(&mut self, key: &Bytes) -> Option<&mut StoredValue> {
        self.store.get_mut(key)
    }

    pub fn peek(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Bytes, StoredValue> {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clears all entries from the shard, resetting the counters.
    pub fn clear(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.store.clear();
        self.memory_counter.store(0, Ordering::Relaxed);
        self.key_counter.store(0, Ordering::Relaxed);
    }

    /// Serializes a stored value into the shard's scratch buffer and
    /// returns a copy of the bytes. This is the persisted-layout hook.
    pub fn encode_value(&mut self, key: &Bytes) -> Option<Bytes> {
        let entry = self.store.get(key)?;
        self.scratch.clear();
        match &entry.data {
            DataValue::String(value) => self.scratch.extend_from_slice(value),
            DataValue::SortedSet(zset) => zset.encode(&mut self.scratch),
        }
        Some(Bytes::copy_from_slice(&self.scratch))
    }
}
