// src/core/storage/db/core.rs

use super::shard::DbShard;
use crate::config::Config;
use crate::core::storage::zset::ZsetLimits;
use bytes::Bytes;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// The number of shards per keyspace.
pub const NUM_SHARDS: usize = 16;

/// `Db` is the whole keyspace, composed of independently locked shards.
#[derive(Debug)]
pub struct Db {
    pub shards: Vec<Arc<DbShard>>,
    /// Encoding thresholds applied to every sorted set created in this db.
    pub zset_limits: ZsetLimits,
    /// Memory ceiling for DENYOOM commands; `0` disables the check.
    pub maxmemory: usize,
}

impl Db {
    /// Creates a new, empty `Db` with default tuning.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Arc::new(DbShard::new())).collect();
        Self {
            shards,
            zset_limits: ZsetLimits::from(&config.sorted_set),
            maxmemory: config.maxmemory,
        }
    }

    /// Calculates the shard index for a given key by hashing its bytes.
    pub fn get_shard_index(&self, key: &Bytes) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    pub fn get_shard(&self, index: usize) -> &Arc<DbShard> {
        &self.shards[index]
    }

    /// Total number of keys across all shards. O(1), reads the atomic
    /// counters without locking.
    pub fn get_key_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.key_count.load(Ordering::Relaxed))
            .sum()
    }

    /// Total memory used across all shards.
    pub fn get_current_memory(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.current_memory.load(Ordering::Relaxed))
            .sum()
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}
