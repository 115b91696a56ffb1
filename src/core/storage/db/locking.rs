// src/core/storage/db/locking.rs

use super::core::Db;
use super::shard::ShardCache;
use crate::core::Command;
use crate::core::commands::command_trait::CommandExt;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::MutexGuard;

/// `ExecutionLocks` holds the `MutexGuard`s a command needs for its whole
/// execution, including both phases of a cross-shard store operation.
pub enum ExecutionLocks<'a> {
    /// A lock on a single shard.
    Single {
        shard_index: usize,
        guard: MutexGuard<'a, ShardCache>,
    },
    /// Locks on every shard touched by a multi-key command, keyed by shard
    /// index.
    Multi {
        guards: BTreeMap<usize, MutexGuard<'a, ShardCache>>,
    },
    /// No locks are required.
    None,
}

impl Db {
    /// Acquires the locks a command needs, based on the keys it names.
    pub async fn determine_locks_for_command<'a>(&'a self, command: &Command) -> ExecutionLocks<'a> {
        let keys = command.get_keys();
        match keys.len() {
            0 => ExecutionLocks::None,
            1 => {
                let shard_index = self.get_shard_index(&keys[0]);
                ExecutionLocks::Single {
                    shard_index,
                    guard: self.get_shard(shard_index).entries.lock().await,
                }
            }
            _ => ExecutionLocks::Multi {
                guards: self.lock_shards_for_keys(&keys).await,
            },
        }
    }

    /// Locks the shards owning the given keys, in ascending index order to
    /// prevent deadlocks.
    pub async fn lock_shards_for_keys<'a>(
        &'a self,
        keys: &[Bytes],
    ) -> BTreeMap<usize, MutexGuard<'a, ShardCache>> {
        let indices: BTreeSet<usize> = keys.iter().map(|key| self.get_shard_index(key)).collect();
        let mut guards = BTreeMap::new();
        for index in indices {
            guards.insert(index, self.shards[index].entries.lock().await);
        }
        guards
    }
}
