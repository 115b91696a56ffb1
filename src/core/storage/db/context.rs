// src/core/storage/db/context.rs

use super::core::Db;
use super::locking::ExecutionLocks;
use super::shard::{DbShard, ShardCache};
use crate::core::Command;
use crate::core::ZirconError;
use crate::core::commands::command_trait::{CommandExt, CommandFlags};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::MutexGuard;

/// `ExecutionContext` provides the state and locks required to execute a
/// `Command`.
pub struct ExecutionContext<'a> {
    pub db: &'a Db,
    pub locks: ExecutionLocks<'a>,
    /// The command being executed; lock helpers use its keys.
    pub command: Option<Command>,
}

impl<'a> ExecutionContext<'a> {
    /// Builds a context holding exactly the locks the command needs.
    pub async fn lock_for_command(db: &'a Db, command: Command) -> ExecutionContext<'a> {
        let locks = db.determine_locks_for_command(&command).await;
        Self {
            db,
            locks,
            command: Some(command),
        }
    }

    /// Gets the shard and guard for the command's first key.
    pub fn get_single_shard_context_mut(
        &mut self,
    ) -> Result<(&Arc<DbShard>, &mut MutexGuard<'a, ShardCache>), ZirconError> {
        let key = self
            .command
            .as_ref()
            .and_then(|c| c.get_keys().into_iter().next())
            .ok_or_else(|| {
                ZirconError::Internal("Command in context has no keys for shard lookup".into())
            })?;
        let shard_index = self.db.get_shard_index(&key);
        let shard = self.db.get_shard(shard_index);
        match &mut self.locks {
            ExecutionLocks::Single { guard, .. } => Ok((shard, guard)),
            ExecutionLocks::Multi { guards } => {
                let guard = guards.get_mut(&shard_index).ok_or_else(|| {
                    ZirconError::LockingError("Required shard lock missing".into())
                })?;
                Ok((shard, guard))
            }
            ExecutionLocks::None => Err(ZirconError::LockingError(
                "Command expected a single/multi shard lock".into(),
            )),
        }
    }

    /// Gets the full multi-shard guard map; store operations require it.
    pub fn get_multi_shard_guards(
        &mut self,
    ) -> Result<&mut BTreeMap<usize, MutexGuard<'a, ShardCache>>, ZirconError> {
        match &mut self.locks {
            ExecutionLocks::Multi { guards } => Ok(guards),
            _ => Err(ZirconError::LockingError(
                "Store operation requires a multi-key lock".into(),
            )),
        }
    }

    /// Rejects DENYOOM commands once used memory exceeds the ceiling.
    pub fn check_memory_pressure(&self, flags: CommandFlags) -> Result<(), ZirconError> {
        if flags.contains(CommandFlags::DENY_OOM)
            && self.db.maxmemory > 0
            && self.db.get_current_memory() > self.db.maxmemory
        {
            return Err(ZirconError::MaxMemoryReached);
        }
        Ok(())
    }

    /// Releases all locks held by the context.
    pub fn release_locks(&mut self) {
        self.locks = ExecutionLocks::None;
    }
}
