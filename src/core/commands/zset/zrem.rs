// src/core/commands/zset/zrem.rs

use super::helpers::{finish_mutation, zset_of_mut};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct ZRem {
    pub key: Bytes,
    pub members: Vec<Bytes>,
}

impl ParseCommand for ZRem {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 2 {
            return Err(ZirconError::WrongArgumentCount("ZREM".to_string()));
        }
        Ok(ZRem {
            key: args[0].clone(),
            members: args[1..].to_vec(),
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRem {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (shard, guard) = ctx.get_single_shard_context_mut()?;
        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        };
        let zset = zset_of_mut(entry)?;
        let old_mem = zset.memory_usage();

        let mut deleted = 0i64;
        for member in &self.members {
            if zset.remove(member) {
                deleted += 1;
            }
        }
        if deleted == 0 {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        }

        let emptied = zset.is_empty();
        finish_mutation(shard, entry, old_mem);
        let outcome = if emptied {
            guard.pop(&self.key);
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::Write { keys_modified: 1 }
        };
        Ok((RespValue::Integer(deleted), outcome))
    }
}

impl CommandSpec for ZRem {
    fn name(&self) -> &'static str {
        "zrem"
    }
    fn arity(&self) -> i64 {
        -3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
