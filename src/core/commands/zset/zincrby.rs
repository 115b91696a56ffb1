// src/core/commands/zset/zincrby.rs

use super::helpers::{finish_mutation, zset_of_mut};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_string, parse_score};
use crate::core::protocol::format_double;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{AddOutcome, AddParams, SortedSet};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// `ZINCRBY` is the single-pair increment form of `ZADD`.
#[derive(Debug, Clone, Default)]
pub struct ZIncrBy {
    pub key: Bytes,
    pub increment: f64,
    pub member: Bytes,
}

impl ParseCommand for ZIncrBy {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount("ZINCRBY".to_string()));
        }
        let increment = parse_score(&extract_string(&args[1])?)?;
        Ok(ZIncrBy {
            key: args[0].clone(),
            increment,
            member: args[2].clone(),
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZIncrBy {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        ctx.check_memory_pressure(self.flags())?;
        let limits = ctx.db.zset_limits;
        let (shard, guard) = ctx.get_single_shard_context_mut()?;

        let member_len = self.member.len();
        let entry = guard.get_or_insert_with_mut(self.key.clone(), || {
            StoredValue::new(DataValue::SortedSet(SortedSet::for_first_member(
                member_len, limits,
            )))
        });
        let zset = zset_of_mut(entry)?;

        let params = AddParams {
            incr: true,
            ..Default::default()
        };
        let old_mem = zset.memory_usage();
        let outcome = zset.add(self.increment, &self.member, &params);
        match outcome {
            AddOutcome::Added(score) | AddOutcome::Updated(score) => {
                finish_mutation(shard, entry, old_mem);
                Ok((
                    RespValue::BulkString(Bytes::from(format_double(score))),
                    WriteOutcome::Write { keys_modified: 1 },
                ))
            }
            AddOutcome::Unchanged(score) => Ok((
                RespValue::BulkString(Bytes::from(format_double(score))),
                WriteOutcome::DidNotWrite,
            )),
            AddOutcome::Skipped => Ok((RespValue::Null, WriteOutcome::DidNotWrite)),
            AddOutcome::Nan => Err(ZirconError::NanScore),
        }
    }
}

impl CommandSpec for ZIncrBy {
    fn name(&self) -> &'static str {
        "zincrby"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::DENY_OOM | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
