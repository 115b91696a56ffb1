// src/core/commands/zset/zrank.rs

use super::helpers::zset_of;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

fn parse_rank_args(args: &[Bytes], name: &str) -> Result<(Bytes, Bytes), ZirconError> {
    if args.len() != 2 {
        return Err(ZirconError::WrongArgumentCount(name.to_string()));
    }
    Ok((args[0].clone(), args[1].clone()))
}

/// Replies with the member's 0-based rank, or Null when the key or member
/// is absent.
fn execute_rank(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    member: &Bytes,
    reverse: bool,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let (_shard, guard) = ctx.get_single_shard_context_mut()?;
    let reply = match guard.get(key) {
        Some(entry) => match zset_of(entry)?.rank(member, reverse) {
            Some(rank) => RespValue::Integer(rank as i64),
            None => RespValue::Null,
        },
        None => RespValue::Null,
    };
    Ok((reply, WriteOutcome::DidNotWrite))
}

#[derive(Debug, Clone, Default)]
pub struct ZRank {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for ZRank {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        let (key, member) = parse_rank_args(args, "ZRANK")?;
        Ok(ZRank { key, member })
    }
}

#[async_trait]
impl ExecutableCommand for ZRank {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_rank(ctx, &self.key, &self.member, false)
    }
}

impl CommandSpec for ZRank {
    fn name(&self) -> &'static str {
        "zrank"
    }
    fn arity(&self) -> i64 {
        3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZRevRank {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for ZRevRank {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        let (key, member) = parse_rank_args(args, "ZREVRANK")?;
        Ok(ZRevRank { key, member })
    }
}

#[async_trait]
impl ExecutableCommand for ZRevRank {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_rank(ctx, &self.key, &self.member, true)
    }
}

impl CommandSpec for ZRevRank {
    fn name(&self) -> &'static str {
        "zrevrank"
    }
    fn arity(&self) -> i64 {
        3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
