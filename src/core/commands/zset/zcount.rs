// src/core/commands/zset/zcount.rs

use super::helpers::{parse_score_bound, zset_of};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::ScoreInterval;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct ZCount {
    pub key: Bytes,
    pub interval: ScoreInterval,
}

impl ParseCommand for ZCount {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount("ZCOUNT".to_string()));
        }
        let interval = ScoreInterval {
            first: parse_score_bound(&extract_string(&args[1])?)?,
            second: parse_score_bound(&extract_string(&args[2])?)?,
        };
        Ok(ZCount {
            key: args[0].clone(),
            interval,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZCount {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_shard, guard) = ctx.get_single_shard_context_mut()?;
        let count = match guard.get(&self.key) {
            Some(entry) => zset_of(entry)?.count_score_range(&self.interval),
            None => 0,
        };
        Ok((RespValue::Integer(count as i64), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZCount {
    fn name(&self) -> &'static str {
        "zcount"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
