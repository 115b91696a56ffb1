// src/core/commands/zset/zlexcount.rs

use super::helpers::{parse_lex_bound, zset_of};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::LexInterval;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct ZLexCount {
    pub key: Bytes,
    pub interval: LexInterval,
}

impl ParseCommand for ZLexCount {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount("ZLEXCOUNT".to_string()));
        }
        let interval = LexInterval {
            first: parse_lex_bound(&args[1])?,
            second: parse_lex_bound(&args[2])?,
        };
        Ok(ZLexCount {
            key: args[0].clone(),
            interval,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZLexCount {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_shard, guard) = ctx.get_single_shard_context_mut()?;
        let count = match guard.get(&self.key) {
            Some(entry) => zset_of(entry)?.count_lex_range(&self.interval),
            None => 0,
        };
        Ok((RespValue::Integer(count as i64), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZLexCount {
    fn name(&self) -> &'static str {
        "zlexcount"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
