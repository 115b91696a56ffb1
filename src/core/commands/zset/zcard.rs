// src/core/commands/zset/zcard.rs

use super::helpers::zset_of;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct ZCard {
    pub key: Bytes,
}

impl ParseCommand for ZCard {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 1 {
            return Err(ZirconError::WrongArgumentCount("ZCARD".to_string()));
        }
        Ok(ZCard {
            key: args[0].clone(),
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZCard {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_shard, guard) = ctx.get_single_shard_context_mut()?;
        let len = match guard.get(&self.key) {
            Some(entry) => zset_of(entry)?.len(),
            None => 0,
        };
        Ok((RespValue::Integer(len as i64), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZCard {
    fn name(&self) -> &'static str {
        "zcard"
    }
    fn arity(&self) -> i64 {
        2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
