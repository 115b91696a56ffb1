// src/core/commands/zset/zscore.rs

use super::helpers::zset_of;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::protocol::format_double;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct ZScore {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for ZScore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 2 {
            return Err(ZirconError::WrongArgumentCount("ZSCORE".to_string()));
        }
        Ok(ZScore {
            key: args[0].clone(),
            member: args[1].clone(),
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZScore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_shard, guard) = ctx.get_single_shard_context_mut()?;
        let reply = match guard.get(&self.key) {
            Some(entry) => match zset_of(entry)?.score(&self.member) {
                Some(score) => RespValue::BulkString(Bytes::from(format_double(score))),
                None => RespValue::Null,
            },
            None => RespValue::Null,
        };
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZScore {
    fn name(&self) -> &'static str {
        "zscore"
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
