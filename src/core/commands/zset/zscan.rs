// src/core/commands/zset/zscan.rs

use super::helpers::zset_of;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::protocol::format_double;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// Members returned per batch on the indexed encoding. A packed set is
/// always returned whole.
const SCAN_BATCH: usize = 20;

/// `ZSCAN key cursor`.
#[derive(Debug, Clone, Default)]
pub struct ZScan {
    pub key: Bytes,
    pub cursor: u64,
}

impl ParseCommand for ZScan {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 2 {
            return Err(ZirconError::WrongArgumentCount("ZSCAN".to_string()));
        }
        let cursor = extract_string(&args[1])?
            .parse()
            .map_err(|_| ZirconError::InvalidCursor)?;
        if args.len() > 2 {
            return Err(ZirconError::SyntaxError);
        }
        Ok(ZScan {
            key: args[0].clone(),
            cursor,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZScan {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_shard, guard) = ctx.get_single_shard_context_mut()?;
        let (next_cursor, entries) = match guard.get(&self.key) {
            Some(entry) => zset_of(entry)?.scan(self.cursor, SCAN_BATCH),
            None => (0, Vec::new()),
        };

        let mut items = Vec::with_capacity(entries.len() * 2);
        for (member, score) in entries {
            items.push(RespValue::BulkString(member));
            items.push(RespValue::BulkString(Bytes::from(format_double(score))));
        }
        let reply = RespValue::Array(vec![
            RespValue::BulkString(Bytes::from(next_cursor.to_string())),
            RespValue::Array(items),
        ]);
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZScan {
    fn name(&self) -> &'static str {
        "zscan"
    }
    fn arity(&self) -> i64 {
        -3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
