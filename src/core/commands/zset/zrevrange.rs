// src/core/commands/zset/zrevrange.rs

use super::helpers::execute_range;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{IndexInterval, Interval, RangeParams, RangeSpec};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// `ZREVRANGE key start stop [WITHSCORES]`: a rank range walked from the
/// tail.
#[derive(Debug, Clone)]
pub struct ZRevRange {
    pub key: Bytes,
    pub spec: RangeSpec,
}

impl ParseCommand for ZRevRange {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 3 {
            return Err(ZirconError::WrongArgumentCount("ZREVRANGE".to_string()));
        }
        let key = args[0].clone();
        let first: i32 = extract_string(&args[1])?
            .parse()
            .map_err(|_| ZirconError::NotAnInteger)?;
        let second: i32 = extract_string(&args[2])?
            .parse()
            .map_err(|_| ZirconError::NotAnInteger)?;

        let mut params = RangeParams {
            reverse: true,
            ..Default::default()
        };
        for arg in &args[3..] {
            if extract_string(arg)?.eq_ignore_ascii_case("withscores") {
                params.with_scores = true;
            } else {
                return Err(ZirconError::SyntaxError);
            }
        }

        Ok(ZRevRange {
            key,
            spec: RangeSpec {
                interval: Interval::Rank(IndexInterval { first, second }),
                params,
            },
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRevRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let reply = execute_range(ctx, &self.key, &self.spec)?;
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZRevRange {
    fn name(&self) -> &'static str {
        "zrevrange"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
