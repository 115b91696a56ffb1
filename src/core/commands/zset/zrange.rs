// src/core/commands/zset/zrange.rs

use super::helpers::{execute_range, parse_score_bound};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{
    IndexInterval, Interval, RangeParams, RangeSpec, ScoreInterval,
};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// `ZRANGE key start stop [BYSCORE] [WITHSCORES]`. Without `BYSCORE` the
/// bounds are signed rank indices.
#[derive(Debug, Clone)]
pub struct ZRange {
    pub key: Bytes,
    pub spec: RangeSpec,
}

impl ParseCommand for ZRange {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 3 {
            return Err(ZirconError::WrongArgumentCount("ZRANGE".to_string()));
        }
        let key = args[0].clone();
        let min_arg = extract_string(&args[1])?;
        let max_arg = extract_string(&args[2])?;

        let mut by_score = false;
        let mut params = RangeParams::default();
        for arg in &args[3..] {
            let token = extract_string(arg)?;
            if token.eq_ignore_ascii_case("byscore") {
                by_score = true;
            } else if token.eq_ignore_ascii_case("withscores") {
                params.with_scores = true;
            } else {
                return Err(ZirconError::SyntaxError);
            }
        }

        let interval = if by_score {
            Interval::Score(ScoreInterval {
                first: parse_score_bound(&min_arg)?,
                second: parse_score_bound(&max_arg)?,
            })
        } else {
            Interval::Rank(IndexInterval {
                first: min_arg.parse().map_err(|_| ZirconError::NotAnInteger)?,
                second: max_arg.parse().map_err(|_| ZirconError::NotAnInteger)?,
            })
        };

        Ok(ZRange {
            key,
            spec: RangeSpec { interval, params },
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let reply = execute_range(ctx, &self.key, &self.spec)?;
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZRange {
    fn name(&self) -> &'static str {
        "zrange"
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
