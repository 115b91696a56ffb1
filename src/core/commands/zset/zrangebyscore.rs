// src/core/commands/zset/zrangebyscore.rs

use super::helpers::{execute_range, parse_score_bound};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{Interval, RangeParams, RangeSpec, ScoreInterval};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// Parses the trailing `[WITHSCORES] [LIMIT offset count]` clause shared by
/// the score range commands. Offset and count are two separate integers; a
/// count of `u32::MAX` means unbounded.
fn parse_score_range_options(args: &[Bytes], params: &mut RangeParams) -> Result<(), ZirconError> {
    let mut i = 0;
    while i < args.len() {
        let token = extract_string(&args[i])?;
        if token.eq_ignore_ascii_case("withscores") {
            params.with_scores = true;
            i += 1;
        } else if token.eq_ignore_ascii_case("limit") {
            if i + 3 != args.len() {
                return Err(ZirconError::SyntaxError);
            }
            params.offset = extract_string(&args[i + 1])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?;
            params.limit = extract_string(&args[i + 2])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?;
            i += 3;
        } else {
            return Err(ZirconError::SyntaxError);
        }
    }
    Ok(())
}

fn parse_score_range_command(
    args: &[Bytes],
    name: &str,
    reverse: bool,
) -> Result<(Bytes, RangeSpec), ZirconError> {
    if args.len() < 3 {
        return Err(ZirconError::WrongArgumentCount(name.to_string()));
    }
    let key = args[0].clone();
    // The reverse variant receives max first and min second; the visitor
    // swaps the endpoints when it builds the directed range.
    let interval = ScoreInterval {
        first: parse_score_bound(&extract_string(&args[1])?)?,
        second: parse_score_bound(&extract_string(&args[2])?)?,
    };
    let mut params = RangeParams {
        reverse,
        ..Default::default()
    };
    parse_score_range_options(&args[3..], &mut params)?;
    Ok((
        key,
        RangeSpec {
            interval: Interval::Score(interval),
            params,
        },
    ))
}

/// `ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]`.
#[derive(Debug, Clone)]
pub struct ZRangeByScore {
    pub key: Bytes,
    pub spec: RangeSpec,
}

impl ParseCommand for ZRangeByScore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        let (key, spec) = parse_score_range_command(args, "ZRANGEBYSCORE", false)?;
        Ok(ZRangeByScore { key, spec })
    }
}

#[async_trait]
impl ExecutableCommand for ZRangeByScore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let reply = execute_range(ctx, &self.key, &self.spec)?;
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZRangeByScore {
    fn name(&self) -> &'static str {
        "zrangebyscore"
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

/// `ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]`.
#[derive(Debug, Clone)]
pub struct ZRevRangeByScore {
    pub key: Bytes,
    pub spec: RangeSpec,
}

impl ParseCommand for ZRevRangeByScore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        let (key, spec) = parse_score_range_command(args, "ZREVRANGEBYSCORE", true)?;
        Ok(ZRevRangeByScore { key, spec })
    }
}

#[async_trait]
impl ExecutableCommand for ZRevRangeByScore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let reply = execute_range(ctx, &self.key, &self.spec)?;
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZRevRangeByScore {
    fn name(&self) -> &'static str {
        "zrevrangebyscore"
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
