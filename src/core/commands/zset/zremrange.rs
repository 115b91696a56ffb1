// src/core/commands/zset/zremrange.rs

//! The `ZREMRANGEBYRANK` / `ZREMRANGEBYSCORE` / `ZREMRANGEBYLEX` family.
//! All three are the remove action of the range visitor behind different
//! interval parsers.

use super::helpers::{execute_remove_range, parse_lex_bound, parse_score_bound};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{
    IndexInterval, Interval, LexInterval, RangeParams, RangeSpec, ScoreInterval,
};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

fn remove_spec(interval: Interval) -> RangeSpec {
    RangeSpec {
        interval,
        params: RangeParams::default(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZRemRangeByRank {
    pub key: Bytes,
    pub interval: IndexInterval,
}

impl ParseCommand for ZRemRangeByRank {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount("ZREMRANGEBYRANK".to_string()));
        }
        let interval = IndexInterval {
            first: extract_string(&args[1])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?,
            second: extract_string(&args[2])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?,
        };
        Ok(ZRemRangeByRank {
            key: args[0].clone(),
            interval,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRemRangeByRank {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_remove_range(ctx, &self.key, &remove_spec(Interval::Rank(self.interval)))
    }
}

impl CommandSpec for ZRemRangeByRank {
    fn name(&self) -> &'static str {
        "zremrangebyrank"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZRemRangeByScore {
    pub key: Bytes,
    pub interval: ScoreInterval,
}

impl ParseCommand for ZRemRangeByScore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount(
                "ZREMRANGEBYSCORE".to_string(),
            ));
        }
        let interval = ScoreInterval {
            first: parse_score_bound(&extract_string(&args[1])?)?,
            second: parse_score_bound(&extract_string(&args[2])?)?,
        };
        Ok(ZRemRangeByScore {
            key: args[0].clone(),
            interval,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRemRangeByScore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_remove_range(ctx, &self.key, &remove_spec(Interval::Score(self.interval)))
    }
}

impl CommandSpec for ZRemRangeByScore {
    fn name(&self) -> &'static str {
        "zremrangebyscore"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZRemRangeByLex {
    pub key: Bytes,
    pub interval: LexInterval,
}

impl ParseCommand for ZRemRangeByLex {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() != 3 {
            return Err(ZirconError::WrongArgumentCount("ZREMRANGEBYLEX".to_string()));
        }
        let interval = LexInterval {
            first: parse_lex_bound(&args[1])?,
            second: parse_lex_bound(&args[2])?,
        };
        Ok(ZRemRangeByLex {
            key: args[0].clone(),
            interval,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRemRangeByLex {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_remove_range(
            ctx,
            &self.key,
            &remove_spec(Interval::Lex(self.interval.clone())),
        )
    }
}

impl CommandSpec for ZRemRangeByLex {
    fn name(&self) -> &'static str {
        "zremrangebylex"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
