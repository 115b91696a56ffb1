// src/core/commands/zset/zrangebylex.rs

use super::helpers::{execute_range, parse_lex_bound};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{Interval, LexInterval, RangeParams, RangeSpec};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// `ZRANGEBYLEX key min max [LIMIT offset count]`. Offset and count are
/// parsed as two separate integers.
#[derive(Debug, Clone)]
pub struct ZRangeByLex {
    pub key: Bytes,
    pub spec: RangeSpec,
}

impl ParseCommand for ZRangeByLex {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 3 {
            return Err(ZirconError::WrongArgumentCount("ZRANGEBYLEX".to_string()));
        }
        let key = args[0].clone();
        let mut params = RangeParams::default();

        if args.len() > 3 {
            if args.len() != 6 || !extract_string(&args[3])?.eq_ignore_ascii_case("limit") {
                return Err(ZirconError::SyntaxError);
            }
            params.offset = extract_string(&args[4])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?;
            params.limit = extract_string(&args[5])?
                .parse()
                .map_err(|_| ZirconError::NotAnInteger)?;
        }

        let interval = LexInterval {
            first: parse_lex_bound(&args[1])?,
            second: parse_lex_bound(&args[2])?,
        };

        Ok(ZRangeByLex {
            key,
            spec: RangeSpec {
                interval: Interval::Lex(interval),
                params,
            },
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRangeByLex {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let reply = execute_range(ctx, &self.key, &self.spec)?;
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for ZRangeByLex {
    fn name(&self) -> &'static str {
        "zrangebylex"
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
