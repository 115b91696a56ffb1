// src/core/commands/mod.rs

//! Defines all supported commands and the central `Command` enum that
//! encapsulates their parsed state.

use crate::core::commands::command_trait::{
    CommandExt, CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

pub use command_spec::CommandSpec;

pub mod command_spec;
pub mod command_trait;
pub mod helpers;
pub mod zset;

/// Every command the engine understands, in parsed form.
#[derive(Debug, Clone)]
pub enum Command {
    Zadd(zset::Zadd),
    ZCard(zset::ZCard),
    ZCount(zset::ZCount),
    ZIncrBy(zset::ZIncrBy),
    ZInterStore(zset::ZInterStore),
    ZLexCount(zset::ZLexCount),
    ZRange(zset::ZRange),
    ZRangeByLex(zset::ZRangeByLex),
    ZRangeByScore(zset::ZRangeByScore),
    ZRank(zset::ZRank),
    ZRem(zset::ZRem),
    ZRemRangeByLex(zset::ZRemRangeByLex),
    ZRemRangeByRank(zset::ZRemRangeByRank),
    ZRemRangeByScore(zset::ZRemRangeByScore),
    ZRevRange(zset::ZRevRange),
    ZRevRangeByScore(zset::ZRevRangeByScore),
    ZRevRank(zset::ZRevRank),
    ZScan(zset::ZScan),
    ZScore(zset::ZScore),
    ZUnionStore(zset::ZUnionStore),
}

/// Applies one expression to whichever command struct the enum holds.
macro_rules! with_command {
    ($self:expr, $cmd:ident => $body:expr) => {
        match $self {
            Command::Zadd($cmd) => $body,
            Command::ZCard($cmd) => $body,
            Command::ZCount($cmd) => $body,
            Command::ZIncrBy($cmd) => $body,
            Command::ZInterStore($cmd) => $body,
            Command::ZLexCount($cmd) => $body,
            Command::ZRange($cmd) => $body,
            Command::ZRangeByLex($cmd) => $body,
            Command::ZRangeByScore($cmd) => $body,
            Command::ZRank($cmd) => $body,
            Command::ZRem($cmd) => $body,
            Command::ZRemRangeByLex($cmd) => $body,
            Command::ZRemRangeByRank($cmd) => $body,
            Command::ZRemRangeByScore($cmd) => $body,
            Command::ZRevRange($cmd) => $body,
            Command::ZRevRangeByScore($cmd) => $body,
            Command::ZRevRank($cmd) => $body,
            Command::ZScan($cmd) => $body,
            Command::ZScore($cmd) => $body,
            Command::ZUnionStore($cmd) => $body,
        }
    };
}

impl Command {
    /// Parses a pre-tokenized command line. `parts[0]` is the command name;
    /// the rest are its arguments.
    pub fn parse(parts: &[Bytes]) -> Result<Self, ZirconError> {
        let Some((name, args)) = parts.split_first() else {
            return Err(ZirconError::UnknownCommand(String::new()));
        };
        let name = helpers::extract_string(name)?.to_ascii_lowercase();
        match name.as_str() {
            "zadd" => Ok(Command::Zadd(zset::Zadd::parse(args)?)),
            "zcard" => Ok(Command::ZCard(zset::ZCard::parse(args)?)),
            "zcount" => Ok(Command::ZCount(zset::ZCount::parse(args)?)),
            "zincrby" => Ok(Command::ZIncrBy(zset::ZIncrBy::parse(args)?)),
            "zinterstore" => Ok(Command::ZInterStore(zset::ZInterStore::parse(args)?)),
            "zlexcount" => Ok(Command::ZLexCount(zset::ZLexCount::parse(args)?)),
            "zrange" => Ok(Command::ZRange(zset::ZRange::parse(args)?)),
            "zrangebylex" => Ok(Command::ZRangeByLex(zset::ZRangeByLex::parse(args)?)),
            "zrangebyscore" => Ok(Command::ZRangeByScore(zset::ZRangeByScore::parse(args)?)),
            "zrank" => Ok(Command::ZRank(zset::ZRank::parse(args)?)),
            "zrem" => Ok(Command::ZRem(zset::ZRem::parse(args)?)),
            "zremrangebylex" => Ok(Command::ZRemRangeByLex(zset::ZRemRangeByLex::parse(args)?)),
            "zremrangebyrank" => Ok(Command::ZRemRangeByRank(zset::ZRemRangeByRank::parse(args)?)),
            "zremrangebyscore" => {
                Ok(Command::ZRemRangeByScore(zset::ZRemRangeByScore::parse(args)?))
            }
            "zrevrange" => Ok(Command::ZRevRange(zset::ZRevRange::parse(args)?)),
            "zrevrangebyscore" => {
                Ok(Command::ZRevRangeByScore(zset::ZRevRangeByScore::parse(args)?))
            }
            "zrevrank" => Ok(Command::ZRevRank(zset::ZRevRank::parse(args)?)),
            "zscan" => Ok(Command::ZScan(zset::ZScan::parse(args)?)),
            "zscore" => Ok(Command::ZScore(zset::ZScore::parse(args)?)),
            "zunionstore" => Ok(Command::ZUnionStore(zset::ZUnionStore::parse(args)?)),
            _ => Err(ZirconError::UnknownCommand(name)),
        }
    }

    /// The command's lowercase wire name.
    pub fn name(&self) -> &'static str {
        with_command!(self, cmd => cmd.name())
    }

    /// The command's arity, counting the command name.
    pub fn arity(&self) -> i64 {
        with_command!(self, cmd => cmd.arity())
    }
}

#[async_trait]
impl CommandExt for Command {
    fn get_flags(&self) -> CommandFlags {
        with_command!(self, cmd => cmd.flags())
    }

    fn get_keys(&self) -> Vec<Bytes> {
        with_command!(self, cmd => CommandSpec::get_keys(cmd))
    }

    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        with_command!(self, cmd => cmd.execute(ctx).await)
    }
}
