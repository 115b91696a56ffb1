// src/core/commands/zset/helpers.rs

//! Shared parsing and execution helpers for the sorted-set commands.

use crate::core::commands::command_trait::WriteOutcome;
use crate::core::protocol::format_double;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::{DbShard, ExecutionContext};
use crate::core::storage::zset::{
    Action, LexBound, RangeSpec, ScoreBound, ScoredEntry, SortedSet,
};
use crate::core::{RespValue, ZirconError};
use bytes::Bytes;
use std::sync::Arc;

/// Parses a score range endpoint: `(` marks an open bound, `+inf`/`-inf`
/// are accepted verbatim, NaN never parses.
pub(super) fn parse_score_bound(s: &str) -> Result<ScoreBound, ZirconError> {
    let (is_open, rest) = match s.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = match rest {
        "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        _ => rest.parse::<f64>().map_err(|_| ZirconError::FloatRange)?,
    };
    if value.is_nan() {
        return Err(ZirconError::FloatRange);
    }
    Ok(ScoreBound { value, is_open })
}

/// Parses a lex range endpoint: `-`, `+`, `(member`, or `[member`.
pub(super) fn parse_lex_bound(arg: &Bytes) -> Result<LexBound, ZirconError> {
    match arg.as_ref() {
        b"-" => Ok(LexBound::MinusInf),
        b"+" => Ok(LexBound::PlusInf),
        [b'(', rest @ ..] => Ok(LexBound::Open(Bytes::copy_from_slice(rest))),
        [b'[', rest @ ..] => Ok(LexBound::Closed(Bytes::copy_from_slice(rest))),
        _ => Err(ZirconError::LexRange),
    }
}

/// Renders a scored entry list as a flat reply array.
pub(super) fn format_scored_array(entries: Vec<ScoredEntry>, with_scores: bool) -> RespValue {
    let mut response = Vec::with_capacity(entries.len() * if with_scores { 2 } else { 1 });
    for (member, score) in entries {
        response.push(RespValue::BulkString(member));
        if with_scores {
            response.push(RespValue::BulkString(Bytes::from(format_double(score))));
        }
    }
    RespValue::Array(response)
}

pub(super) fn zset_of(entry: &StoredValue) -> Result<&SortedSet, ZirconError> {
    match &entry.data {
        DataValue::SortedSet(zset) => Ok(zset),
        _ => Err(ZirconError::WrongType),
    }
}

pub(super) fn zset_of_mut(entry: &mut StoredValue) -> Result<&mut SortedSet, ZirconError> {
    match &mut entry.data {
        DataValue::SortedSet(zset) => Ok(zset),
        _ => Err(ZirconError::WrongType),
    }
}

/// Post-mutation bookkeeping: bump the version, refresh the size, and move
/// the shard memory counter by the delta.
pub(super) fn finish_mutation(shard: &Arc<DbShard>, entry: &mut StoredValue, old_mem: usize) {
    let new_mem = entry.data.memory_usage();
    entry.version = entry.version.wrapping_add(1);
    entry.size = new_mem;
    if new_mem > old_mem {
        shard.update_memory((new_mem - old_mem) as isize);
    } else {
        shard.update_memory(-((old_mem - new_mem) as isize));
    }
}

/// Runs a read-only range over the keyed set. An absent key yields an
/// empty array.
pub(super) fn execute_range(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    spec: &RangeSpec,
) -> Result<RespValue, ZirconError> {
    let (_shard, guard) = ctx.get_single_shard_context_mut()?;
    let Some(entry) = guard.get_mut(key) else {
        return Ok(RespValue::Array(vec![]));
    };
    let zset = zset_of_mut(entry)?;
    let result = zset.visit_range(spec, Action::Range);
    Ok(format_scored_array(result.entries, spec.params.with_scores))
}

/// Runs a range deletion over the keyed set, destroying the key when the
/// set empties out.
pub(super) fn execute_remove_range(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    spec: &RangeSpec,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let (shard, guard) = ctx.get_single_shard_context_mut()?;
    let Some(entry) = guard.get_mut(key) else {
        return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
    };
    let zset = zset_of_mut(entry)?;
    let old_mem = zset.memory_usage();
    let result = zset.visit_range(spec, Action::Remove);
    if result.removed == 0 {
        return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
    }
    let emptied = zset.is_empty();
    finish_mutation(shard, entry, old_mem);
    let outcome = if emptied {
        guard.pop(key);
        WriteOutcome::Delete { keys_deleted: 1 }
    } else {
        WriteOutcome::Write { keys_modified: 1 }
    };
    Ok((RespValue::Integer(i64::from(result.removed)), outcome))
}
