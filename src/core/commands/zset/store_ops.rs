// src/core/commands/zset/store_ops.rs

//! `ZUNIONSTORE` / `ZINTERSTORE`: cross-shard aggregation.
//!
//! Execution runs in two phases under one exclusive hold on every involved
//! shard. Phase 1 materializes a partial scored map per shard from that
//! shard's slice of the input keys; phase 2 merges the partials and
//! replaces the destination key under its own shard's guard. No set is
//! mutated between the phases.

use super::helpers::zset_of;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{AddParams, SortedSet};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// The aggregation function combining scores of a shared member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    #[default]
    Sum,
    Min,
    Max,
}

impl Aggregate {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Aggregate::Sum => a + b,
            Aggregate::Min => a.min(b),
            Aggregate::Max => a.max(b),
        }
    }
}

/// member → weighted, aggregated score.
type ScoredMap = HashMap<Bytes, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreKind {
    Union,
    Inter,
}

/// The parsed shape shared by both store commands.
#[derive(Debug, Clone, Default)]
pub struct StoreArgs {
    pub destination: Bytes,
    pub keys: Vec<Bytes>,
    pub weights: Vec<f64>,
    pub aggregate: Aggregate,
}

fn parse_store_args(args: &[Bytes], name: &'static str) -> Result<StoreArgs, ZirconError> {
    if args.len() < 2 {
        return Err(ZirconError::WrongArgumentCount(name.to_string()));
    }
    let destination = args[0].clone();
    let num_keys: usize = extract_string(&args[1])?
        .parse()
        .map_err(|_| ZirconError::NotAnInteger)?;
    if num_keys == 0 {
        return Err(ZirconError::AtLeastOneKey(name.to_ascii_lowercase()));
    }
    if args.len() < 2 + num_keys {
        return Err(ZirconError::SyntaxError);
    }
    let keys: Vec<Bytes> = args[2..2 + num_keys].to_vec();

    let mut weights = vec![1.0; num_keys];
    let mut aggregate = Aggregate::Sum;
    let mut i = 2 + num_keys;
    while i < args.len() {
        let option = extract_string(&args[i])?.to_ascii_lowercase();
        match option.as_str() {
            "weights" => {
                i += 1;
                if args.len() < i + num_keys {
                    return Err(ZirconError::SyntaxError);
                }
                for (slot, arg) in weights.iter_mut().zip(&args[i..i + num_keys]) {
                    *slot = extract_string(arg)?
                        .parse()
                        .map_err(|_| ZirconError::WeightNotAFloat)?;
                }
                i += num_keys;
            }
            "aggregate" => {
                i += 1;
                if i >= args.len() {
                    return Err(ZirconError::SyntaxError);
                }
                aggregate = match extract_string(&args[i])?.to_ascii_lowercase().as_str() {
                    "sum" => Aggregate::Sum,
                    "min" => Aggregate::Min,
                    "max" => Aggregate::Max,
                    _ => return Err(ZirconError::SyntaxError),
                };
                i += 1;
            }
            _ => return Err(ZirconError::SyntaxError),
        }
    }

    Ok(StoreArgs {
        destination,
        keys,
        weights,
        aggregate,
    })
}

/// Materializes one input set as member → weight × score. A product that
/// is NaN (e.g. 0 × ±inf) drops that member; the command itself succeeds.
fn materialize(zset: &SortedSet, weight: f64) -> ScoredMap {
    let mut map = ScoredMap::with_capacity(zset.len());
    for (member, score) in zset.entries() {
        let weighted = score * weight;
        if weighted.is_nan() {
            continue;
        }
        map.insert(member, weighted);
    }
    map
}

fn union_into(dest: &mut ScoredMap, src: ScoredMap, aggregate: Aggregate) {
    for (member, score) in src {
        dest.entry(member)
            .and_modify(|s| *s = aggregate.apply(*s, score))
            .or_insert(score);
    }
}

fn inter_into(dest: &mut ScoredMap, src: &ScoredMap, aggregate: Aggregate) {
    dest.retain(|member, score| match src.get(member) {
        Some(other) => {
            *score = aggregate.apply(*score, *other);
            true
        }
        None => false,
    });
}

/// Runs both phases. `ctx` must hold the multi-shard locks covering the
/// destination and every input key.
fn execute_store(
    ctx: &mut ExecutionContext<'_>,
    args: &StoreArgs,
    kind: StoreKind,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let limits = ctx.db.zset_limits;
    let dest_shard_index = ctx.db.get_shard_index(&args.destination);

    // Each input key belongs to exactly one shard; the destination is
    // never an input.
    let mut inputs_by_shard: BTreeMap<usize, Vec<(&Bytes, f64)>> = BTreeMap::new();
    for (key, weight) in args.keys.iter().zip(&args.weights) {
        inputs_by_shard
            .entry(ctx.db.get_shard_index(key))
            .or_default()
            .push((key, *weight));
    }

    let guards = ctx.get_multi_shard_guards()?;

    // Phase 1: one partial map per shard holding input keys. For an
    // intersection, an absent input key collapses the shard's partial to
    // an empty map, which the merge below short-circuits on.
    let mut partials: Vec<ScoredMap> = Vec::with_capacity(inputs_by_shard.len());
    for (shard_index, inputs) in &inputs_by_shard {
        let guard = guards.get_mut(shard_index).ok_or_else(|| {
            ZirconError::LockingError("Missing shard lock for store operation".into())
        })?;
        let mut partial: Option<ScoredMap> = None;
        for &(key, weight) in inputs {
            let map = match guard.get(key) {
                Some(entry) => Some(materialize(zset_of(entry)?, weight)),
                None => match kind {
                    StoreKind::Union => None,
                    StoreKind::Inter => Some(ScoredMap::new()),
                },
            };
            let Some(map) = map else { continue };
            partial = Some(match partial.take() {
                None => map,
                Some(mut acc) => {
                    match kind {
                        StoreKind::Union => union_into(&mut acc, map, args.aggregate),
                        StoreKind::Inter => inter_into(&mut acc, &map, args.aggregate),
                    }
                    acc
                }
            });
            if kind == StoreKind::Inter && partial.as_ref().is_some_and(|p| p.is_empty()) {
                break;
            }
        }
        if let Some(partial) = partial {
            partials.push(partial);
        } else if kind == StoreKind::Inter && !inputs.is_empty() {
            // All of this shard's inputs were absent.
            partials.push(ScoredMap::new());
        }
    }
    debug!(
        shards = inputs_by_shard.len(),
        partials = partials.len(),
        "store operation phase 1 complete"
    );

    // Phase 2: global merge, then write-back on the destination shard.
    let mut merged = ScoredMap::new();
    for partial in partials {
        match kind {
            StoreKind::Union => union_into(&mut merged, partial, args.aggregate),
            StoreKind::Inter => {
                if merged.is_empty() {
                    merged = partial;
                } else {
                    inter_into(&mut merged, &partial, args.aggregate);
                }
                if merged.is_empty() {
                    break;
                }
            }
        }
    }

    let dest_guard = guards.get_mut(&dest_shard_index).ok_or_else(|| {
        ZirconError::LockingError("Missing destination shard lock for store operation".into())
    })?;

    let written = merged.len();
    if written == 0 {
        let existed = dest_guard.pop(&args.destination).is_some();
        let outcome = if existed {
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::DidNotWrite
        };
        return Ok((RespValue::Integer(0), outcome));
    }

    let mut result = SortedSet::new(limits);
    for (member, score) in merged {
        result.add(score, &member, &AddParams::default());
    }
    dest_guard.put(
        args.destination.clone(),
        StoredValue::new(DataValue::SortedSet(result)),
    );

    Ok((
        RespValue::Integer(written as i64),
        WriteOutcome::Write { keys_modified: 1 },
    ))
}

#[derive(Debug, Clone, Default)]
pub struct ZUnionStore {
    pub args: StoreArgs,
}

impl ParseCommand for ZUnionStore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        Ok(ZUnionStore {
            args: parse_store_args(args, "ZUNIONSTORE")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZUnionStore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_store(ctx, &self.args, StoreKind::Union)
    }
}

impl CommandSpec for ZUnionStore {
    fn name(&self) -> &'static str {
        "zunionstore"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::VARIADIC_KEYS
    }
    fn get_keys(&self) -> Vec<Bytes> {
        let mut all_keys = vec![self.args.destination.clone()];
        all_keys.extend_from_slice(&self.args.keys);
        all_keys
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZInterStore {
    pub args: StoreArgs,
}

impl ParseCommand for ZInterStore {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        Ok(ZInterStore {
            args: parse_store_args(args, "ZINTERSTORE")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZInterStore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        execute_store(ctx, &self.args, StoreKind::Inter)
    }
}

impl CommandSpec for ZInterStore {
    fn name(&self) -> &'static str {
        "zinterstore"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::VARIADIC_KEYS
    }
    fn get_keys(&self) -> Vec<Bytes> {
        let mut all_keys = vec![self.args.destination.clone()];
        all_keys.extend_from_slice(&self.args.keys);
        all_keys
    }
}
