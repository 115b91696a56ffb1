// src/core/commands/zset/zadd.rs

use super::helpers::{finish_mutation, zset_of_mut};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_string, parse_score};
use crate::core::protocol::format_double;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::{AddCondition, AddOutcome, AddParams, SortedSet, UpdateRule};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

/// The `ZADD` command with all of its option flags.
#[derive(Debug, Clone, Default)]
pub struct Zadd {
    pub key: Bytes,
    pub members: Vec<(f64, Bytes)>,
    pub condition: AddCondition,
    pub rule: UpdateRule,
    pub ch: bool,
    pub incr: bool,
}

impl ParseCommand for Zadd {
    fn parse(args: &[Bytes]) -> Result<Self, ZirconError> {
        if args.len() < 3 {
            return Err(ZirconError::WrongArgumentCount("ZADD".to_string()));
        }

        let key = args[0].clone();
        let mut i = 1;
        let mut nx = false;
        let mut xx = false;
        let mut gt = false;
        let mut lt = false;
        let mut ch = false;
        let mut incr = false;

        // Flags come first; the first token that is not a flag starts the
        // (score, member) pair list.
        while i < args.len() {
            let Ok(flag) = extract_string(&args[i]) else {
                break;
            };
            match flag.to_ascii_lowercase().as_str() {
                "nx" => nx = true,
                "xx" => xx = true,
                "gt" => gt = true,
                "lt" => lt = true,
                "ch" => ch = true,
                "incr" => incr = true,
                _ => break,
            }
            i += 1;
        }

        if (i >= args.len()) || (args.len() - i) % 2 != 0 {
            return Err(ZirconError::SyntaxError);
        }
        if incr && args.len() - i != 2 {
            return Err(ZirconError::IncrSinglePair);
        }
        if nx && xx {
            return Err(ZirconError::NxAndXx);
        }
        if (nx && (gt || lt)) || (gt && lt) {
            return Err(ZirconError::GtLtNx);
        }

        let condition = if nx {
            AddCondition::IfNotExists
        } else if xx {
            AddCondition::IfExists
        } else {
            AddCondition::None
        };
        let rule = if gt {
            UpdateRule::GreaterThan
        } else if lt {
            UpdateRule::LessThan
        } else {
            UpdateRule::None
        };

        let members = args[i..]
            .chunks_exact(2)
            .map(|chunk| -> Result<(f64, Bytes), ZirconError> {
                let score_str = extract_string(&chunk[0])?;
                let score = parse_score(&score_str)?;
                Ok((score, chunk[1].clone()))
            })
            .collect::<Result<_, _>>()?;

        Ok(Zadd {
            key,
            members,
            condition,
            rule,
            ch,
            incr,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Zadd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        ctx.check_memory_pressure(self.flags())?;
        let limits = ctx.db.zset_limits;
        let (shard, guard) = ctx.get_single_shard_context_mut()?;

        // XX never creates the key.
        if self.condition == AddCondition::IfExists && guard.get(&self.key).is_none() {
            let reply = if self.incr {
                RespValue::Null
            } else {
                RespValue::Integer(0)
            };
            return Ok((reply, WriteOutcome::DidNotWrite));
        }

        let first_member_len = self.members.first().map_or(0, |(_, m)| m.len());
        let entry = guard.get_or_insert_with_mut(self.key.clone(), || {
            StoredValue::new(DataValue::SortedSet(SortedSet::for_first_member(
                first_member_len,
                limits,
            )))
        });
        let zset = zset_of_mut(entry)?;

        let params = AddParams {
            condition: self.condition,
            rule: self.rule,
            incr: self.incr,
        };

        let old_mem = zset.memory_usage();
        let mut added = 0i64;
        let mut updated = 0i64;
        let mut incr_outcome = AddOutcome::Skipped;

        for (score, member) in &self.members {
            let outcome = zset.add(*score, member, &params);
            match outcome {
                AddOutcome::Added(_) => added += 1,
                AddOutcome::Updated(_) => updated += 1,
                AddOutcome::Unchanged(_) | AddOutcome::Skipped => {}
                AddOutcome::Nan => {
                    // The set was not modified by this pair; surface the
                    // error without committing any bookkeeping for it.
                    if self.incr {
                        return Err(ZirconError::NanScore);
                    }
                }
            }
            if self.incr {
                incr_outcome = outcome;
            }
        }

        let changed = added + updated;
        let outcome = if changed > 0 {
            finish_mutation(shard, entry, old_mem);
            WriteOutcome::Write { keys_modified: 1 }
        } else {
            WriteOutcome::DidNotWrite
        };

        let reply = if self.incr {
            match incr_outcome {
                AddOutcome::Added(score)
                | AddOutcome::Updated(score)
                | AddOutcome::Unchanged(score) => {
                    RespValue::BulkString(Bytes::from(format_double(score)))
                }
                AddOutcome::Skipped => RespValue::Null,
                AddOutcome::Nan => return Err(ZirconError::NanScore),
            }
        } else if self.ch {
            RespValue::Integer(changed)
        } else {
            RespValue::Integer(added)
        };

        Ok((reply, outcome))
    }
}

impl CommandSpec for Zadd {
    fn name(&self) -> &'static str {
        "zadd"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::DENY_OOM | CommandFlags::FAST
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
