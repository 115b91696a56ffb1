// src/core/storage/zset/mod.rs

//! The sorted-set value type: a collection of unique byte-string members,
//! each carrying a non-NaN double score, ordered by (score, member).
//!
//! A set lives in one of two encodings. Small sets use the packed byte
//! buffer; a set promotes to the skiplist-backed indexed encoding the moment
//! an insertion would push it past the configured entry count or member
//! length limits. Promotion is one-way.

pub mod packed;
pub mod range;
pub mod skiplist;

pub use packed::PackedZSet;
pub use range::{
    Action, IndexInterval, Interval, LexBound, LexInterval, NO_LIMIT, RangeParams, RangeResult,
    RangeSpec, ScoreBound, ScoreInterval, ScoredEntry,
};
pub use skiplist::IndexedZSet;

use crate::config::SortedSetConfig;
use crate::core::ZirconError;
use bytes::{Buf, BufMut, Bytes};
use range::{LexRange, ScoreRange};
use tracing::debug;

/// Encoding thresholds carried by every set. Copied out of the engine
/// configuration when the set is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZsetLimits {
    pub max_packed_entries: usize,
    pub max_packed_value: usize,
}

impl Default for ZsetLimits {
    fn default() -> Self {
        Self {
            max_packed_entries: 128,
            max_packed_value: 64,
        }
    }
}

impl ZsetLimits {
    /// The effective member-length limit for the packed encoding. Entry
    /// headers store member lengths as u16, so a larger configured value
    /// cannot be honored.
    fn packed_value_cap(&self) -> usize {
        self.max_packed_value.min(u16::MAX as usize)
    }
}

impl From<&SortedSetConfig> for ZsetLimits {
    fn from(config: &SortedSetConfig) -> Self {
        Self {
            max_packed_entries: config.max_packed_entries,
            // Packed entry headers carry member lengths as u16; a larger
            // configured limit is clamped.
            max_packed_value: config.max_packed_value.min(u16::MAX as usize),
        }
    }
}

/// Existence condition for an add (`NX` / `XX`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AddCondition {
    #[default]
    None,
    IfNotExists,
    IfExists,
}

/// Score comparison rule for updates (`GT` / `LT`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UpdateRule {
    #[default]
    None,
    GreaterThan,
    LessThan,
}

/// Per-pair add behavior. `CH` is a reporting concern and lives with the
/// command layer, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddParams {
    pub condition: AddCondition,
    pub rule: UpdateRule,
    pub incr: bool,
}

/// Outcome of a single add. The score-carrying variants report the member's
/// score after the call so `INCR` can reply with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddOutcome {
    Added(f64),
    Updated(f64),
    /// Member already held exactly this score; nothing changed.
    Unchanged(f64),
    /// A flag condition blocked the operation.
    Skipped,
    /// The increment produced NaN; the set was not modified.
    Nan,
}

const ENCODING_PACKED: u8 = 0;
const ENCODING_INDEXED: u8 = 1;

#[derive(Debug, Clone)]
pub(crate) enum Encoding {
    Packed(PackedZSet),
    Indexed(IndexedZSet),
}

/// A sorted set behind one of the two encodings.
#[derive(Debug, Clone)]
pub struct SortedSet {
    pub(crate) enc: Encoding,
    limits: ZsetLimits,
}

impl Default for SortedSet {
    fn default() -> Self {
        Self::new(ZsetLimits::default())
    }
}

impl SortedSet {
    pub fn new(limits: ZsetLimits) -> Self {
        Self {
            enc: Encoding::Packed(PackedZSet::new()),
            limits,
        }
    }

    /// Picks the initial encoding from the first member's length, the way a
    /// set is created on first insert.
    pub fn for_first_member(member_len: usize, limits: ZsetLimits) -> Self {
        let enc = if member_len > limits.packed_value_cap() {
            Encoding::Indexed(IndexedZSet::new())
        } else {
            Encoding::Packed(PackedZSet::new())
        };
        Self { enc, limits }
    }

    pub fn len(&self) -> usize {
        match &self.enc {
            Encoding::Packed(p) => p.len(),
            Encoding::Indexed(z) => z.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_packed(&self) -> bool {
        matches!(self.enc, Encoding::Packed(_))
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        match &self.enc {
            Encoding::Packed(p) => p.find_member(member),
            Encoding::Indexed(z) => z.score(member),
        }
    }

    /// Adds or updates one member under the given flag semantics.
    pub fn add(&mut self, score: f64, member: &Bytes, params: &AddParams) -> AddOutcome {
        match self.score(member) {
            Some(current) => {
                if params.condition == AddCondition::IfNotExists {
                    return AddOutcome::Skipped;
                }
                let new_score = if params.incr { current + score } else { score };
                if new_score.is_nan() {
                    return AddOutcome::Nan;
                }
                let blocked = match params.rule {
                    UpdateRule::GreaterThan => new_score <= current,
                    UpdateRule::LessThan => new_score >= current,
                    UpdateRule::None => false,
                };
                if blocked {
                    return AddOutcome::Skipped;
                }
                if new_score == current {
                    return AddOutcome::Unchanged(new_score);
                }
                match &mut self.enc {
                    Encoding::Packed(p) => {
                        p.remove(member);
                        p.insert(new_score, member);
                    }
                    Encoding::Indexed(z) => z.update(current, new_score, member),
                }
                AddOutcome::Updated(new_score)
            }
            None => {
                if params.condition == AddCondition::IfExists {
                    return AddOutcome::Skipped;
                }
                // An increment of a missing member starts from zero.
                self.promote_if_needed(member.len());
                match &mut self.enc {
                    Encoding::Packed(p) => p.insert(score, member),
                    Encoding::Indexed(z) => z.insert(score, member.clone()),
                }
                AddOutcome::Added(score)
            }
        }
    }

    /// Converts a packed set to the indexed encoding when an insertion would
    /// overflow either packed limit. No back-conversion exists.
    fn promote_if_needed(&mut self, incoming_member_len: usize) {
        let Encoding::Packed(p) = &self.enc else {
            return;
        };
        if p.len() + 1 <= self.limits.max_packed_entries
            && incoming_member_len <= self.limits.packed_value_cap()
        {
            return;
        }
        debug!(
            entries = p.len(),
            member_len = incoming_member_len,
            "promoting sorted set to indexed encoding"
        );
        let mut indexed = IndexedZSet::new();
        for (member, score) in p.entries() {
            indexed.insert(score, member);
        }
        self.enc = Encoding::Indexed(indexed);
    }

    pub fn remove(&mut self, member: &[u8]) -> bool {
        match &mut self.enc {
            Encoding::Packed(p) => p.remove(member),
            Encoding::Indexed(z) => z.remove(member),
        }
    }

    /// 0-based rank in forward or reverse iteration order.
    pub fn rank(&self, member: &[u8], reverse: bool) -> Option<usize> {
        let forward = match &self.enc {
            Encoding::Packed(p) => p.rank_of(member)?,
            Encoding::Indexed(z) => z.rank_of(member)?,
        };
        Some(if reverse {
            self.len() - 1 - forward
        } else {
            forward
        })
    }

    /// Number of members whose score falls inside the interval. Uses rank
    /// arithmetic on the indexed encoding and a linear scan on the packed.
    pub fn count_score_range(&self, interval: &ScoreInterval) -> usize {
        let range = ScoreRange::new(false, interval);
        match &self.enc {
            Encoding::Packed(p) => p.count_score_range(&range),
            Encoding::Indexed(z) => z.count_score_range(&range),
        }
    }

    pub fn count_lex_range(&self, interval: &LexInterval) -> usize {
        let range = LexRange::new(false, interval);
        match &self.enc {
            Encoding::Packed(p) => p.count_lex_range(&range),
            Encoding::Indexed(z) => z.count_lex_range(&range),
        }
    }

    /// All entries in iteration order.
    pub fn entries(&self) -> Vec<ScoredEntry> {
        match &self.enc {
            Encoding::Packed(p) => p.entries(),
            Encoding::Indexed(z) => z.entries(),
        }
    }

    /// One ZSCAN batch. A packed set is returned whole with the cursor
    /// reset; an indexed set is walked through its hash index in bounded
    /// batches until the cursor wraps to zero.
    pub fn scan(&self, cursor: u64, batch: usize) -> (u64, Vec<ScoredEntry>) {
        match &self.enc {
            Encoding::Packed(p) => (0, p.entries()),
            Encoding::Indexed(z) => z.scan(cursor, batch),
        }
    }

    pub fn memory_usage(&self) -> usize {
        match &self.enc {
            Encoding::Packed(p) => p.memory_usage(),
            Encoding::Indexed(z) => z.memory_usage(),
        }
    }

    /// Serializes the set into `buf`: an encoding tag byte, a big-endian
    /// entry count, then (member length, member bytes, score bits) per entry
    /// in iteration order. Both encodings share the pair layout.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_u8(match self.enc {
            Encoding::Packed(_) => ENCODING_PACKED,
            Encoding::Indexed(_) => ENCODING_INDEXED,
        });
        buf.put_u32(self.len() as u32);
        for (member, score) in self.entries() {
            buf.put_u32(member.len() as u32);
            buf.put_slice(&member);
            buf.put_u64(score.to_bits());
        }
    }

    /// Rebuilds a set from its serialized form. The live encoding is chosen
    /// by the decoded content against `limits`, not by the stored tag.
    pub fn decode(mut data: &[u8], limits: ZsetLimits) -> Result<Self, ZirconError> {
        if data.remaining() < 5 {
            return Err(ZirconError::Persistence(
                "sorted set payload truncated".into(),
            ));
        }
        let tag = data.get_u8();
        if tag != ENCODING_PACKED && tag != ENCODING_INDEXED {
            return Err(ZirconError::Persistence(format!(
                "unknown sorted set encoding tag {tag}"
            )));
        }
        let len = data.get_u32() as usize;
        let mut set = Self::new(limits);
        for _ in 0..len {
            if data.remaining() < 4 {
                return Err(ZirconError::Persistence(
                    "sorted set entry truncated".into(),
                ));
            }
            let member_len = data.get_u32() as usize;
            if data.remaining() < member_len + 8 {
                return Err(ZirconError::Persistence(
                    "sorted set entry truncated".into(),
                ));
            }
            let member = data.copy_to_bytes(member_len);
            let score = f64::from_bits(data.get_u64());
            if score.is_nan() {
                return Err(ZirconError::Persistence(
                    "sorted set entry carries a NaN score".into(),
                ));
            }
            set.add(score, &member, &AddParams::default());
        }
        Ok(set)
    }
}
