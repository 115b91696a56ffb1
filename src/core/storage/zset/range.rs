// src/core/storage/zset/range.rs

//! Range specifications and the interval visitor.
//!
//! The visitor is the single code path behind every rank, score, and
//! lexicographic scan: it dispatches on the interval kind, the action
//! (collect or delete), the iteration direction, and the live encoding.

use super::{Encoding, SortedSet};
use bytes::Bytes;

/// One endpoint of a score range. `value` may be infinite; NaN never
/// occurs here (the bound parsers reject it).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBound {
    pub value: f64,
    pub is_open: bool,
}

impl ScoreBound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            is_open: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            is_open: true,
        }
    }
}

/// A score range in command argument order. For reverse scans callers pass
/// the high bound first; the visitor swaps the endpoints internally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreInterval {
    pub first: ScoreBound,
    pub second: ScoreBound,
}

/// One endpoint of a lexicographic range over raw member bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexBound {
    #[default]
    MinusInf,
    PlusInf,
    Open(Bytes),
    Closed(Bytes),
}

/// A lexicographic range in command argument order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexInterval {
    pub first: LexBound,
    pub second: LexBound,
}

/// A rank range; negative indices count from the tail (`-1` is the last
/// element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexInterval {
    pub first: i32,
    pub second: i32,
}

/// The three interval kinds a range operation can be driven by.
#[derive(Debug, Clone, PartialEq)]
pub enum Interval {
    Rank(IndexInterval),
    Score(ScoreInterval),
    Lex(LexInterval),
}

/// Sentinel for "no limit" in [`RangeParams::limit`].
pub const NO_LIMIT: u32 = u32::MAX;

/// Shared parameters of a range operation. `offset` and `limit` only apply
/// to score and lex intervals; rank intervals ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParams {
    pub reverse: bool,
    pub with_scores: bool,
    pub offset: u32,
    pub limit: u32,
}

impl Default for RangeParams {
    fn default() -> Self {
        Self {
            reverse: false,
            with_scores: false,
            offset: 0,
            limit: NO_LIMIT,
        }
    }
}

/// What the visitor does with the matching elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Range,
    Remove,
}

/// A fully specified range operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSpec {
    pub interval: Interval,
    pub params: RangeParams,
}

/// A single (member, score) pair produced by a range scan.
pub type ScoredEntry = (Bytes, f64);

/// Result of a visitor pass: collected entries for [`Action::Range`], or
/// the number of elements deleted for [`Action::Remove`].
#[derive(Debug, Default)]
pub struct RangeResult {
    pub entries: Vec<ScoredEntry>,
    pub removed: u32,
}

/// A score range normalized to absolute low/high ends, independent of the
/// iteration direction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub minex: bool,
    pub maxex: bool,
}

impl ScoreRange {
    pub(crate) fn new(reverse: bool, interval: &ScoreInterval) -> Self {
        let (lo, hi) = if reverse {
            (interval.second, interval.first)
        } else {
            (interval.first, interval.second)
        };
        Self {
            min: lo.value,
            max: hi.value,
            minex: lo.is_open,
            maxex: hi.is_open,
        }
    }

    pub(crate) fn gte_min(&self, score: f64) -> bool {
        if self.minex {
            score > self.min
        } else {
            score >= self.min
        }
    }

    pub(crate) fn lte_max(&self, score: f64) -> bool {
        if self.maxex {
            score < self.max
        } else {
            score <= self.max
        }
    }
}

/// A lexicographic range normalized to absolute low/high ends.
#[derive(Debug, Clone)]
pub(crate) struct LexRange {
    pub min: LexBound,
    pub max: LexBound,
}

impl LexRange {
    pub(crate) fn new(reverse: bool, interval: &LexInterval) -> Self {
        let (lo, hi) = if reverse {
            (interval.second.clone(), interval.first.clone())
        } else {
            (interval.first.clone(), interval.second.clone())
        };
        Self { min: lo, max: hi }
    }

    pub(crate) fn gte_min(&self, member: &[u8]) -> bool {
        match &self.min {
            LexBound::MinusInf => true,
            LexBound::PlusInf => false,
            LexBound::Open(b) => member > b.as_ref(),
            LexBound::Closed(b) => member >= b.as_ref(),
        }
    }

    pub(crate) fn lte_max(&self, member: &[u8]) -> bool {
        match &self.max {
            LexBound::PlusInf => true,
            LexBound::MinusInf => false,
            LexBound::Open(b) => member < b.as_ref(),
            LexBound::Closed(b) => member <= b.as_ref(),
        }
    }
}

impl SortedSet {
    /// Runs a range operation over the set. This is the only entry point
    /// for rank, score, and lex scans and for range deletions.
    pub fn visit_range(&mut self, spec: &RangeSpec, action: Action) -> RangeResult {
        let mut result = RangeResult::default();
        match (&spec.interval, action) {
            (Interval::Rank(ii), Action::Range) => self.range_by_rank(ii, &spec.params, &mut result),
            (Interval::Rank(ii), Action::Remove) => self.remove_by_rank(ii, &mut result),
            (Interval::Score(si), Action::Range) => {
                let range = ScoreRange::new(spec.params.reverse, si);
                self.range_by_score(&range, &spec.params, &mut result);
            }
            (Interval::Score(si), Action::Remove) => {
                // Deletions are direction-agnostic.
                let range = ScoreRange::new(false, si);
                result.removed = match &mut self.enc {
                    Encoding::Packed(p) => p.delete_score_range(&range),
                    Encoding::Indexed(z) => z.delete_score_range(&range),
                };
            }
            (Interval::Lex(li), Action::Range) => {
                let range = LexRange::new(spec.params.reverse, li);
                self.range_by_lex(&range, &spec.params, &mut result);
            }
            (Interval::Lex(li), Action::Remove) => {
                let range = LexRange::new(false, li);
                result.removed = match &mut self.enc {
                    Encoding::Packed(p) => p.delete_lex_range(&range),
                    Encoding::Indexed(z) => z.delete_lex_range(&range),
                };
            }
        }
        result
    }

    /// Normalizes a rank interval against the current length. Returns the
    /// inclusive (start, end) positions, or `None` when the interval is
    /// empty after normalization.
    fn normalize_rank_interval(&self, interval: &IndexInterval) -> Option<(usize, usize)> {
        let len = self.len() as i64;
        let mut start = i64::from(interval.first);
        let mut end = i64::from(interval.second);
        if start < 0 {
            start += len;
        }
        if end < 0 {
            end += len;
        }
        start = start.max(0);
        if start > end || start >= len {
            return None;
        }
        end = end.min(len - 1);
        Some((start as usize, end as usize))
    }

    fn range_by_rank(&self, interval: &IndexInterval, params: &RangeParams, out: &mut RangeResult) {
        let Some((start, end)) = self.normalize_rank_interval(interval) else {
            return;
        };
        let len = self.len();
        let mut range_len = end - start + 1;
        match &self.enc {
            Encoding::Packed(p) => {
                // Reverse iteration counts positions from the tail.
                let mut pos = if params.reverse { len - 1 - start } else { start };
                loop {
                    let (member, score) = p.entry_by_rank(pos);
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    range_len -= 1;
                    if range_len == 0 {
                        break;
                    }
                    pos = if params.reverse { pos - 1 } else { pos + 1 };
                }
            }
            Encoding::Indexed(z) => {
                let first_rank = if params.reverse { len - 1 - start } else { start };
                let mut node = z.node_by_rank(first_rank);
                while let Some(n) = node {
                    let (member, score) = z.entry(n);
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    range_len -= 1;
                    if range_len == 0 {
                        break;
                    }
                    node = if params.reverse { z.prev(n) } else { z.next(n) };
                }
            }
        }
    }

    fn remove_by_rank(&mut self, interval: &IndexInterval, out: &mut RangeResult) {
        let Some((start, end)) = self.normalize_rank_interval(interval) else {
            return;
        };
        out.removed = match &mut self.enc {
            Encoding::Packed(p) => p.delete_rank_span(start, end),
            Encoding::Indexed(z) => z.delete_rank_span(start, end),
        };
    }

    fn range_by_score(&self, range: &ScoreRange, params: &RangeParams, out: &mut RangeResult) {
        let mut offset = params.offset;
        let mut limit = params.limit;
        match &self.enc {
            Encoding::Packed(p) => {
                let mut pos = if params.reverse {
                    p.last_in_score_range(range)
                } else {
                    p.first_in_score_range(range)
                };
                // The offset skips elements without checking the far bound;
                // the bound is enforced in the emit loop below.
                while let Some(cur) = pos {
                    if offset == 0 {
                        break;
                    }
                    offset -= 1;
                    pos = p.step(cur, params.reverse);
                }
                while let Some(cur) = pos {
                    if limit == 0 {
                        break;
                    }
                    limit -= 1;
                    let (member, score) = p.entry_by_rank(cur);
                    let in_range = if params.reverse {
                        range.gte_min(score)
                    } else {
                        range.lte_max(score)
                    };
                    if !in_range {
                        break;
                    }
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    pos = p.step(cur, params.reverse);
                }
            }
            Encoding::Indexed(z) => {
                let mut node = if params.reverse {
                    z.last_in_score_range(range)
                } else {
                    z.first_in_score_range(range)
                };
                while let Some(cur) = node {
                    if offset == 0 {
                        break;
                    }
                    offset -= 1;
                    node = if params.reverse { z.prev(cur) } else { z.next(cur) };
                }
                while let Some(cur) = node {
                    if limit == 0 {
                        break;
                    }
                    limit -= 1;
                    let (member, score) = z.entry(cur);
                    let in_range = if params.reverse {
                        range.gte_min(score)
                    } else {
                        range.lte_max(score)
                    };
                    if !in_range {
                        break;
                    }
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    node = if params.reverse { z.prev(cur) } else { z.next(cur) };
                }
            }
        }
    }

    fn range_by_lex(&self, range: &LexRange, params: &RangeParams, out: &mut RangeResult) {
        let mut offset = params.offset;
        let mut limit = params.limit;
        match &self.enc {
            Encoding::Packed(p) => {
                let mut pos = if params.reverse {
                    p.last_in_lex_range(range)
                } else {
                    p.first_in_lex_range(range)
                };
                while let Some(cur) = pos {
                    if offset == 0 {
                        break;
                    }
                    offset -= 1;
                    pos = p.step(cur, params.reverse);
                }
                while let Some(cur) = pos {
                    if limit == 0 {
                        break;
                    }
                    limit -= 1;
                    let (member, score) = p.entry_by_rank(cur);
                    let in_range = if params.reverse {
                        range.gte_min(member)
                    } else {
                        range.lte_max(member)
                    };
                    if !in_range {
                        break;
                    }
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    pos = p.step(cur, params.reverse);
                }
            }
            Encoding::Indexed(z) => {
                let mut node = if params.reverse {
                    z.last_in_lex_range(range)
                } else {
                    z.first_in_lex_range(range)
                };
                while let Some(cur) = node {
                    if offset == 0 {
                        break;
                    }
                    offset -= 1;
                    node = if params.reverse { z.prev(cur) } else { z.next(cur) };
                }
                while let Some(cur) = node {
                    if limit == 0 {
                        break;
                    }
                    limit -= 1;
                    let (member, score) = z.entry(cur);
                    let in_range = if params.reverse {
                        range.gte_min(member)
                    } else {
                        range.lte_max(member)
                    };
                    if !in_range {
                        break;
                    }
                    out.entries.push((Bytes::copy_from_slice(member), score));
                    node = if params.reverse { z.prev(cur) } else { z.next(cur) };
                }
            }
        }
    }
}
