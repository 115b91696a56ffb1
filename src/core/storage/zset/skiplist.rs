// src/core/storage/zset/skiplist.rs

//! The indexed sorted-set encoding: a rank-span probabilistic skiplist
//! ordered by (score, member) alongside a member-to-score hash index.
//!
//! The skiplist stores its nodes in an arena and links them by index, with a
//! per-level span that counts the elements a forward link skips. Spans make
//! rank queries and rank-addressed traversal O(log N). The hash index gives
//! O(1) membership and score lookup; every mutation keeps both in sync.

use super::packed::cmp_entry;
use super::range::{LexBound, LexRange, ScoreRange};
use bytes::Bytes;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::HashMap;

const MAX_LEVEL: usize = 32;
/// Probability of promoting a node one more level.
const LEVEL_P: f64 = 0.25;

const NIL: u32 = u32::MAX;
const HEAD: u32 = 0;

#[derive(Debug, Clone, Copy)]
struct Link {
    forward: u32,
    /// Number of elements this forward link skips over, inclusive of the
    /// target node. Zero when `forward` is `NIL`.
    span: u32,
}

impl Link {
    const fn empty() -> Self {
        Self {
            forward: NIL,
            span: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    member: Bytes,
    score: f64,
    backward: u32,
    links: Vec<Link>,
}

#[derive(Debug, Clone)]
struct SkipList {
    /// Arena of nodes; index 0 is the head sentinel.
    nodes: Vec<Node>,
    free: Vec<u32>,
    level: usize,
    len: usize,
    tail: u32,
    rng: SmallRng,
}

impl SkipList {
    fn new() -> Self {
        let head = Node {
            member: Bytes::new(),
            score: f64::NEG_INFINITY,
            backward: NIL,
            links: vec![Link::empty(); MAX_LEVEL],
        };
        Self {
            nodes: vec![head],
            free: Vec::new(),
            level: 1,
            len: 0,
            tail: NIL,
            rng: SmallRng::from_entropy(),
        }
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.r#gen::<f64>() < LEVEL_P {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> u32 {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            idx
        } else {
            self.nodes.push(node);
            (self.nodes.len() - 1) as u32
        }
    }

    fn release(&mut self, idx: u32) {
        let node = &mut self.nodes[idx as usize];
        node.member = Bytes::new();
        node.score = 0.0;
        node.backward = NIL;
        node.links.clear();
        self.free.push(idx);
    }

    fn member(&self, idx: u32) -> &[u8] {
        self.nodes[idx as usize].member.as_ref()
    }

    fn score(&self, idx: u32) -> f64 {
        self.nodes[idx as usize].score
    }

    fn first(&self) -> Option<u32> {
        let idx = self.nodes[HEAD as usize].links[0].forward;
        (idx != NIL).then_some(idx)
    }

    fn next(&self, idx: u32) -> Option<u32> {
        let fwd = self.nodes[idx as usize].links[0].forward;
        (fwd != NIL).then_some(fwd)
    }

    fn prev(&self, idx: u32) -> Option<u32> {
        let back = self.nodes[idx as usize].backward;
        (back != NIL).then_some(back)
    }

    /// Inserts a new (score, member) node. The caller guarantees the member
    /// is not already present.
    fn insert(&mut self, score: f64, member: Bytes) {
        let mut update = [HEAD; MAX_LEVEL];
        let mut rank = [0u32; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward == NIL {
                    break;
                }
                let fwd = &self.nodes[link.forward as usize];
                if cmp_entry(fwd.score, &fwd.member, score, &member) == Ordering::Less {
                    rank[i] += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let lvl = self.random_level();
        if lvl > self.level {
            for i in self.level..lvl {
                rank[i] = 0;
                update[i] = HEAD;
                self.nodes[HEAD as usize].links[i].span = self.len as u32;
            }
            self.level = lvl;
        }

        let node = Node {
            member,
            score,
            backward: NIL,
            links: vec![Link::empty(); lvl],
        };
        let idx = self.alloc(node);

        for i in 0..lvl {
            let upd = update[i] as usize;
            let upd_link = self.nodes[upd].links[i];
            self.nodes[idx as usize].links[i] = Link {
                forward: upd_link.forward,
                span: upd_link.span - (rank[0] - rank[i]),
            };
            self.nodes[upd].links[i] = Link {
                forward: idx,
                span: (rank[0] - rank[i]) + 1,
            };
        }
        for i in lvl..self.level {
            self.nodes[update[i] as usize].links[i].span += 1;
        }

        self.nodes[idx as usize].backward = if update[0] == HEAD { NIL } else { update[0] };
        let next0 = self.nodes[idx as usize].links[0].forward;
        if next0 != NIL {
            self.nodes[next0 as usize].backward = idx;
        } else {
            self.tail = idx;
        }
        self.len += 1;
    }

    /// Unlinks a node found via `update` from every level, fixing spans,
    /// the backward link, the tail, and the list level.
    fn unlink(&mut self, x: u32, update: &[u32; MAX_LEVEL]) {
        for i in 0..self.level {
            let upd = update[i] as usize;
            if self.nodes[upd].links[i].forward == x {
                let x_link = self.nodes[x as usize].links[i];
                self.nodes[upd].links[i].span += x_link.span;
                self.nodes[upd].links[i].span -= 1;
                self.nodes[upd].links[i].forward = x_link.forward;
            } else {
                self.nodes[upd].links[i].span -= 1;
            }
        }
        let fwd = self.nodes[x as usize].links[0].forward;
        let back = self.nodes[x as usize].backward;
        if fwd != NIL {
            self.nodes[fwd as usize].backward = back;
        } else {
            self.tail = back;
        }
        while self.level > 1 && self.nodes[HEAD as usize].links[self.level - 1].forward == NIL {
            self.nodes[HEAD as usize].links[self.level - 1].span = 0;
            self.level -= 1;
        }
        self.len -= 1;
    }

    fn delete(&mut self, score: f64, member: &[u8]) -> bool {
        let mut update = [HEAD; MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward == NIL {
                    break;
                }
                let fwd = &self.nodes[link.forward as usize];
                if cmp_entry(fwd.score, &fwd.member, score, member) == Ordering::Less {
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        let target = self.nodes[x as usize].links[0].forward;
        if target == NIL {
            return false;
        }
        let found = {
            let node = &self.nodes[target as usize];
            node.score == score && node.member.as_ref() == member
        };
        if !found {
            return false;
        }
        self.unlink(target, &update);
        self.release(target);
        true
    }

    /// 1-based rank of a member with a known score.
    fn rank_of(&self, score: f64, member: &[u8]) -> Option<u32> {
        let mut x = HEAD;
        let mut rank: u32 = 0;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward == NIL {
                    break;
                }
                let fwd = &self.nodes[link.forward as usize];
                if cmp_entry(fwd.score, &fwd.member, score, member) != Ordering::Greater {
                    rank += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            if x != HEAD && self.nodes[x as usize].member.as_ref() == member {
                return Some(rank);
            }
        }
        None
    }

    /// Node at the given 1-based rank.
    fn node_by_rank(&self, rank: u32) -> Option<u32> {
        if rank == 0 || rank as usize > self.len {
            return None;
        }
        let mut x = HEAD;
        let mut traversed: u32 = 0;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && traversed + link.span <= rank {
                    traversed += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            if traversed == rank {
                return Some(x);
            }
        }
        None
    }

    fn score_range_overlaps(&self, range: &ScoreRange) -> bool {
        if range.min > range.max
            || (range.min == range.max && (range.minex || range.maxex))
        {
            return false;
        }
        if self.tail == NIL || !range.gte_min(self.score(self.tail)) {
            return false;
        }
        match self.first() {
            Some(first) => range.lte_max(self.score(first)),
            None => false,
        }
    }

    fn first_in_score_range(&self, range: &ScoreRange) -> Option<u32> {
        if !self.score_range_overlaps(range) {
            return None;
        }
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && !range.gte_min(self.score(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
        }
        let first = self.nodes[x as usize].links[0].forward;
        if first == NIL {
            return None;
        }
        range.lte_max(self.score(first)).then_some(first)
    }

    fn last_in_score_range(&self, range: &ScoreRange) -> Option<u32> {
        if !self.score_range_overlaps(range) {
            return None;
        }
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && range.lte_max(self.score(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
        }
        if x == HEAD {
            return None;
        }
        range.gte_min(self.score(x)).then_some(x)
    }

    fn lex_range_is_empty(range: &LexRange) -> bool {
        match (&range.min, &range.max) {
            (LexBound::PlusInf, _) | (_, LexBound::MinusInf) => true,
            (LexBound::MinusInf, _) | (_, LexBound::PlusInf) => false,
            (
                LexBound::Open(a) | LexBound::Closed(a),
                LexBound::Open(b) | LexBound::Closed(b),
            ) => match a.as_ref().cmp(b.as_ref()) {
                Ordering::Greater => true,
                Ordering::Equal => {
                    matches!(range.min, LexBound::Open(_)) || matches!(range.max, LexBound::Open(_))
                }
                Ordering::Less => false,
            },
        }
    }

    fn lex_range_overlaps(&self, range: &LexRange) -> bool {
        if Self::lex_range_is_empty(range) {
            return false;
        }
        if self.tail == NIL || !range.gte_min(self.member(self.tail)) {
            return false;
        }
        match self.first() {
            Some(first) => range.lte_max(self.member(first)),
            None => false,
        }
    }

    fn first_in_lex_range(&self, range: &LexRange) -> Option<u32> {
        if !self.lex_range_overlaps(range) {
            return None;
        }
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && !range.gte_min(self.member(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
        }
        let first = self.nodes[x as usize].links[0].forward;
        if first == NIL {
            return None;
        }
        range.lte_max(self.member(first)).then_some(first)
    }

    fn last_in_lex_range(&self, range: &LexRange) -> Option<u32> {
        if !self.lex_range_overlaps(range) {
            return None;
        }
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && range.lte_max(self.member(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
        }
        if x == HEAD {
            return None;
        }
        range.gte_min(self.member(x)).then_some(x)
    }

    /// Deletes every node whose score falls in the range, removing each
    /// member from the hash index as it goes. The deleted nodes are
    /// consecutive, so the `update` path stays valid across unlinks.
    fn delete_range_by_score(
        &mut self,
        range: &ScoreRange,
        index: &mut HashMap<Bytes, f64>,
    ) -> u32 {
        let mut update = [HEAD; MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && !range.gte_min(self.score(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        let mut x = self.nodes[x as usize].links[0].forward;
        let mut removed = 0;
        while x != NIL && range.lte_max(self.score(x)) {
            let next = self.nodes[x as usize].links[0].forward;
            index.remove(self.member(x));
            self.unlink(x, &update);
            self.release(x);
            removed += 1;
            x = next;
        }
        removed
    }

    fn delete_range_by_lex(&mut self, range: &LexRange, index: &mut HashMap<Bytes, f64>) -> u32 {
        let mut update = [HEAD; MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && !range.gte_min(self.member(link.forward)) {
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        let mut x = self.nodes[x as usize].links[0].forward;
        let mut removed = 0;
        while x != NIL && range.lte_max(self.member(x)) {
            let next = self.nodes[x as usize].links[0].forward;
            index.remove(self.member(x));
            self.unlink(x, &update);
            self.release(x);
            removed += 1;
            x = next;
        }
        removed
    }

    /// Deletes the inclusive 1-based rank span.
    fn delete_range_by_rank(
        &mut self,
        start: u32,
        end: u32,
        index: &mut HashMap<Bytes, f64>,
    ) -> u32 {
        let mut update = [HEAD; MAX_LEVEL];
        let mut traversed: u32 = 0;
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.nodes[x as usize].links[i];
                if link.forward != NIL && traversed + link.span < start {
                    traversed += link.span;
                    x = link.forward;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        traversed += 1;
        let mut x = self.nodes[x as usize].links[0].forward;
        let mut removed = 0;
        while x != NIL && traversed <= end {
            let next = self.nodes[x as usize].links[0].forward;
            index.remove(self.member(x));
            self.unlink(x, &update);
            self.release(x);
            removed += 1;
            traversed += 1;
            x = next;
        }
        removed
    }
}

/// The indexed encoding: skiplist plus member→score hash index.
#[derive(Debug, Clone, Default)]
pub struct IndexedZSet {
    list: SkipList,
    index: HashMap<Bytes, f64>,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedZSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.index.get(member).copied()
    }

    /// Inserts a member known to be absent.
    pub fn insert(&mut self, score: f64, member: Bytes) {
        debug_assert!(!self.index.contains_key(member.as_ref()));
        self.list.insert(score, member.clone());
        self.index.insert(member, score);
    }

    /// Moves an existing member to a new score.
    pub fn update(&mut self, old_score: f64, new_score: f64, member: &Bytes) {
        self.list.delete(old_score, member.as_ref());
        self.list.insert(new_score, member.clone());
        self.index.insert(member.clone(), new_score);
    }

    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.index.remove(member) {
            Some(score) => {
                self.list.delete(score, member);
                true
            }
            None => false,
        }
    }

    /// 0-based forward rank.
    pub fn rank_of(&self, member: &[u8]) -> Option<usize> {
        let score = self.index.get(member)?;
        self.list.rank_of(*score, member).map(|r| (r - 1) as usize)
    }

    /// Node handle at the given 0-based rank.
    pub fn node_by_rank(&self, rank: usize) -> Option<u32> {
        self.list.node_by_rank(rank as u32 + 1)
    }

    pub fn entry(&self, node: u32) -> (&[u8], f64) {
        (self.list.member(node), self.list.score(node))
    }

    pub fn next(&self, node: u32) -> Option<u32> {
        self.list.next(node)
    }

    pub fn prev(&self, node: u32) -> Option<u32> {
        self.list.prev(node)
    }

    pub fn first_in_score_range(&self, range: &ScoreRange) -> Option<u32> {
        self.list.first_in_score_range(range)
    }

    pub fn last_in_score_range(&self, range: &ScoreRange) -> Option<u32> {
        self.list.last_in_score_range(range)
    }

    pub fn first_in_lex_range(&self, range: &LexRange) -> Option<u32> {
        self.list.first_in_lex_range(range)
    }

    pub fn last_in_lex_range(&self, range: &LexRange) -> Option<u32> {
        self.list.last_in_lex_range(range)
    }

    pub fn delete_score_range(&mut self, range: &ScoreRange) -> u32 {
        self.list.delete_range_by_score(range, &mut self.index)
    }

    pub fn delete_lex_range(&mut self, range: &LexRange) -> u32 {
        self.list.delete_range_by_lex(range, &mut self.index)
    }

    /// Deletes the inclusive 0-based rank span.
    pub fn delete_rank_span(&mut self, start: usize, end: usize) -> u32 {
        self.list
            .delete_range_by_rank(start as u32 + 1, end as u32 + 1, &mut self.index)
    }

    /// Counts the score range by rank arithmetic on the span structure
    /// instead of materializing the range.
    pub fn count_score_range(&self, range: &ScoreRange) -> usize {
        let Some(first) = self.first_in_score_range(range) else {
            return 0;
        };
        let (member, score) = self.entry(first);
        let Some(first_rank) = self.list.rank_of(score, member) else {
            return 0;
        };
        let len = self.len();
        let mut count = len - (first_rank as usize - 1);
        if let Some(last) = self.last_in_score_range(range) {
            let (member, score) = self.entry(last);
            if let Some(last_rank) = self.list.rank_of(score, member) {
                count -= len - last_rank as usize;
            }
        }
        count
    }

    pub fn count_lex_range(&self, range: &LexRange) -> usize {
        let Some(first) = self.first_in_lex_range(range) else {
            return 0;
        };
        let (member, score) = self.entry(first);
        let Some(first_rank) = self.list.rank_of(score, member) else {
            return 0;
        };
        let len = self.len();
        let mut count = len - (first_rank as usize - 1);
        if let Some(last) = self.last_in_lex_range(range) {
            let (member, score) = self.entry(last);
            if let Some(last_rank) = self.list.rank_of(score, member) {
                count -= len - last_rank as usize;
            }
        }
        count
    }

    /// All entries in iteration order.
    pub fn entries(&self) -> Vec<(Bytes, f64)> {
        let mut out = Vec::with_capacity(self.len());
        let mut node = self.list.first();
        while let Some(n) = node {
            let (member, score) = self.entry(n);
            out.push((Bytes::copy_from_slice(member), score));
            node = self.next(n);
        }
        out
    }

    /// One cursor batch over the hash index. The cursor counts entries
    /// already consumed; it wraps to zero once the traversal completes.
    /// Stable as long as the set is not mutated between batches.
    pub fn scan(&self, cursor: u64, batch: usize) -> (u64, Vec<(Bytes, f64)>) {
        let mut out = Vec::with_capacity(batch);
        for (member, score) in self.index.iter().skip(cursor as usize).take(batch) {
            out.push((member.clone(), *score));
        }
        let consumed = cursor + out.len() as u64;
        let next_cursor = if consumed >= self.len() as u64 {
            0
        } else {
            consumed
        };
        (next_cursor, out)
    }

    pub fn memory_usage(&self) -> usize {
        let f64_size = std::mem::size_of::<f64>();
        let node_overhead = std::mem::size_of::<Node>();
        self.index
            .keys()
            .map(|member| 2 * member.len() + f64_size + node_overhead)
            .sum()
    }
}
