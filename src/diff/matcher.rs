//! Ratcliff/Obershelp sequence alignment.
//!
//! Finds the longest common block in a window, recurses on both sides of it,
//! and turns the resulting matching blocks into an edit script. No junk
//! heuristics are applied: two elements match only when they are equal.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// `a[i1..i2]` maps to `b[j1..j2]` under `tag`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

/// `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T> SequenceMatcher<'a, T>
where
    T: Eq + Hash,
{
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest block common to `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, and
    /// among those the one starting earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let mut best = MatchBlock {
            a: alo,
            b: blo,
            size: 0,
        };
        // j2len[j] = length of the block ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = MatchBlock {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        best
    }

    /// Maximal matching blocks in increasing order, terminated by a
    /// zero-sized sentinel at `(a.len(), b.len())`.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks: Vec<MatchBlock> = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let found = self.find_longest_match(alo, ahi, blo, bhi);
            if found.size == 0 {
                continue;
            }
            blocks.push(found);
            if alo < found.a && blo < found.b {
                queue.push((alo, found.a, blo, found.b));
            }
            if found.a + found.size < ahi && found.b + found.size < bhi {
                queue.push((found.a + found.size, ahi, found.b + found.size, bhi));
            }
        }
        blocks.sort();

        let mut collapsed: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match collapsed.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed.push(MatchBlock {
            a: la,
            b: lb,
            size: 0,
        });
        collapsed
    }

    /// Edit script turning `a` into `b`. Covers both sequences without gaps.
    pub fn opcodes(&self) -> Vec<Opcode> {
        if self.a.is_empty() && self.b.is_empty() {
            return vec![Opcode {
                tag: OpTag::Equal,
                i1: 0,
                i2: 0,
                j1: 0,
                j2: 0,
            }];
        }

        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();
        for block in self.matching_blocks() {
            let tag = if i < block.a && j < block.b {
                Some(OpTag::Replace)
            } else if i < block.a {
                Some(OpTag::Delete)
            } else if j < block.b {
                Some(OpTag::Insert)
            } else {
                None
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    i1: i,
                    i2: block.a,
                    j1: j,
                    j2: block.b,
                });
            }
            i = block.a + block.size;
            j = block.b + block.size;
            if block.size > 0 {
                ops.push(Opcode {
                    tag: OpTag::Equal,
                    i1: block.a,
                    i2: i,
                    j1: block.b,
                    j2: j,
                });
            }
        }
        ops
    }
}

pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    SequenceMatcher::new(a, b).opcodes()
}
