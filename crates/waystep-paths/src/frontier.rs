use std::cmp::Ordering;
use std::collections::BinaryHeap;

use waystep_core::{Point, Range};

use crate::node::SearchNode;

/// How equal-priority open nodes are ordered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// The node inserted earliest is popped first.
    #[default]
    FirstDiscovered,
    /// The node inserted latest is popped first, as a sorted list does when
    /// new entries go ahead of equal ones.
    LastDiscovered,
}

/// What [`Frontier::relax_if_cheaper`] did with a candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relaxation {
    /// The cell was unseen; the candidate is now open.
    Inserted,
    /// A costlier open entry was replaced.
    ReplacedOpen,
    /// A costlier closed entry was replaced and the cell re-opened.
    Reopened,
    /// The existing entry is at least as cheap; nothing changed.
    Discarded,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum Membership {
    #[default]
    Unseen,
    Open,
    Closed,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    node: Option<SearchNode>,
    generation: u32,
    membership: Membership,
    seq: u64,
}

/// Heap entry pointing into the slot array, ordered by `(f, rank)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct OpenEntry {
    idx: usize,
    f: i32,
    rank: u64,
    seq: u64,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest (f, rank) first.
        other.f.cmp(&self.f).then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open and closed sets of one search.
///
/// Nodes live in a flat arena indexed by cell; a generation stamp makes a
/// [`reset`](Self::reset) invalidate every slot without touching it. The open
/// set is a binary heap of `(total_cost, discovery order)` keys. Replaced
/// entries stay in the heap and are skipped when popped.
///
/// A cell is in at most one of the two sets at any time.
#[derive(Debug, Default)]
pub struct Frontier {
    rng: Range,
    width: usize,
    slots: Vec<Slot>,
    generation: u32,
    heap: BinaryHeap<OpenEntry>,
    next_seq: u64,
    tie_break: TieBreak,
    open_len: usize,
    closed_len: usize,
}

impl Frontier {
    /// Create an empty frontier over `rng`.
    pub fn new(rng: Range, tie_break: TieBreak) -> Self {
        let mut frontier = Self::default();
        frontier.reset(rng, tie_break);
        frontier
    }

    /// Forget every node and prepare for a search over `rng`.
    ///
    /// The slot array only grows; smaller ranges reuse it.
    pub fn reset(&mut self, rng: Range, tie_break: TieBreak) {
        let len = rng.len();
        if len > self.slots.len() {
            self.slots.resize(len, Slot::default());
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps wrapped: old slots could look current again.
            self.slots.fill(Slot::default());
            self.generation = 1;
        }
        self.rng = rng;
        self.width = rng.width().max(0) as usize;
        self.heap.clear();
        self.next_seq = 0;
        self.tie_break = tie_break;
        self.open_len = 0;
        self.closed_len = 0;
    }

    /// Bounds covered by this frontier.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Number of open nodes.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open_len
    }

    /// Number of closed nodes.
    #[inline]
    pub fn closed_len(&self) -> usize {
        self.closed_len
    }

    /// Whether the open set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open_len == 0
    }

    pub fn is_open(&self, p: Point) -> bool {
        self.membership(p) == Membership::Open
    }

    pub fn is_closed(&self, p: Point) -> bool {
        self.membership(p) == Membership::Closed
    }

    /// The open or closed node at `p`, if any.
    pub fn node(&self, p: Point) -> Option<&SearchNode> {
        let slot = self.current_slot(self.idx(p)?)?;
        if slot.membership == Membership::Unseen {
            return None;
        }
        slot.node.as_ref()
    }

    /// Add `node` to the open set.
    ///
    /// The node must not already be open. A closed node at the same cell is
    /// moved back to the open set. Nodes outside the range are ignored.
    pub fn insert_sorted(&mut self, node: SearchNode) {
        let Some(idx) = self.idx(node.pos()) else {
            return;
        };
        debug_assert!(
            !self.is_open(node.pos()),
            "{} inserted into the open set twice",
            node.pos()
        );
        self.place(idx, node);
    }

    /// Remove the open node with the lowest total cost and close it.
    ///
    /// Returns `None` once the open set is exhausted.
    pub fn pop_best(&mut self) -> Option<SearchNode> {
        while let Some(entry) = self.heap.pop() {
            let generation = self.generation;
            let slot = &mut self.slots[entry.idx];
            if slot.generation != generation
                || slot.membership != Membership::Open
                || slot.seq != entry.seq
            {
                continue;
            }
            slot.membership = Membership::Closed;
            self.open_len -= 1;
            self.closed_len += 1;
            return slot.node;
        }
        None
    }

    /// Offer `candidate` for its cell.
    ///
    /// An unseen cell takes the candidate as a new open node. A seen cell
    /// takes it only if its current entry has a strictly higher total cost;
    /// a replaced closed entry is re-opened.
    pub fn relax_if_cheaper(&mut self, candidate: SearchNode) -> Relaxation {
        let Some(idx) = self.idx(candidate.pos()) else {
            return Relaxation::Discarded;
        };
        let existing = self
            .current_slot(idx)
            .filter(|s| s.membership != Membership::Unseen)
            .map(|s| (s.membership, s.node.map_or(i32::MAX, |n| n.total_cost())));
        let Some((membership, stale_cost)) = existing else {
            self.place(idx, candidate);
            return Relaxation::Inserted;
        };
        if candidate.total_cost() >= stale_cost {
            return Relaxation::Discarded;
        }
        self.place(idx, candidate);
        if membership == Membership::Closed {
            Relaxation::Reopened
        } else {
            Relaxation::ReplacedOpen
        }
    }

    fn place(&mut self, idx: usize, node: SearchNode) {
        let generation = self.generation;
        let seq = self.next_seq;
        self.next_seq += 1;

        let slot = &mut self.slots[idx];
        if slot.generation == generation {
            match slot.membership {
                Membership::Open => self.open_len -= 1,
                Membership::Closed => self.closed_len -= 1,
                Membership::Unseen => {}
            }
        }
        *slot = Slot {
            node: Some(node),
            generation,
            membership: Membership::Open,
            seq,
        };
        self.open_len += 1;

        let rank = match self.tie_break {
            TieBreak::FirstDiscovered => seq,
            TieBreak::LastDiscovered => u64::MAX - seq,
        };
        self.heap.push(OpenEntry {
            idx,
            f: node.total_cost(),
            rank,
            seq,
        });
    }

    fn membership(&self, p: Point) -> Membership {
        self.idx(p)
            .and_then(|i| self.current_slot(i))
            .map_or(Membership::Unseen, |s| s.membership)
    }

    #[inline]
    fn current_slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx).filter(|s| s.generation == self.generation)
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }
}
