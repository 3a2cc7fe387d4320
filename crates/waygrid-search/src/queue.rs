//! The [`OpenQueue`] — a fixed-capacity binary min-heap with a coordinate
//! index.
//!
//! Alongside the heap array the queue maintains a map from each record's
//! coordinate to its current slot, giving O(1) "is this cell queued, and at
//! what cost" lookups and O(log n) removal of arbitrary logical entries.
//! The structural invariant is that for every occupied slot `i`,
//! `slots[items[i].coord] == i`; every swap during sifting updates both
//! sides.

use std::collections::HashMap;

use thiserror::Error;
use waygrid_core::Coord;

use crate::node::SearchNode;

/// Returned by [`OpenQueue::push`] when the queue is at capacity.
///
/// Capacity is fixed at construction; the search engine treats a full queue
/// as an unrecoverable failure of the whole search rather than resizing or
/// retrying.
#[derive(Debug, Error)]
#[error("open queue is at capacity ({0})")]
pub struct QueueFull(pub usize);

/// Fixed-capacity indexed priority queue over [`SearchNode`]s.
#[derive(Debug)]
pub struct OpenQueue {
    items: Vec<SearchNode>,
    slots: HashMap<Coord, usize>,
    capacity: usize,
}

impl OpenQueue {
    /// Create a queue holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity.min(128)),
            capacity,
        }
    }

    /// Number of queued records.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of records, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a record for `coord` is currently queued.
    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.slots.contains_key(&coord)
    }

    /// The queued record for `coord`, if any.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<&SearchNode> {
        self.slots.get(&coord).map(|&slot| &self.items[slot])
    }

    /// Insert a record. O(log n). Fails without modifying the queue when at
    /// capacity.
    pub fn push(&mut self, node: SearchNode) -> Result<(), QueueFull> {
        if self.items.len() >= self.capacity {
            return Err(QueueFull(self.capacity));
        }
        let slot = self.items.len();
        self.slots.insert(node.coord, slot);
        self.items.push(node);
        self.sift_up(slot);
        Ok(())
    }

    /// Remove and return the minimum record by `(f, h)`. O(log n).
    pub fn pop(&mut self) -> Option<SearchNode> {
        if self.items.is_empty() {
            return None;
        }
        self.remove_slot(0)
    }

    /// Remove the record for `coord`, wherever it sits in the heap.
    /// O(log n). This is the "decrease cost" primitive: remove the stale
    /// entry, then [`push`](OpenQueue::push) the improved one.
    pub fn remove(&mut self, coord: Coord) -> Option<SearchNode> {
        let slot = *self.slots.get(&coord)?;
        self.remove_slot(slot)
    }

    /// Remove the record at `slot`, filling the hole with the last element
    /// and restoring heap order in whichever direction it violates.
    fn remove_slot(&mut self, slot: usize) -> Option<SearchNode> {
        let last = self.items.len() - 1;
        self.items.swap(slot, last);
        let removed = self.items.pop()?;
        self.slots.remove(&removed.coord);
        if slot < self.items.len() {
            self.slots.insert(self.items[slot].coord, slot);
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        }
        Some(removed)
    }

    /// Move the record at `slot` towards the root while it precedes its
    /// parent. Returns its final slot.
    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.items[slot].precedes(&self.items[parent]) {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
        slot
    }

    /// Move the record at `slot` towards the leaves while a child precedes
    /// it.
    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.items.len() {
                return;
            }
            let right = left + 1;
            let mut child = left;
            if right < self.items.len() && self.items[right].precedes(&self.items[left]) {
                child = right;
            }
            if !self.items[child].precedes(&self.items[slot]) {
                return;
            }
            self.swap_slots(slot, child);
            slot = child;
        }
    }

    /// Swap two occupied slots, keeping the coordinate index in step.
    #[inline]
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slots.insert(self.items[a].coord, a);
        self.slots.insert(self.items[b].coord, b);
    }
}
