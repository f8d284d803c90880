//! Self-indexing binary max-heap.
//!
//! The heap stores item ids; the items themselves live in a caller-owned
//! slice and record the heap slot they currently occupy. That slot lets
//! [`BinaryMaxHeap::contains`] answer in O(1) and lets the caller reposition
//! an item after changing its priority in place.
//!
//! The heap is the only writer of an item's slot. Reordering items behind
//! its back breaks `contains` and `update_item`.

use std::cmp::Ordering;

use crate::error::Error;

/// Slot value for an item that is not in any heap.
pub const NO_SLOT: usize = usize::MAX;

/// An item that can live in a [`BinaryMaxHeap`].
pub trait HeapItem {
    /// Slot the item occupies, or [`NO_SLOT`].
    fn heap_slot(&self) -> usize;

    /// Record the slot. Only called by the heap.
    fn set_heap_slot(&mut self, slot: usize);

    /// `Greater` means `self` should sit closer to the top than `other`.
    fn priority_cmp(&self, other: &Self) -> Ordering;
}

/// Max-heap over ids indexing into a slice of [`HeapItem`]s.
#[derive(Debug, Clone, Default)]
pub struct BinaryMaxHeap {
    slots: Vec<usize>,
}

impl BinaryMaxHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every item. Items keep their stale slots, which `contains`
    /// rejects.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Id of the highest-priority item without removing it.
    pub fn peek(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Append `id` and sift it up. O(log n).
    pub fn add<I: HeapItem>(&mut self, items: &mut [I], id: usize) {
        let slot = self.slots.len();
        self.slots.push(id);
        items[id].set_heap_slot(slot);
        self.sift_up(items, slot);
    }

    /// Remove and return the id of the highest-priority item.
    pub fn remove_first<I: HeapItem>(&mut self, items: &mut [I]) -> Result<usize, Error> {
        if self.slots.is_empty() {
            return Err(Error::EmptyHeap);
        }
        let first = self.slots.swap_remove(0);
        items[first].set_heap_slot(NO_SLOT);
        if let Some(&moved) = self.slots.first() {
            items[moved].set_heap_slot(0);
            self.sift_down(items, 0);
        }
        Ok(first)
    }

    /// Restore the heap order after the priority of `id` changed in place.
    pub fn update_item<I: HeapItem>(&mut self, items: &mut [I], id: usize) {
        let slot = items[id].heap_slot();
        if !self.holds(id, slot) {
            return;
        }
        let slot = self.sift_up(items, slot);
        self.sift_down(items, slot);
    }

    /// Whether `id` is currently in the heap.
    #[inline]
    pub fn contains<I: HeapItem>(&self, items: &[I], id: usize) -> bool {
        self.holds(id, items[id].heap_slot())
    }

    #[inline]
    fn holds(&self, id: usize, slot: usize) -> bool {
        self.slots.get(slot) == Some(&id)
    }

    fn sift_up<I: HeapItem>(&mut self, items: &mut [I], mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            let (a, b) = (self.slots[slot], self.slots[parent]);
            if items[a].priority_cmp(&items[b]) != Ordering::Greater {
                break;
            }
            self.swap(items, slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down<I: HeapItem>(&mut self, items: &mut [I], mut slot: usize) {
        let count = self.slots.len();
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut best = slot;
            if left < count
                && items[self.slots[best]].priority_cmp(&items[self.slots[left]]) == Ordering::Less
            {
                best = left;
            }
            if right < count
                && items[self.slots[best]].priority_cmp(&items[self.slots[right]]) == Ordering::Less
            {
                best = right;
            }
            if best == slot {
                return;
            }
            self.swap(items, slot, best);
            slot = best;
        }
    }

    fn swap<I: HeapItem>(&mut self, items: &mut [I], a: usize, b: usize) {
        self.slots.swap(a, b);
        items[self.slots[a]].set_heap_slot(a);
        items[self.slots[b]].set_heap_slot(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[derive(Debug, Clone)]
    struct Item {
        priority: i32,
        slot: usize,
    }

    impl Item {
        fn new(priority: i32) -> Self {
            Self {
                priority,
                slot: NO_SLOT,
            }
        }
    }

    impl HeapItem for Item {
        fn heap_slot(&self) -> usize {
            self.slot
        }

        fn set_heap_slot(&mut self, slot: usize) {
            self.slot = slot;
        }

        fn priority_cmp(&self, other: &Self) -> Ordering {
            self.priority.cmp(&other.priority)
        }
    }

    fn assert_heap_order(heap: &BinaryMaxHeap, items: &[Item]) {
        for (slot, &id) in heap.slots.iter().enumerate() {
            assert_eq!(items[id].slot, slot, "item {id} lost track of its slot");
            for child in [slot * 2 + 1, slot * 2 + 2] {
                if let Some(&c) = heap.slots.get(child) {
                    assert!(items[id].priority >= items[c].priority);
                }
            }
        }
    }

    #[test]
    fn pops_in_priority_order() {
        let mut items: Vec<Item> = [5, 1, 9, 3, 7].into_iter().map(Item::new).collect();
        let mut heap = BinaryMaxHeap::new();
        for id in 0..items.len() {
            heap.add(&mut items, id);
        }
        let ids: Vec<usize> = std::iter::from_fn(|| heap.remove_first(&mut items).ok()).collect();
        let order: Vec<i32> = ids.iter().map(|&id| items[id].priority).collect();
        assert_eq!(order, vec![9, 7, 5, 3, 1]);
    }

    #[test]
    fn empty_heap_errors() {
        let mut items: Vec<Item> = Vec::new();
        let mut heap = BinaryMaxHeap::new();
        assert_eq!(heap.remove_first(&mut items), Err(Error::EmptyHeap));
    }

    #[test]
    fn contains_tracks_membership() {
        let mut items: Vec<Item> = [1, 2, 3].into_iter().map(Item::new).collect();
        let mut heap = BinaryMaxHeap::new();
        assert!(!heap.contains(&items, 0));
        heap.add(&mut items, 0);
        heap.add(&mut items, 2);
        assert!(heap.contains(&items, 0));
        assert!(!heap.contains(&items, 1));
        assert_eq!(heap.remove_first(&mut items), Ok(2));
        assert!(!heap.contains(&items, 2));
        heap.clear();
        assert!(!heap.contains(&items, 0));
    }

    #[test]
    fn update_item_moves_both_ways() {
        let mut items: Vec<Item> = [10, 20, 30, 40].into_iter().map(Item::new).collect();
        let mut heap = BinaryMaxHeap::new();
        for id in 0..items.len() {
            heap.add(&mut items, id);
        }
        items[0].priority = 50;
        heap.update_item(&mut items, 0);
        assert_eq!(heap.peek(), Some(0));
        items[0].priority = 0;
        heap.update_item(&mut items, 0);
        assert_heap_order(&heap, &items);
        assert_eq!(heap.peek(), Some(3));
    }

    #[test]
    fn random_operations_keep_heap_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items: Vec<Item> = (0..200)
            .map(|_| Item::new(rng.random_range(0..1000)))
            .collect();
        let mut heap = BinaryMaxHeap::with_capacity(items.len());
        let mut next = 0;
        let mut popped = Vec::new();

        for _ in 0..600 {
            match rng.random_range(0..3) {
                0 if next < items.len() => {
                    heap.add(&mut items, next);
                    next += 1;
                }
                1 if !heap.is_empty() => {
                    let id = heap.slots[rng.random_range(0..heap.len())];
                    items[id].priority = rng.random_range(0..1000);
                    heap.update_item(&mut items, id);
                }
                _ => {
                    if let Ok(id) = heap.remove_first(&mut items) {
                        popped.push(id);
                    }
                }
            }
            assert_heap_order(&heap, &items);
        }

        let mut last = i32::MAX;
        while let Ok(id) = heap.remove_first(&mut items) {
            assert!(items[id].priority <= last);
            last = items[id].priority;
        }
    }
}
