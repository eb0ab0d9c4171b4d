//! An arena-plus-index binary min-heap over cursor-array slots.
//!
//! No heap node is embedded in a cursor the way the original's intrusive
//! `heap_node` is. Instead `heap[slot]` holds a cursor index and
//! `pos[cursor_idx]` holds that cursor's current slot, so `update` and
//! `delete` by cursor index stay O(log n) without cyclic ownership.

use kmerge_core::error::Result;

pub(crate) struct Heap {
    heap: Vec<usize>,
    pos: Vec<Option<usize>>,
}

impl Heap {
    pub(crate) fn new() -> Self {
        Heap {
            heap: Vec::new(),
            pos: Vec::new(),
        }
    }

    pub(crate) fn reserve(&mut self, capacity: usize) -> Result<()> {
        self.heap
            .try_reserve(capacity.saturating_sub(self.heap.len()))?;
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.pos.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn top(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Insert cursor index `idx`, which must not already be in the heap.
    pub(crate) fn insert<F>(&mut self, idx: usize, mut less: F) -> Result<()>
    where
        F: FnMut(usize, usize) -> bool,
    {
        if idx >= self.pos.len() {
            self.pos.try_reserve(idx + 1 - self.pos.len())?;
            self.pos.resize(idx + 1, None);
        }
        self.heap.try_reserve(1)?;
        let slot = self.heap.len();
        self.heap.push(idx);
        self.pos[idx] = Some(slot);
        self.sift_up(slot, &mut less);
        Ok(())
    }

    /// Remove cursor index `idx` from the heap. A no-op if it isn't in it.
    pub(crate) fn delete<F>(&mut self, idx: usize, mut less: F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        let slot = match self.pos.get(idx).copied().flatten() {
            Some(s) => s,
            None => return,
        };
        let last = self.heap.len() - 1;
        self.swap_slots(slot, last);
        self.heap.pop();
        self.pos[idx] = None;
        if slot < self.heap.len() {
            self.sift_down(slot, &mut less);
            self.sift_up(slot, &mut less);
        }
    }

    /// Re-seat cursor index `idx` after its head tuple changed.
    pub(crate) fn update<F>(&mut self, idx: usize, mut less: F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        let slot = match self.pos.get(idx).copied().flatten() {
            Some(s) => s,
            None => return,
        };
        self.sift_down(slot, &mut less);
        self.sift_up(slot, &mut less);
    }

    fn swap_slots(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i]] = Some(i);
        self.pos[self.heap[j]] = Some(j);
    }

    fn sift_up<F>(&mut self, mut slot: usize, less: &mut F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if less(self.heap[slot], self.heap[parent]) {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down<F>(&mut self, mut slot: usize, less: &mut F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        loop {
            let l = 2 * slot + 1;
            let r = 2 * slot + 2;
            let mut smallest = slot;
            if l < self.heap.len() && less(self.heap[l], self.heap[smallest]) {
                smallest = l;
            }
            if r < self.heap.len() && less(self.heap[r], self.heap[smallest]) {
                smallest = r;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }
}
