//! Array-backed binary min-heap driving the tree merge loop.
//!
//! Unlike `std::collections::BinaryHeap` this exposes the exact operations the
//! builder needs: a fallible fixed-capacity constructor, an O(n) bulk load and
//! an O(1) "one left" check.

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    /// Empty heap able to hold `capacity` entries without reallocating.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    /// Bulk-load unordered entries, heapifying bottom-up from the last
    /// non-leaf index.
    pub fn from_unordered(items: Vec<T>) -> Self {
        let mut heap = Self { items };
        for i in (0..heap.items.len() / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build-loop termination check.
    pub fn is_single(&self) -> bool {
        self.items.len() == 1
    }

    pub fn insert(&mut self, item: T) -> Result<()> {
        self.items.try_reserve(1)?;
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Remove the smallest entry. The last entry moves to the root and is
    /// sifted down.
    pub fn extract_min(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let min = self.items.swap_remove(0);
        self.sift_down(0);
        Ok(min)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[i] >= self.items[parent] {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;

            if left < n && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < n && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        (1..self.items.len()).all(|i| self.items[(i - 1) / 2] <= self.items[i])
    }
}
