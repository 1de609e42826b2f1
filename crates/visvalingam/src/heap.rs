//! Indexed binary min-heap with logarithmic update-in-place.
//!
//! Purpose
//! - The elimination loop needs a min-heap with the standard `insert`,
//!   `peek`, `pop`, plus the non-standard `reheap`: restore heap order for a
//!   single resident element whose key changed, wherever it sits.
//! - A map from element handle to heap slot makes `reheap` O(log n) without
//!   the caller ever tracking positions.
//!
//! Contract
//! - Fixed capacity, declared at construction; inserting past it panics.
//! - Handles must be unique among concurrently resident elements. A
//!   collision silently corrupts the slot map and is not detected.

use std::collections::HashMap;
use std::hash::Hash;

/// Caller-supplied unique handle for a heap resident.
///
/// The handle stands in for pointer identity: it is how `reheap` finds the
/// element's current slot after its key changed.
pub trait HeapKey {
    type Key: Copy + Eq + Hash;
    fn heap_key(&self) -> Self::Key;
}

macro_rules! self_keyed {
    ($($t:ty),*) => {
        $(impl HeapKey for $t {
            type Key = $t;
            #[inline]
            fn heap_key(&self) -> $t {
                *self
            }
        })*
    };
}

// Plain integers key themselves, so the heap doubles as an ordinary
// priority queue for numeric payloads.
self_keyed!(i32, i64, u32, u64, usize);

fn natural_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

/// Fixed-capacity binary min-heap over `T`, with an element-to-slot map.
///
/// "Minimum" is defined by the comparator `less` supplied at construction;
/// `new` uses the natural `PartialOrd` ordering.
pub struct IndexedHeap<T: HeapKey, C = fn(&T, &T) -> bool>
where
    C: Fn(&T, &T) -> bool,
{
    data: Vec<T>,
    capacity: usize,
    less: C,
    slot_of: HashMap<T::Key, usize>,
}

impl<T: HeapKey + PartialOrd> IndexedHeap<T> {
    /// Min-heap under the natural ordering of `T`.
    pub fn new(capacity: usize) -> Self {
        Self::with_comparator(capacity, natural_less::<T>)
    }
}

impl<T: HeapKey, C: Fn(&T, &T) -> bool> IndexedHeap<T, C> {
    /// Min-heap where `less(a, b)` means `a` sorts before `b`.
    pub fn with_comparator(capacity: usize, less: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            less,
            slot_of: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append at the first free leaf and sift up. O(log n).
    pub fn insert(&mut self, elem: T) {
        assert!(self.data.len() < self.capacity, "heap capacity exceeded");
        self.data.push(elem);
        self.sift_up(self.data.len() - 1);
    }

    /// Minimum element, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Remove and return the minimum element. The last leaf replaces the
    /// root and sifts down. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let res = self.data.pop()?;
        self.slot_of.remove(&res.heap_key());
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(res)
    }

    /// Replace the resident element carrying `elem`'s key and restore heap
    /// order from its slot, sifting up then down. O(log n).
    ///
    /// Panics if no resident element has that key; callers maintain
    /// residency by construction.
    pub fn reheap(&mut self, elem: T) {
        let slot = match self.slot_of.get(&elem.heap_key()) {
            Some(&slot) => slot,
            None => panic!("reheap of element not resident in heap"),
        };
        self.data[slot] = elem;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
    }

    fn sift_up(&mut self, mut n: usize) -> usize {
        while n > 0 {
            let parent = (n - 1) / 2;
            if !(self.less)(&self.data[n], &self.data[parent]) {
                break;
            }
            self.data.swap(n, parent);
            // the former parent now lives at slot n
            self.slot_of.insert(self.data[n].heap_key(), n);
            n = parent;
        }
        self.slot_of.insert(self.data[n].heap_key(), n);
        n
    }

    fn sift_down(&mut self, mut n: usize) -> usize {
        loop {
            let left = 2 * n + 1;
            let right = left + 1;
            let mut smallest = n;
            if left < self.data.len() && (self.less)(&self.data[left], &self.data[smallest]) {
                smallest = left;
            }
            if right < self.data.len() && (self.less)(&self.data[right], &self.data[smallest]) {
                smallest = right;
            }
            if smallest == n {
                self.slot_of.insert(self.data[n].heap_key(), n);
                return n;
            }
            self.data.swap(n, smallest);
            // the former occupant of `smallest` now lives at slot n
            self.slot_of.insert(self.data[n].heap_key(), n);
            n = smallest;
        }
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[T] {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.slot_of.len(), self.data.len());
        for (i, elem) in self.data.iter().enumerate() {
            assert_eq!(self.slot_of.get(&elem.heap_key()), Some(&i));
            if i > 0 {
                let parent = (i - 1) / 2;
                assert!(!(self.less)(elem, &self.data[parent]));
            }
        }
    }
}
