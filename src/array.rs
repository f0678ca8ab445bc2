// ── Expandable array ──────────────────────────────────────────────────────────
//
// Ordered, growable storage for dialog controls.  The array always owns one
// staging slot beyond its logical length: a new element is written into that
// slot in place (the control parser fills it field by field) and then either
// committed, which makes it part of the array, or discarded.
//
// Storage grows geometrically and is never shrunk automatically.

use std::ops::{Index, IndexMut};

use serde::{Serialize, Serializer};

/// Number of slots reserved by [`ExpArray::new`].
pub const DEFAULT_RESERVE: usize = 16;

/// Growable sequence with a staging slot.
///
/// Invariant: `slots.len() == len + 1`; the final slot is the staging slot
/// and is never visible through the logical API (`get`, `iter`, indexing).
#[derive(Debug, Clone)]
pub struct ExpArray<T> {
    slots: Vec<T>,
}

impl<T: Default> ExpArray<T> {
    /// An empty array with [`DEFAULT_RESERVE`] slots allocated up front.
    pub fn new() -> Self {
        Self::with_reserve(DEFAULT_RESERVE)
    }

    /// An empty array with room for `reserve` elements (at least one, the
    /// staging slot).
    pub fn with_reserve(reserve: usize) -> Self {
        let mut slots = Vec::with_capacity(reserve.max(1));
        slots.push(T::default());
        Self { slots }
    }

    /// Number of committed elements.
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated slots, staging slot included.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// The committed elements, in order.
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len()]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        &mut self.slots[..len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    // ── Staging ───────────────────────────────────────────────────────────────

    /// The spare slot one past the last committed element.
    pub fn staging(&self) -> &T {
        &self.slots[self.len()]
    }

    pub fn staging_mut(&mut self) -> &mut T {
        let len = self.len();
        &mut self.slots[len]
    }

    /// Confirm the staging slot as a new element and open a fresh staging
    /// slot behind it.  Returns the index of the committed element.
    pub fn commit(&mut self) -> usize {
        let index = self.len();
        self.grow();
        self.slots.push(T::default());
        index
    }

    /// Reset the staging slot to its default value.
    pub fn discard_staging(&mut self) {
        *self.staging_mut() = T::default();
    }

    // ── Convenience ───────────────────────────────────────────────────────────

    /// Append `value`, returning its index.
    pub fn push(&mut self, value: T) -> usize {
        *self.staging_mut() = value;
        self.commit()
    }

    /// Remove the element at `index`, shifting later elements down.
    /// Allocated storage is kept.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.len()).then(|| self.slots.remove(index))
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.slots.push(T::default());
    }

    /// Double the allocation once every slot is in use.
    fn grow(&mut self) {
        let cap = self.slots.capacity();
        if self.slots.len() >= cap {
            self.slots.reserve_exact(cap.max(1));
        }
    }
}

impl<T: Default> Default for ExpArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> Index<usize> for ExpArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Default> IndexMut<usize> for ExpArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T: Default> IntoIterator for &'a ExpArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Default> FromIterator<T> for ExpArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl<T: Default + PartialEq> PartialEq for ExpArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

// Only committed elements are serialized; the staging slot is an
// implementation detail.
impl<T: Default + Serialize> Serialize for ExpArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
