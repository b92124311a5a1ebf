//! The fixed-capacity collection that a k-nearest-neighbour query accumulates
//! its candidates in.

use crate::nearest_neighbour::NearestNeighbour;
use crate::types::{Axis, Content};

/// Holds at most `capacity` candidates, keeping the closest seen so far.
///
/// Once full, a new candidate evicts the current worst entry if it is strictly
/// closer. When several entries share the maximum distance, the one at the
/// lowest slot is evicted. The slot of the worst entry is kept up to date as
/// entries arrive, and found again with a linear scan only after an eviction.
/// For the small `k` this is used with, the scan is cheaper than maintaining
/// a heap, and it keeps the eviction order fully determined.
#[derive(Debug, Clone)]
pub struct BoundedResultSet<A: Axis, T> {
    entries: Vec<NearestNeighbour<A, T>>,
    capacity: usize,
    worst: Option<usize>,
}

impl<A: Axis, T: Content> BoundedResultSet<A, T> {
    /// Creates an empty set that will hold up to `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            // capacity comes from the caller and may far exceed the tree size
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
            worst: None,
        }
    }

    /// Offers a candidate to the set, returning whether it was kept.
    ///
    /// Appended unconditionally while the set is not yet full; afterwards it
    /// replaces the first entry holding the maximum distance, but only if its
    /// own distance is strictly smaller.
    pub fn offer(&mut self, entry: NearestNeighbour<A, T>) -> bool {
        if self.entries.len() < self.capacity {
            // a later entry only becomes the worst if strictly further
            if self.worst_distance().map_or(true, |worst| entry.distance > worst) {
                self.worst = Some(self.entries.len());
            }
            self.entries.push(entry);
            return true;
        }

        match self.worst {
            Some(idx) if entry.distance < self.entries[idx].distance => {
                self.entries[idx] = entry;
                self.worst = self.find_worst();
                true
            }
            _ => false,
        }
    }

    /// Returns the largest distance currently held, or `None` when empty.
    pub fn worst_distance(&self) -> Option<A::Distance> {
        self.worst.map(|idx| self.entries[idx].distance)
    }

    /// Whether the set holds as many entries as its capacity.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether [`offer`](Self::offer) would keep a candidate at `dist`.
    pub fn accepts(&self, dist: A::Distance) -> bool {
        if !self.is_full() {
            return true;
        }
        self.worst_distance().is_some_and(|worst| dist < worst)
    }

    /// Whether a region at least `bound` away from the query could still hold
    /// a candidate worth visiting: always while the set is not full, afterwards
    /// only if `bound` does not exceed the current worst distance.
    pub(crate) fn within_reach(&self, bound: A::Distance) -> bool {
        if !self.is_full() {
            return true;
        }
        self.worst_distance().is_some_and(|worst| worst >= bound)
    }

    /// Consumes the set, returning the entries in slot order.
    pub fn into_vec(self) -> Vec<NearestNeighbour<A, T>> {
        self.entries
    }

    /// Consumes the set, returning the entries ordered by ascending distance.
    ///
    /// The sort is stable: entries at equal distance keep their slot order.
    pub fn into_sorted_vec(mut self) -> Vec<NearestNeighbour<A, T>> {
        self.entries.sort_by(|a, b| a.distance.cmp(&b.distance));
        self.entries
    }

    fn find_worst(&self) -> Option<usize> {
        let mut iter = self.entries.iter().enumerate();
        let (mut worst_idx, first) = iter.next()?;
        let mut worst_dist = first.distance;
        for (idx, entry) in iter {
            if entry.distance > worst_dist {
                worst_idx = idx;
                worst_dist = entry.distance;
            }
        }
        Some(worst_idx)
    }
}
