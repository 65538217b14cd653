use std::cmp::Reverse;
use std::collections::BinaryHeap;

use foundation::math::StableF64;

/// Binary min-heap of `(vertex, tentative distance)` entries.
///
/// There is no decrease-key: improved distances are pushed again and the
/// solver discards stale pops. Equal distances pop the lower vertex first.
#[derive(Debug, Default)]
pub struct MinHeap {
    entries: BinaryHeap<Reverse<(StableF64, usize)>>,
}

impl MinHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, vertex: usize, distance: f64) {
        self.entries.push(Reverse((StableF64(distance), vertex)));
    }

    pub fn pop(&mut self) -> Option<(usize, f64)> {
        self.entries
            .pop()
            .map(|Reverse((distance, vertex))| (vertex, distance.0))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MinHeap;

    #[test]
    fn pops_in_ascending_distance() {
        let mut heap = MinHeap::new();
        heap.push(1, 3.0);
        heap.push(2, 0.5);
        heap.push(3, 2.0);
        heap.push(4, f64::INFINITY);
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|(v, _)| v)).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
    }

    #[test]
    fn keeps_duplicate_entries() {
        let mut heap = MinHeap::with_capacity(4);
        heap.push(7, 5.0);
        heap.push(7, 1.0);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.pop(), Some((7, 1.0)));
        assert_eq!(heap.pop(), Some((7, 5.0)));
        assert!(heap.is_empty());
    }

    #[test]
    fn ties_break_on_lower_vertex() {
        let mut heap = MinHeap::new();
        heap.push(9, 1.0);
        heap.push(4, 1.0);
        assert_eq!(heap.pop(), Some((4, 1.0)));
    }
}
