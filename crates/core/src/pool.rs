//! Pool of reusable leftover boxes.
//!
//! Boxes are retrieved largest-minimum-side first. Equal minimum sides are
//! served in insertion order.

use crate::detail::Detail;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordering by `min(width, height)`, then by age.
#[derive(Debug, Clone)]
struct PooledBox {
    min_side: f64,
    seq: u64,
    detail: Detail,
}

impl PartialEq for PooledBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PooledBox {}

impl PartialOrd for PooledBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PooledBox {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: larger min side first, then the older entry (smaller seq)
        self.min_side
            .total_cmp(&other.min_side)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Ordered collection of leftover rectangles available as future stripes.
#[derive(Debug, Clone, Default)]
pub struct BoxPool {
    heap: BinaryHeap<PooledBox>,
    next_seq: u64,
}

impl BoxPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box to the pool.
    pub fn insert(&mut self, detail: Detail) {
        let entry = PooledBox {
            min_side: detail.min_side(),
            seq: self.next_seq,
            detail,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    /// Returns the box with the largest minimum side, if any.
    pub fn peek_best(&self) -> Option<&Detail> {
        self.heap.peek().map(|entry| &entry.detail)
    }

    /// Minimum side of the best box, if any.
    pub fn best_min_side(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.min_side)
    }

    /// Removes and returns the box with the largest minimum side.
    pub fn remove_best(&mut self) -> Option<Detail> {
        self.heap.pop().map(|entry| entry.detail)
    }

    /// Number of pooled boxes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no boxes are pooled.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterates over pooled boxes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Detail> {
        self.heap.iter().map(|entry| &entry.detail)
    }

    /// Total area of all pooled boxes.
    pub fn total_area(&self) -> f64 {
        self.iter().map(Detail::area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailType;

    fn rect(name: &str, w: f64, h: f64) -> Detail {
        Detail::new((0.0, 0.0), (w, h), name, DetailType::NormalBox1)
    }

    #[test]
    fn test_empty_pool() {
        let mut pool = BoxPool::new();
        assert!(pool.is_empty());
        assert!(pool.peek_best().is_none());
        assert!(pool.best_min_side().is_none());
        assert!(pool.remove_best().is_none());
    }

    #[test]
    fn test_largest_min_side_first() {
        let mut pool = BoxPool::new();
        pool.insert(rect("thin", 100.0, 1.0));
        pool.insert(rect("square", 5.0, 5.0));
        pool.insert(rect("wide", 3.0, 20.0));

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.peek_best().map(|d| d.name.as_str()), Some("square"));
        assert_eq!(pool.best_min_side(), Some(5.0));

        let order: Vec<String> = std::iter::from_fn(|| pool.remove_best())
            .map(|d| d.name)
            .collect();
        assert_eq!(order, vec!["square", "wide", "thin"]);
    }

    #[test]
    fn test_ties_resolved_by_insertion_order() {
        let mut pool = BoxPool::new();
        pool.insert(rect("first", 2.0, 7.0));
        pool.insert(rect("second", 9.0, 2.0));
        pool.insert(rect("third", 2.0, 2.0));

        assert_eq!(pool.remove_best().unwrap().name, "first");
        assert_eq!(pool.remove_best().unwrap().name, "second");
        assert_eq!(pool.remove_best().unwrap().name, "third");
    }

    #[test]
    fn test_total_area() {
        let mut pool = BoxPool::new();
        pool.insert(rect("a", 2.0, 3.0));
        pool.insert(rect("b", 1.0, 4.0));
        assert_eq!(pool.total_area(), 10.0);
        assert_eq!(pool.iter().count(), 2);
    }
}
