//! Adjacency queries over a placed-details collection.

use gamma_pack_core::Detail;
use std::collections::HashSet;

/// Returns true if the closed rectangles share at least a boundary point.
pub fn touches(a: &Detail, b: &Detail, epsilon: f64) -> bool {
    a.bottom_left.x <= b.top_right.x + epsilon
        && b.bottom_left.x <= a.top_right.x + epsilon
        && a.bottom_left.y <= b.top_right.y + epsilon
        && b.bottom_left.y <= a.top_right.y + epsilon
}

/// Collects `target` and every detail reachable from it in at most `depth`
/// adjacency steps, in breadth-first order.
pub fn find_neighbours_of_depth<'a>(
    details: &'a [Detail],
    target: &Detail,
    depth: usize,
) -> Vec<&'a Detail> {
    let Some(start) = details.iter().position(|d| d == target) else {
        return Vec::new();
    };

    let mut visited: HashSet<usize> = HashSet::from([start]);
    let mut order = vec![start];
    let mut frontier = vec![start];

    for _ in 0..depth {
        let mut next = Vec::new();
        for &current in &frontier {
            for (i, candidate) in details.iter().enumerate() {
                if !visited.contains(&i) && touches(&details[current], candidate, 1e-12) {
                    visited.insert(i);
                    next.push(i);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        order.extend_from_slice(&next);
        frontier = next;
    }

    order.into_iter().map(|i| &details[i]).collect()
}
