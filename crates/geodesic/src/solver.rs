use tracing::trace;

use crate::error::GeodesicError;
use crate::graph::Graph;
use crate::heap::MinHeap;

/// Result of a single-pair search over graph vertex indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Vertex indices from start to goal; empty when unreachable.
    pub path: Vec<usize>,
    /// Sum of edge weights; `f64::INFINITY` when unreachable.
    pub length: f64,
}

impl ShortestPath {
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            length: f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.length.is_finite()
    }
}

/// Dijkstra from `start` to `goal`, stopping once `goal` is settled.
///
/// An unreachable goal (disconnected islands) is a normal result, not an error.
pub fn shortest_path(
    graph: &Graph,
    start: usize,
    goal: usize,
) -> Result<ShortestPath, GeodesicError> {
    let n = graph.vertex_count();
    for index in [start, goal] {
        if index >= n {
            return Err(GeodesicError::VertexOutOfRange {
                index,
                vertex_count: n,
            });
        }
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut heap = MinHeap::with_capacity(n);
    let mut settled = 0usize;

    dist[start] = 0.0;
    heap.push(start, 0.0);

    while let Some((u, d)) = heap.pop() {
        // Stale entry: a shorter distance was pushed after this one.
        if d != dist[u] {
            continue;
        }
        settled += 1;
        if u == goal {
            break;
        }
        for e in graph.neighbors(u) {
            let nd = d + e.weight;
            if nd < dist[e.to] {
                dist[e.to] = nd;
                prev[e.to] = Some(u);
                heap.push(e.to, nd);
            }
        }
    }

    if goal != start && prev[goal].is_none() {
        trace!(start, goal, settled, "goal unreachable");
        return Ok(ShortestPath::unreachable());
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(p) = prev[cursor] {
        path.push(p);
        cursor = p;
    }
    path.reverse();

    trace!(start, goal, settled, hops = path.len() - 1, length = dist[goal], "solved");
    Ok(ShortestPath {
        path,
        length: dist[goal],
    })
}
