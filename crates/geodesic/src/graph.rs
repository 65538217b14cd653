use foundation::math::Vec3;
use scene::TriangleMesh;
use tracing::{debug, warn};

use crate::config::GeodesicConfig;
use crate::error::GeodesicError;
use crate::weld::{Welded, weld};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Edge {
    pub to: usize,
    /// World-space Euclidean length; always finite and positive.
    pub weight: f64,
}

/// Undirected, weighted vertex graph of a mesh surface.
///
/// Invariants:
/// - every edge is stored on both endpoints with the same weight;
/// - a vertex lists each neighbor at most once (first weight seen wins);
/// - no self-loops, no zero-length or non-finite edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    vertices: Vec<Vec3>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// World-space vertex positions, index-aligned with the (welded) buffer.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        self.vertices.get(index).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn neighbors(&self, index: usize) -> &[Edge] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.neighbors(a)
            .iter()
            .find(|e| e.to == b)
            .map(|e| e.weight)
    }

    fn with_vertices(vertices: Vec<Vec3>) -> Self {
        let adjacency = vec![Vec::new(); vertices.len()];
        Self {
            vertices,
            adjacency,
            edge_count: 0,
        }
    }

    /// Adds the undirected edge `a`–`b` unless it is degenerate or already present.
    fn add_edge(&mut self, a: usize, b: usize) -> EdgeInsert {
        if a == b {
            return EdgeInsert::Degenerate;
        }
        let weight = self.vertices[a].distance(self.vertices[b]);
        // NaN fails the comparison and is rejected here too.
        if !(weight > 0.0 && weight.is_finite()) {
            return EdgeInsert::Degenerate;
        }
        if self.adjacency[a].iter().any(|e| e.to == b) {
            return EdgeInsert::Duplicate;
        }
        self.adjacency[a].push(Edge { to: b, weight });
        self.adjacency[b].push(Edge { to: a, weight });
        self.edge_count += 1;
        EdgeInsert::Added
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EdgeInsert {
    Added,
    Duplicate,
    Degenerate,
}

/// What a graph build did, for logging and diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source_vertices: usize,
    pub graph_vertices: usize,
    pub triangles: usize,
    pub edges: usize,
    /// Triangle edges dropped as self-loops, zero-length or non-finite.
    pub degenerate_edges: usize,
    pub welded: bool,
}

/// Builds the surface graph of `mesh`.
///
/// Fails only on malformed topology (see [`GeodesicError`]). A failed weld
/// falls back to the unwelded buffer.
pub fn build_graph(
    mesh: &TriangleMesh,
    config: &GeodesicConfig,
) -> Result<(Graph, BuildReport), GeodesicError> {
    let triangles = validated_triangles(mesh)?;
    let positions = mesh.positions();

    let (welded, did_weld) = match config.weld.resolve(mesh) {
        None => (Welded::unwelded(positions, &triangles), false),
        Some(tol) => match weld(positions, &triangles, tol) {
            Ok(w) => (w, true),
            Err(err) => {
                warn!(%err, tolerance = tol, "vertex weld failed; using unwelded buffer");
                (Welded::unwelded(positions, &triangles), false)
            }
        },
    };

    let transform = mesh.transform();
    let world: Vec<Vec3> = welded
        .positions
        .iter()
        .map(|p| transform.transform_point(*p))
        .collect();

    let mut graph = Graph::with_vertices(world);
    let mut degenerate_edges = 0usize;
    for &[a, b, c] in &welded.triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if graph.add_edge(u, v) == EdgeInsert::Degenerate {
                degenerate_edges += 1;
            }
        }
    }

    let report = BuildReport {
        source_vertices: positions.len(),
        graph_vertices: graph.vertex_count(),
        triangles: triangles.len(),
        edges: graph.edge_count(),
        degenerate_edges,
        welded: did_weld,
    };
    debug!(
        source_vertices = report.source_vertices,
        graph_vertices = report.graph_vertices,
        triangles = report.triangles,
        edges = report.edges,
        degenerate_edges = report.degenerate_edges,
        welded = report.welded,
        "built surface graph"
    );
    Ok((graph, report))
}

fn validated_triangles(mesh: &TriangleMesh) -> Result<Vec<[usize; 3]>, GeodesicError> {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return Err(GeodesicError::EmptyMesh);
    }

    match mesh.indices() {
        Some(indices) => {
            if indices.len() % 3 != 0 {
                return Err(GeodesicError::IndexCountNotTriangles {
                    index_count: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeodesicError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        None => {
            if vertex_count % 3 != 0 {
                return Err(GeodesicError::UnindexedVertexCount { vertex_count });
            }
        }
    }

    let triangles: Vec<[usize; 3]> = mesh
        .triangles()
        .map(|[a, b, c]| [a as usize, b as usize, c as usize])
        .collect();
    if triangles.is_empty() {
        return Err(GeodesicError::EmptyMesh);
    }
    Ok(triangles)
}
