//! On-surface distance engine.
//!
//! A triangle mesh is turned into a weighted edge graph over its (welded)
//! vertices; distances and paths are shortest paths in that graph. This is an
//! edge-graph approximation of surface distance, not an exact geodesic.
//!
//! Entry points live on [`GraphCache`]: `ensure_graph`, `surface_path` and
//! `surface_polyline`. The synchronous building blocks ([`build_graph`],
//! [`shortest_path`], [`nearest_vertex`], [`compose`]) are exposed for callers
//! that manage graphs themselves.

pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod graph;
pub mod heap;
pub mod locate;
pub mod solver;
pub mod weld;

#[cfg(test)]
pub(crate) mod test_meshes;

pub use cache::*;
pub use compose::{SurfacePath, surface_path, surface_polyline};
pub use config::*;
pub use error::*;
pub use graph::*;
pub use locate::*;
pub use solver::*;
