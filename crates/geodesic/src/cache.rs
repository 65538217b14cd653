use std::collections::BTreeMap;
use std::sync::Arc;

use foundation::math::Vec3;
use runtime::Metrics;
use scene::{MeshId, MeshRegistry};
use tracing::{debug, info};

use crate::compose::{self, SurfacePath};
use crate::config::GeodesicConfig;
use crate::error::GeodesicError;
use crate::graph::{Graph, build_graph};

const GRAPH_BUILDS: &str = "geodesic.graph_builds";
const GRAPH_EDGES: &str = "geodesic.graph_edges";
const CACHE_HITS: &str = "geodesic.cache_hits";

/// Per-mesh graph cache.
///
/// Graphs are keyed by [`MeshId`]; since a replaced mesh gets a new id, a
/// stale graph is never served for new geometry. Entries for ids that are no
/// longer live can be dropped with [`GraphCache::retain_live`].
///
/// Access is `&mut self`, so at most one build runs per cache at a time and a
/// completed build is visible to every later call.
#[derive(Debug, Default)]
pub struct GraphCache {
    config: GeodesicConfig,
    graphs: BTreeMap<MeshId, Arc<Graph>>,
    metrics: Metrics,
}

impl GraphCache {
    pub fn new(config: GeodesicConfig) -> Self {
        Self {
            config,
            graphs: BTreeMap::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &GeodesicConfig {
        &self.config
    }

    pub fn get(&self, id: MeshId) -> Option<Arc<Graph>> {
        self.graphs.get(&id).cloned()
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.graphs.contains_key(&id)
    }

    /// Returns the cached graph for `id`, building it on a miss.
    ///
    /// The mesh is looked up in `registry`, so a graph is always built from
    /// the geometry its id names.
    pub fn ensure_graph_now(
        &mut self,
        registry: &MeshRegistry,
        id: MeshId,
    ) -> Result<Arc<Graph>, GeodesicError> {
        let mesh = registry.get(id).ok_or(GeodesicError::UnknownMesh)?;
        if let Some(graph) = self.graphs.get(&id) {
            self.metrics.incr(CACHE_HITS);
            return Ok(Arc::clone(graph));
        }

        let (graph, report) = build_graph(mesh, &self.config)?;
        let graph = Arc::new(graph);
        self.metrics.incr(GRAPH_BUILDS);
        self.metrics.observe(GRAPH_EDGES, report.edges as f64);
        info!(
            mesh = id.index(),
            generation = id.generation(),
            vertices = report.graph_vertices,
            edges = report.edges,
            "geodesic graph ready"
        );
        self.graphs.insert(id, Arc::clone(&graph));
        Ok(graph)
    }

    /// Async form of [`GraphCache::ensure_graph_now`].
    ///
    /// On a miss the task yields once before building so a UI loop gets a
    /// frame in; hits resolve without suspending.
    pub async fn ensure_graph(
        &mut self,
        registry: &MeshRegistry,
        id: MeshId,
    ) -> Result<Arc<Graph>, GeodesicError> {
        if !self.contains(id) {
            runtime::yield_now().await;
        }
        self.ensure_graph_now(registry, id)
    }

    pub async fn surface_path(
        &mut self,
        registry: &MeshRegistry,
        id: MeshId,
        a: Vec3,
        b: Vec3,
    ) -> Result<SurfacePath, GeodesicError> {
        let graph = self.ensure_graph(registry, id).await?;
        compose::surface_path(&graph, a, b)
    }

    pub async fn surface_polyline(
        &mut self,
        registry: &MeshRegistry,
        id: MeshId,
        waypoints: &[Vec3],
    ) -> Result<SurfacePath, GeodesicError> {
        // Fail fast before paying for a build.
        if waypoints.len() < 2 {
            return Err(GeodesicError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        let graph = self.ensure_graph(registry, id).await?;
        compose::surface_polyline(&graph, waypoints)
    }

    pub fn forget(&mut self, id: MeshId) -> bool {
        self.graphs.remove(&id).is_some()
    }

    /// Drops graphs whose mesh id no longer resolves in `registry`.
    pub fn retain_live(&mut self, registry: &MeshRegistry) -> usize {
        let before = self.graphs.len();
        self.graphs.retain(|id, _| registry.contains(*id));
        let dropped = before - self.graphs.len();
        if dropped > 0 {
            debug!(dropped, "evicted stale geodesic graphs");
        }
        dropped
    }

    /// Number of graphs built over the cache's lifetime.
    pub fn build_count(&self) -> u64 {
        self.metrics.counter(GRAPH_BUILDS)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::GraphCache;
    use crate::config::{GeodesicConfig, WeldTolerance};
    use crate::error::GeodesicError;
    use crate::test_meshes::{split_quad, unit_cube};
    use foundation::math::{Affine3, Vec3};
    use scene::{MeshRegistry, TriangleMesh};
    use std::sync::Arc;

    #[test]
    fn repeated_ensure_returns_the_same_graph() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();

        let first = pollster::block_on(cache.ensure_graph(&registry, id)).expect("graph");
        let second = pollster::block_on(cache.ensure_graph(&registry, id)).expect("graph");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.build_count(), 1);
        assert_eq!(cache.metrics().counter("geodesic.cache_hits"), 1);
        let edges = cache.metrics().summary("geodesic.graph_edges").expect("edge summary");
        assert_eq!((edges.count, edges.max), (1, 18.0));
    }

    #[test]
    fn queries_share_one_build() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();

        for _ in 0..4 {
            let path = pollster::block_on(cache.surface_path(
                &registry,
                id,
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ))
            .expect("path");
            assert!((path.length - 2f64.sqrt()).abs() < 1e-12);
        }
        let line = pollster::block_on(cache.surface_polyline(
            &registry,
            id,
            &[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
        ))
        .expect("polyline");
        assert_eq!(line.length, 1.0);
        assert_eq!(cache.build_count(), 1);
    }

    #[test]
    fn replaced_mesh_gets_a_fresh_graph() {
        let mut registry = MeshRegistry::new();
        let old_id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();
        let old_graph = cache.ensure_graph_now(&registry, old_id).expect("graph");

        let scaled = unit_cube().with_transform(Affine3::from_scale(2.0));
        let new_id = registry.replace(old_id, scaled).expect("replace");
        assert_ne!(old_id, new_id);

        let new_graph = cache.ensure_graph_now(&registry, new_id).expect("graph");
        assert!(!Arc::ptr_eq(&old_graph, &new_graph));
        assert_eq!(cache.build_count(), 2);

        let path = pollster::block_on(cache.surface_path(
            &registry,
            new_id,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ))
        .expect("path");
        assert_eq!(path.length, 2.0);

        assert_eq!(cache.retain_live(&registry), 1);
        assert!(!cache.contains(old_id));
        assert!(cache.contains(new_id));
    }

    #[test]
    fn stale_ids_are_rejected() {
        let mut registry = MeshRegistry::new();
        let old_id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();
        cache.ensure_graph_now(&registry, old_id).expect("graph");

        registry.replace(old_id, split_quad()).expect("replace");
        assert_eq!(
            cache.ensure_graph_now(&registry, old_id).unwrap_err(),
            GeodesicError::UnknownMesh
        );
        assert_eq!(cache.build_count(), 1);
    }

    #[test]
    fn forget_forces_a_rebuild() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();
        cache.ensure_graph_now(&registry, id).expect("graph");
        assert!(cache.forget(id));
        assert!(!cache.forget(id));
        assert!(cache.is_empty());
        cache.ensure_graph_now(&registry, id).expect("graph");
        assert_eq!(cache.build_count(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn build_uses_cache_config() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(split_quad());
        let mut welded = GraphCache::default();
        let mut raw = GraphCache::new(GeodesicConfig::new(WeldTolerance::Disabled));
        assert_eq!(welded.ensure_graph_now(&registry, id).expect("graph").vertex_count(), 4);
        assert_eq!(raw.ensure_graph_now(&registry, id).expect("graph").vertex_count(), 6);
        assert_eq!(raw.config().weld, WeldTolerance::Disabled);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(TriangleMesh::soup(Vec::new()));
        let mut cache = GraphCache::default();
        assert_eq!(
            pollster::block_on(cache.ensure_graph(&registry, id)).unwrap_err(),
            GeodesicError::EmptyMesh
        );
        assert!(cache.is_empty());
        assert_eq!(cache.build_count(), 0);
    }

    #[test]
    fn short_polyline_fails_without_building() {
        let mut registry = MeshRegistry::new();
        let id = registry.insert(unit_cube());
        let mut cache = GraphCache::default();
        let err = pollster::block_on(cache.surface_polyline(&registry, id, &[Vec3::ZERO])).unwrap_err();
        assert_eq!(err, GeodesicError::TooFewWaypoints { count: 1 });
        assert_eq!(cache.build_count(), 0);
    }
}
