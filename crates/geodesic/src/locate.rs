use foundation::math::Vec3;

use crate::graph::Graph;

/// Index of the graph vertex closest to `p` (Euclidean, world space).
///
/// Linear scan; ties keep the lowest index. `None` only for an empty graph.
pub fn nearest_vertex(graph: &Graph, p: Vec3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in graph.vertices().iter().enumerate() {
        let d = v.distance_squared(p);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::nearest_vertex;
    use crate::config::GeodesicConfig;
    use crate::graph::build_graph;
    use crate::test_meshes::unit_cube;
    use foundation::math::Vec3;

    #[test]
    fn snaps_to_the_closest_corner() {
        let (graph, _) = build_graph(&unit_cube(), &GeodesicConfig::default()).expect("build");
        let i = nearest_vertex(&graph, Vec3::new(0.9, 0.1, 1.2)).expect("vertex");
        assert_eq!(graph.vertices()[i], Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn ties_keep_the_first_vertex() {
        let (graph, _) = build_graph(&unit_cube(), &GeodesicConfig::default()).expect("build");
        // Centre of the cube is equidistant from all corners.
        assert_eq!(nearest_vertex(&graph, Vec3::new(0.5, 0.5, 0.5)), Some(0));
    }

    #[test]
    fn exact_vertex_maps_to_itself() {
        let (graph, _) = build_graph(&unit_cube(), &GeodesicConfig::default()).expect("build");
        for (i, v) in graph.vertices().iter().enumerate() {
            assert_eq!(nearest_vertex(&graph, *v), Some(i));
        }
    }
}
