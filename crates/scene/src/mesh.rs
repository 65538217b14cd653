use foundation::bounds::Aabb3;
use foundation::handles::Handle;
use foundation::math::{Affine3, Vec3};

/// Identity of a mesh instance inside a [`crate::MeshRegistry`].
///
/// Replacing a mesh yields a new id (same slot, next generation), so anything
/// keyed by `MeshId` goes stale together with the mesh it was derived from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(pub Handle);

impl MeshId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

/// A triangle mesh as produced by an asset loader.
///
/// Positions are in the mesh's local space; `transform` maps them to world
/// space. Without an index list, positions are read as sequential triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    indices: Option<Vec<u32>>,
    transform: Affine3,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        Self {
            positions,
            indices,
            transform: Affine3::identity(),
        }
    }

    pub fn indexed(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self::new(positions, Some(indices))
    }

    /// Triangle soup: every three consecutive positions form one triangle.
    pub fn soup(positions: Vec<Vec3>) -> Self {
        Self::new(positions, None)
    }

    pub fn with_transform(mut self, transform: Affine3) -> Self {
        self.transform = transform;
        self
    }

    /// Builds from flat `f32` buffers as handed over by a GPU-oriented loader.
    pub fn from_flat_f32(positions: &[f32], indices: Option<Vec<u32>>) -> Self {
        let positions = positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64))
            .collect();
        Self::new(positions, indices)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn transform(&self) -> &Affine3 {
        &self.transform
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of complete triangles described by the index list (or soup).
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(ix) => ix.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Iterates complete triangles as vertex-index triples.
    ///
    /// A trailing partial triple is not yielded; validating that case is the
    /// consumer's concern.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(ix) => [ix[3 * t], ix[3 * t + 1], ix[3 * t + 2]],
            None => {
                let base = (3 * t) as u32;
                [base, base + 1, base + 2]
            }
        })
    }

    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        self.positions
            .get(index)
            .map(|p| self.transform.transform_point(*p))
    }

    pub fn local_bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(self.positions.iter().copied())
    }

    pub fn world_bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(
            self.positions
                .iter()
                .map(|p| self.transform.transform_point(*p)),
        )
    }
}
