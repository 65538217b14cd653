use foundation::math::{Affine3, Vec3};
use scene::TriangleMesh;
use serde::{Deserialize, Serialize};

use crate::MeshLoadError;

/// JSON interchange form of a [`TriangleMesh`].
///
/// `transform` is a row-major 3x4 local-to-world matrix; absent means identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub positions: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 12]>,
}

impl MeshDocument {
    pub fn from_json(src: &str) -> Result<Self, MeshLoadError> {
        serde_json::from_str(src).map_err(MeshLoadError::Json)
    }

    pub fn to_json(&self) -> Result<String, MeshLoadError> {
        serde_json::to_string_pretty(self).map_err(MeshLoadError::Json)
    }

    pub fn into_mesh(self) -> TriangleMesh {
        let positions = self.positions.into_iter().map(Vec3::from_array).collect();
        let mesh = TriangleMesh::new(positions, self.indices);
        match self.transform {
            Some(rows) => mesh.with_transform(Affine3::from_rows_3x4(&rows)),
            None => mesh,
        }
    }

    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let t = mesh.transform();
        let transform = (*t != Affine3::identity()).then(|| {
            let mut rows = [0.0; 12];
            for (r, row) in t.linear.iter().enumerate() {
                rows[r * 4..r * 4 + 3].copy_from_slice(row);
                rows[r * 4 + 3] = t.translation.to_array()[r];
            }
            rows
        });
        Self {
            positions: mesh.positions().iter().map(|p| p.to_array()).collect(),
            indices: mesh.indices().map(<[u32]>::to_vec),
            transform,
        }
    }
}

pub fn load_mesh_json(src: &str) -> Result<TriangleMesh, MeshLoadError> {
    MeshDocument::from_json(src).map(MeshDocument::into_mesh)
}
