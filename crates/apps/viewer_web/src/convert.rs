//! Conversions between JS-side buffers and engine types.

use foundation::handles::Handle;
use foundation::math::{Affine3, Vec3};
use scene::{MeshId, TriangleMesh};

pub fn mesh_id_from_bits(bits: u64) -> MeshId {
    MeshId(Handle::from_bits(bits))
}

pub fn mesh_id_to_bits(id: MeshId) -> u64 {
    id.0.to_bits()
}

/// Builds a mesh from a three.js-style `BufferGeometry` and `matrixWorld`.
///
/// `matrix_world` is the 16-element column-major array; absent means identity.
pub fn mesh_from_buffers(
    positions: &[f32],
    indices: Option<Vec<u32>>,
    matrix_world: Option<Vec<f64>>,
) -> Result<TriangleMesh, String> {
    if positions.len() % 3 != 0 {
        return Err(format!(
            "position buffer length {} is not a multiple of 3",
            positions.len()
        ));
    }
    let mesh = TriangleMesh::from_flat_f32(positions, indices);
    match matrix_world {
        None => Ok(mesh),
        Some(m) => {
            let cols: [f64; 16] = m
                .as_slice()
                .try_into()
                .map_err(|_| format!("matrixWorld needs 16 elements, got {}", m.len()))?;
            Ok(mesh.with_transform(Affine3::from_cols_array(&cols)))
        }
    }
}

/// Splits a flat `[x0, y0, z0, x1, ...]` buffer into points.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<Vec3>, String> {
    if flat.len() % 3 != 0 {
        return Err(format!(
            "point buffer length {} is not a multiple of 3",
            flat.len()
        ));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect())
}

pub fn points_to_flat(points: &[Vec3]) -> Vec<f64> {
    points.iter().flat_map(|p| p.to_array()).collect()
}
