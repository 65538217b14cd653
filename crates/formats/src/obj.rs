use foundation::math::Vec3;
use scene::TriangleMesh;

use crate::MeshLoadError;

/// Reads the geometry of a Wavefront OBJ document.
///
/// Only `v` and `f` records are interpreted; polygons are fan-triangulated and
/// every other record (normals, texture coordinates, groups, materials) is
/// skipped.
pub fn load_obj(src: &str) -> Result<TriangleMesh, MeshLoadError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (n, raw) in src.lines().enumerate() {
        let line = n + 1;
        let body = raw.split('#').next().unwrap_or("").trim();
        let mut parts = body.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut xyz = [0.0f64; 3];
                for c in xyz.iter_mut() {
                    let tok = parts.next().ok_or_else(|| MeshLoadError::Parse {
                        line,
                        message: "vertex needs three coordinates".to_string(),
                    })?;
                    *c = tok.parse().map_err(|_| MeshLoadError::Parse {
                        line,
                        message: format!("bad coordinate {tok:?}"),
                    })?;
                }
                positions.push(Vec3::from_array(xyz));
            }
            Some("f") => {
                let corners = parts
                    .map(|tok| resolve_index(tok, positions.len(), line))
                    .collect::<Result<Vec<u32>, _>>()?;
                if corners.len() < 3 {
                    return Err(MeshLoadError::Parse {
                        line,
                        message: format!("face has {} corners", corners.len()),
                    });
                }
                for k in 1..corners.len() - 1 {
                    indices.extend([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(TriangleMesh::indexed(positions, indices))
}

/// Maps one `v`, `v/vt`, `v//vn` or `v/vt/vn` corner to a zero-based index.
fn resolve_index(tok: &str, seen: usize, line: usize) -> Result<u32, MeshLoadError> {
    let head = tok.split('/').next().unwrap_or("");
    let raw: i64 = head.parse().map_err(|_| MeshLoadError::Parse {
        line,
        message: format!("bad face index {tok:?}"),
    })?;
    let resolved = match raw {
        r if r > 0 => r - 1,
        r if r < 0 => seen as i64 + r,
        _ => -1,
    };
    if resolved < 0 || resolved >= seen as i64 {
        return Err(MeshLoadError::Parse {
            line,
            message: format!("face index {raw} out of range for {seen} vertices"),
        });
    }
    Ok(resolved as u32)
}
