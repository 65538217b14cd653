//! Position-only vertex welding.
//!
//! Vertices are snapped to a grid of `tolerance`-sized cells and every corner
//! that lands in an occupied cell reuses that cell's first vertex. Points
//! closer than `tolerance` can still straddle a cell boundary; that is
//! accepted, since welding only improves connectivity.

use std::collections::HashMap;

use foundation::math::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum WeldError {
    NonFiniteTolerance,
    NonPositiveTolerance,
    NonFinitePosition { index: usize },
}

impl std::fmt::Display for WeldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeldError::NonFiniteTolerance => write!(f, "weld tolerance is not finite"),
            WeldError::NonPositiveTolerance => write!(f, "weld tolerance must be positive"),
            WeldError::NonFinitePosition { index } => {
                write!(f, "vertex {index} has a non-finite position")
            }
        }
    }
}

impl std::error::Error for WeldError {}

/// A welded vertex buffer plus the triangles rewritten against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Welded {
    /// Representative positions, in first-use order over the triangle list.
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[usize; 3]>,
}

impl Welded {
    /// The identity "weld": every source vertex becomes its own node.
    pub fn unwelded(positions: &[Vec3], triangles: &[[usize; 3]]) -> Self {
        Self {
            positions: positions.to_vec(),
            triangles: triangles.to_vec(),
        }
    }
}

/// Merges vertices of `triangles` whose positions share a `tolerance` cell.
///
/// Vertices no triangle references are dropped. `triangles` must only hold
/// indices valid for `positions`.
pub fn weld(
    positions: &[Vec3],
    triangles: &[[usize; 3]],
    tolerance: f64,
) -> Result<Welded, WeldError> {
    if !tolerance.is_finite() {
        return Err(WeldError::NonFiniteTolerance);
    }
    if tolerance <= 0.0 {
        return Err(WeldError::NonPositiveTolerance);
    }

    let inv = 1.0 / tolerance;
    let mut cells: HashMap<[i64; 3], usize> = HashMap::new();
    // Source index -> welded index, filled lazily.
    let mut remap: Vec<Option<usize>> = vec![None; positions.len()];
    let mut welded_positions: Vec<Vec3> = Vec::new();
    let mut welded_triangles: Vec<[usize; 3]> = Vec::with_capacity(triangles.len());

    for tri in triangles {
        let mut out = [0usize; 3];
        for (slot, &src) in out.iter_mut().zip(tri.iter()) {
            if let Some(w) = remap[src] {
                *slot = w;
                continue;
            }
            let p = positions[src];
            let key = cell_key(p, inv).ok_or(WeldError::NonFinitePosition { index: src })?;
            let w = *cells.entry(key).or_insert_with(|| {
                welded_positions.push(p);
                welded_positions.len() - 1
            });
            remap[src] = Some(w);
            *slot = w;
        }
        welded_triangles.push(out);
    }

    Ok(Welded {
        positions: welded_positions,
        triangles: welded_triangles,
    })
}

fn cell_key(p: Vec3, inv_tolerance: f64) -> Option<[i64; 3]> {
    let q = |v: f64| {
        let s = (v * inv_tolerance).round();
        // `as` saturates; reject values that would alias at the i64 limits.
        (s.is_finite() && s.abs() < i64::MAX as f64).then_some(s as i64)
    };
    Some([q(p.x)?, q(p.y)?, q(p.z)?])
}
