use crate::math::Vec3;

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Tight bounds of `points`; `None` when empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (lo, hi) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Aabb3::new(lo.to_array(), hi.to_array()))
    }

    pub fn size(&self) -> Vec3 {
        Vec3::from_array(self.max) - Vec3::from_array(self.min)
    }

    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }
}
