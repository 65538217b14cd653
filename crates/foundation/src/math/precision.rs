use core::cmp::Ordering;

/// Maps `-0.0` to `0.0` and every NaN to one bit pattern.
pub fn canonical_f64(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// `total_cmp` over canonicalized values: `-0.0 == 0.0`, NaN sorts after `+inf`.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Totally ordered `f64`, for priority queues and sorted keys.
#[derive(Debug, Copy, Clone, Default)]
pub struct StableF64(pub f64);

impl StableF64 {
    pub fn new(v: f64) -> Self {
        StableF64(canonical_f64(v))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for StableF64 {
    fn from(v: f64) -> Self {
        StableF64::new(v)
    }
}

impl Ord for StableF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        stable_total_cmp_f64(self.0, other.0)
    }
}

impl PartialOrd for StableF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for StableF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for StableF64 {}

#[cfg(test)]
mod tests {
    use super::{StableF64, stable_total_cmp_f64};
    use core::cmp::{Ordering, Reverse};
    use std::collections::BinaryHeap;

    #[test]
    fn signed_zeros_compare_equal() {
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
        assert_eq!(StableF64::new(-0.0).get().to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn nan_is_greater_than_infinity() {
        assert_eq!(stable_total_cmp_f64(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(StableF64(f64::NAN), StableF64(-f64::NAN));
    }

    #[test]
    fn min_heap_pops_smallest_first() {
        let mut heap = BinaryHeap::new();
        for d in [2.5, f64::INFINITY, 0.0, 1.0] {
            heap.push(Reverse(StableF64::from(d)));
        }
        let order: Vec<f64> = std::iter::from_fn(|| heap.pop().map(|Reverse(d)| d.get())).collect();
        assert_eq!(order, vec![0.0, 1.0, 2.5, f64::INFINITY]);
    }
}
