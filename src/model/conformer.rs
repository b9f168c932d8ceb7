use crate::math::{distance, point};

/// One 3D coordinate assignment for a hydrogen-complete molecule.
///
/// `positions[i]` belongs to atom `i` of the molecule it was generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformation {
    pub positions: Vec<[f64; 3]>,
}

impl Conformation {
    pub fn new(positions: Vec<[f64; 3]>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.positions.iter().flatten().all(|c| c.is_finite())
    }

    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        distance(&self.positions[i], &self.positions[j])
    }

    /// Mass-weighted centre; pass unit weights for the geometric centroid.
    pub fn center(&self, weights: &[f64]) -> [f64; 3] {
        let total: f64 = weights.iter().sum();
        let mut c = [0.0; 3];
        if total == 0.0 {
            return c;
        }
        for (p, w) in self.positions.iter().zip(weights) {
            for k in 0..3 {
                c[k] += p[k] * w;
            }
        }
        c.map(|v| v / total)
    }

    /// Coordinates translated so that `origin` sits at zero.
    pub fn centered_on(&self, origin: &[f64; 3]) -> Vec<[f64; 3]> {
        let origin = point(origin);
        self.positions
            .iter()
            .map(|p| (point(p) - origin).into())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_with_unit_weights() {
        let conf = Conformation::new(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 3.0, 0.0]]);
        let c = conf.center(&[1.0, 1.0, 1.0]);
        assert!((c[0] - 1.0).abs() < 1e-12);
        assert!((c[1] - 1.0).abs() < 1e-12);
        assert_eq!(c[2], 0.0);
    }

    #[test]
    fn distance_and_finiteness() {
        let conf = Conformation::new(vec![[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        assert!((conf.distance(0, 1) - 5.0).abs() < 1e-12);
        assert!(conf.is_finite());
        let bad = Conformation::new(vec![[f64::NAN, 0.0, 0.0]]);
        assert!(!bad.is_finite());
    }

    #[test]
    fn centered_coordinates() {
        let conf = Conformation::new(vec![[1.0, 1.0, 1.0], [3.0, 1.0, 1.0]]);
        let centered = conf.centered_on(&[2.0, 1.0, 1.0]);
        assert_eq!(centered, vec![[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    }
}
