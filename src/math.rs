//! Geometry on `[f64; 3]` points and symmetric eigen-decompositions, backed
//! by `nalgebra`.

use nalgebra::{DMatrix, Matrix3, SymmetricEigen, Vector3};

#[inline]
pub fn point(p: &[f64; 3]) -> Vector3<f64> {
    Vector3::from(*p)
}

#[inline]
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (point(a) - point(b)).norm()
}

/// Bond angle at `b` in radians.
pub fn angle(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let u = point(a) - point(b);
    let v = point(c) - point(b);
    let denom = u.norm() * v.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (u.dot(&v) / denom).clamp(-1.0, 1.0).acos()
}

/// Signed dihedral angle a-b-c-d in radians, in `(-π, π]`.
pub fn dihedral(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3], d: &[f64; 3]) -> f64 {
    let b1 = point(b) - point(a);
    let b2 = point(c) - point(b);
    let b3 = point(d) - point(c);
    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m1 = n1.cross(&(b2 / b2.norm().max(1e-12)));
    (-m1.dot(&n2)).atan2(n1.dot(&n2))
}

/// Eigen-decomposition of a symmetric 3×3 matrix.
///
/// Returns eigenvalues in ascending order together with the matching unit
/// eigenvectors (`vectors[k]` belongs to `values[k]`).
pub fn symmetric_eigen3(m: Matrix3<f64>) -> ([f64; 3], [Vector3<f64>; 3]) {
    let eigen = m.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&x, &y| eigen.eigenvalues[x].total_cmp(&eigen.eigenvalues[y]));
    let values = order.map(|k| eigen.eigenvalues[k]);
    let vectors = order.map(|k| eigen.eigenvectors.column(k).into_owned());
    (values, vectors)
}

/// The `count` largest algebraic eigenpairs of a dense symmetric `n × n`
/// matrix given in row-major order, largest first.
pub fn leading_eigenpairs(matrix: &[f64], n: usize, count: usize) -> Vec<(f64, Vec<f64>)> {
    if n == 0 {
        return Vec::new();
    }
    let eigen = SymmetricEigen::new(DMatrix::from_row_slice(n, n, matrix));
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| eigen.eigenvalues[y].total_cmp(&eigen.eigenvalues[x]));
    order
        .into_iter()
        .take(count)
        .map(|k| {
            let vector = eigen.eigenvectors.column(k).iter().copied().collect();
            (eigen.eigenvalues[k], vector)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn right_angle() {
        let a = angle(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(approx_eq(a, PI / 2.0, 1e-12));
    }

    #[test]
    fn dihedral_signs() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 0.0, 0.0];
        let c = [0.0, 0.0, 1.0];
        let trans = dihedral(&a, &b, &c, &[-1.0, 0.0, 1.0]);
        let cis = dihedral(&a, &b, &c, &[1.0, 0.0, 1.0]);
        let gauche = dihedral(&a, &b, &c, &[0.0, 1.0, 1.0]);
        assert!(approx_eq(trans.abs(), PI, 1e-12));
        assert!(approx_eq(cis, 0.0, 1e-12));
        assert!(approx_eq(gauche.abs(), PI / 2.0, 1e-12));
    }

    #[test]
    fn eigenvalues_come_back_ascending() {
        let m = Matrix3::new(5.0, 0.0, 0.0, 0.0, 2.0, 1.0, 0.0, 1.0, 2.0);
        let (values, vectors) = symmetric_eigen3(m);
        assert!(approx_eq(values[0], 1.0, 1e-10));
        assert!(approx_eq(values[1], 3.0, 1e-10));
        assert!(approx_eq(values[2], 5.0, 1e-10));
        let v = vectors[0];
        assert!(approx_eq(v[1].abs(), 1.0 / 2f64.sqrt(), 1e-8));
        assert!(approx_eq(v[1], -v[2], 1e-8));
        assert!(approx_eq(vectors[2][0].abs(), 1.0, 1e-8));
    }

    #[test]
    fn leading_pairs_are_the_largest_algebraic_values() {
        // Eigenvalues 4, 1, -6: the negative one dominates in magnitude.
        let matrix = [4.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -6.0];
        let pairs = leading_eigenpairs(&matrix, 3, 2);
        assert_eq!(pairs.len(), 2);
        assert!(approx_eq(pairs[0].0, 4.0, 1e-10));
        assert!(approx_eq(pairs[1].0, 1.0, 1e-10));
        assert!(approx_eq(pairs[0].1[0].abs(), 1.0, 1e-10));
        assert!(leading_eigenpairs(&[], 0, 3).is_empty());
    }
}
