//! Geometric, gravitational and inertial descriptors of a conformation.

use crate::math::{distance, point, symmetric_eigen3};
use nalgebra::{Matrix3, Vector3};

pub const SHAPE_NAMES: [&str; 4] = [
    "GeomDiameter",
    "GeomRadius",
    "GeomShapeIndex",
    "GeomPetitjeanIndex",
];
pub const GRAVITATIONAL_NAMES: [&str; 4] = ["GRAV", "GRAVH", "GRAVp", "GRAVHp"];
pub const INERTIA_NAMES: [&str; 3] = ["MOMI-X", "MOMI-Y", "MOMI-Z"];
pub const PLANE_NAMES: [&str; 1] = ["PBF"];

/// Diameter, radius and the two shape ratios from geometric
/// eccentricities.
pub fn shape(positions: &[[f64; 3]], out: &mut Vec<f64>) {
    let eccentricities: Vec<f64> = positions
        .iter()
        .map(|p| positions.iter().map(|q| distance(p, q)).fold(0.0, f64::max))
        .collect();
    let diameter = eccentricities.iter().copied().fold(f64::NAN, f64::max);
    let radius = eccentricities.iter().copied().fold(f64::NAN, f64::min);

    out.push(diameter);
    out.push(radius);
    out.push(ratio(diameter - radius, radius));
    out.push(ratio(diameter - radius, diameter));
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Gravitational indices over heavy atoms (`GRAV`), all atoms (`GRAVH`),
/// and the bonded-pair variants of both.
pub fn gravitational(
    positions: &[[f64; 3]],
    masses: &[f64],
    heavy: &[bool],
    bonds: &[(usize, usize)],
    out: &mut Vec<f64>,
) {
    let term = |i: usize, j: usize| {
        let r = distance(&positions[i], &positions[j]);
        masses[i] * masses[j] / (r * r)
    };

    let n = positions.len();
    let mut all_heavy = 0.0;
    let mut all = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let t = term(i, j);
            all += t;
            if heavy[i] && heavy[j] {
                all_heavy += t;
            }
        }
    }

    let mut bonded_heavy = 0.0;
    let mut bonded = 0.0;
    for &(i, j) in bonds {
        let t = term(i, j);
        bonded += t;
        if heavy[i] && heavy[j] {
            bonded_heavy += t;
        }
    }

    out.extend([all_heavy, all, bonded_heavy, bonded]);
}

/// Principal moments of inertia about the centre of mass, ascending
/// (amu·Å²).
pub fn inertia(positions: &[[f64; 3]], masses: &[f64], out: &mut Vec<f64>) {
    let total: f64 = masses.iter().sum();
    if total == 0.0 {
        out.extend([f64::NAN; 3]);
        return;
    }
    let center = weighted_center(positions, masses);

    let tensor = positions
        .iter()
        .zip(masses)
        .fold(Matrix3::zeros(), |acc, (p, &m)| {
            let r = point(p) - center;
            acc + (Matrix3::identity() * r.norm_squared() - r * r.transpose()) * m
        });
    let (moments, _) = symmetric_eigen3(tensor);
    out.extend(moments.map(|v| v.max(0.0)));
}

/// Mean distance of the atoms from their least-squares plane.
pub fn plane_fit(positions: &[[f64; 3]], out: &mut Vec<f64>) {
    if positions.is_empty() {
        out.push(f64::NAN);
        return;
    }
    let weights = vec![1.0; positions.len()];
    let center = weighted_center(positions, &weights);

    let covariance = positions.iter().fold(Matrix3::zeros(), |acc, p| {
        let r = point(p) - center;
        acc + r * r.transpose()
    });
    let (_, vectors) = symmetric_eigen3(covariance);
    let normal = vectors[0];
    let total: f64 = positions
        .iter()
        .map(|p| (point(p) - center).dot(&normal).abs())
        .sum();
    out.push(total / positions.len() as f64);
}

fn weighted_center(positions: &[[f64; 3]], weights: &[f64]) -> Vector3<f64> {
    let total: f64 = weights.iter().sum();
    let sum = positions
        .iter()
        .zip(weights)
        .fold(Vector3::zeros(), |acc, (p, &w)| acc + point(p) * w);
    sum / total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn shape_of_a_linear_triatomic() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let mut out = Vec::new();
        shape(&positions, &mut out);
        assert!(approx_eq(out[0], 2.0, 1e-12));
        assert!(approx_eq(out[1], 1.0, 1e-12));
        assert!(approx_eq(out[2], 1.0, 1e-12));
        assert!(approx_eq(out[3], 0.5, 1e-12));
    }

    #[test]
    fn single_atom_ratios_are_undefined() {
        let mut out = Vec::new();
        shape(&[[1.0, 2.0, 3.0]], &mut out);
        assert_eq!(out[0], 0.0);
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
    }

    #[test]
    fn gravitational_variants() {
        // H - C - C with unit spacing
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let masses = [1.0, 12.0, 12.0];
        let heavy = [false, true, true];
        let bonds = [(0, 1), (1, 2)];
        let mut out = Vec::new();
        gravitational(&positions, &masses, &heavy, &bonds, &mut out);
        assert!(approx_eq(out[0], 144.0, 1e-12));
        assert!(approx_eq(out[1], 144.0 + 12.0 + 12.0 / 4.0, 1e-12));
        assert!(approx_eq(out[2], 144.0, 1e-12));
        assert!(approx_eq(out[3], 156.0, 1e-12));
    }

    #[test]
    fn moments_of_a_diatomic() {
        let positions = [[0.0, 0.0, -0.5], [0.0, 0.0, 0.5]];
        let mut out = Vec::new();
        inertia(&positions, &[2.0, 2.0], &mut out);
        assert!(approx_eq(out[0], 0.0, 1e-9));
        assert!(approx_eq(out[1], 1.0, 1e-9));
        assert!(approx_eq(out[2], 1.0, 1e-9));
    }

    #[test]
    fn planar_points_have_zero_pbf() {
        let flat = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let mut out = Vec::new();
        plane_fit(&flat, &mut out);
        assert!(approx_eq(out[0], 0.0, 1e-9));

        let puckered = [
            [0.0, 0.0, 0.2],
            [1.0, 0.0, -0.2],
            [0.0, 1.0, -0.2],
            [1.0, 1.0, 0.2],
        ];
        let mut out = Vec::new();
        plane_fit(&puckered, &mut out);
        assert!(approx_eq(out[0], 0.2, 1e-9));
    }
}
