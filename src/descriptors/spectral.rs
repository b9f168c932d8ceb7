//! Spectral descriptors of the adjacency (`_A`) and topological distance
//! (`_D`) matrices of the hydrogen-suppressed graph.
//!
//! With eigenvalues `λ` and the eigenvector `v` of the largest one:
//!
//! - `SpAbs` `Σ|λ|`, `SpMax` `max λ`, `SpDiam` `max λ - min λ`
//! - `SpAD` `Σ|λ - mean λ|` and `SpMAD` its per-atom mean
//! - `LogEE` `ln Σ exp λ`
//! - `VE1` `Σ|v_i|`, `VE2` `VE1 / n`, `VE3` `ln(0.1 n VE1)`
//! - `VR1` `Σ_bonds (|v_i| |v_j|)^-½`, `VR2` `VR1 / n`, `VR3` `ln(0.1 n VR1)`
//!
//! Atoms in different fragments are at distance zero in `D`.

use super::graph::{HeavyGraph, UNREACHABLE};
use nalgebra::{DMatrix, SymmetricEigen};

pub const ATTRIBUTES: [&str; 12] = [
    "SpAbs", "SpMax", "SpDiam", "SpAD", "SpMAD", "LogEE", "VE1", "VE2", "VE3", "VR1", "VR2", "VR3",
];
const MATRICES: [&str; 2] = ["A", "D"];

pub fn names(out: &mut Vec<String>) {
    for matrix in MATRICES {
        out.extend(ATTRIBUTES.iter().map(|a| format!("{a}_{matrix}")));
    }
}

pub fn evaluate(graph: &HeavyGraph, out: &mut Vec<f64>) {
    let n = graph.len();
    let adjacency = DMatrix::from_fn(n, n, |i, j| {
        if graph.adjacency[i].contains(&j) { 1.0 } else { 0.0 }
    });
    let distance = DMatrix::from_fn(n, n, |i, j| match graph.distances[i][j] {
        UNREACHABLE => 0.0,
        d => d as f64,
    });
    attributes(graph, adjacency, out);
    attributes(graph, distance, out);
}

fn attributes(graph: &HeavyGraph, matrix: DMatrix<f64>, out: &mut Vec<f64>) {
    let n = matrix.nrows();
    if n == 0 {
        out.extend([f64::NAN; ATTRIBUTES.len()]);
        return;
    }
    let atoms = n as f64;
    let eigen = SymmetricEigen::new(matrix);
    let values = eigen.eigenvalues.as_slice();

    let mut leading = 0;
    for (k, value) in values.iter().enumerate() {
        if *value > values[leading] {
            leading = k;
        }
    }
    let max = values[leading];
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = values.iter().sum::<f64>() / atoms;
    let spread: f64 = values.iter().map(|v| (v - mean).abs()).sum();
    // Shifted log-sum-exp.
    let log_ee = max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln();

    let vector: Vec<f64> = eigen.eigenvectors.column(leading).iter().map(|c| c.abs()).collect();
    let ve1: f64 = vector.iter().sum();
    let vr1: f64 = graph
        .bonds
        .iter()
        .map(|&(i, j, _)| vector[i] * vector[j])
        .filter(|&p| p > 0.0)
        .map(|p| p.powf(-0.5))
        .sum();

    out.extend([
        values.iter().map(|v| v.abs()).sum(),
        max,
        max - min,
        spread,
        spread / atoms,
        log_ee,
        ve1,
        ve1 / atoms,
        (0.1 * atoms * ve1).ln(),
        vr1,
        vr1 / atoms,
        (0.1 * atoms * vr1).ln(),
    ]);
}
