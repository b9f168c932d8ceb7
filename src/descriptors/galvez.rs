//! Galvez topological charge indices.
//!
//! The charge-term matrix is `CT = A · D⁻²`, with `A` the adjacency matrix
//! and `D⁻²` the reciprocal squared distances of the hydrogen-suppressed
//! graph. `GGI{k}` sums `|CT_ij - CT_ji|` over pairs at distance `k`,
//! `JGI{k}` averages it over those pairs and `JGT10` is the sum of the
//! averages.

use super::graph::{HeavyGraph, UNREACHABLE};
use nalgebra::DMatrix;

pub const MAX_ORDER: usize = 10;

pub fn names(out: &mut Vec<String>) {
    out.extend((1..=MAX_ORDER).map(|k| format!("GGI{k}")));
    out.extend((1..=MAX_ORDER).map(|k| format!("JGI{k}")));
    out.push(format!("JGT{MAX_ORDER}"));
}

pub fn evaluate(graph: &HeavyGraph, out: &mut Vec<f64>) {
    let n = graph.len();
    let adjacency = DMatrix::from_fn(n, n, |i, j| {
        if graph.adjacency[i].contains(&j) { 1.0 } else { 0.0 }
    });
    let reciprocal = DMatrix::from_fn(n, n, |i, j| match graph.distances[i][j] {
        0 | UNREACHABLE => 0.0,
        d => 1.0 / (d * d) as f64,
    });
    let charge_terms = adjacency * reciprocal;

    let mut sums = [0.0; MAX_ORDER + 1];
    let mut pairs = [0usize; MAX_ORDER + 1];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = graph.distances[i][j];
            if d == UNREACHABLE || d > MAX_ORDER {
                continue;
            }
            sums[d] += (charge_terms[(i, j)] - charge_terms[(j, i)]).abs();
            pairs[d] += 1;
        }
    }

    // No pairs at a distance means no charge transfer across it.
    let averages: Vec<f64> = (1..=MAX_ORDER)
        .map(|k| if pairs[k] == 0 { 0.0 } else { sums[k] / pairs[k] as f64 })
        .collect();
    out.extend_from_slice(&sums[1..]);
    out.extend_from_slice(&averages);
    out.push(averages.iter().sum());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn compute(smiles: &str) -> Vec<(String, f64)> {
        let mol = parse_smiles(smiles).unwrap();
        let graph = HeavyGraph::new(&mol);
        let mut names_out = Vec::new();
        names(&mut names_out);
        let mut values = Vec::new();
        evaluate(&graph, &mut values);
        assert_eq!(names_out.len(), values.len());
        names_out.into_iter().zip(values).collect()
    }

    fn value(results: &[(String, f64)], name: &str) -> f64 {
        results.iter().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn propane_charge_transfer() {
        let r = compute("CCC");
        // CT rows: [1, 0, 1], [1.25, 2, 1.25], [1, 0, 1].
        assert!(approx_eq(value(&r, "GGI1"), 2.5));
        assert!(approx_eq(value(&r, "GGI2"), 0.0));
        assert!(approx_eq(value(&r, "JGI1"), 1.25));
        assert!(approx_eq(value(&r, "JGT10"), 1.25));
    }

    #[test]
    fn symmetric_graphs_carry_no_charge() {
        let r = compute("c1ccccc1");
        for k in 1..=MAX_ORDER {
            assert!(approx_eq(value(&r, &format!("GGI{k}")), 0.0), "GGI{k}");
        }
        assert!(approx_eq(value(&r, "JGI5"), 0.0));
    }
}
