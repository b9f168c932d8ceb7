//! Walk and path counts of the hydrogen-suppressed graph.
//!
//! - `MWC{k}` molecular walk count, `ln(1 + w_k)` where `w_k` is half the
//!   sum of the entries of `A^k`
//! - `SRW{k}` self-returning walk count, `ln(1 + tr A^k)`
//! - `MPC{k}` number of simple paths with `k` bonds
//! - `piPC{k}` conventional bond order path count, `ln(1 + Σ_paths Π π*)`
//!
//! Totals (`TMWC10`, `TSRW10`, `TMPC10`, `TpiPC10`) add the atom count as
//! the zero-length term.

use super::graph::HeavyGraph;
use nalgebra::DMatrix;

pub const MAX_LENGTH: usize = 10;

pub fn names(out: &mut Vec<String>) {
    out.extend((1..=MAX_LENGTH).map(|k| format!("MWC{k:02}")));
    out.push(format!("TMWC{MAX_LENGTH}"));
    out.extend((2..=MAX_LENGTH).map(|k| format!("SRW{k:02}")));
    out.push(format!("TSRW{MAX_LENGTH}"));
    out.extend((2..=MAX_LENGTH).map(|k| format!("MPC{k}")));
    out.push(format!("TMPC{MAX_LENGTH}"));
    out.extend((1..=MAX_LENGTH).map(|k| format!("piPC{k}")));
    out.push(format!("TpiPC{MAX_LENGTH}"));
}

/// Walk totals and closed-walk totals for lengths `1..=MAX_LENGTH`.
fn walk_counts(graph: &HeavyGraph) -> ([f64; MAX_LENGTH + 1], [f64; MAX_LENGTH + 1]) {
    let n = graph.len();
    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    for &(i, j, _) in &graph.bonds {
        adjacency[(i, j)] = 1.0;
        adjacency[(j, i)] = 1.0;
    }

    let mut walks = [0.0; MAX_LENGTH + 1];
    let mut closed = [0.0; MAX_LENGTH + 1];
    let mut power = DMatrix::<f64>::identity(n, n);
    for k in 1..=MAX_LENGTH {
        power = &power * &adjacency;
        walks[k] = power.sum() / 2.0;
        closed[k] = power.trace();
    }
    (walks, closed)
}

/// Number of simple paths and their bond-order products, by length.
fn path_counts(graph: &HeavyGraph) -> ([usize; MAX_LENGTH + 1], [f64; MAX_LENGTH + 1]) {
    let mut neighbours = vec![Vec::new(); graph.len()];
    for &(i, j, order) in &graph.bonds {
        neighbours[i].push((j, order.multiplier()));
        neighbours[j].push((i, order.multiplier()));
    }

    let mut counts = [0usize; MAX_LENGTH + 1];
    let mut weights = [0.0; MAX_LENGTH + 1];
    let mut on_path = vec![false; graph.len()];
    for start in 0..graph.len() {
        on_path[start] = true;
        extend(
            &neighbours,
            start,
            start,
            0,
            1.0,
            &mut on_path,
            &mut counts,
            &mut weights,
        );
        on_path[start] = false;
    }
    (counts, weights)
}

#[allow(clippy::too_many_arguments)]
fn extend(
    neighbours: &[Vec<(usize, f64)>],
    start: usize,
    last: usize,
    length: usize,
    product: f64,
    on_path: &mut [bool],
    counts: &mut [usize; MAX_LENGTH + 1],
    weights: &mut [f64; MAX_LENGTH + 1],
) {
    if length > 0 && start < last {
        counts[length] += 1;
        weights[length] += product;
    }
    if length == MAX_LENGTH {
        return;
    }
    for &(next, order) in &neighbours[last] {
        if on_path[next] {
            continue;
        }
        on_path[next] = true;
        extend(
            neighbours,
            start,
            next,
            length + 1,
            product * order,
            on_path,
            counts,
            weights,
        );
        on_path[next] = false;
    }
}

pub fn evaluate(graph: &HeavyGraph, out: &mut Vec<f64>) {
    let atoms = graph.len() as f64;
    let log = |x: f64| x.ln_1p();

    let (walks, closed) = walk_counts(graph);
    out.extend(walks[1..].iter().map(|&w| log(w)));
    out.push(log(atoms + walks[1..].iter().sum::<f64>()));
    out.extend(closed[2..].iter().map(|&w| log(w)));
    out.push(log(atoms + closed[2..].iter().sum::<f64>()));

    let (counts, weights) = path_counts(graph);
    out.extend(counts[2..].iter().map(|&c| c as f64));
    out.push(atoms + counts[1..].iter().sum::<usize>() as f64);
    out.extend(weights[1..].iter().map(|&w| log(w)));
    out.push(log(atoms + weights[1..].iter().sum::<f64>()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::graph::count_paths;
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
    fn catalogue_size() {
        let mut out = Vec::new();
        names(&mut out);
        assert_eq!(out.len(), 42);
        assert_eq!(out[0], "MWC01");
        assert_eq!(out[10], "TMWC10");
    }

    #[test]
    fn walks_of_propane() {
        let r = compute("CCC");
        // A² has entries summing to 6, A³ to 8; only even lengths return.
        assert!(approx_eq(value(&r, "MWC01"), 3f64.ln()));
        assert!(approx_eq(value(&r, "MWC02"), 4f64.ln()));
        assert!(approx_eq(value(&r, "MWC03"), 5f64.ln()));
        assert!(approx_eq(value(&r, "SRW02"), 5f64.ln()));
        assert!(approx_eq(value(&r, "SRW03"), 0.0));
    }

    #[test]
    fn path_counts_match_the_shared_enumerator() {
        let mol = parse_smiles("CC1CCC(C)C2CCCCC12").unwrap();
        let graph = HeavyGraph::new(&mol);
        let (counts, _) = path_counts(&graph);
        for (length, &count) in counts.iter().enumerate().skip(1) {
            assert_eq!(count, count_paths(&graph.adjacency, length), "length {length}");
        }
    }

    #[test]
    fn bond_orders_weight_paths() {
        let r = compute("C=CC#C");
        assert!(approx_eq(value(&r, "MPC2"), 2.0));
        assert!(approx_eq(value(&r, "MPC3"), 1.0));
        // Bond orders 2, 1, 3.
        assert!(approx_eq(value(&r, "piPC1"), (1.0f64 + 6.0).ln()));
        assert!(approx_eq(value(&r, "piPC3"), (1.0f64 + 6.0).ln()));
        assert!(approx_eq(value(&r, "TMPC10"), 4.0 + 3.0 + 2.0 + 1.0));
    }

    #[test]
    fn single_atom_has_no_walks() {
        let r = compute("C");
        assert!(approx_eq(value(&r, "MWC01"), 0.0));
        assert!(approx_eq(value(&r, "TMWC10"), 2f64.ln()));
        assert!(approx_eq(value(&r, "MPC2"), 0.0));
    }
}
