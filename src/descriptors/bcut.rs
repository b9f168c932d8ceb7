//! BCUT descriptors: extreme eigenvalues of weighted Burden matrices.
//!
//! The Burden matrix of the hydrogen-suppressed graph carries an atomic
//! weight on the diagonal. A bonded pair gets `0.1 π*` (π* = 1, 2, 3,
//! 1.5 for aromatic), plus `0.01` when either atom is terminal, and
//! every other pair gets `0.001`. `BCUT{w}-1h` and `BCUT{w}-1l` are the
//! largest and smallest eigenvalues.

use super::graph::HeavyGraph;
use super::properties::{AtomEnvironment, AtomWeight, AtomicProperty};
use crate::model::molecule::Molecule;
use nalgebra::{DMatrix, SymmetricEigen};

pub const WEIGHTS: [AtomWeight; 10] = [
    AtomWeight::Charge,
    AtomWeight::Sigma,
    AtomWeight::Valence,
    AtomWeight::State,
    AtomWeight::Element(AtomicProperty::AtomicNumber),
    AtomWeight::Element(AtomicProperty::Mass),
    AtomWeight::Element(AtomicProperty::VdwVolume),
    AtomWeight::Element(AtomicProperty::Sanderson),
    AtomWeight::Element(AtomicProperty::Pauling),
    AtomWeight::Element(AtomicProperty::Polarizability),
];

const BONDED: f64 = 0.1;
const TERMINAL: f64 = 0.01;
const UNBONDED: f64 = 0.001;

pub fn names(out: &mut Vec<String>) {
    for weight in WEIGHTS {
        out.push(format!("BCUT{}-1h", weight.suffix()));
        out.push(format!("BCUT{}-1l", weight.suffix()));
    }
}

/// Burden matrix of `graph` with `diagonal` weights.
pub fn burden_matrix(graph: &HeavyGraph, diagonal: &[f64]) -> DMatrix<f64> {
    let n = graph.len();
    let mut matrix = DMatrix::from_element(n, n, UNBONDED);
    for (k, &w) in diagonal.iter().enumerate() {
        matrix[(k, k)] = w;
    }
    for &(i, j, order) in &graph.bonds {
        let mut value = BONDED * order.multiplier();
        if graph.degree(i) == 1 || graph.degree(j) == 1 {
            value += TERMINAL;
        }
        matrix[(i, j)] = value;
        matrix[(j, i)] = value;
    }
    matrix
}

/// `molecule` may carry implicit hydrogens; `charges` are those of its
/// hydrogen-complete form, which keeps the heavy-atom indices.
pub fn evaluate(molecule: &Molecule, graph: &HeavyGraph, charges: Option<&[f64]>, out: &mut Vec<f64>) {
    let all = AtomEnvironment::of_molecule(molecule);
    let atoms: Vec<AtomEnvironment> = graph.atoms.iter().map(|&idx| all[idx]).collect();
    let heavy_charges: Option<Vec<f64>> =
        charges.map(|q| graph.atoms.iter().map(|&idx| q[idx]).collect());

    for weight in WEIGHTS {
        let extremes = match weight.values(&atoms, heavy_charges.as_deref()) {
            Some(diagonal) if !diagonal.is_empty() => {
                let eigen = SymmetricEigen::new(burden_matrix(graph, &diagonal));
                eigen
                    .eigenvalues
                    .iter()
                    .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), &v| (hi.max(v), lo.min(v)))
            }
            _ => (f64::NAN, f64::NAN),
        };
        out.extend([extremes.0, extremes.1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charge::gasteiger_charges;
    use crate::smiles::parse_smiles;

    fn compute(smiles: &str, with_charges: bool) -> Vec<(String, f64)> {
        let mol = parse_smiles(smiles).unwrap();
        let graph = HeavyGraph::new(&mol);
        let charges = with_charges.then(|| gasteiger_charges(&mol.with_explicit_hydrogens()).unwrap());
        let mut names_out = Vec::new();
        names(&mut names_out);
        let mut values = Vec::new();
        evaluate(&mol, &graph, charges.as_deref(), &mut values);
        assert_eq!(names_out.len(), values.len());
        names_out.into_iter().zip(values).collect()
    }

    fn value(results: &[(String, f64)], name: &str) -> f64 {
        results.iter().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap()
    }

    #[test]
    fn burden_matrix_of_acetaldehyde() {
        let mol = parse_smiles("CC=O").unwrap();
        let graph = HeavyGraph::new(&mol);
        let m = burden_matrix(&graph, &[1.0, 2.0, 3.0]);
        assert_eq!(m[(1, 1)], 2.0);
        assert!((m[(0, 1)] - 0.11).abs() < 1e-12);
        assert!((m[(1, 2)] - 0.21).abs() < 1e-12);
        assert_eq!(m[(0, 2)], UNBONDED);
    }

    #[test]
    fn methanol_atomic_number_bcut() {
        let r = compute("CO", false);
        // [[6, 0.11], [0.11, 8]] has eigenvalues 7 ± sqrt(1 + 0.11²).
        let root = (1.0f64 + 0.11 * 0.11).sqrt();
        assert!((value(&r, "BCUTZ-1h") - (7.0 + root)).abs() < 1e-9);
        assert!((value(&r, "BCUTZ-1l") - (7.0 - root)).abs() < 1e-9);
        assert!(value(&r, "BCUTc-1h").is_nan());
    }

    #[test]
    fn charges_feed_the_charge_weighting() {
        let r = compute("CC(=O)O", true);
        let (hi, lo) = (value(&r, "BCUTc-1h"), value(&r, "BCUTc-1l"));
        assert!(hi > 0.0 && lo < 0.0, "{hi} {lo}");
        assert!(value(&r, "BCUTm-1h") > 15.0);
    }

    #[test]
    fn empty_molecule_is_missing() {
        let r = compute("[H][H]", false);
        assert!(r.iter().all(|(_, v)| v.is_nan()));
    }
}
