//! Neighbourhood information content of the hydrogen-complete graph.
//!
//! Atoms are partitioned into equivalence classes by their neighbourhood
//! of order `k`: at order zero by element, and at each further order by
//! the previous class together with the multiset of (bond order,
//! neighbour class) pairs. Over the class sizes `n_g` of `n` atoms:
//!
//! - `IC{k}` Shannon entropy `-Σ (n_g/n) log₂(n_g/n)`
//! - `TIC{k}` total information, `n IC`
//! - `SIC{k}` structural, `IC / log₂ n`
//! - `BIC{k}` bonding, `IC / log₂ B` with `B` the summed bond orders
//! - `CIC{k}` complementary, `log₂ n - IC`
//! - `MIC{k}`, `ZMIC{k}` entropies of the class shares of total mass and
//!   of total atomic number

use crate::model::molecule::Molecule;
use std::collections::HashMap;

pub const MAX_ORDER: usize = 5;
const PREFIXES: [&str; 7] = ["IC", "TIC", "SIC", "BIC", "CIC", "MIC", "ZMIC"];

pub fn names(out: &mut Vec<String>) {
    for prefix in PREFIXES {
        out.extend((0..=MAX_ORDER).map(|k| format!("{prefix}{k}")));
    }
}

/// Class label of every atom at orders `0..=MAX_ORDER`.
pub fn neighbourhood_classes(molecule: &Molecule) -> Vec<Vec<usize>> {
    let adjacency = molecule.adjacency();
    let mut orders = Vec::with_capacity(MAX_ORDER + 1);
    let mut labels: Vec<usize> = molecule
        .atoms
        .iter()
        .map(|a| usize::from(a.element.atomic_number()))
        .collect();
    orders.push(intern(labels.iter().map(|&l| (l, Vec::new()))));

    for _ in 1..=MAX_ORDER {
        labels = orders[orders.len() - 1].clone();
        let signatures = adjacency.iter().enumerate().map(|(idx, neighbours)| {
            let mut around: Vec<(u8, usize)> = neighbours
                .iter()
                .map(|nb| (molecule.bonds[nb.bond].order as u8, labels[nb.atom]))
                .collect();
            around.sort_unstable();
            (labels[idx], around)
        });
        orders.push(intern(signatures));
    }
    orders
}

/// Maps equal signatures to equal, dense labels.
fn intern(signatures: impl Iterator<Item = (usize, Vec<(u8, usize)>)>) -> Vec<usize> {
    let mut seen: HashMap<(usize, Vec<(u8, usize)>), usize> = HashMap::new();
    signatures
        .map(|signature| {
            let next = seen.len();
            *seen.entry(signature).or_insert(next)
        })
        .collect()
}

/// `-Σ p log₂ p` over the shares of each class in `totals`.
fn entropy(classes: &[usize], weights: &[f64]) -> f64 {
    let mut totals: HashMap<usize, f64> = HashMap::new();
    for (&class, &w) in classes.iter().zip(weights) {
        *totals.entry(class).or_default() += w;
    }
    let sum: f64 = totals.values().sum();
    if sum <= 0.0 {
        return f64::NAN;
    }
    totals
        .values()
        .map(|&t| t / sum)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.log2())
        .sum()
}

/// `molecule` must be hydrogen-complete.
pub fn evaluate(molecule: &Molecule, out: &mut Vec<f64>) {
    let n = molecule.atom_count() as f64;
    let classes = neighbourhood_classes(molecule);
    let ones = vec![1.0; molecule.atom_count()];
    let masses: Vec<f64> = molecule.atoms.iter().map(|a| a.element.atomic_mass()).collect();
    let numbers: Vec<f64> = molecule
        .atoms
        .iter()
        .map(|a| f64::from(a.element.atomic_number()))
        .collect();
    let bond_orders: f64 = molecule.bonds.iter().map(|b| b.order.multiplier()).sum();

    let ratio = |ic: f64, base: f64| if base > 1.0 { ic / base.log2() } else { f64::NAN };
    let ic: Vec<f64> = classes.iter().map(|c| entropy(c, &ones)).collect();

    out.extend(ic.iter().copied());
    out.extend(ic.iter().map(|v| n * v));
    out.extend(ic.iter().map(|&v| ratio(v, n)));
    out.extend(ic.iter().map(|&v| ratio(v, bond_orders)));
    out.extend(ic.iter().map(|v| if n > 0.0 { n.log2() - v } else { f64::NAN }));
    out.extend(classes.iter().map(|c| entropy(c, &masses)));
    out.extend(classes.iter().map(|c| entropy(c, &numbers)));
}
