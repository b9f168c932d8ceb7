//! Kier–Hall electrotopological state (E-state) atom-type indices.
//!
//! Every heavy atom gets an E-state `S_i = I_i + Σ_j (I_i - I_j) / (d_ij + 1)²`
//! from the intrinsic states `I` and topological distances `d` of the
//! hydrogen-suppressed graph. Atoms are typed by their bonds to heavy
//! neighbours (`s`ingle, `d`ouble, `t`riple, `a`romatic), element and
//! attached hydrogens, so `ssCH2` is a methylene in a chain. Per type the
//! catalogue reports the count `N`, the sum `S` and the extremes `MAX` and
//! `MIN` of the member states.

use super::graph::{HeavyGraph, UNREACHABLE, intrinsic_state};
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const ATOM_TYPES: [&str; 79] = [
    "sLi", "ssBe", "ssssBe", "ssBH", "sssB", "ssssB", "sCH3", "dCH2", "ssCH2", "tCH", "dsCH",
    "aaCH", "sssCH", "ddC", "tsC", "dssC", "aasC", "aaaC", "ssssC", "sNH3", "sNH2", "ssNH2",
    "dNH", "ssNH", "aaNH", "tN", "sssNH", "dsN", "aaN", "sssN", "ddsN", "aasN", "ssssN", "sOH",
    "dO", "ssO", "aaO", "sF", "sSiH3", "ssSiH2", "sssSiH", "ssssSi", "sPH2", "ssPH", "sssP",
    "dsssP", "sssssP", "sSH", "dS", "ssS", "aaS", "dssS", "ddssS", "sCl", "sGeH3", "ssGeH2",
    "sssGeH", "ssssGe", "sAsH2", "ssAsH", "sssAs", "sssdAs", "sssssAs", "sSeH", "dSe", "ssSe",
    "aaSe", "dssSe", "ddssSe", "sBr", "sSnH3", "ssSnH2", "sssSnH", "ssssSn", "sI", "sPbH3",
    "ssPbH2", "sssPbH", "ssssPb",
];

/// Bond symbols in the order they appear in a canonical type key.
const BOND_SYMBOLS: [char; 4] = ['t', 'd', 'a', 's'];

static TYPE_INDEX: LazyLock<HashMap<String, usize>> = LazyLock::new(|| {
    ATOM_TYPES
        .iter()
        .enumerate()
        .map(|(k, name)| (canonical(name), k))
        .collect()
});

/// Reorders the leading bond symbols of a type name so that every
/// spelling of the same environment maps to one key.
fn canonical(name: &str) -> String {
    let split = name
        .find(|c: char| !BOND_SYMBOLS.contains(&c))
        .unwrap_or(name.len());
    let (bonds, rest) = name.split_at(split);
    let mut key: String = BOND_SYMBOLS
        .iter()
        .flat_map(|&symbol| bonds.chars().filter(move |&c| c == symbol))
        .collect();
    key.push_str(rest);
    key
}

pub fn names(out: &mut Vec<String>) {
    for prefix in ["N", "S", "MAX", "MIN"] {
        out.extend(ATOM_TYPES.iter().map(|t| format!("{prefix}{t}")));
    }
}

/// E-state of every heavy atom, indexed like `graph.atoms`.
pub fn states(molecule: &Molecule, graph: &HeavyGraph) -> Vec<f64> {
    let intrinsic: Vec<f64> = (0..graph.len())
        .map(|i| {
            let element = molecule.atoms[graph.atoms[i]].element;
            intrinsic_state(element, graph.hydrogens[i], graph.degree(i))
        })
        .collect();

    (0..graph.len())
        .map(|i| {
            let perturbation: f64 = (0..graph.len())
                .filter(|&j| j != i && graph.distances[i][j] != UNREACHABLE)
                .map(|j| {
                    let r = (graph.distances[i][j] + 1) as f64;
                    (intrinsic[i] - intrinsic[j]) / (r * r)
                })
                .sum();
            intrinsic[i] + perturbation
        })
        .collect()
}

/// Index into [`ATOM_TYPES`] for every heavy atom; `None` for
/// environments outside the table.
pub fn atom_types(molecule: &Molecule, graph: &HeavyGraph) -> Vec<Option<usize>> {
    let mut bonds = vec![[0usize; 4]; graph.len()];
    let mut exotic = vec![false; graph.len()];
    for &(i, j, order) in &graph.bonds {
        let slot = match order {
            BondOrder::Triple => 0,
            BondOrder::Double => 1,
            BondOrder::Aromatic => 2,
            BondOrder::Single => 3,
            BondOrder::Quadruple => {
                exotic[i] = true;
                exotic[j] = true;
                continue;
            }
        };
        bonds[i][slot] += 1;
        bonds[j][slot] += 1;
    }

    (0..graph.len())
        .map(|i| {
            if exotic[i] || graph.degree(i) == 0 {
                return None;
            }
            let mut key = String::new();
            for (symbol, &count) in BOND_SYMBOLS.iter().zip(&bonds[i]) {
                key.extend(std::iter::repeat_n(*symbol, count));
            }
            key.push_str(molecule.atoms[graph.atoms[i]].element.symbol());
            match graph.hydrogens[i] {
                0 => {}
                1 => key.push('H'),
                h => key.push_str(&format!("H{h}")),
            }
            TYPE_INDEX.get(&key).copied()
        })
        .collect()
}

pub fn evaluate(molecule: &Molecule, graph: &HeavyGraph, out: &mut Vec<f64>) {
    let states = states(molecule, graph);
    let types = atom_types(molecule, graph);

    let mut count = [0usize; ATOM_TYPES.len()];
    let mut sum = [0.0f64; ATOM_TYPES.len()];
    let mut max = [f64::NAN; ATOM_TYPES.len()];
    let mut min = [f64::NAN; ATOM_TYPES.len()];
    for (state, ty) in states.iter().zip(&types) {
        let Some(k) = *ty else {
            continue;
        };
        count[k] += 1;
        sum[k] += state;
        max[k] = max[k].max(*state);
        min[k] = min[k].min(*state);
    }

    out.extend(count.iter().map(|&c| c as f64));
    out.extend(sum);
    out.extend(max);
    out.extend(min);
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
        evaluate(&mol, &graph, &mut values);
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
    fn type_names_are_unique_after_canonicalisation() {
        assert_eq!(TYPE_INDEX.len(), ATOM_TYPES.len());
        assert_eq!(canonical("sssdAs"), "dsssAs");
        assert_eq!(canonical("aasC"), "aasC");
        assert_eq!(canonical("sCl"), "sCl");
    }

    #[test]
    fn methanol_states() {
        let mol = parse_smiles("CO").unwrap();
        let graph = HeavyGraph::new(&mol);
        // Intrinsic states 2 and 6, one bond apart.
        let s = states(&mol, &graph);
        assert!(approx_eq(s[0], 1.0));
        assert!(approx_eq(s[1], 7.0));

        let r = compute("CO");
        assert!(approx_eq(value(&r, "NsCH3"), 1.0));
        assert!(approx_eq(value(&r, "SsOH"), 7.0));
        assert!(approx_eq(value(&r, "MAXsOH"), 7.0));
        assert!(approx_eq(value(&r, "NssCH2"), 0.0));
        assert!(approx_eq(value(&r, "SssCH2"), 0.0));
        assert!(value(&r, "MINssCH2").is_nan());
    }

    #[test]
    fn types_follow_bonding_environment() {
        let mol = parse_smiles("CC(=O)Nc1ccccc1C#N").unwrap();
        let graph = HeavyGraph::new(&mol);
        let types = atom_types(&mol, &graph);
        let name = |k: usize| types[k].map(|t| ATOM_TYPES[t]);
        assert_eq!(name(0), Some("sCH3"));
        assert_eq!(name(1), Some("dssC"));
        assert_eq!(name(2), Some("dO"));
        assert_eq!(name(3), Some("ssNH"));
        assert_eq!(name(4), Some("aasC"));
        assert_eq!(name(5), Some("aaCH"));
        assert_eq!(name(10), Some("tsC"));
        assert_eq!(name(11), Some("tN"));
    }

    #[test]
    fn symmetric_atoms_share_states() {
        let r = compute("c1ccccc1");
        assert!(approx_eq(value(&r, "NaaCH"), 6.0));
        assert!(approx_eq(value(&r, "MAXaaCH"), value(&r, "MINaaCH")));
        // Identical intrinsic states leave no perturbation: ((2/2)² * 3 + 1) / 2.
        assert!(approx_eq(value(&r, "SaaCH"), 6.0 * 2.0));
    }

    #[test]
    fn isolated_and_unlisted_atoms_are_untyped() {
        let r = compute("C.[Na+]");
        assert!(value(&r, "NsCH3").abs() < 1e-12);
        let total: f64 = r
            .iter()
            .filter(|(n, _)| n.starts_with('N'))
            .map(|(_, v)| *v)
            .sum();
        assert!(approx_eq(total, 0.0));
    }
}
