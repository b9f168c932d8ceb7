//! Torsion classification shared by the experimental torsion preferences
//! and the MMFF-style torsion terms.

use super::terms::{FourierTerm, TorsionTerm};
use super::topology::{Dihedral, Topology};
use crate::model::types::{BondOrder, Element, Hybridization};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TorsionClass {
    Sp3Sp3,
    Sp2Sp3,
    Sp2Sp2,
    Double,
    Aromatic,
    Amide,
    Ester,
    ArylSp3,
    ArylHetero,
    Biaryl,
}

impl TorsionClass {
    /// Key of this class in the parameter tables.
    pub fn key(&self) -> &'static str {
        match self {
            TorsionClass::Sp3Sp3 => "sp3-sp3",
            TorsionClass::Sp2Sp3 => "sp2-sp3",
            TorsionClass::Sp2Sp2 => "sp2-sp2",
            TorsionClass::Double => "double",
            TorsionClass::Aromatic => "aromatic",
            TorsionClass::Amide => "amide",
            TorsionClass::Ester => "ester",
            TorsionClass::ArylSp3 => "aryl-sp3",
            TorsionClass::ArylHetero => "aryl-hetero",
            TorsionClass::Biaryl => "biaryl",
        }
    }

    /// The more generic class consulted when a table lacks this one.
    pub fn fallback(&self) -> Option<TorsionClass> {
        match self {
            TorsionClass::Biaryl | TorsionClass::Amide => Some(TorsionClass::Sp2Sp2),
            TorsionClass::ArylSp3 | TorsionClass::ArylHetero | TorsionClass::Ester => {
                Some(TorsionClass::Sp2Sp3)
            }
            _ => None,
        }
    }

    /// Looks the class up in `table`, walking the fallback chain.
    pub fn lookup<'t, T>(&self, table: &'t HashMap<String, T>) -> Option<&'t T> {
        let mut class = Some(*self);
        while let Some(current) = class {
            if let Some(found) = table.get(current.key()) {
                return Some(found);
            }
            class = current.fallback();
        }
        None
    }
}

/// Classifies the torsion about `bond`. Triple bonds have no torsion.
pub fn classify(topology: &Topology, bond: usize) -> Option<TorsionClass> {
    let mol = topology.molecule;
    let (a, b) = (mol.bonds[bond].i, mol.bonds[bond].j);
    match mol.bonds[bond].order {
        BondOrder::Triple | BondOrder::Quadruple => return None,
        BondOrder::Double => return Some(TorsionClass::Double),
        BondOrder::Aromatic => return Some(TorsionClass::Aromatic),
        BondOrder::Single => {}
    }
    if topology.hybridization[a] == Hybridization::SP
        || topology.hybridization[b] == Hybridization::SP
    {
        return None;
    }

    let aromatic_a = mol.atoms[a].aromatic;
    let aromatic_b = mol.atoms[b].aromatic;
    if aromatic_a && aromatic_b {
        return Some(TorsionClass::Biaryl);
    }
    if is_amide_bond(topology, a, b) || is_amide_bond(topology, b, a) {
        return Some(TorsionClass::Amide);
    }
    if is_ester_bond(topology, a, b) || is_ester_bond(topology, b, a) {
        return Some(TorsionClass::Ester);
    }
    if aromatic_a || aromatic_b {
        let other = if aromatic_a { b } else { a };
        let element = mol.atoms[other].element;
        return Some(match topology.hybridization[other] {
            _ if matches!(element, Element::N | Element::O | Element::S) => {
                TorsionClass::ArylHetero
            }
            Hybridization::SP2 => TorsionClass::Sp2Sp2,
            _ => TorsionClass::ArylSp3,
        });
    }

    let sp2 = |atom: usize| topology.hybridization[atom] == Hybridization::SP2;
    Some(match (sp2(a), sp2(b)) {
        (true, true) => TorsionClass::Sp2Sp2,
        (true, false) | (false, true) => TorsionClass::Sp2Sp3,
        (false, false) => TorsionClass::Sp3Sp3,
    })
}

fn is_amide_bond(topology: &Topology, carbon: usize, nitrogen: usize) -> bool {
    topology.is_carbonyl_carbon(carbon) && topology.molecule.atoms[nitrogen].element == Element::N
}

fn is_ester_bond(topology: &Topology, carbon: usize, oxygen: usize) -> bool {
    topology.is_carbonyl_carbon(carbon)
        && topology.molecule.atoms[oxygen].element == Element::O
        && topology.degree(oxygen) == 2
}

/// Whether `bond` is a freely rotatable single bond: acyclic, not
/// terminal, and without a linear end.
pub fn is_rotatable(topology: &Topology, bond: usize) -> bool {
    let mol = topology.molecule;
    let (a, b) = (mol.bonds[bond].i, mol.bonds[bond].j);
    mol.bonds[bond].order == BondOrder::Single
        && !topology.rings.is_ring_bond(bond)
        && topology.degree(a) > 1
        && topology.degree(b) > 1
        && topology.hybridization[a] != Hybridization::SP
        && topology.hybridization[b] != Hybridization::SP
}

/// One dihedral per rotatable bond, preferring heavy-atom ends.
pub fn representative_dihedrals(topology: &Topology) -> Vec<Dihedral> {
    let mol = topology.molecule;
    let pick = |center: usize, exclude: usize| {
        let candidates = topology.neighbors[center]
            .iter()
            .map(|nb| nb.atom)
            .filter(|&atom| atom != exclude);
        candidates
            .clone()
            .find(|&atom| !mol.atoms[atom].element.is_hydrogen())
            .or_else(|| candidates.clone().next())
    };

    (0..mol.bond_count())
        .filter(|&bond| is_rotatable(topology, bond))
        .filter_map(|bond| {
            let (j, k) = (mol.bonds[bond].i, mol.bonds[bond].j);
            Some(Dihedral {
                i: pick(j, k)?,
                j,
                k,
                l: pick(k, j)?,
                bond,
            })
        })
        .collect()
}

/// Experimental torsion terms for every rotatable bond found in `table`.
pub fn preference_terms(
    topology: &Topology,
    table: &HashMap<String, Vec<FourierTerm>>,
) -> Vec<TorsionTerm> {
    representative_dihedrals(topology)
        .into_iter()
        .filter_map(|d| {
            let class = classify(topology, d.bond)?;
            let terms = class.lookup(table)?;
            Some(TorsionTerm {
                i: d.i,
                j: d.j,
                k: d.k,
                l: d.l,
                terms: terms.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::get_default_parameters;
    use crate::smiles::parse_smiles;

    fn class_of(smiles: &str, a: usize, b: usize) -> Option<TorsionClass> {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let bond = mol.bond_between(a, b).unwrap();
        classify(&topo, bond)
    }

    #[test]
    fn classifies_common_bonds() {
        assert_eq!(class_of("CCCC", 1, 2), Some(TorsionClass::Sp3Sp3));
        assert_eq!(class_of("C=CCC", 1, 2), Some(TorsionClass::Sp2Sp3));
        assert_eq!(class_of("C=CC=C", 1, 2), Some(TorsionClass::Sp2Sp2));
        assert_eq!(class_of("CC(=O)NC", 1, 3), Some(TorsionClass::Amide));
        assert_eq!(class_of("CC(=O)OC", 1, 3), Some(TorsionClass::Ester));
        assert_eq!(class_of("Cc1ccccc1", 0, 1), Some(TorsionClass::ArylSp3));
        assert_eq!(class_of("Oc1ccccc1", 0, 1), Some(TorsionClass::ArylHetero));
        assert_eq!(class_of("c1ccccc1-c1ccccc1", 5, 6), Some(TorsionClass::Biaryl));
        assert_eq!(class_of("CC=CC", 1, 2), Some(TorsionClass::Double));
        assert_eq!(class_of("CC#CC", 1, 2), None);
    }

    #[test]
    fn rotatable_bonds_exclude_rings_and_termini() {
        let mol = parse_smiles("CCC1CCCCC1").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let rotatable: Vec<usize> = (0..mol.bond_count())
            .filter(|&b| is_rotatable(&topo, b))
            .collect();
        // C0-C1 (methyl rotor) and C1-C2; ring and C-H bonds excluded.
        assert_eq!(rotatable.len(), 2);
    }

    #[test]
    fn representative_dihedral_prefers_heavy_atoms() {
        let mol = parse_smiles("CCCC").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let dihedrals = representative_dihedrals(&topo);
        let central = dihedrals
            .iter()
            .find(|d| (d.j, d.k) == (1, 2))
            .unwrap();
        assert_eq!((central.i, central.l), (0, 3));
    }

    #[test]
    fn lookup_walks_fallbacks() {
        let prefs = &get_default_parameters().torsion_preferences;
        let biaryl_v1 = TorsionClass::Biaryl.lookup(&prefs.v1).unwrap();
        assert_eq!(biaryl_v1, &prefs.v1["sp2-sp2"]);
        let biaryl_v2 = TorsionClass::Biaryl.lookup(&prefs.v2).unwrap();
        assert_eq!(biaryl_v2.len(), 2);
        assert!(TorsionClass::Double.lookup(&prefs.v1).is_none());
    }

    #[test]
    fn preference_terms_cover_rotatable_bonds() {
        let mol = parse_smiles("CCOC(=O)C").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let terms = preference_terms(&topo, &get_default_parameters().torsion_preferences.v2);
        // C0-C1, C1-O2 and O2-C3 (ester) rotate; C3-C5 also rotates.
        assert_eq!(terms.len(), 4);
    }
}
