//! Force-field atom typing from perceived topology.

use super::topology::Topology;
use crate::model::types::{BondOrder, Element, Hybridization};

/// Total bond valence of an atom, implicit hydrogens included.
fn valence(topology: &Topology, atom: usize) -> u32 {
    let mol = topology.molecule;
    let bonded: u32 = topology.neighbors[atom]
        .iter()
        .map(|nb| u32::from(mol.bonds[nb.bond].order.valence_units()))
        .sum();
    let aromatic_extra = u32::from(mol.atoms[atom].aromatic);
    bonded + u32::from(mol.atoms[atom].implicit_hydrogens) + aromatic_extra
}

fn has_double_bond(topology: &Topology, atom: usize) -> bool {
    topology.neighbors[atom]
        .iter()
        .any(|nb| topology.molecule.bonds[nb.bond].order == BondOrder::Double)
}

/// UFF type label of every atom.
pub fn uff_types(topology: &Topology) -> Vec<String> {
    (0..topology.atom_count())
        .map(|idx| uff_type(topology, idx).to_string())
        .collect()
}

fn uff_type(topology: &Topology, idx: usize) -> &'static str {
    let atom = &topology.molecule.atoms[idx];
    let hyb = topology.hybridization[idx];
    match atom.element {
        Element::H => "H_",
        Element::Li => "Li",
        Element::Na => "Na",
        Element::K => "K_",
        Element::Mg => "Mg3",
        Element::Ca => "Ca6+2",
        Element::Al => "Al3",
        Element::Fe => "Fe3+2",
        Element::Cu => "Cu3+1",
        Element::Zn => "Zn3+2",
        Element::Sn => "Sn3",
        Element::Be => "Be3+2",
        Element::Ti => "Ti3+4",
        Element::V => "V_3+5",
        Element::Cr => "Cr6+3",
        Element::Mn => "Mn6+2",
        Element::Co => "Co6+3",
        Element::Ni => "Ni4+2",
        Element::Ga => "Ga3+3",
        Element::Ge => "Ge3",
        Element::Rb => "Rb",
        Element::Sr => "Sr6+2",
        Element::Zr => "Zr3+4",
        Element::Mo => "Mo6+6",
        Element::Ru => "Ru6+2",
        Element::Rh => "Rh6+3",
        Element::Pd => "Pd4+2",
        Element::Ag => "Ag1+1",
        Element::Cd => "Cd3+2",
        Element::In => "In3+3",
        Element::Sb => "Sb3+3",
        Element::Te => "Te3+2",
        Element::Cs => "Cs",
        Element::Ba => "Ba6+2",
        Element::Gd => "Gd6+3",
        Element::W => "W_6+6",
        Element::Pt => "Pt4+2",
        Element::Au => "Au4+3",
        Element::Hg => "Hg1+2",
        Element::Tl => "Tl3+3",
        Element::Pb => "Pb3",
        Element::Bi => "Bi3+3",
        Element::U => "U6+4",
        Element::Si => "Si3",
        Element::As => "As3+3",
        Element::Se => "Se3+2",
        Element::F => "F_",
        Element::Cl => "Cl",
        Element::Br => "Br",
        Element::I => "I_",
        Element::B => match hyb {
            Hybridization::SP2 => "B_2",
            _ => "B_3",
        },
        Element::C => match hyb {
            _ if atom.aromatic => "C_R",
            Hybridization::SP => "C_1",
            Hybridization::SP2 => "C_2",
            _ => "C_3",
        },
        Element::N => match hyb {
            _ if atom.aromatic => "N_R",
            Hybridization::SP => "N_1",
            Hybridization::SP2 if !has_double_bond(topology, idx) => "N_R",
            Hybridization::SP2 => "N_2",
            _ => "N_3",
        },
        Element::O => match hyb {
            _ if atom.aromatic => "O_R",
            Hybridization::SP => "O_1",
            Hybridization::SP2 => "O_2",
            _ => "O_3",
        },
        Element::S => match valence(topology, idx) {
            _ if atom.aromatic => "S_R",
            v if v >= 6 => "S_3+6",
            v if v >= 4 => "S_3+4",
            _ if hyb == Hybridization::SP2 => "S_2",
            _ => "S_3+2",
        },
        Element::P => match valence(topology, idx) {
            v if v >= 5 => "P_3+5",
            _ => "P_3+3",
        },
    }
}

/// MMFF-style class label of every atom.
///
/// Elements without an entry in the parameter table keep a label anyway;
/// the lookup reports them as missing parameters.
pub fn mmff_classes(topology: &Topology) -> Vec<String> {
    (0..topology.atom_count())
        .map(|idx| mmff_class(topology, idx))
        .collect()
}

fn mmff_class(topology: &Topology, idx: usize) -> String {
    let atom = &topology.molecule.atoms[idx];
    let hyb = topology.hybridization[idx];
    let label = match atom.element {
        Element::H => "H",
        Element::F => "F",
        Element::Cl => "Cl",
        Element::Br => "Br",
        Element::I => "I",
        Element::Si => "Si",
        Element::C => match hyb {
            _ if atom.aromatic => "C_R",
            Hybridization::SP => "C_1",
            Hybridization::SP2 => "C_2",
            _ => "C_3",
        },
        Element::N => match hyb {
            _ if atom.aromatic => "N_R",
            Hybridization::SP => "N_1",
            Hybridization::SP2 if !has_double_bond(topology, idx) => "N_R",
            Hybridization::SP2 => "N_2",
            _ => "N_3",
        },
        Element::O => match hyb {
            _ if atom.aromatic => "O_R",
            Hybridization::SP | Hybridization::SP2 => "O_2",
            _ => "O_3",
        },
        Element::S => match valence(topology, idx) {
            _ if atom.aromatic => "S_R",
            v if v >= 4 => "S_4",
            _ if hyb == Hybridization::SP2 => "S_2",
            _ => "S_3",
        },
        Element::P => match valence(topology, idx) {
            v if v >= 5 => "P_4",
            _ => "P_3",
        },
        other => return other.symbol().to_string(),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn uff_for(smiles: &str) -> Vec<String> {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        uff_types(&topo)
    }

    fn mmff_for(smiles: &str) -> Vec<String> {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        mmff_classes(&topo)
    }

    #[test]
    fn types_acetic_acid() {
        let types = uff_for("CC(=O)O");
        assert_eq!(&types[..4], ["C_3", "C_2", "O_2", "O_3"]);
        assert!(types[4..].iter().all(|t| t == "H_"));
    }

    #[test]
    fn types_aromatics_as_resonant() {
        let types = uff_for("c1ccncc1");
        assert_eq!(types[3], "N_R");
        assert!(types[..6].iter().all(|t| t.ends_with("_R")));
    }

    #[test]
    fn amide_nitrogen_is_resonant() {
        let types = uff_for("CC(=O)N");
        assert_eq!(types[3], "N_R");
        let types = uff_for("CC=NC");
        assert_eq!(types[2], "N_2");
    }

    #[test]
    fn sulfur_types_follow_valence() {
        assert_eq!(uff_for("CSC")[1], "S_3+2");
        assert_eq!(uff_for("CS(=O)C")[1], "S_3+4");
        assert_eq!(uff_for("CS(=O)(=O)C")[1], "S_3+6");
        assert_eq!(uff_for("C=S")[1], "S_2");
    }

    #[test]
    fn nitrile_is_linear() {
        let types = uff_for("CC#N");
        assert_eq!(&types[..3], ["C_3", "C_1", "N_1"]);
    }

    #[test]
    fn mmff_classes_for_common_groups() {
        let classes = mmff_for("OC(=O)c1ccccc1");
        assert_eq!(&classes[..4], ["O_3", "C_2", "O_2", "C_R"]);
        assert_eq!(mmff_for("CS(=O)(=O)C")[1], "S_4");
    }

    #[test]
    fn mmff_keeps_unparameterised_elements_visible() {
        let classes = mmff_for("CB(C)C");
        assert_eq!(classes[1], "B");
    }

    #[test]
    fn every_element_has_uff_parameters() {
        let params = crate::params::get_default_parameters();
        for element in Element::ALL {
            let types = uff_for(&format!("[{element}]"));
            assert!(
                params.uff.atoms.contains_key(&types[0]),
                "{element}: no UFF entry for {}",
                types[0]
            );
        }
    }
}
