//! SMILES reader.
//!
//! Supports the organic subset, aromatic lowercase atoms, bracket atoms
//! (isotope, chirality, hydrogen count, charge, atom class), explicit and
//! directional bonds, branches, ring closures including `%nn`, and `.`
//! component separators. Stereo marks are accepted and discarded.
//!
//! Implicit hydrogens of organic-subset atoms follow the default valence
//! lists; bracket atoms carry exactly the hydrogens they spell out. Rings
//! written in Kekulé form are perceived as aromatic when they are
//! five- or six-membered and fully conjugated.

mod error;
mod parser;
mod perception;

pub use error::ParseError;

use crate::model::molecule::Molecule;

/// Parses a SMILES string into a heavy-atom molecular graph with implicit
/// hydrogen counts. Surrounding whitespace is ignored.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, ParseError> {
    parser::Parser::new(smiles.trim()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{BondOrder, Element};

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms.iter().map(|a| a.implicit_hydrogens).collect()
    }

    #[test]
    fn parses_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(hydrogens(&mol), vec![3, 2, 1]);
        assert!((mol.molecular_weight() - 46.069).abs() < 0.01);
    }

    #[test]
    fn parses_aromatic_benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert!(mol.atoms.iter().all(|a| a.aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert_eq!(hydrogens(&mol), vec![1; 6]);
    }

    #[test]
    fn kekule_benzene_is_perceived_aromatic() {
        let mol = parse_smiles("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert_eq!(hydrogens(&mol), vec![1; 6]);
    }

    #[test]
    fn kekule_pyrrole_is_perceived_aromatic() {
        let mol = parse_smiles("C1=CC=CN1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.aromatic));
        assert_eq!(mol.atoms[4].element, Element::N);
        assert_eq!(mol.atoms[4].implicit_hydrogens, 1);
    }

    #[test]
    fn cyclohexene_stays_aliphatic() {
        let mol = parse_smiles("C1=CCCCC1").unwrap();
        assert!(mol.atoms.iter().all(|a| !a.aromatic));
    }

    #[test]
    fn parses_aspirin() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 13);
        assert_eq!(mol.hydrogen_count(), 8);
        assert!((mol.molecular_weight() - 180.16).abs() < 0.05);
        let ring_bonds = mol
            .bonds
            .iter()
            .filter(|b| b.order == BondOrder::Aromatic)
            .count();
        assert_eq!(ring_bonds, 6);
    }

    #[test]
    fn biphenyl_link_is_single() {
        let mol = parse_smiles("c1ccccc1c1ccccc1").unwrap();
        let link = mol.bond_between(5, 6).unwrap();
        assert_eq!(mol.bonds[link].order, BondOrder::Single);
    }

    #[test]
    fn parses_bracket_atoms_and_components() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[1].formal_charge, -1);
        assert_eq!(mol.component_count(), 2);
    }

    #[test]
    fn parses_bracket_details() {
        let mol = parse_smiles("[13CH3][C@@H](N)C(=O)[O-]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 1);
        assert_eq!(mol.atoms[2].implicit_hydrogens, 2);
        assert_eq!(mol.atoms[5].formal_charge, -1);
        assert_eq!(mol.atoms[5].implicit_hydrogens, 0);
    }

    #[test]
    fn parses_aromatic_nh_and_pyridine() {
        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(pyrrole.atoms[3].implicit_hydrogens, 1);
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(pyridine.atoms[3].implicit_hydrogens, 0);
        assert_eq!(pyridine.hydrogen_count(), 5);
    }

    #[test]
    fn parses_percent_ring_labels_and_charges() {
        let mol = parse_smiles("C%10CC%10").unwrap();
        assert_eq!(mol.rings().ring_count(), 1);
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);
        let mol = parse_smiles("[O--]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, -2);
    }

    #[test]
    fn hypervalent_sulfur_and_phosphorus() {
        let dmso = parse_smiles("CS(=O)C").unwrap();
        assert_eq!(dmso.atoms[1].implicit_hydrogens, 0);
        let sulfonic = parse_smiles("CS(=O)(=O)O").unwrap();
        assert_eq!(sulfonic.atoms[1].implicit_hydrogens, 0);
        let phosphate = parse_smiles("OP(=O)(O)O").unwrap();
        assert_eq!(phosphate.atoms[1].implicit_hydrogens, 0);
    }

    #[test]
    fn ring_bond_order_on_either_side() {
        let mol = parse_smiles("C=1CCCCC1").unwrap();
        let closure = mol.bond_between(0, 5).unwrap();
        assert_eq!(mol.bonds[closure].order, BondOrder::Double);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_smiles(""), Err(ParseError::Empty));
        assert_eq!(parse_smiles("   "), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_smiles("INVALID"),
            Err(ParseError::UnknownElement { .. })
        ));
        assert!(matches!(
            parse_smiles("C?C"),
            Err(ParseError::UnexpectedChar { ch: '?', pos: 1 })
        ));
    }

    #[test]
    fn rejects_unbalanced_branches() {
        assert_eq!(
            parse_smiles("CC(C"),
            Err(ParseError::UnmatchedParenthesis { pos: 2 })
        );
        assert_eq!(
            parse_smiles("CC)C"),
            Err(ParseError::UnmatchedParenthesis { pos: 2 })
        );
        assert_eq!(
            parse_smiles("(C)C"),
            Err(ParseError::BranchWithoutAtom { pos: 0 })
        );
    }

    #[test]
    fn rejects_ring_errors() {
        assert_eq!(parse_smiles("C1CC"), Err(ParseError::UnclosedRing { label: 1 }));
        assert!(matches!(
            parse_smiles("C11"),
            Err(ParseError::InvalidRingClosure { label: 1, .. })
        ));
        assert!(matches!(
            parse_smiles("C=1CCCCC#1"),
            Err(ParseError::RingBondConflict { label: 1, .. })
        ));
    }

    #[test]
    fn rejects_dangling_bonds() {
        assert_eq!(parse_smiles("CC="), Err(ParseError::DanglingBond { pos: 2 }));
        assert!(matches!(
            parse_smiles("=CC"),
            Err(ParseError::UnexpectedChar { ch: '=', pos: 0 })
        ));
    }

    #[test]
    fn rejects_empty_dot_components() {
        assert_eq!(parse_smiles("C..C"), Err(ParseError::EmptyComponent { pos: 2 }));
        assert_eq!(parse_smiles(".C"), Err(ParseError::EmptyComponent { pos: 0 }));
        assert_eq!(parse_smiles("C."), Err(ParseError::EmptyComponent { pos: 1 }));
        assert_eq!(parse_smiles("."), Err(ParseError::EmptyComponent { pos: 0 }));
        assert_eq!(parse_smiles("CC.O").unwrap().component_count(), 2);
    }

    #[test]
    fn accepts_metals_and_actinides_in_brackets() {
        let mol = parse_smiles("[U+4].[Pt]").unwrap();
        assert_eq!(mol.atoms[0].element, Element::U);
        assert_eq!(mol.atoms[0].formal_charge, 4);
        assert_eq!(mol.atoms[1].element, Element::Pt);
        assert!(parse_smiles("[Cs+].[Cl-]").is_ok());
    }

    #[test]
    fn rejects_bad_brackets() {
        assert!(matches!(
            parse_smiles("[C"),
            Err(ParseError::BracketAtom { .. })
        ));
        assert!(matches!(
            parse_smiles("[Xx]"),
            Err(ParseError::UnknownElement { .. })
        ));
    }

    #[test]
    fn rejects_overvalent_carbon() {
        assert_eq!(
            parse_smiles("C(C)(C)(C)(C)C"),
            Err(ParseError::Valence {
                index: 0,
                element: Element::C,
                valence: 5
            })
        );
    }

    #[test]
    fn rejects_aromatic_atom_outside_ring() {
        assert_eq!(
            parse_smiles("cc"),
            Err(ParseError::AromaticOutsideRing { index: 0 })
        );
    }
}
