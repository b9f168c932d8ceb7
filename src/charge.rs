//! Gasteiger–Marsili partial equalisation of orbital electronegativity.

use crate::model::molecule::Molecule;
use crate::model::types::{Element, Hybridization};
use crate::params::{GasteigerParams, Parameters, get_default_parameters};
use thiserror::Error;

const ITERATIONS: u32 = 6;
const DAMPING: f64 = 0.5;
/// Cation electronegativity used for hydrogen instead of a + b + c.
const HYDROGEN_CHI_PLUS: f64 = 20.02;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no Gasteiger parameters for atom {index} ({element}, class {class})")]
    UnsupportedAtom {
        index: usize,
        element: Element,
        class: String,
    },
}

/// Computes Gasteiger charges with the embedded parameter table.
///
/// Every hydrogen must be an explicit graph node; implicit hydrogens are
/// ignored. Initial charges are the formal charges, so the charges sum to
/// the net formal charge.
pub fn gasteiger_charges(molecule: &Molecule) -> Result<Vec<f64>, Error> {
    gasteiger_charges_with(molecule, get_default_parameters())
}

pub fn gasteiger_charges_with(molecule: &Molecule, params: &Parameters) -> Result<Vec<f64>, Error> {
    let hybridization = molecule.hybridizations();

    let table: Vec<&GasteigerParams> = molecule
        .atoms
        .iter()
        .enumerate()
        .map(|(index, atom)| {
            let class = gasteiger_class(atom.element, hybridization[index]);
            params.gasteiger.get(&class).ok_or(Error::UnsupportedAtom {
                index,
                element: atom.element,
                class,
            })
        })
        .collect::<Result<_, _>>()?;

    let chi_plus: Vec<f64> = molecule
        .atoms
        .iter()
        .zip(&table)
        .map(|(atom, p)| {
            if atom.element.is_hydrogen() {
                HYDROGEN_CHI_PLUS
            } else {
                p.chi_plus()
            }
        })
        .collect();

    let mut charges: Vec<f64> = molecule
        .atoms
        .iter()
        .map(|a| f64::from(a.formal_charge))
        .collect();
    let mut delta = vec![0.0; charges.len()];
    let mut damping = 1.0;

    for _ in 0..ITERATIONS {
        damping *= DAMPING;
        let chi: Vec<f64> = table.iter().zip(&charges).map(|(p, &q)| p.chi(q)).collect();
        delta.iter_mut().for_each(|d| *d = 0.0);

        for bond in &molecule.bonds {
            let (i, j) = (bond.i, bond.j);
            let (donor, acceptor) = if chi[j] > chi[i] { (i, j) } else { (j, i) };
            let denom = chi_plus[donor];
            if denom == 0.0 {
                continue;
            }
            let transfer = (chi[acceptor] - chi[donor]) / denom * damping;
            delta[donor] += transfer;
            delta[acceptor] -= transfer;
        }

        for (q, d) in charges.iter_mut().zip(&delta) {
            *q += d;
        }
    }

    Ok(charges)
}

fn gasteiger_class(element: Element, hybridization: Hybridization) -> String {
    let digit = match hybridization {
        Hybridization::SP => "1",
        Hybridization::SP2 => "2",
        Hybridization::SP3 | Hybridization::Unspecified => "3",
    };
    match element {
        Element::H | Element::F | Element::Cl | Element::Br | Element::I | Element::Si => {
            element.symbol().to_string()
        }
        Element::B if hybridization == Hybridization::SP2 => "B2".to_string(),
        Element::S if hybridization == Hybridization::SP2 => "S2".to_string(),
        Element::B | Element::S | Element::P => format!("{}3", element.symbol()),
        Element::O if hybridization == Hybridization::SP => "O2".to_string(),
        _ => format!("{}{}", element.symbol(), digit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn charges_for(smiles: &str) -> (Molecule, Vec<f64>) {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let q = gasteiger_charges(&mol).unwrap();
        (mol, q)
    }

    #[test]
    fn neutral_molecule_sums_to_zero() {
        let (_, q) = charges_for("CCO");
        assert!(q.iter().sum::<f64>().abs() < 1e-9);
    }

    #[test]
    fn oxygen_is_negative_in_ethanol() {
        let (mol, q) = charges_for("CCO");
        let oxygen = mol.atoms.iter().position(|a| a.element == Element::O).unwrap();
        assert!(q[oxygen] < -0.3 && q[oxygen] > -0.5, "q(O) = {}", q[oxygen]);
        // The hydroxyl hydrogen is the most positive atom.
        let max = q.iter().cloned().fold(f64::MIN, f64::max);
        let hydroxyl_h = mol
            .bonds
            .iter()
            .find(|b| b.contains(oxygen) && mol.atoms[b.other(oxygen)].element == Element::H)
            .map(|b| b.other(oxygen))
            .unwrap();
        assert_eq!(q[hydroxyl_h], max);
    }

    #[test]
    fn ion_charge_is_preserved() {
        let (_, q) = charges_for("C[NH3+]");
        assert!((q.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn symmetric_atoms_get_equal_charges() {
        let (_, q) = charges_for("c1ccccc1");
        for i in 1..6 {
            assert!((q[i] - q[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn unsupported_element_is_reported() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        let err = gasteiger_charges(&mol).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAtom { index: 0, element: Element::Na, .. }));
    }
}
