//! Post-parse perception: ring checks, implicit hydrogens and aromaticity
//! of rings written in Kekulé form.

use super::error::ParseError;
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::ring::RingInfo;
use crate::model::types::{BondOrder, Element};

pub(super) fn finalize(
    atoms: Vec<Atom>,
    bracketed: &[bool],
    bonds: Vec<Bond>,
) -> Result<Molecule, ParseError> {
    let mut molecule = Molecule { atoms, bonds };
    let rings = molecule.rings();

    for (idx, bond) in molecule.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic && !rings.is_ring_bond(idx) {
            bond.order = BondOrder::Single;
        }
    }
    if let Some(index) =
        (0..molecule.atom_count()).find(|&i| molecule.atoms[i].aromatic && !rings.is_ring_atom(i))
    {
        return Err(ParseError::AromaticOutsideRing { index });
    }

    assign_implicit_hydrogens(&mut molecule, bracketed)?;
    perceive_aromatic_rings(&mut molecule, &rings);
    Ok(molecule)
}

fn assign_implicit_hydrogens(molecule: &mut Molecule, bracketed: &[bool]) -> Result<(), ParseError> {
    let adjacency = molecule.adjacency();

    for idx in 0..molecule.atom_count() {
        if bracketed[idx] {
            continue;
        }
        let atom = &molecule.atoms[idx];
        let mut valence: u32 = 0;
        let mut has_multiple = false;
        for nb in &adjacency[idx] {
            let order = molecule.bonds[nb.bond].order;
            valence += u32::from(order.valence_units());
            has_multiple |= matches!(
                order,
                BondOrder::Double | BondOrder::Triple | BondOrder::Quadruple
            );
        }
        if atom.aromatic && !has_multiple {
            let donates = match atom.element {
                Element::B | Element::C => true,
                Element::N | Element::P => adjacency[idx].len() == 2,
                _ => false,
            };
            if donates {
                valence += 1;
            }
        }

        let allowed = atom.element.default_valences();
        let target = allowed
            .iter()
            .map(|&v| u32::from(v))
            .find(|&v| v >= valence)
            .ok_or(ParseError::Valence {
                index: idx,
                element: atom.element,
                valence,
            })?;
        molecule.atoms[idx].implicit_hydrogens = (target - valence) as u8;
    }
    Ok(())
}

/// Marks five- and six-membered rings written with alternating single and
/// double bonds as aromatic. Rings are revisited until nothing changes so
/// that fused systems are recognised once a neighbouring ring is aromatic.
fn perceive_aromatic_rings(molecule: &mut Molecule, rings: &RingInfo) {
    loop {
        let mut changed = false;
        for (ring_atoms, ring_bonds) in rings.rings.iter().zip(&rings.ring_bonds) {
            if ring_atoms.iter().all(|&a| molecule.atoms[a].aromatic) {
                continue;
            }
            let aromatic = match ring_atoms.len() {
                6 => is_kekule_six_ring(molecule, ring_atoms, ring_bonds),
                5 => is_kekule_five_ring(molecule, ring_atoms, ring_bonds),
                _ => false,
            };
            if aromatic {
                for &a in ring_atoms {
                    molecule.atoms[a].aromatic = true;
                }
                for &b in ring_bonds {
                    molecule.bonds[b].order = BondOrder::Aromatic;
                }
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn has_ring_double(molecule: &Molecule, atom: usize, ring_bonds: &[usize]) -> bool {
    ring_bonds.iter().any(|&b| {
        let bond = &molecule.bonds[b];
        bond.contains(atom) && bond.order == BondOrder::Double
    })
}

fn ring_is_conjugable(molecule: &Molecule, ring_bonds: &[usize]) -> bool {
    ring_bonds.iter().all(|&b| {
        matches!(
            molecule.bonds[b].order,
            BondOrder::Single | BondOrder::Double | BondOrder::Aromatic
        )
    })
}

fn is_kekule_six_ring(molecule: &Molecule, ring_atoms: &[usize], ring_bonds: &[usize]) -> bool {
    ring_is_conjugable(molecule, ring_bonds)
        && ring_atoms.iter().all(|&a| {
            let atom = &molecule.atoms[a];
            matches!(atom.element, Element::C | Element::N)
                && (atom.aromatic || has_ring_double(molecule, a, ring_bonds))
        })
}

fn is_kekule_five_ring(molecule: &Molecule, ring_atoms: &[usize], ring_bonds: &[usize]) -> bool {
    if !ring_is_conjugable(molecule, ring_bonds) {
        return false;
    }
    let mut donors = 0;
    for &a in ring_atoms {
        let atom = &molecule.atoms[a];
        if atom.aromatic || has_ring_double(molecule, a, ring_bonds) {
            if !matches!(atom.element, Element::C | Element::N) {
                return false;
            }
            continue;
        }
        let lone_pair_donor = matches!(atom.element, Element::N | Element::O | Element::S)
            && !molecule
                .bonds
                .iter()
                .any(|b| b.contains(a) && b.order == BondOrder::Double);
        if !lone_pair_donor {
            return false;
        }
        donors += 1;
    }
    donors == 1
}
