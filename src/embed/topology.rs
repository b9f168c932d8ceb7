//! Connectivity-derived data shared by the bounds builder and the force
//! fields.
//!
//! A [`Topology`] is built once per molecule and reused across every
//! method and trial of that molecule.

use super::error::Error;
use crate::model::molecule::{Molecule, Neighbor};
use crate::model::ring::RingInfo;
use crate::model::types::{BondOrder, Element, Hybridization};
use std::collections::VecDeque;

/// Three-atom bend `i-j-k` centred on `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// Four-atom torsion `i-j-k-l` about the bond `j-k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dihedral {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
    /// Index of the central bond in the molecule.
    pub bond: usize,
}

#[derive(Debug, Clone)]
pub struct Topology<'a> {
    pub molecule: &'a Molecule,
    pub hybridization: Vec<Hybridization>,
    pub neighbors: Vec<Vec<Neighbor>>,
    pub rings: RingInfo,
    pub angles: Vec<Angle>,
    pub dihedrals: Vec<Dihedral>,
    pub components: Vec<usize>,
    /// Bond-count distance between every pair, `None` across components.
    paths: Vec<Option<u32>>,
}

impl<'a> Topology<'a> {
    pub fn new(molecule: &'a Molecule) -> Result<Self, Error> {
        if molecule.is_empty() {
            return Err(Error::EmptyMolecule);
        }
        let neighbors = molecule.adjacency();
        let angles = enumerate_angles(&neighbors);
        let dihedrals = enumerate_dihedrals(molecule, &neighbors);
        let paths = path_lengths(&neighbors);

        Ok(Self {
            molecule,
            hybridization: molecule.hybridizations(),
            rings: molecule.rings(),
            components: molecule.components(),
            neighbors,
            angles,
            dihedrals,
            paths,
        })
    }

    pub fn atom_count(&self) -> usize {
        self.molecule.atom_count()
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors[atom].len()
    }

    pub fn path_length(&self, i: usize, j: usize) -> Option<u32> {
        self.paths[i * self.atom_count() + j]
    }

    pub fn bond_order(&self, bond: usize) -> BondOrder {
        self.molecule.bonds[bond].order
    }

    /// Longest shortest path inside the component containing `atom`.
    pub fn component_diameter(&self, atom: usize) -> u32 {
        let label = self.components[atom];
        let members: Vec<usize> = (0..self.atom_count())
            .filter(|&a| self.components[a] == label)
            .collect();
        members
            .iter()
            .flat_map(|&a| members.iter().filter_map(move |&b| self.path_length(a, b)))
            .max()
            .unwrap_or(0)
    }

    /// Non-aromatic nitrogen bonded to a carbonyl or thiocarbonyl carbon.
    pub fn is_amide_nitrogen(&self, atom: usize) -> bool {
        let mol = self.molecule;
        mol.atoms[atom].element == Element::N
            && !mol.atoms[atom].aromatic
            && self.neighbors[atom]
                .iter()
                .any(|nb| self.is_carbonyl_carbon(nb.atom))
    }

    /// Carbon double bonded to oxygen or sulfur.
    pub fn is_carbonyl_carbon(&self, atom: usize) -> bool {
        let mol = self.molecule;
        mol.atoms[atom].element == Element::C
            && self.neighbors[atom].iter().any(|nb| {
                mol.bonds[nb.bond].order == BondOrder::Double
                    && matches!(mol.atoms[nb.atom].element, Element::O | Element::S)
            })
    }
}

fn enumerate_angles(neighbors: &[Vec<Neighbor>]) -> Vec<Angle> {
    let mut angles = Vec::new();
    for (j, nbs) in neighbors.iter().enumerate() {
        for (a, first) in nbs.iter().enumerate() {
            for second in &nbs[a + 1..] {
                angles.push(Angle {
                    i: first.atom,
                    j,
                    k: second.atom,
                });
            }
        }
    }
    angles
}

fn enumerate_dihedrals(molecule: &Molecule, neighbors: &[Vec<Neighbor>]) -> Vec<Dihedral> {
    let mut dihedrals = Vec::new();
    for (bond_idx, bond) in molecule.bonds.iter().enumerate() {
        let (j, k) = (bond.i, bond.j);
        for ni in &neighbors[j] {
            if ni.atom == k {
                continue;
            }
            for nl in &neighbors[k] {
                if nl.atom == j || nl.atom == ni.atom {
                    continue;
                }
                dihedrals.push(Dihedral {
                    i: ni.atom,
                    j,
                    k,
                    l: nl.atom,
                    bond: bond_idx,
                });
            }
        }
    }
    dihedrals
}

fn path_lengths(neighbors: &[Vec<Neighbor>]) -> Vec<Option<u32>> {
    let n = neighbors.len();
    let mut paths = vec![None; n * n];
    let mut queue = VecDeque::new();
    for start in 0..n {
        let row = &mut paths[start * n..(start + 1) * n];
        row[start] = Some(0);
        queue.clear();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let next = row[current].map_or(0, |d| d + 1);
            for nb in &neighbors[current] {
                if row[nb.atom].is_none() {
                    row[nb.atom] = Some(next);
                    queue.push_back(nb.atom);
                }
            }
        }
    }
    paths
}
