//! Ring perception.
//!
//! Candidate rings are the shortest cycles through each ring bond; a
//! smallest set of smallest rings is then selected greedily by size,
//! keeping only candidates whose bond sets are linearly independent over
//! GF(2). The number of rings equals the cyclomatic number of the graph.

use super::molecule::{Molecule, Neighbor};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInfo {
    /// Atoms of every ring, in cyclic order.
    pub rings: Vec<Vec<usize>>,
    /// Bond indices of every ring.
    pub ring_bonds: Vec<Vec<usize>>,
    bond_in_ring: Vec<bool>,
    atom_in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn perceive(molecule: &Molecule) -> Self {
        let adjacency = molecule.adjacency();
        let n_atoms = molecule.atom_count();
        let n_bonds = molecule.bond_count();

        let mut bond_in_ring = vec![false; n_bonds];
        let mut seen = HashSet::new();
        let mut candidates: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();

        for (idx, bond) in molecule.bonds.iter().enumerate() {
            let Some(path) = shortest_path_avoiding(&adjacency, bond.i, bond.j, idx) else {
                continue;
            };
            bond_in_ring[idx] = true;

            let mut key = path.clone();
            key.sort_unstable();
            if !seen.insert(key) {
                continue;
            }
            let bonds = cycle_bonds(&adjacency, &path);
            candidates.push((path, bonds));
        }
        candidates.sort_by_key(|(atoms, _)| atoms.len());

        let cyclomatic = (n_bonds + molecule.component_count()).saturating_sub(n_atoms);
        let mut basis = Gf2Basis::new(n_bonds);
        let mut rings = Vec::new();
        let mut ring_bonds = Vec::new();
        for (atoms, bonds) in candidates {
            if rings.len() == cyclomatic {
                break;
            }
            if basis.insert(&bonds) {
                rings.push(atoms);
                ring_bonds.push(bonds);
            }
        }

        let mut atom_in_ring = vec![false; n_atoms];
        for ring in &rings {
            for &atom in ring {
                atom_in_ring[atom] = true;
            }
        }

        Self {
            rings,
            ring_bonds,
            bond_in_ring,
            atom_in_ring,
        }
    }

    #[inline]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.bond_in_ring.get(bond).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.atom_in_ring.get(atom).copied().unwrap_or(false)
    }

    /// Size of the smallest perceived ring containing every listed bond.
    pub fn smallest_ring_with_bonds(&self, bonds: &[usize]) -> Option<usize> {
        self.ring_bonds
            .iter()
            .filter(|ring| bonds.iter().all(|b| ring.contains(b)))
            .map(Vec::len)
            .min()
    }

    /// Size of the smallest perceived ring containing `atom`.
    pub fn smallest_ring_with_atom(&self, atom: usize) -> Option<usize> {
        self.rings
            .iter()
            .filter(|ring| ring.contains(&atom))
            .map(Vec::len)
            .min()
    }
}

fn shortest_path_avoiding(
    adjacency: &[Vec<Neighbor>],
    start: usize,
    goal: usize,
    excluded_bond: usize,
) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; adjacency.len()];
    parent[start] = start;
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for nb in &adjacency[current] {
            if nb.bond == excluded_bond || parent[nb.atom] != usize::MAX {
                continue;
            }
            parent[nb.atom] = current;
            queue.push_back(nb.atom);
        }
    }

    if parent[goal] == usize::MAX {
        return None;
    }
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = parent[current];
        path.push(current);
    }
    path.reverse();
    Some(path)
}

fn cycle_bonds(adjacency: &[Vec<Neighbor>], cycle: &[usize]) -> Vec<usize> {
    let mut bonds = Vec::with_capacity(cycle.len());
    for (pos, &a) in cycle.iter().enumerate() {
        let b = cycle[(pos + 1) % cycle.len()];
        if let Some(nb) = adjacency[a].iter().find(|nb| nb.atom == b) {
            bonds.push(nb.bond);
        }
    }
    bonds
}

/// Incremental row-echelon basis of bond-incidence vectors over GF(2).
struct Gf2Basis {
    words: usize,
    rows: Vec<(usize, Vec<u64>)>,
}

impl Gf2Basis {
    fn new(bits: usize) -> Self {
        Self {
            words: bits.div_ceil(64).max(1),
            rows: Vec::new(),
        }
    }

    /// Adds the vector if it is independent of the current basis.
    fn insert(&mut self, set_bits: &[usize]) -> bool {
        let mut v = vec![0u64; self.words];
        for &bit in set_bits {
            v[bit / 64] ^= 1 << (bit % 64);
        }
        for (pivot, row) in &self.rows {
            if v[pivot / 64] & (1 << (pivot % 64)) != 0 {
                for (a, b) in v.iter_mut().zip(row) {
                    *a ^= b;
                }
            }
        }
        let pivot = v
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize);
        match pivot {
            Some(p) => {
                self.rows.push((p, v));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{BondOrder, Element};

    fn chain_ring(size: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..size {
            mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
        }
        for i in 0..size {
            mol.add_bond(i, (i + 1) % size, BondOrder::Single);
        }
        mol
    }

    fn make_naphthalene_skeleton() -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..10 {
            mol.add_atom(Atom::new(Element::C).aromatic());
        }
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 0),
            (4, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 5),
        ];
        for (a, b) in edges {
            mol.add_bond(a, b, BondOrder::Aromatic);
        }
        mol
    }

    #[test]
    fn cyclohexane_has_one_six_ring() {
        let info = chain_ring(6).rings();
        assert_eq!(info.ring_count(), 1);
        assert_eq!(info.rings[0].len(), 6);
        assert!((0..6).all(|b| info.is_ring_bond(b)));
        assert_eq!(info.smallest_ring_with_atom(3), Some(6));
    }

    #[test]
    fn naphthalene_has_two_six_rings() {
        let info = make_naphthalene_skeleton().rings();
        assert_eq!(info.ring_count(), 2);
        assert!(info.rings.iter().all(|r| r.len() == 6));
        // The fusion bond 4-5 belongs to both rings.
        assert_eq!(info.smallest_ring_with_bonds(&[4]), Some(6));
    }

    #[test]
    fn acyclic_chain_has_no_rings() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C));
        mol.add_atom(Atom::new(Element::C));
        mol.add_atom(Atom::new(Element::O));
        mol.add_bond(0, 1, BondOrder::Single);
        mol.add_bond(1, 2, BondOrder::Single);
        let info = mol.rings();
        assert_eq!(info.ring_count(), 0);
        assert!(!info.is_ring_bond(0));
        assert!(!info.is_ring_atom(1));
    }

    #[test]
    fn bicyclic_bridge_counts_cyclomatic_rings() {
        // Norbornane: C1CC2CCC1C2
        let mut mol = Molecule::new();
        for _ in 0..7 {
            mol.add_atom(Atom::new(Element::C));
        }
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (5, 6), (6, 2)];
        for (a, b) in edges {
            mol.add_bond(a, b, BondOrder::Single);
        }
        let info = mol.rings();
        assert_eq!(info.ring_count(), 2);
        assert!(info.rings.iter().all(|r| r.len() == 5));
    }

    #[test]
    fn cyclopropane_angle_lookup() {
        let info = chain_ring(3).rings();
        assert_eq!(info.smallest_ring_with_bonds(&[0, 1]), Some(3));
        assert_eq!(info.smallest_ring_with_bonds(&[]), Some(3));
    }
}
