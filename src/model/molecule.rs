use super::atom::Atom;
use super::ring::RingInfo;
use super::types::{BondOrder, Element, Hybridization};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// Returns the partner of `idx` in this bond.
    #[inline]
    pub fn other(&self, idx: usize) -> usize {
        if self.i == idx { self.j } else { self.i }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.i == idx || self.j == idx
    }
}

/// Entry of an adjacency list: the neighbouring atom and the connecting bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub atom: usize,
    pub bond: usize,
}

/// A molecular graph.
///
/// Hydrogens may be implicit (counted on their heavy atom) or explicit
/// graph nodes; [`Molecule::with_explicit_hydrogens`] converts the former
/// into the latter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.element.is_hydrogen()).count()
    }

    /// Total hydrogen count, implicit and explicit.
    pub fn hydrogen_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|a| {
                usize::from(a.implicit_hydrogens) + usize::from(a.element.is_hydrogen())
            })
            .sum()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) -> usize {
        self.bonds.push(Bond::new(i, j, order));
        self.bonds.len() - 1
    }

    pub fn adjacency(&self) -> Vec<Vec<Neighbor>> {
        let mut adjacency = vec![Vec::new(); self.atoms.len()];
        for (idx, bond) in self.bonds.iter().enumerate() {
            adjacency[bond.i].push(Neighbor { atom: bond.j, bond: idx });
            adjacency[bond.j].push(Neighbor { atom: bond.i, bond: idx });
        }
        adjacency
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        let (i, j) = if a <= b { (a, b) } else { (b, a) };
        self.bonds.iter().position(|bond| bond.i == i && bond.j == j)
    }

    /// Degree of every atom counting implicit hydrogens as neighbours.
    pub fn total_degrees(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self
            .atoms
            .iter()
            .map(|a| usize::from(a.implicit_hydrogens))
            .collect();
        for bond in &self.bonds {
            degrees[bond.i] += 1;
            degrees[bond.j] += 1;
        }
        degrees
    }

    /// Hydrogens attached to every atom, implicit plus explicit neighbours.
    pub fn attached_hydrogens(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = self
            .atoms
            .iter()
            .map(|a| usize::from(a.implicit_hydrogens))
            .collect();
        for bond in &self.bonds {
            if self.atoms[bond.j].element.is_hydrogen() {
                counts[bond.i] += 1;
            }
            if self.atoms[bond.i].element.is_hydrogen() {
                counts[bond.j] += 1;
            }
        }
        counts
    }

    /// Connected component label for every atom, numbered from zero in
    /// order of first appearance.
    pub fn components(&self) -> Vec<usize> {
        let adjacency = self.adjacency();
        let mut labels = vec![usize::MAX; self.atoms.len()];
        let mut next = 0;
        for start in 0..self.atoms.len() {
            if labels[start] != usize::MAX {
                continue;
            }
            labels[start] = next;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for nb in &adjacency[current] {
                    if labels[nb.atom] == usize::MAX {
                        labels[nb.atom] = next;
                        queue.push_back(nb.atom);
                    }
                }
            }
            next += 1;
        }
        labels
    }

    pub fn component_count(&self) -> usize {
        self.components().into_iter().max().map_or(0, |m| m + 1)
    }

    pub fn molecular_weight(&self) -> f64 {
        self.atoms.iter().map(Atom::mass_with_hydrogens).sum()
    }

    pub fn net_charge(&self) -> i32 {
        self.atoms.iter().map(|a| i32::from(a.formal_charge)).sum()
    }

    pub fn rings(&self) -> RingInfo {
        RingInfo::perceive(self)
    }

    /// Returns a copy in which every implicit hydrogen is a graph node.
    ///
    /// Heavy atoms keep their indices; the new hydrogens are appended in
    /// the order of the atoms that carry them.
    pub fn with_explicit_hydrogens(&self) -> Molecule {
        let mut explicit = Molecule {
            atoms: self
                .atoms
                .iter()
                .map(|a| Atom {
                    implicit_hydrogens: 0,
                    ..a.clone()
                })
                .collect(),
            bonds: self.bonds.clone(),
        };
        for (idx, atom) in self.atoms.iter().enumerate() {
            for _ in 0..atom.implicit_hydrogens {
                let h = explicit.add_atom(Atom::new(Element::H));
                explicit.add_bond(idx, h, BondOrder::Single);
            }
        }
        explicit
    }

    /// Perceives the hybridization of every atom from its bonding pattern.
    ///
    /// Aromatic atoms and atoms with one double bond are sp2, atoms with a
    /// triple bond or two cumulated double bonds are sp, and saturated
    /// centres are sp3. A trivalent nitrogen next to an sp2 centre is
    /// treated as conjugated (sp2), as in amides and anilines.
    pub fn hybridizations(&self) -> Vec<Hybridization> {
        let adjacency = self.adjacency();
        let degrees = self.total_degrees();

        let mut hybridization: Vec<Hybridization> = self
            .atoms
            .iter()
            .enumerate()
            .map(|(idx, atom)| {
                if atom.element.is_hydrogen() || degrees[idx] == 0 || is_metal(atom.element) {
                    return Hybridization::Unspecified;
                }
                let mut doubles = 0;
                let mut triples = 0;
                for nb in &adjacency[idx] {
                    match self.bonds[nb.bond].order {
                        BondOrder::Double => doubles += 1,
                        BondOrder::Triple | BondOrder::Quadruple => triples += 1,
                        _ => {}
                    }
                }
                if atom.aromatic {
                    Hybridization::SP2
                } else if triples > 0 || doubles >= 2 {
                    Hybridization::SP
                } else if doubles == 1 {
                    Hybridization::SP2
                } else if matches!(atom.element, Element::B | Element::Al) && degrees[idx] <= 3 {
                    Hybridization::SP2
                } else {
                    Hybridization::SP3
                }
            })
            .collect();

        let initial = hybridization.clone();
        for (idx, atom) in self.atoms.iter().enumerate() {
            if atom.element == Element::N
                && initial[idx] == Hybridization::SP3
                && degrees[idx] <= 3
                && atom.formal_charge == 0
                && adjacency[idx]
                    .iter()
                    .any(|nb| initial[nb.atom] == Hybridization::SP2)
            {
                hybridization[idx] = Hybridization::SP2;
            }
        }

        hybridization
    }
}

fn is_metal(element: Element) -> bool {
    matches!(
        element,
        Element::Li
            | Element::Be
            | Element::Na
            | Element::Mg
            | Element::K
            | Element::Ca
            | Element::Ti
            | Element::V
            | Element::Cr
            | Element::Mn
            | Element::Fe
            | Element::Co
            | Element::Ni
            | Element::Cu
            | Element::Zn
            | Element::Rb
            | Element::Sr
            | Element::Zr
            | Element::Mo
            | Element::Ru
            | Element::Rh
            | Element::Pd
            | Element::Ag
            | Element::Cd
            | Element::Cs
            | Element::Ba
            | Element::Gd
            | Element::W
            | Element::Pt
            | Element::Au
            | Element::Hg
            | Element::U
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ethanol() -> Molecule {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let c2 = mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let o = mol.add_atom(Atom::new(Element::O).with_hydrogens(1));
        mol.add_bond(c1, c2, BondOrder::Single);
        mol.add_bond(c2, o, BondOrder::Single);
        mol
    }

    fn make_acetamide() -> Molecule {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let c2 = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        let n = mol.add_atom(Atom::new(Element::N).with_hydrogens(2));
        mol.add_bond(c1, c2, BondOrder::Single);
        mol.add_bond(c2, o, BondOrder::Double);
        mol.add_bond(c2, n, BondOrder::Single);
        mol
    }

    #[test]
    fn bond_new_normalizes_indices() {
        let bond = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((bond.i, bond.j), (2, 5));
        assert_eq!(bond.other(2), 5);
        assert_eq!(bond.other(5), 2);
    }

    #[test]
    fn explicit_hydrogens_are_appended() {
        let ethanol = make_ethanol();
        let explicit = ethanol.with_explicit_hydrogens();

        assert_eq!(explicit.atom_count(), 9);
        assert_eq!(explicit.bond_count(), 8);
        assert_eq!(explicit.heavy_atom_count(), 3);
        assert!(explicit.atoms.iter().all(|a| a.implicit_hydrogens == 0));
        for (heavy, original) in explicit.atoms.iter().zip(&ethanol.atoms) {
            assert_eq!(heavy.element, original.element);
        }
        assert!(explicit.atoms[3..].iter().all(|a| a.element == Element::H));
        assert_eq!(explicit.attached_hydrogens()[..3], [3, 2, 1]);
    }

    #[test]
    fn hydrogen_counts_agree_before_and_after_expansion() {
        let ethanol = make_ethanol();
        assert_eq!(ethanol.hydrogen_count(), 6);
        assert_eq!(ethanol.with_explicit_hydrogens().hydrogen_count(), 6);
    }

    #[test]
    fn molecular_weight_of_ethanol() {
        let mw = make_ethanol().molecular_weight();
        assert!((mw - 46.069).abs() < 0.01);
        let explicit = make_ethanol().with_explicit_hydrogens().molecular_weight();
        assert!((mw - explicit).abs() < 1e-9);
    }

    #[test]
    fn components_of_salt() {
        let mut salt = Molecule::new();
        salt.add_atom(Atom::new(Element::Na).with_charge(1));
        salt.add_atom(Atom::new(Element::Cl).with_charge(-1));
        assert_eq!(salt.components(), vec![0, 1]);
        assert_eq!(salt.component_count(), 2);
        assert_eq!(salt.net_charge(), 0);
    }

    #[test]
    fn hybridization_of_amide() {
        let hyb = make_acetamide().hybridizations();
        assert_eq!(hyb[0], Hybridization::SP3);
        assert_eq!(hyb[1], Hybridization::SP2);
        assert_eq!(hyb[2], Hybridization::SP2);
        assert_eq!(hyb[3], Hybridization::SP2);
    }

    #[test]
    fn hybridization_of_nitrile_and_hydrogens() {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let c2 = mol.add_atom(Atom::new(Element::C));
        let n = mol.add_atom(Atom::new(Element::N));
        mol.add_bond(c1, c2, BondOrder::Single);
        mol.add_bond(c2, n, BondOrder::Triple);
        let explicit = mol.with_explicit_hydrogens();
        let hyb = explicit.hybridizations();

        assert_eq!(hyb[0], Hybridization::SP3);
        assert_eq!(hyb[1], Hybridization::SP);
        assert_eq!(hyb[2], Hybridization::SP);
        assert!(hyb[3..].iter().all(|h| *h == Hybridization::Unspecified));
    }

    #[test]
    fn bond_between_is_order_independent() {
        let ethanol = make_ethanol();
        assert_eq!(ethanol.bond_between(1, 0), Some(0));
        assert_eq!(ethanol.bond_between(0, 2), None);
    }
}
