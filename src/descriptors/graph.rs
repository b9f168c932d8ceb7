//! Graph helpers shared by the topological descriptors.

use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};
use std::collections::VecDeque;

/// Marker for atoms in different connected components.
pub const UNREACHABLE: usize = usize::MAX;

/// Hydrogen-suppressed view of a molecule.
///
/// Hydrogens, explicit or implicit, are folded into the per-atom
/// `hydrogens` count. Indices are local to the view; `atoms[k]` maps back
/// to the molecule.
#[derive(Debug, Clone)]
pub struct HeavyGraph {
    pub atoms: Vec<usize>,
    pub adjacency: Vec<Vec<usize>>,
    pub bonds: Vec<(usize, usize, BondOrder)>,
    pub hydrogens: Vec<usize>,
    pub distances: Vec<Vec<usize>>,
}

impl HeavyGraph {
    pub fn new(molecule: &Molecule) -> Self {
        let mut local = vec![UNREACHABLE; molecule.atom_count()];
        let mut atoms = Vec::new();
        for (idx, atom) in molecule.atoms.iter().enumerate() {
            if !atom.element.is_hydrogen() {
                local[idx] = atoms.len();
                atoms.push(idx);
            }
        }

        let all_hydrogens = molecule.attached_hydrogens();
        let hydrogens = atoms.iter().map(|&a| all_hydrogens[a]).collect();

        let mut adjacency = vec![Vec::new(); atoms.len()];
        let mut bonds = Vec::new();
        for bond in &molecule.bonds {
            let (i, j) = (local[bond.i], local[bond.j]);
            if i == UNREACHABLE || j == UNREACHABLE {
                continue;
            }
            adjacency[i].push(j);
            adjacency[j].push(i);
            bonds.push((i, j, bond.order));
        }

        let distances = shortest_paths(&adjacency);
        Self {
            atoms,
            adjacency,
            bonds,
            hydrogens,
            distances,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Eccentricity of every atom within its own component.
    pub fn eccentricities(&self) -> Vec<usize> {
        self.distances
            .iter()
            .map(|row| {
                row.iter()
                    .copied()
                    .filter(|&d| d != UNREACHABLE)
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Cyclomatic number, `bonds - atoms + components`.
    pub fn cyclomatic_number(&self) -> usize {
        let components = components(&self.adjacency);
        (self.bonds.len() + components).saturating_sub(self.len())
    }
}

/// Kier–Hall valence delta, `(Zv - h) / (Z - Zv - 1)`.
pub fn valence_delta(element: Element, formal_charge: i8, hydrogens: usize) -> f64 {
    let z = f64::from(element.atomic_number());
    let zv = f64::from(element.props().valence_electrons) - f64::from(formal_charge);
    (zv - hydrogens as f64) / (z - zv - 1.0).max(1.0)
}

/// Kier–Hall intrinsic state, `((2/N)² δv + 1) / δ` with `δv = Zv - h`.
/// An atom without heavy neighbours is taken as `δ = 1`.
pub fn intrinsic_state(element: Element, hydrogens: usize, degree: usize) -> f64 {
    let n = f64::from(element.period());
    let dv = f64::from(element.props().valence_electrons) - hydrogens as f64;
    ((2.0 / n).powi(2) * dv + 1.0) / degree.max(1) as f64
}

/// All-pairs topological distances by breadth-first search.
pub fn shortest_paths(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut dist = vec![vec![UNREACHABLE; n]; n];
    for start in 0..n {
        let row = &mut dist[start];
        row[start] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &next in &adjacency[current] {
                if row[next] == UNREACHABLE {
                    row[next] = row[current] + 1;
                    queue.push_back(next);
                }
            }
        }
    }
    dist
}

pub fn components(adjacency: &[Vec<usize>]) -> usize {
    let mut seen = vec![false; adjacency.len()];
    let mut count = 0;
    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        count += 1;
        seen[start] = true;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &next in &adjacency[current] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    count
}

/// Calls `visit` once for every simple path with `length` bonds.
///
/// A path and its reverse are the same path; only the orientation whose
/// first atom has the smaller index is reported. Length zero visits every
/// atom.
pub fn for_each_path<F: FnMut(&[usize])>(adjacency: &[Vec<usize>], length: usize, mut visit: F) {
    let n = adjacency.len();
    let mut path = Vec::with_capacity(length + 1);
    let mut on_path = vec![false; n];
    for start in 0..n {
        path.push(start);
        on_path[start] = true;
        extend_path(adjacency, length, &mut path, &mut on_path, &mut visit);
        on_path[start] = false;
        path.pop();
    }
}

fn extend_path<F: FnMut(&[usize])>(
    adjacency: &[Vec<usize>],
    length: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    visit: &mut F,
) {
    if path.len() == length + 1 {
        if length == 0 || path[0] < path[length] {
            visit(path);
        }
        return;
    }
    let Some(&last) = path.last() else {
        return;
    };
    for &next in &adjacency[last] {
        if on_path[next] {
            continue;
        }
        on_path[next] = true;
        path.push(next);
        extend_path(adjacency, length, path, on_path, visit);
        path.pop();
        on_path[next] = false;
    }
}

pub fn count_paths(adjacency: &[Vec<usize>], length: usize) -> usize {
    let mut count = 0;
    for_each_path(adjacency, length, |_| count += 1);
    count
}

/// Adjacency lists of the full molecular graph, hydrogens included.
pub fn full_adjacency(molecule: &Molecule) -> Vec<Vec<usize>> {
    molecule
        .adjacency()
        .into_iter()
        .map(|nbs| nbs.into_iter().map(|nb| nb.atom).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn heavy_graph_folds_hydrogens() {
        let mol = parse_smiles("CCO").unwrap().with_explicit_hydrogens();
        let graph = HeavyGraph::new(&mol);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.hydrogens, vec![3, 2, 1]);
        assert_eq!(graph.bonds.len(), 2);
        assert_eq!(graph.distances[0][2], 2);
    }

    #[test]
    fn path_counts_of_butane() {
        let mol = parse_smiles("CCCC").unwrap();
        let graph = HeavyGraph::new(&mol);
        assert_eq!(count_paths(&graph.adjacency, 0), 4);
        assert_eq!(count_paths(&graph.adjacency, 1), 3);
        assert_eq!(count_paths(&graph.adjacency, 2), 2);
        assert_eq!(count_paths(&graph.adjacency, 3), 1);
        assert_eq!(count_paths(&graph.adjacency, 4), 0);
    }

    #[test]
    fn ring_paths_are_not_double_counted() {
        let mol = parse_smiles("C1CC1").unwrap();
        let graph = HeavyGraph::new(&mol);
        assert_eq!(count_paths(&graph.adjacency, 1), 3);
        assert_eq!(count_paths(&graph.adjacency, 2), 3);
        assert_eq!(graph.cyclomatic_number(), 1);
    }

    #[test]
    fn kier_hall_deltas_and_states() {
        assert!((valence_delta(Element::C, 0, 3) - 1.0).abs() < 1e-12);
        assert!((valence_delta(Element::O, 0, 1) - 5.0).abs() < 1e-12);
        // Chlorine: 7 / (17 - 7 - 1).
        assert!((valence_delta(Element::Cl, 0, 0) - 7.0 / 9.0).abs() < 1e-12);
        assert!((intrinsic_state(Element::C, 3, 1) - 2.0).abs() < 1e-12);
        assert!((intrinsic_state(Element::O, 1, 1) - 6.0).abs() < 1e-12);
        assert!((intrinsic_state(Element::Cl, 0, 1) - (4.0 / 9.0 * 7.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn disconnected_atoms_are_unreachable() {
        let mol = parse_smiles("C.C").unwrap();
        let graph = HeavyGraph::new(&mol);
        assert_eq!(graph.distances[0][1], UNREACHABLE);
        assert_eq!(graph.eccentricities(), vec![0, 0]);
        assert_eq!(components(&graph.adjacency), 2);
    }
}
