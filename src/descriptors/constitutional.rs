//! Counts, ring statistics and additive atom-contribution descriptors.

use super::graph::HeavyGraph;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element, Hybridization};

const ELEMENT_COUNTS: [(&str, Element); 11] = [
    ("nB", Element::B),
    ("nC", Element::C),
    ("nN", Element::N),
    ("nO", Element::O),
    ("nS", Element::S),
    ("nP", Element::P),
    ("nF", Element::F),
    ("nCl", Element::Cl),
    ("nBr", Element::Br),
    ("nI", Element::I),
    ("nSi", Element::Si),
];

const COUNT_NAMES: [&str; 13] = [
    "nAtom",
    "nHeavyAtom",
    "nH",
    "nX",
    "nHetero",
    "nAromAtom",
    "nBonds",
    "nBondsS",
    "nBondsD",
    "nBondsT",
    "nBondsA",
    "nRot",
    "FormalCharge",
];

const RING_NAMES: [&str; 6] = ["nRing", "nHRing", "naRing", "naHRing", "nARing", "nFRing"];

const PROPERTY_NAMES: [&str; 11] = [
    "MW", "AMW", "FCSP3", "nHBDon", "nHBAcc", "TopoPSA", "apol", "bpol", "RNCG", "RPCG",
    "VdwVolumeABC",
];

pub fn names(out: &mut Vec<String>) {
    out.extend(COUNT_NAMES.iter().map(|s| s.to_string()));
    out.extend(ELEMENT_COUNTS.iter().map(|(s, _)| s.to_string()));
    out.extend(RING_NAMES.iter().map(|s| s.to_string()));
    out.extend(PROPERTY_NAMES.iter().map(|s| s.to_string()));
}

/// `molecule` may carry implicit hydrogens; `explicit` is its
/// hydrogen-complete form and `charges` its Gasteiger charges.
pub fn evaluate(
    molecule: &Molecule,
    explicit: &Molecule,
    graph: &HeavyGraph,
    charges: Option<&[f64]>,
    out: &mut Vec<f64>,
) {
    counts(explicit, graph, out);
    for (_, element) in ELEMENT_COUNTS {
        let n = explicit.atoms.iter().filter(|a| a.element == element).count();
        out.push(n as f64);
    }
    rings(molecule, out);

    let atom_count = explicit.atom_count() as f64;
    let weight = explicit.molecular_weight();
    out.push(weight);
    out.push(if atom_count > 0.0 { weight / atom_count } else { f64::NAN });
    out.push(fraction_sp3(explicit));
    let (donors, acceptors) = hydrogen_bonding(molecule, graph);
    out.push(donors as f64);
    out.push(acceptors as f64);
    out.push(topological_psa(molecule, graph));
    let (apol, bpol) = polarizability(explicit);
    out.push(apol);
    out.push(bpol);
    let (rncg, rpcg) = charges.map_or((f64::NAN, f64::NAN), relative_charges);
    out.push(rncg);
    out.push(rpcg);
    out.push(zhao_volume(molecule, explicit));
}

fn counts(explicit: &Molecule, graph: &HeavyGraph, out: &mut Vec<f64>) {
    let atoms = &explicit.atoms;
    let heavy = graph.len();
    let halogens = atoms.iter().filter(|a| a.element.is_halogen()).count();
    let hetero = atoms
        .iter()
        .filter(|a| !matches!(a.element, Element::C | Element::H))
        .count();
    let aromatic = atoms.iter().filter(|a| a.aromatic).count();

    let mut by_order = [0usize; 4];
    for &(_, _, order) in &graph.bonds {
        let slot = match order {
            BondOrder::Single => 0,
            BondOrder::Double => 1,
            BondOrder::Triple | BondOrder::Quadruple => 2,
            BondOrder::Aromatic => 3,
        };
        by_order[slot] += 1;
    }

    out.extend([
        atoms.len() as f64,
        heavy as f64,
        (atoms.len() - heavy) as f64,
        halogens as f64,
        hetero as f64,
        aromatic as f64,
        explicit.bond_count() as f64,
        by_order[0] as f64,
        by_order[1] as f64,
        by_order[2] as f64,
        by_order[3] as f64,
        rotatable_bonds(explicit) as f64,
        f64::from(explicit.net_charge()),
    ]);
}

/// Acyclic single bonds between non-terminal heavy atoms, excluding bonds
/// next to a triple bond.
fn rotatable_bonds(explicit: &Molecule) -> usize {
    let rings = explicit.rings();
    let adjacency = explicit.adjacency();
    let next_to_triple = |atom: usize| {
        adjacency[atom]
            .iter()
            .any(|nb| explicit.bonds[nb.bond].order == BondOrder::Triple)
    };
    let heavy_degree = |atom: usize| {
        adjacency[atom]
            .iter()
            .filter(|nb| !explicit.atoms[nb.atom].element.is_hydrogen())
            .count()
    };
    explicit
        .bonds
        .iter()
        .enumerate()
        .filter(|(idx, bond)| {
            bond.order == BondOrder::Single
                && !rings.is_ring_bond(*idx)
                && heavy_degree(bond.i) > 1
                && heavy_degree(bond.j) > 1
                && !next_to_triple(bond.i)
                && !next_to_triple(bond.j)
        })
        .count()
}

fn rings(molecule: &Molecule, out: &mut Vec<f64>) {
    let info = molecule.rings();
    let hetero = |ring: &[usize]| {
        ring.iter()
            .any(|&a| !matches!(molecule.atoms[a].element, Element::C | Element::H))
    };
    let aromatic = |ring: &[usize]| ring.iter().all(|&a| molecule.atoms[a].aromatic);

    let total = info.rings.len();
    let hetero_rings = info.rings.iter().filter(|r| hetero(r)).count();
    let aromatic_rings = info.rings.iter().filter(|r| aromatic(r)).count();
    let aromatic_hetero = info.rings.iter().filter(|r| aromatic(r) && hetero(r)).count();
    let fused = (0..total)
        .filter(|&i| {
            (0..total).any(|j| {
                j != i
                    && info.ring_bonds[i]
                        .iter()
                        .any(|b| info.ring_bonds[j].contains(b))
            })
        })
        .count();

    out.extend([
        total as f64,
        hetero_rings as f64,
        aromatic_rings as f64,
        aromatic_hetero as f64,
        (total - aromatic_rings) as f64,
        fused as f64,
    ]);
}

fn fraction_sp3(explicit: &Molecule) -> f64 {
    let hybridization = explicit.hybridizations();
    let carbons: Vec<usize> = (0..explicit.atom_count())
        .filter(|&i| explicit.atoms[i].element == Element::C)
        .collect();
    if carbons.is_empty() {
        return f64::NAN;
    }
    let sp3 = carbons
        .iter()
        .filter(|&&i| hybridization[i] == Hybridization::SP3)
        .count();
    sp3 as f64 / carbons.len() as f64
}

/// Lipinski-style donor and acceptor counts over N and O.
fn hydrogen_bonding(molecule: &Molecule, graph: &HeavyGraph) -> (usize, usize) {
    let mut donors = 0;
    let mut acceptors = 0;
    for (local, &idx) in graph.atoms.iter().enumerate() {
        let atom = &molecule.atoms[idx];
        if !matches!(atom.element, Element::N | Element::O) {
            continue;
        }
        let h = graph.hydrogens[local];
        if h > 0 {
            donors += 1;
        }
        let accepts = match atom.element {
            Element::O => atom.formal_charge <= 0,
            _ => {
                atom.formal_charge <= 0
                    && !(atom.aromatic && h > 0)
                    && graph.degree(local) + h < 4
                    && !is_amide_nitrogen(molecule, graph, local)
            }
        };
        if accepts {
            acceptors += 1;
        }
    }
    (donors, acceptors)
}

fn is_amide_nitrogen(molecule: &Molecule, graph: &HeavyGraph, local: usize) -> bool {
    graph.adjacency[local].iter().any(|&c| {
        molecule.atoms[graph.atoms[c]].element == Element::C
            && graph.bonds.iter().any(|&(i, j, order)| {
                order == BondOrder::Double
                    && (i == c || j == c)
                    && molecule.atoms[graph.atoms[if i == c { j } else { i }]].element
                        == Element::O
            })
    })
}

/// Ertl topological polar surface area from N and O fragment
/// contributions (Å²).
fn topological_psa(molecule: &Molecule, graph: &HeavyGraph) -> f64 {
    let rings = molecule.rings();
    let mut bond_orders: Vec<Vec<BondOrder>> = vec![Vec::new(); graph.len()];
    for &(i, j, order) in &graph.bonds {
        bond_orders[i].push(order);
        bond_orders[j].push(order);
    }

    graph
        .atoms
        .iter()
        .enumerate()
        .map(|(local, &idx)| {
            let atom = &molecule.atoms[idx];
            let orders = &bond_orders[local];
            let count = |o: BondOrder| orders.iter().filter(|&&x| x == o).count();
            let fragment = PolarFragment {
                h: graph.hydrogens[local],
                single: count(BondOrder::Single),
                double: count(BondOrder::Double),
                triple: count(BondOrder::Triple),
                aromatic: count(BondOrder::Aromatic),
                charge: atom.formal_charge,
                three_ring: rings.smallest_ring_with_atom(idx) == Some(3),
            };
            match atom.element {
                Element::N => fragment.nitrogen(),
                Element::O => fragment.oxygen(),
                _ => 0.0,
            }
        })
        .sum()
}

struct PolarFragment {
    h: usize,
    single: usize,
    double: usize,
    triple: usize,
    aromatic: usize,
    charge: i8,
    three_ring: bool,
}

impl PolarFragment {
    fn nitrogen(&self) -> f64 {
        let bonds = (self.single, self.double, self.triple, self.aromatic);
        match (self.charge, self.h, bonds) {
            (0, 0, (3, 0, 0, 0)) if self.three_ring => 3.01,
            (0, 0, (3, 0, 0, 0)) => 3.24,
            (0, 0, (1, 1, 0, 0)) => 12.36,
            (0, 0, (0, 0, 1, 0)) => 23.79,
            (0, 0, (1, 2, 0, 0)) => 11.68,
            (0, 0, (0, 1, 1, 0)) => 13.60,
            (0, 1, (2, 0, 0, 0)) if self.three_ring => 21.94,
            (0, 1, (2, 0, 0, 0)) => 12.03,
            (0, 1, (0, 1, 0, 0)) => 23.85,
            (0, 2, (1, 0, 0, 0)) => 26.02,
            (0, 0, (0, 0, 0, 2)) => 12.89,
            (0, 0, (0, 0, 0, 3)) => 4.41,
            (0, 0, (1, 0, 0, 2)) => 4.93,
            (0, 0, (0, 1, 0, 2)) => 8.39,
            (0, 1, (0, 0, 0, 2)) => 15.79,
            (1, 0, (4, 0, 0, 0)) => 0.0,
            (1, 0, (2, 1, 0, 0)) => 3.01,
            (1, 0, (1, 0, 1, 0)) => 4.36,
            (1, 1, (3, 0, 0, 0)) => 4.44,
            (1, 1, (1, 1, 0, 0)) => 13.97,
            (1, 2, (2, 0, 0, 0)) => 16.61,
            (1, 2, (0, 1, 0, 0)) => 25.59,
            (1, 3, (1, 0, 0, 0)) => 27.64,
            (1, 0, (0, 0, 0, 3)) => 4.10,
            (1, 0, (1, 0, 0, 2)) => 3.88,
            (1, 1, (0, 0, 0, 2)) => 14.14,
            (_, h, _) => match h {
                0 => 3.24,
                1 => 12.03,
                _ => 26.02,
            },
        }
    }

    fn oxygen(&self) -> f64 {
        let bonds = (self.single, self.double, self.triple, self.aromatic);
        match (self.charge, self.h, bonds) {
            (0, 0, (2, 0, 0, 0)) if self.three_ring => 12.53,
            (0, 0, (2, 0, 0, 0)) => 9.23,
            (0, 0, (0, 1, 0, 0)) => 17.07,
            (0, 1, (1, 0, 0, 0)) => 20.23,
            (-1, 0, (1, 0, 0, 0)) => 23.06,
            (0, 0, (0, 0, 0, 2)) => 13.14,
            (_, h, _) if h > 0 => 20.23,
            _ => 9.23,
        }
    }
}

/// Atomic polarizability sum and bond polarizability difference sum (Å³).
fn polarizability(explicit: &Molecule) -> (f64, f64) {
    let alpha = |i: usize| explicit.atoms[i].element.props().polarizability;
    let apol = (0..explicit.atom_count()).map(alpha).sum();
    let bpol = explicit
        .bonds
        .iter()
        .map(|b| (alpha(b.i) - alpha(b.j)).abs())
        .sum();
    (apol, bpol)
}

/// Most negative (positive) charge over the total negative (positive)
/// charge; zero without charges of that sign.
fn relative_charges(charges: &[f64]) -> (f64, f64) {
    let ratio = |select: fn(f64) -> bool, pick: fn(f64, f64) -> f64| {
        let total: f64 = charges.iter().copied().filter(|&q| select(q)).sum();
        if total == 0.0 {
            return 0.0;
        }
        let extreme = charges.iter().copied().filter(|&q| select(q)).fold(0.0, pick);
        extreme / total
    };
    (
        ratio(|q| q < 0.0, f64::min),
        ratio(|q| q > 0.0, f64::max),
    )
}

/// Zhao, Abraham and Zissimos van der Waals volume (Å³); undefined for
/// elements outside its contribution table.
fn zhao_volume(molecule: &Molecule, explicit: &Molecule) -> f64 {
    let contribution = |element: Element| match element {
        Element::H => Some(7.24),
        Element::C => Some(20.58),
        Element::N => Some(15.60),
        Element::O => Some(14.71),
        Element::F => Some(13.31),
        Element::Cl => Some(22.45),
        Element::Br => Some(26.52),
        Element::I => Some(32.52),
        Element::P => Some(24.43),
        Element::S => Some(24.43),
        Element::As => Some(26.52),
        Element::B => Some(40.48),
        Element::Si => Some(38.79),
        Element::Se => Some(28.73),
        _ => None,
    };
    let Some(atoms) = explicit
        .atoms
        .iter()
        .map(|a| contribution(a.element))
        .sum::<Option<f64>>()
    else {
        return f64::NAN;
    };

    let info = molecule.rings();
    let aromatic = info
        .rings
        .iter()
        .filter(|r| r.iter().all(|&a| molecule.atoms[a].aromatic))
        .count();
    let aliphatic = info.rings.len() - aromatic;
    atoms - 5.92 * explicit.bond_count() as f64 - 14.7 * aromatic as f64 - 3.8 * aliphatic as f64
}
