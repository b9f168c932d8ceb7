//! Interatomic distance bounds for distance geometry.
//!
//! Bonded pairs get tight windows from covalent radii, 1-3 pairs from
//! ideal bond angles, and 1-4 pairs span the cis to trans range of their
//! torsion. Every other pair is only kept apart by a van der Waals floor.
//! Triangle smoothing then tightens the matrix and detects contradictions.

use super::error::Error;
use super::topology::{Dihedral, Topology};
use crate::model::types::BondOrder;

const BOND_TOLERANCE: f64 = 0.01;
const ANGLE_TOLERANCE: f64 = 0.04;
const TORSION_TOLERANCE: f64 = 0.04;
const VDW_SCALE: f64 = 0.7;
const UNBOUNDED: f64 = 1000.0;
/// Approximate span of one bond when sizing disconnected fragments (Å).
const BOND_SPAN: f64 = 1.5;
/// Extra room allowed between disconnected fragments (Å).
const FRAGMENT_GAP: f64 = 4.0;
const SMOOTHING_SLACK: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKind {
    Unset,
    Bonded,
    Angle,
    Torsion,
}

/// Symmetric lower/upper distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsMatrix {
    n: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoundsMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            lower: vec![0.0; n * n],
            upper: vec![0.0; n * n],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn lower(&self, i: usize, j: usize) -> f64 {
        self.lower[i * self.n + j]
    }

    #[inline]
    pub fn upper(&self, i: usize, j: usize) -> f64 {
        self.upper[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, lower: f64, upper: f64) {
        let n = self.n;
        self.lower[i * n + j] = lower;
        self.lower[j * n + i] = lower;
        self.upper[i * n + j] = upper;
        self.upper[j * n + i] = upper;
    }

    fn set_upper(&mut self, i: usize, j: usize, upper: f64) {
        let n = self.n;
        self.upper[i * n + j] = upper;
        self.upper[j * n + i] = upper;
    }

    fn set_lower(&mut self, i: usize, j: usize, lower: f64) {
        let n = self.n;
        self.lower[i * n + j] = lower;
        self.lower[j * n + i] = lower;
    }

    /// Floyd-style triangle smoothing of both bounds.
    pub fn smooth(&mut self) -> Result<(), Error> {
        let n = self.n;
        for k in 0..n {
            for i in 0..n {
                if i == k {
                    continue;
                }
                let (u_ik, l_ik) = (self.upper(i, k), self.lower(i, k));
                for j in (i + 1)..n {
                    if j == k {
                        continue;
                    }
                    let (u_kj, l_kj) = (self.upper(k, j), self.lower(k, j));
                    let through = u_ik + u_kj;
                    if self.upper(i, j) > through {
                        self.set_upper(i, j, through);
                    }
                    let raised = (l_ik - u_kj).max(l_kj - u_ik);
                    if self.lower(i, j) < raised {
                        self.set_lower(i, j, raised);
                    }
                    let (lower, upper) = (self.lower(i, j), self.upper(i, j));
                    if lower > upper + SMOOTHING_SLACK {
                        return Err(Error::InconsistentBounds { i, j, lower, upper });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Ideal bond length from covalent radii, shortened by bond order.
pub fn ideal_bond_length(topology: &Topology, bond: usize) -> f64 {
    let mol = topology.molecule;
    let b = &mol.bonds[bond];
    let sum = mol.atoms[b.i].element.covalent_radius() + mol.atoms[b.j].element.covalent_radius();
    let factor = match b.order {
        BondOrder::Single => 1.0,
        BondOrder::Aromatic => 0.91,
        BondOrder::Double => 0.87,
        BondOrder::Triple | BondOrder::Quadruple => 0.78,
    };
    sum * factor
}

/// Ideal angle `i-j-k` in degrees, with small-ring overrides.
pub fn ideal_angle(topology: &Topology, i: usize, j: usize, k: usize) -> f64 {
    let mol = topology.molecule;
    if let (Some(b1), Some(b2)) = (mol.bond_between(i, j), mol.bond_between(j, k)) {
        match topology.rings.smallest_ring_with_bonds(&[b1, b2]) {
            Some(3) => return 60.0,
            Some(4) => return 90.0,
            Some(5) => return 108.0,
            _ => {}
        }
    }
    topology.hybridization[j].ideal_angle()
}

/// Law-of-cosines distance between the ends of a bend.
fn bend_distance(a: f64, b: f64, theta_deg: f64) -> f64 {
    (a * a + b * b - 2.0 * a * b * theta_deg.to_radians().cos()).sqrt()
}

/// 1-4 distance for a planar torsion, cis (`phi = 0`) or trans.
fn torsion_distance(
    d_ij: f64,
    d_jk: f64,
    d_kl: f64,
    theta_ijk: f64,
    theta_jkl: f64,
    cis: bool,
) -> f64 {
    let (t1, t2) = (theta_ijk.to_radians(), theta_jkl.to_radians());
    let pi = [d_ij * t1.cos(), d_ij * t1.sin(), 0.0];
    let side = if cis { 1.0 } else { -1.0 };
    let pl = [d_jk - d_kl * t2.cos(), side * d_kl * t2.sin(), 0.0];
    let d = [pl[0] - pi[0], pl[1] - pi[1], pl[2] - pi[2]];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Builds and smooths the bounds matrix.
///
/// With `knowledge` enabled, torsions about aromatic bonds are fixed to
/// their planar cis or trans value instead of spanning the whole range.
pub fn build_bounds(topology: &Topology, knowledge: bool) -> Result<BoundsMatrix, Error> {
    let mol = topology.molecule;
    let n = topology.atom_count();
    let mut bounds = BoundsMatrix::new(n);
    let mut kind = vec![PairKind::Unset; n * n];

    let lengths: Vec<f64> = (0..mol.bond_count())
        .map(|b| ideal_bond_length(topology, b))
        .collect();
    let length = |a: usize, b: usize| mol.bond_between(a, b).map(|idx| lengths[idx]);

    for (idx, bond) in mol.bonds.iter().enumerate() {
        let r = lengths[idx];
        bounds.set(bond.i, bond.j, r - BOND_TOLERANCE, r + BOND_TOLERANCE);
        kind[bond.i * n + bond.j] = PairKind::Bonded;
        kind[bond.j * n + bond.i] = PairKind::Bonded;
    }

    for angle in &topology.angles {
        let (i, k) = (angle.i, angle.k);
        if kind[i * n + k] == PairKind::Bonded {
            continue;
        }
        let (Some(a), Some(b)) = (length(i, angle.j), length(angle.j, k)) else {
            continue;
        };
        let d = bend_distance(a, b, ideal_angle(topology, i, angle.j, k));
        let (lo, hi) = if kind[i * n + k] == PairKind::Angle {
            (
                bounds.lower(i, k).min(d - ANGLE_TOLERANCE),
                bounds.upper(i, k).max(d + ANGLE_TOLERANCE),
            )
        } else {
            (d - ANGLE_TOLERANCE, d + ANGLE_TOLERANCE)
        };
        bounds.set(i, k, lo, hi);
        kind[i * n + k] = PairKind::Angle;
        kind[k * n + i] = PairKind::Angle;
    }

    for dihedral in &topology.dihedrals {
        let (i, l) = (dihedral.i, dihedral.l);
        if matches!(kind[i * n + l], PairKind::Bonded | PairKind::Angle) {
            continue;
        }
        let Some((lo, hi)) = torsion_window(topology, dihedral, knowledge, &length) else {
            continue;
        };
        let (lo, hi) = if kind[i * n + l] == PairKind::Torsion {
            (bounds.lower(i, l).min(lo), bounds.upper(i, l).max(hi))
        } else {
            (lo, hi)
        };
        bounds.set(i, l, lo, hi);
        kind[i * n + l] = PairKind::Torsion;
        kind[l * n + i] = PairKind::Torsion;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if kind[i * n + j] != PairKind::Unset {
                continue;
            }
            let floor = VDW_SCALE
                * (mol.atoms[i].element.vdw_radius() + mol.atoms[j].element.vdw_radius());
            let ceiling = if topology.components[i] == topology.components[j] {
                UNBOUNDED
            } else {
                let span = BOND_SPAN
                    * f64::from(topology.component_diameter(i) + topology.component_diameter(j));
                floor + span + FRAGMENT_GAP
            };
            bounds.set(i, j, floor, ceiling);
        }
    }

    bounds.smooth()?;
    Ok(bounds)
}

fn torsion_window(
    topology: &Topology,
    dihedral: &Dihedral,
    knowledge: bool,
    length: &impl Fn(usize, usize) -> Option<f64>,
) -> Option<(f64, f64)> {
    let Dihedral { i, j, k, l, bond } = *dihedral;
    let d_ij = length(i, j)?;
    let d_jk = length(j, k)?;
    let d_kl = length(k, l)?;
    let t1 = ideal_angle(topology, i, j, k);
    let t2 = ideal_angle(topology, j, k, l);
    let cis = torsion_distance(d_ij, d_jk, d_kl, t1, t2, true);
    let trans = torsion_distance(d_ij, d_jk, d_kl, t1, t2, false);

    if knowledge && topology.bond_order(bond) == BondOrder::Aromatic {
        let d = if aromatic_torsion_is_cis(topology, dihedral) {
            cis
        } else {
            trans
        };
        return Some((d - TORSION_TOLERANCE, d + TORSION_TOLERANCE));
    }
    Some((
        cis.min(trans) - TORSION_TOLERANCE,
        cis.max(trans) + TORSION_TOLERANCE,
    ))
}

/// Planar placement of the ends of a torsion about an aromatic bond.
///
/// Ends that share a ring with the central bond sit on the ring side;
/// exocyclic ends point away from it.
fn aromatic_torsion_is_cis(topology: &Topology, dihedral: &Dihedral) -> bool {
    let mol = topology.molecule;
    let rings = &topology.rings;
    let (Some(b_ij), Some(b_kl)) = (
        mol.bond_between(dihedral.i, dihedral.j),
        mol.bond_between(dihedral.k, dihedral.l),
    ) else {
        return false;
    };
    let b_jk = dihedral.bond;
    if rings.smallest_ring_with_bonds(&[b_ij, b_jk, b_kl]).is_some() {
        return true;
    }
    let i_in = rings.smallest_ring_with_bonds(&[b_ij, b_jk]).is_some();
    let l_in = rings.smallest_ring_with_bonds(&[b_jk, b_kl]).is_some();
    !i_in && !l_in
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn bounds_for(smiles: &str, knowledge: bool) -> (crate::model::molecule::Molecule, BoundsMatrix) {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let bounds = {
            let topo = Topology::new(&mol).unwrap();
            build_bounds(&topo, knowledge).unwrap()
        };
        (mol, bounds)
    }

    #[test]
    fn bonded_window_is_tight() {
        let (_, b) = bounds_for("CC", false);
        assert!((b.lower(0, 1) - 1.51).abs() < 0.03);
        assert!(b.upper(0, 1) - b.lower(0, 1) <= 2.0 * BOND_TOLERANCE + 1e-9);
    }

    #[test]
    fn matrix_is_symmetric_and_ordered() {
        let (mol, b) = bounds_for("CC(=O)Nc1ccccc1", true);
        let n = mol.atom_count();
        for i in 0..n {
            for j in 0..n {
                assert_eq!(b.lower(i, j), b.lower(j, i));
                assert_eq!(b.upper(i, j), b.upper(j, i));
                assert!(b.lower(i, j) <= b.upper(i, j) + SMOOTHING_SLACK);
            }
        }
    }

    #[test]
    fn torsion_range_spans_cis_to_trans() {
        let (_, b) = bounds_for("CCCC", false);
        let (lo, hi) = (b.lower(0, 3), b.upper(0, 3));
        assert!(lo > 2.4 && lo < 2.7, "lower {lo}");
        assert!(hi > 3.7 && hi < 4.0, "upper {hi}");
    }

    #[test]
    fn knowledge_fixes_aromatic_ring_geometry() {
        let (_, plain) = bounds_for("c1ccccc1", false);
        let (_, known) = bounds_for("c1ccccc1", true);
        let para = known.upper(0, 3) - known.lower(0, 3);
        assert!(para <= 2.0 * TORSION_TOLERANCE + 1e-9);
        assert!((known.lower(0, 3) - 2.77).abs() < 0.1);
        assert!(plain.upper(0, 3) - plain.lower(0, 3) >= para);
    }

    #[test]
    fn fragments_get_finite_separation() {
        let (_, b) = bounds_for("[Na+].[Cl-]", false);
        assert!(b.upper(0, 1) < 20.0);
        assert!(b.lower(0, 1) > 0.0);
    }

    #[test]
    fn smoothing_tightens_long_range_upper_bounds() {
        let (_, b) = bounds_for("CCCCC", false);
        assert!(b.upper(0, 4) < 6.0);
    }

    #[test]
    fn smoothing_rejects_contradictions() {
        let mut b = BoundsMatrix::new(3);
        b.set(0, 1, 1.0, 1.1);
        b.set(1, 2, 1.0, 1.1);
        b.set(0, 2, 5.0, 6.0);
        assert!(matches!(b.smooth(), Err(Error::InconsistentBounds { .. })));
    }
}
