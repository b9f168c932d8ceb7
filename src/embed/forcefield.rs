//! Force-field term generation and relaxation.
//!
//! Two force fields are available. The UFF rendition follows the published
//! functional forms: harmonic stretches with radii corrected for bond
//! order and electronegativity, cosine-expanded bends, hybridization-based
//! torsions and a 12-6 van der Waals term. The MMFF-style rendition uses
//! quartic stretches, cubic bends, class-based three-term torsions, a
//! buffered 14-7 van der Waals term and buffered Coulomb interactions on
//! Gasteiger charges.

use super::config::ForceFieldKind;
use super::error::Error;
use super::optimize::{MinimizerOptions, Objective, minimize};
use super::terms::{AngleTerm, BondTerm, FourierTerm, PairTerm, TermSet, TorsionTerm};
use super::topology::Topology;
use super::torsions::classify;
use super::typer::{mmff_classes, uff_types};
use crate::charge::gasteiger_charges_with;
use crate::model::types::{BondOrder, Element};
use crate::params::{MmffAtomParams, Parameters, UffAtomParams};
use std::collections::HashMap;
use tracing::debug;

const UFF_FORCE_UNITS: f64 = 664.12;
const UFF_BOND_ORDER_SCALE: f64 = 0.1332;
const UFF_AMIDE_BOND_ORDER: f64 = 1.41;
const LINEAR_THRESHOLD: f64 = 175.0;
const MMFF_STRETCH_TO_BEND: f64 = 143.9325;
const MMFF_VDW_B: f64 = 0.2;
const MMFF_VDW_BETA: f64 = 12.0;
const MMFF_VDW_EPS_UNITS: f64 = 181.16;
const COULOMB_UNITS: f64 = 332.0716;
const ONE_FOUR_ELECTROSTATIC_SCALE: f64 = 0.75;

/// Builds the full term set of `kind` for the molecule.
pub fn build_force_field(
    topology: &Topology,
    kind: ForceFieldKind,
    params: &Parameters,
) -> Result<TermSet, Error> {
    match kind {
        ForceFieldKind::Uff => build_uff(topology, params),
        ForceFieldKind::Mmff => build_mmff(topology, params),
    }
}

/// Minimises `coords` under the force field and returns the relaxed
/// coordinates.
pub fn relax(
    topology: &Topology,
    kind: ForceFieldKind,
    params: &Parameters,
    coords: &[[f64; 3]],
    max_iterations: usize,
) -> Result<Vec<[f64; 3]>, Error> {
    let terms = build_force_field(topology, kind, params)?;
    let mut x: Vec<f64> = coords.iter().flatten().copied().collect();
    let options = MinimizerOptions {
        max_iterations,
        ..MinimizerOptions::default()
    };
    let result = minimize(&terms, &mut x, &options);
    debug!(
        force_field = %kind,
        energy = result.value,
        iterations = result.iterations,
        converged = result.converged,
        "force-field relaxation finished"
    );
    if !result.value.is_finite() || !x.iter().all(|v| v.is_finite()) {
        return Err(Error::NonFinite);
    }
    Ok(x.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// Energy of `coords` under the force field (kcal/mol).
pub fn energy(
    topology: &Topology,
    kind: ForceFieldKind,
    params: &Parameters,
    coords: &[[f64; 3]],
) -> Result<f64, Error> {
    let terms = build_force_field(topology, kind, params)?;
    let x: Vec<f64> = coords.iter().flatten().copied().collect();
    let mut grad = vec![0.0; x.len()];
    Ok(terms.evaluate(&x, &mut grad))
}

fn lookup_atoms<'p, T>(
    kind: ForceFieldKind,
    labels: &[String],
    table: &'p HashMap<String, T>,
) -> Result<Vec<&'p T>, Error> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            table
                .get(label)
                .ok_or_else(|| Error::missing_parameters(kind, idx, label.as_str()))
        })
        .collect()
}

fn nonbonded_pairs<'a>(
    topology: &'a Topology<'a>,
) -> impl Iterator<Item = (usize, usize, Option<u32>)> + 'a {
    let n = topology.atom_count();
    (0..n)
        .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
        .filter_map(move |(i, j)| match topology.path_length(i, j) {
            Some(p) if p < 3 => None,
            path => Some((i, j, path)),
        })
}

fn build_uff(topology: &Topology, params: &Parameters) -> Result<TermSet, Error> {
    let types = uff_types(topology);
    let atoms = lookup_atoms(ForceFieldKind::Uff, &types, &params.uff.atoms)?;
    let mut set = TermSet::new(topology.atom_count());

    let rest_lengths = generate_uff_bonds(topology, &atoms, &mut set);
    generate_uff_angles(topology, &atoms, &rest_lengths, &mut set);
    generate_uff_torsions(topology, &types, &atoms, &mut set);

    for (i, j, _) in nonbonded_pairs(topology) {
        set.pairs.push(PairTerm::LennardJones {
            i,
            j,
            x: (atoms[i].x1 * atoms[j].x1).sqrt(),
            d: (atoms[i].d1 * atoms[j].d1).sqrt(),
        });
    }
    Ok(set)
}

fn uff_bond_order(topology: &Topology, bond: usize) -> f64 {
    let mol = topology.molecule;
    let b = &mol.bonds[bond];
    let amide = b.order == BondOrder::Single
        && ((topology.is_carbonyl_carbon(b.i) && topology.is_amide_nitrogen(b.j))
            || (topology.is_carbonyl_carbon(b.j) && topology.is_amide_nitrogen(b.i)));
    if amide {
        UFF_AMIDE_BOND_ORDER
    } else {
        b.order.multiplier()
    }
}

/// UFF natural bond length between two typed atoms.
fn uff_rest_length(a: &UffAtomParams, b: &UffAtomParams, order: f64) -> f64 {
    let r_bo = -UFF_BOND_ORDER_SCALE * (a.r1 + b.r1) * order.ln();
    let chi_diff = a.chi.sqrt() - b.chi.sqrt();
    let r_en = a.r1 * b.r1 * chi_diff * chi_diff / (a.chi * a.r1 + b.chi * b.r1);
    a.r1 + b.r1 + r_bo - r_en
}

fn generate_uff_bonds(
    topology: &Topology,
    atoms: &[&UffAtomParams],
    set: &mut TermSet,
) -> Vec<f64> {
    topology
        .molecule
        .bonds
        .iter()
        .enumerate()
        .map(|(idx, bond)| {
            let (a, b) = (atoms[bond.i], atoms[bond.j]);
            let r0 = uff_rest_length(a, b, uff_bond_order(topology, idx));
            let k = UFF_FORCE_UNITS * a.z1 * b.z1 / r0.powi(3);
            set.bonds.push(BondTerm::Harmonic {
                i: bond.i,
                j: bond.j,
                k,
                r0,
            });
            r0
        })
        .collect()
}

fn generate_uff_angles(
    topology: &Topology,
    atoms: &[&UffAtomParams],
    rest_lengths: &[f64],
    set: &mut TermSet,
) {
    let mol = topology.molecule;
    for angle in &topology.angles {
        let (Some(b1), Some(b2)) = (
            mol.bond_between(angle.i, angle.j),
            mol.bond_between(angle.j, angle.k),
        ) else {
            continue;
        };
        let theta0 = atoms[angle.j].theta0;
        let cos0 = theta0.to_radians().cos();
        let (r_ij, r_jk) = (rest_lengths[b1], rest_lengths[b2]);
        let r_ik2 = r_ij * r_ij + r_jk * r_jk - 2.0 * r_ij * r_jk * cos0;
        let r_ik = r_ik2.sqrt();
        let k_force = UFF_FORCE_UNITS * atoms[angle.i].z1 * atoms[angle.k].z1 / r_ik.powi(5)
            * (3.0 * r_ij * r_jk * (1.0 - cos0 * cos0) - r_ik2 * cos0);

        if theta0 >= LINEAR_THRESHOLD {
            set.angles.push(AngleTerm::Linear {
                i: angle.i,
                j: angle.j,
                k: angle.k,
                k_force,
            });
        } else {
            let sin2 = 1.0 - cos0 * cos0;
            let c2 = 1.0 / (4.0 * sin2);
            set.angles.push(AngleTerm::Fourier {
                i: angle.i,
                j: angle.j,
                k: angle.k,
                k_force,
                c0: c2 * (2.0 * cos0 * cos0 + 1.0),
                c1: -4.0 * c2 * cos0,
                c2,
            });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UffCenter {
    Sp3,
    Sp2,
    Other,
}

fn uff_center(label: &str) -> UffCenter {
    let suffix = label.get(2..3);
    match suffix {
        Some("3") => UffCenter::Sp3,
        Some("2") | Some("R") => UffCenter::Sp2,
        _ => UffCenter::Other,
    }
}

fn is_group16(element: Element) -> bool {
    matches!(element, Element::O | Element::S | Element::Se)
}

fn generate_uff_torsions(
    topology: &Topology,
    types: &[String],
    atoms: &[&UffAtomParams],
    set: &mut TermSet,
) {
    let mol = topology.molecule;
    let mut per_bond = vec![0usize; mol.bond_count()];
    for d in &topology.dihedrals {
        per_bond[d.bond] += 1;
    }

    for d in &topology.dihedrals {
        let (j, k) = (d.j, d.k);
        let count = per_bond[d.bond] as f64;
        let term = match (uff_center(&types[j]), uff_center(&types[k])) {
            (UffCenter::Sp3, UffCenter::Sp3) => {
                let (ej, ek) = (mol.atoms[j].element, mol.atoms[k].element);
                if is_group16(ej) && is_group16(ek) {
                    let barrier = |e: Element| -> f64 { if e == Element::O { 2.0 } else { 6.8 } };
                    FourierTerm::new(2, (barrier(ej) * barrier(ek)).sqrt() / 2.0, 1.0)
                } else {
                    let v = (atoms[j].v_sp3 * atoms[k].v_sp3).sqrt();
                    FourierTerm::new(3, v / 2.0, 1.0)
                }
            }
            (UffCenter::Sp2, UffCenter::Sp2) => {
                let order = uff_bond_order(topology, d.bond);
                let v = 5.0 * (atoms[j].u_sp2 * atoms[k].u_sp2).sqrt() * (1.0 + 4.18 * order.ln());
                FourierTerm::new(2, v / 2.0, -1.0)
            }
            (UffCenter::Sp2, UffCenter::Sp3) | (UffCenter::Sp3, UffCenter::Sp2) => {
                FourierTerm::new(6, 0.5, -1.0)
            }
            _ => continue,
        };
        if term.v == 0.0 {
            continue;
        }
        set.torsions.push(TorsionTerm {
            i: d.i,
            j,
            k,
            l: d.l,
            terms: vec![FourierTerm::new(term.n, term.v / count, term.sign)],
        });
    }
}

fn build_mmff(topology: &Topology, params: &Parameters) -> Result<TermSet, Error> {
    let classes = mmff_classes(topology);
    let atoms = lookup_atoms(ForceFieldKind::Mmff, &classes, &params.mmff.atoms)?;
    let charges = gasteiger_charges_with(topology.molecule, params)?;
    let mut set = TermSet::new(topology.atom_count());

    generate_mmff_bonds(topology, params, &mut set)?;
    generate_mmff_angles(topology, params, &atoms, &mut set);
    generate_mmff_torsions(topology, params, &mut set);

    for (i, j, path) in nonbonded_pairs(topology) {
        let (r_star, eps) = mmff_vdw_pair(atoms[i], atoms[j]);
        set.pairs.push(PairTerm::Buffered147 { i, j, r_star, eps });

        let scale = if path == Some(3) {
            ONE_FOUR_ELECTROSTATIC_SCALE
        } else {
            1.0
        };
        let qq = COULOMB_UNITS * charges[i] * charges[j] * scale;
        if qq != 0.0 {
            set.pairs.push(PairTerm::Coulomb { i, j, qq });
        }
    }
    Ok(set)
}

fn mmff_radius(
    params: &Parameters,
    element: Element,
    order: BondOrder,
    atom: usize,
) -> Result<f64, Error> {
    let radii = params
        .mmff
        .radii
        .get(element.symbol())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::missing_parameters(ForceFieldKind::Mmff, atom, element.symbol()))?;
    let pick = |idx: usize| radii[idx.min(radii.len() - 1)];
    Ok(match order {
        BondOrder::Single => pick(0),
        BondOrder::Double => pick(1),
        BondOrder::Triple | BondOrder::Quadruple => pick(2),
        BondOrder::Aromatic => 0.5 * (pick(0) + pick(1)),
    })
}

fn generate_mmff_bonds(
    topology: &Topology,
    params: &Parameters,
    set: &mut TermSet,
) -> Result<(), Error> {
    let mol = topology.molecule;
    let stretch = params.mmff.stretch;
    for bond in &mol.bonds {
        let (ei, ej) = (mol.atoms[bond.i].element, mol.atoms[bond.j].element);
        let ri = mmff_radius(params, ei, bond.order, bond.i)?;
        let rj = mmff_radius(params, ej, bond.order, bond.j)?;
        let c = if ei.is_hydrogen() || ej.is_hydrogen() {
            0.085
        } else {
            0.05
        };
        let r0 = ri + rj - c * (ei.props().pauling - ej.props().pauling).abs().powf(1.4);
        let kb = match bond.order {
            BondOrder::Single => stretch.single,
            BondOrder::Double => stretch.double,
            BondOrder::Triple | BondOrder::Quadruple => stretch.triple,
            BondOrder::Aromatic => stretch.aromatic,
        };
        set.bonds.push(BondTerm::Quartic {
            i: bond.i,
            j: bond.j,
            kb,
            r0,
        });
    }
    Ok(())
}

fn generate_mmff_angles(
    topology: &Topology,
    params: &Parameters,
    atoms: &[&MmffAtomParams],
    set: &mut TermSet,
) {
    let mol = topology.molecule;
    let bend = params.mmff.bend;
    for angle in &topology.angles {
        let ring = match (
            mol.bond_between(angle.i, angle.j),
            mol.bond_between(angle.j, angle.k),
        ) {
            (Some(b1), Some(b2)) => topology.rings.smallest_ring_with_bonds(&[b1, b2]),
            _ => None,
        };
        let theta0 = match ring {
            Some(3) => 60.0,
            Some(4) => 90.0,
            _ => atoms[angle.j].theta0,
        };
        let ka = if mol.atoms[angle.i].element.is_hydrogen()
            || mol.atoms[angle.k].element.is_hydrogen()
        {
            bend.hydrogen
        } else {
            bend.heavy
        };
        if theta0 >= LINEAR_THRESHOLD {
            set.angles.push(AngleTerm::Linear {
                i: angle.i,
                j: angle.j,
                k: angle.k,
                k_force: MMFF_STRETCH_TO_BEND * ka,
            });
        } else {
            set.angles.push(AngleTerm::Cubic {
                i: angle.i,
                j: angle.j,
                k: angle.k,
                ka,
                theta0,
            });
        }
    }
}

fn generate_mmff_torsions(topology: &Topology, params: &Parameters, set: &mut TermSet) {
    for d in &topology.dihedrals {
        let Some(class) = classify(topology, d.bond) else {
            continue;
        };
        let Some(v) = class.lookup(&params.mmff.torsions) else {
            continue;
        };
        let terms: Vec<FourierTerm> = [
            FourierTerm::new(1, v.v1 / 2.0, 1.0),
            FourierTerm::new(2, v.v2 / 2.0, -1.0),
            FourierTerm::new(3, v.v3 / 2.0, 1.0),
        ]
        .into_iter()
        .filter(|t| t.v != 0.0)
        .collect();
        if terms.is_empty() {
            continue;
        }
        set.torsions.push(TorsionTerm {
            i: d.i,
            j: d.j,
            k: d.k,
            l: d.l,
            terms,
        });
    }
}

/// Combined minimum-energy distance and well depth of a 14-7 pair.
fn mmff_vdw_pair(a: &MmffAtomParams, b: &MmffAtomParams) -> (f64, f64) {
    let r_a = a.a * a.alpha.powf(0.25);
    let r_b = b.a * b.alpha.powf(0.25);
    let gamma = (r_a - r_b) / (r_a + r_b);
    let r_star =
        0.5 * (r_a + r_b) * (1.0 + MMFF_VDW_B * (1.0 - (-MMFF_VDW_BETA * gamma * gamma).exp()));
    let eps = MMFF_VDW_EPS_UNITS * a.g * b.g * a.alpha * b.alpha
        / ((a.alpha / a.n_eff).sqrt() + (b.alpha / b.n_eff).sqrt())
        / r_star.powi(6);
    (r_star, eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::get_default_parameters;
    use crate::smiles::parse_smiles;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn uff_carbon_carbon_rest_lengths() {
        let atoms = &get_default_parameters().uff.atoms;
        let c3 = &atoms["C_3"];
        let single = uff_rest_length(c3, c3, 1.0);
        assert!(approx_eq(single, 1.514, 0.01), "C-C {single}");
        let c2 = &atoms["C_2"];
        let double = uff_rest_length(c2, c2, 2.0);
        assert!(double < single && double > 1.25, "C=C {double}");
    }

    #[test]
    fn uff_terms_for_ethane() {
        let mol = parse_smiles("CC").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let set = build_force_field(&topo, ForceFieldKind::Uff, get_default_parameters()).unwrap();
        assert_eq!(set.bonds.len(), 7);
        assert_eq!(set.angles.len(), 12);
        assert_eq!(set.torsions.len(), 9);
        // Only the H...H pairs across the C-C bond are three bonds apart.
        assert_eq!(set.pairs.len(), 9);
    }

    #[test]
    fn mmff_rejects_boron() {
        let mol = parse_smiles("CB(C)C").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let err = build_force_field(&topo, ForceFieldKind::Mmff, get_default_parameters())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameters {
                force_field: ForceFieldKind::Mmff,
                atom: 1,
                ..
            }
        ));
    }

    #[test]
    fn mmff_adds_electrostatics() {
        let mol = parse_smiles("CCO").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let set = build_force_field(&topo, ForceFieldKind::Mmff, get_default_parameters()).unwrap();
        assert!(set.pairs.iter().any(|p| matches!(p, PairTerm::Coulomb { .. })));
        assert!(set.bonds.iter().all(|b| matches!(b, BondTerm::Quartic { .. })));
    }

    #[test]
    fn relaxation_lowers_energy() {
        let mol = parse_smiles("CCO").unwrap().with_explicit_hydrogens();
        let topo = Topology::new(&mol).unwrap();
        let params = get_default_parameters();
        // A crude zig-zag start with hydrogens scattered around their parents.
        let mut coords = vec![[0.0, 0.0, 0.0], [1.6, 0.1, 0.0], [2.2, 1.3, 0.1]];
        let offsets = [
            [-0.4, 0.9, 0.3],
            [-0.4, -0.5, 0.8],
            [-0.3, -0.4, -0.9],
            [0.2, -0.6, 0.8],
            [0.1, -0.5, -0.9],
            [0.8, 0.5, 0.4],
        ];
        let parents = [0, 0, 0, 1, 1, 2];
        for (offset, &parent) in offsets.iter().zip(&parents) {
            let p: [f64; 3] = coords[parent];
            coords.push([p[0] + offset[0], p[1] + offset[1], p[2] + offset[2]]);
        }
        for kind in [ForceFieldKind::Uff, ForceFieldKind::Mmff] {
            let before = energy(&topo, kind, params, &coords).unwrap();
            let relaxed = relax(&topo, kind, params, &coords, 200).unwrap();
            let after = energy(&topo, kind, params, &relaxed).unwrap();
            assert!(after < before, "{kind}: {after} >= {before}");
        }
    }
}
