//! Coordinate embedding from a bounds matrix.
//!
//! Each attempt draws a random distance matrix inside the bounds, turns it
//! into a metric matrix, and takes the three leading eigenpairs as initial
//! coordinates. The coordinates are then refined against the bounds and,
//! for the knowledge-based methods, against torsion and planarity terms.

use super::bounds::BoundsMatrix;
use super::config::{EmbedConfig, EmbeddingMethod, TorsionTable};
use super::error::Error;
use super::optimize::{MinimizerOptions, Objective, minimize};
use super::terms::{FourierTerm, PairTerm, TermSet, TorsionTerm};
use super::topology::{Dihedral, Topology};
use super::torsions::preference_terms;
use crate::math::{dihedral, leading_eigenpairs};
use crate::model::types::{BondOrder, Hybridization};
use crate::params::Parameters;
use rand::Rng;
use tracing::trace;

/// Smallest eigenvalue accepted as a real dimension.
const EIGEN_TOLERANCE: f64 = 1e-3;
/// Accepted bounds violation energy per atom after refinement.
const RESIDUAL_PER_ATOM: f64 = 0.1;
/// Accepted deviation of a bonded distance from its window (Å).
const BONDED_SLACK: f64 = 0.5;
/// Accepted out-of-plane twist of a torsion inside an aromatic ring (rad).
const AROMATIC_PUCKER: f64 = 0.2;

/// Distance-bound penalties over every atom pair.
pub fn bounds_terms(bounds: &BoundsMatrix) -> TermSet {
    let n = bounds.len();
    let mut set = TermSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            set.pairs.push(PairTerm::DistanceBounds {
                i,
                j,
                lower: bounds.lower(i, j),
                upper: bounds.upper(i, j),
                weight: 1.0,
            });
        }
    }
    set
}

/// Extra refinement terms for methods with torsion preferences or basic
/// knowledge; `None` for plain distance geometry.
pub fn refinement_terms(
    topology: &Topology,
    bounds: &BoundsMatrix,
    method: EmbeddingMethod,
    params: &Parameters,
) -> Option<TermSet> {
    let table = method.torsion_table().map(|t| match t {
        TorsionTable::V1 => &params.torsion_preferences.v1,
        TorsionTable::V2 => &params.torsion_preferences.v2,
    });
    if table.is_none() && !method.uses_basic_knowledge() {
        return None;
    }

    let mol = topology.molecule;
    let mut set = TermSet::new(topology.atom_count());
    let weight = params.knowledge.bonded_weight;
    let mut restrain = |i: usize, j: usize| {
        set.pairs.push(PairTerm::DistanceBounds {
            i,
            j,
            lower: bounds.lower(i, j),
            upper: bounds.upper(i, j),
            weight,
        });
    };
    for bond in &mol.bonds {
        restrain(bond.i, bond.j);
    }
    for angle in &topology.angles {
        if mol.bond_between(angle.i, angle.k).is_none() {
            restrain(angle.i, angle.k);
        }
    }
    let aromatic: Vec<&Dihedral> = topology
        .dihedrals
        .iter()
        .filter(|d| topology.bond_order(d.bond) == BondOrder::Aromatic)
        .collect();
    for d in &aromatic {
        if mol.bond_between(d.i, d.l).is_none() {
            restrain(d.i, d.l);
        }
    }

    // Two-fold terms hold ring atoms cis and substituents cis or trans.
    let flat = params.knowledge.aromatic_barrier;
    set.torsions.extend(aromatic.iter().map(|d| TorsionTerm {
        i: d.i,
        j: d.j,
        k: d.k,
        l: d.l,
        terms: vec![FourierTerm::new(2, flat, -1.0)],
    }));

    if let Some(table) = table {
        set.torsions.extend(preference_terms(topology, table));
    }

    if method.uses_basic_knowledge() {
        let barrier = params.knowledge.improper_barrier;
        for (center, nbs) in topology.neighbors.iter().enumerate() {
            if topology.hybridization[center] != Hybridization::SP2 || nbs.len() != 3 {
                continue;
            }
            set.torsions.push(TorsionTerm {
                i: nbs[0].atom,
                j: center,
                k: nbs[1].atom,
                l: nbs[2].atom,
                terms: vec![FourierTerm::new(2, barrier, -1.0)],
            });
        }
    }

    Some(set)
}

/// Runs up to `config.max_attempts` embeddings drawn from `rng` and returns
/// the first that satisfies the bounds.
pub fn embed<R: Rng + ?Sized>(
    topology: &Topology,
    bounds: &BoundsMatrix,
    refinement: Option<&TermSet>,
    config: &EmbedConfig,
    rng: &mut R,
) -> Result<Vec<[f64; 3]>, Error> {
    let n = bounds.len();
    if n == 0 {
        return Err(Error::EmptyMolecule);
    }
    if n == 1 {
        return Ok(vec![[0.0; 3]]);
    }

    let base = bounds_terms(bounds);
    let combined = refinement.map(|extra| {
        let mut set = base.clone();
        set.extend(extra.clone());
        set
    });
    let options = MinimizerOptions {
        max_iterations: config.max_iterations,
        ..MinimizerOptions::default()
    };

    let ring_torsions = match refinement {
        Some(_) => aromatic_ring_torsions(topology),
        None => Vec::new(),
    };

    let attempts = config.max_attempts.max(1);
    let mut degenerate = 0;
    let mut residual = f64::INFINITY;
    let mut grad = vec![0.0; 3 * n];

    for attempt in 0..attempts {
        let Some(mut x) = initial_coordinates(bounds, rng) else {
            degenerate += 1;
            trace!(attempt, "degenerate metric matrix");
            continue;
        };

        minimize(&base, &mut x, &options);
        if let Some(set) = &combined {
            minimize(set, &mut x, &options);
        }
        if !x.iter().all(|v| v.is_finite()) {
            trace!(attempt, "refinement produced non-finite coordinates");
            continue;
        }

        residual = base.evaluate(&x, &mut grad) / n as f64;
        let coords: Vec<[f64; 3]> = x.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        let pucker = max_pucker(&ring_torsions, &coords);
        if residual <= RESIDUAL_PER_ATOM
            && pucker <= AROMATIC_PUCKER
            && bonded_within_bounds(topology, bounds, &x)
        {
            trace!(attempt, residual, "embedding accepted");
            return Ok(coords);
        }
        trace!(attempt, residual, pucker, "embedding rejected");
    }

    if degenerate == attempts {
        Err(Error::DegenerateMetric { attempts })
    } else {
        Err(Error::NotConverged { attempts, residual })
    }
}

/// Torsions whose four atoms all lie in one ring around an aromatic bond.
fn aromatic_ring_torsions<'t>(topology: &'t Topology) -> Vec<&'t Dihedral> {
    let mol = topology.molecule;
    topology
        .dihedrals
        .iter()
        .filter(|d| topology.bond_order(d.bond) == BondOrder::Aromatic)
        .filter(|d| {
            match (mol.bond_between(d.i, d.j), mol.bond_between(d.k, d.l)) {
                (Some(b_ij), Some(b_kl)) => topology
                    .rings
                    .smallest_ring_with_bonds(&[b_ij, d.bond, b_kl])
                    .is_some(),
                _ => false,
            }
        })
        .collect()
}

/// Largest twist away from cis over `torsions`, zero when there are none.
fn max_pucker(torsions: &[&Dihedral], coords: &[[f64; 3]]) -> f64 {
    torsions
        .iter()
        .map(|d| dihedral(&coords[d.i], &coords[d.j], &coords[d.k], &coords[d.l]).abs())
        .fold(0.0, f64::max)
}

fn bonded_within_bounds(topology: &Topology, bounds: &BoundsMatrix, x: &[f64]) -> bool {
    topology.molecule.bonds.iter().all(|bond| {
        let (i, j) = (bond.i, bond.j);
        let d = ((x[3 * i] - x[3 * j]).powi(2)
            + (x[3 * i + 1] - x[3 * j + 1]).powi(2)
            + (x[3 * i + 2] - x[3 * j + 2]).powi(2))
        .sqrt();
        d >= bounds.lower(i, j) - BONDED_SLACK && d <= bounds.upper(i, j) + BONDED_SLACK
    })
}

/// Random distances inside the bounds projected to three dimensions.
///
/// Returns `None` when the metric matrix has no positive eigenvalue.
fn initial_coordinates<R: Rng + ?Sized>(bounds: &BoundsMatrix, rng: &mut R) -> Option<Vec<f64>> {
    let n = bounds.len();
    let mut d2 = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let (lo, hi) = (bounds.lower(i, j), bounds.upper(i, j));
            let d = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            d2[i * n + j] = d * d;
            d2[j * n + i] = d * d;
        }
    }

    let nf = n as f64;
    let total: f64 = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .map(|(i, j)| d2[i * n + j])
        .sum();
    let d0: Vec<f64> = (0..n)
        .map(|i| d2[i * n..(i + 1) * n].iter().sum::<f64>() / nf - total / (nf * nf))
        .collect();

    let mut metric = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            metric[i * n + j] = 0.5 * (d0[i] + d0[j] - d2[i * n + j]);
        }
    }

    let pairs = leading_eigenpairs(&metric, n, 3);
    if pairs.first().is_none_or(|(lambda, _)| *lambda <= EIGEN_TOLERANCE) {
        return None;
    }

    let mut x = vec![0.0; 3 * n];
    for dim in 0..3 {
        match pairs.get(dim) {
            Some((lambda, vector)) if *lambda > EIGEN_TOLERANCE => {
                let s = lambda.sqrt();
                for i in 0..n {
                    x[3 * i + dim] = s * vector[i];
                }
            }
            _ => {
                for i in 0..n {
                    x[3 * i + dim] = rng.gen_range(-1.0..1.0);
                }
            }
        }
    }
    Some(x)
}
