//! Conformer generation by distance geometry.
//!
//! This module turns a hydrogen-complete [`Molecule`] into 3D
//! [`Conformation`]s using one of six [`EmbeddingMethod`]s. Every method
//! shares the same pipeline:
//!
//! 1. **Topology** — angles, torsions, rings and topological distances
//! 2. **Bounds** — lower/upper distance matrix with triangle smoothing
//! 3. **Embedding** — random metric matrix projected to three dimensions
//! 4. **Refinement** — minimisation against the bounds, plus torsion
//!    preferences and planarity terms for the knowledge-based methods
//! 5. **Relaxation** — UFF or MMFF-style minimisation for the force-field
//!    methods
//!
//! Trials are seeded: the same molecule, method and seed always produce
//! the same coordinates.

mod bounds;
mod config;
mod error;
mod forcefield;
mod geometry;
mod optimize;
mod terms;
mod topology;
mod torsions;
mod typer;

pub use bounds::{BoundsMatrix, build_bounds};
pub use config::{EmbedConfig, EmbeddingMethod, ForceFieldKind, ParseMethodError, TorsionTable};
pub use error::Error;
pub use forcefield::{build_force_field, energy, relax};
pub use optimize::{Minimization, MinimizerOptions, Objective, minimize};
pub use terms::{AngleTerm, BondTerm, FourierTerm, PairTerm, TermSet, TorsionTerm};
pub use topology::{Angle, Dihedral, Topology};
pub use torsions::{TorsionClass, classify};
pub use typer::{mmff_classes, uff_types};

use crate::model::conformer::Conformation;
use crate::model::molecule::Molecule;
use crate::params::{Parameters, get_default_parameters, load_parameters};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::borrow::Cow;
use tracing::debug;

/// Anything that can turn a molecule into seeded conformations.
///
/// The pipeline is generic over this trait so that tests can substitute
/// deterministic or failing generators.
pub trait ConformerGenerator: Sync {
    fn generate(
        &self,
        molecule: &Molecule,
        method: EmbeddingMethod,
        seed: u64,
    ) -> Result<Conformation, Error>;

    /// Runs one trial per seed. Implementations may share per-molecule
    /// preparation across the trials.
    fn generate_trials(
        &self,
        molecule: &Molecule,
        method: EmbeddingMethod,
        seeds: &[u64],
    ) -> Vec<Result<Conformation, Error>> {
        seeds
            .iter()
            .map(|&seed| self.generate(molecule, method, seed))
            .collect()
    }
}

/// The distance-geometry conformer generator.
#[derive(Debug, Clone)]
pub struct DistanceGeometry<'p> {
    pub config: EmbedConfig,
    params: Cow<'p, Parameters>,
}

impl Default for DistanceGeometry<'static> {
    fn default() -> Self {
        Self::new(EmbedConfig::default())
    }
}

impl DistanceGeometry<'static> {
    /// Generator using the embedded parameter tables.
    pub fn new(config: EmbedConfig) -> Self {
        Self {
            config,
            params: Cow::Borrowed(get_default_parameters()),
        }
    }

    /// Generator using a custom parameter table given as TOML text.
    pub fn with_parameters_toml(config: EmbedConfig, toml: &str) -> Result<Self, toml::de::Error> {
        Ok(Self {
            config,
            params: Cow::Owned(load_parameters(Some(toml))?),
        })
    }
}

impl<'p> DistanceGeometry<'p> {
    pub fn with_parameters(config: EmbedConfig, params: &'p Parameters) -> Self {
        Self {
            config,
            params: Cow::Borrowed(params),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Precomputes everything about `molecule` that does not depend on the
    /// seed.
    pub fn prepare<'m>(
        &self,
        molecule: &'m Molecule,
        method: EmbeddingMethod,
    ) -> Result<EmbeddingPlan<'m, '_>, Error> {
        let topology = Topology::new(molecule)?;
        let bounds = build_bounds(&topology, method.uses_basic_knowledge())?;
        let refinement = geometry::refinement_terms(&topology, &bounds, method, &self.params);
        Ok(EmbeddingPlan {
            generator: self,
            method,
            topology,
            bounds,
            refinement,
        })
    }
}

/// Seed-independent embedding state for one molecule and method.
#[derive(Debug)]
pub struct EmbeddingPlan<'m, 'g> {
    generator: &'g DistanceGeometry<'g>,
    method: EmbeddingMethod,
    topology: Topology<'m>,
    bounds: BoundsMatrix,
    refinement: Option<TermSet>,
}

impl EmbeddingPlan<'_, '_> {
    pub fn bounds(&self) -> &BoundsMatrix {
        &self.bounds
    }

    /// Runs a single seeded trial.
    pub fn embed(&self, seed: u64) -> Result<Conformation, Error> {
        let generator = self.generator;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let coords = geometry::embed(
            &self.topology,
            &self.bounds,
            self.refinement.as_ref(),
            &generator.config,
            &mut rng,
        )?;

        let coords = match self.method.force_field() {
            Some(kind) => relax(
                &self.topology,
                kind,
                &generator.params,
                &coords,
                generator.config.force_field_iterations,
            )?,
            None => coords,
        };

        let conformation = Conformation::new(coords);
        if !conformation.is_finite() {
            return Err(Error::NonFinite);
        }
        debug!(method = %self.method, seed, atoms = conformation.len(), "conformer embedded");
        Ok(conformation)
    }
}

impl ConformerGenerator for DistanceGeometry<'_> {
    fn generate(
        &self,
        molecule: &Molecule,
        method: EmbeddingMethod,
        seed: u64,
    ) -> Result<Conformation, Error> {
        self.prepare(molecule, method)?.embed(seed)
    }

    fn generate_trials(
        &self,
        molecule: &Molecule,
        method: EmbeddingMethod,
        seeds: &[u64],
    ) -> Vec<Result<Conformation, Error>> {
        match self.prepare(molecule, method) {
            Ok(plan) => seeds.iter().map(|&seed| plan.embed(seed)).collect(),
            Err(err) => seeds.iter().map(|_| Err(err.clone())).collect(),
        }
    }
}

/// Embeds one conformation with the default generator.
pub fn generate(
    molecule: &Molecule,
    method: EmbeddingMethod,
    seed: u64,
) -> Result<Conformation, Error> {
    DistanceGeometry::default().generate(molecule, method, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;
    use crate::smiles::parse_smiles;

    fn explicit(smiles: &str) -> Molecule {
        parse_smiles(smiles).unwrap().with_explicit_hydrogens()
    }

    #[test]
    fn every_method_embeds_ethanol() {
        let mol = explicit("CCO");
        for method in EmbeddingMethod::ALL {
            let conf = generate(&mol, method, 42).unwrap();
            assert_eq!(conf.len(), mol.atom_count(), "{method}");
            assert!(conf.is_finite(), "{method}");
            let cc = conf.distance(0, 1);
            assert!(cc > 1.2 && cc < 1.9, "{method}: C-C {cc}");
        }
    }

    #[test]
    fn trials_are_reproducible() {
        let mol = explicit("CCCO");
        let generator = DistanceGeometry::default();
        let seeds = [42, 43, 42];
        let trials = generator.generate_trials(&mol, EmbeddingMethod::EtkdgV2, &seeds);
        let confs: Vec<_> = trials.into_iter().map(Result::unwrap).collect();
        assert_eq!(confs[0], confs[2]);
        assert_ne!(confs[0], confs[1]);
    }

    fn worst_ring_dihedral(conf: &Conformation, ring: &[usize]) -> f64 {
        let p = &conf.positions;
        (0..ring.len())
            .map(|s| {
                let at = |o: usize| &p[ring[(s + o) % ring.len()]];
                crate::math::dihedral(at(0), at(1), at(2), at(3)).abs()
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn knowledge_keeps_benzene_flat() {
        let mol = explicit("c1ccccc1");
        let ring: Vec<usize> = (0..6).collect();
        for method in [
            EmbeddingMethod::Etdg,
            EmbeddingMethod::Kdg,
            EmbeddingMethod::EtkdgV1,
            EmbeddingMethod::EtkdgV2,
        ] {
            for seed in [1, 7, 42] {
                let conf = generate(&mol, method, seed).unwrap();
                let worst = worst_ring_dihedral(&conf, &ring);
                assert!(worst < 0.35, "{method} seed {seed}: ring dihedral {worst}");
            }
        }
    }

    #[test]
    fn heteroaromatic_and_fused_rings_stay_flat() {
        let pyrrole = explicit("c1cc[nH]c1");
        let conf = generate(&pyrrole, EmbeddingMethod::EtkdgV2, 3).unwrap();
        assert!(worst_ring_dihedral(&conf, &[0, 1, 2, 3, 4]) < 0.35);

        let naphthalene = explicit("c1ccc2ccccc2c1");
        let conf = generate(&naphthalene, EmbeddingMethod::Kdg, 5).unwrap();
        assert!(worst_ring_dihedral(&conf, &[0, 1, 2, 3, 8, 9]) < 0.35);
        assert!(worst_ring_dihedral(&conf, &[3, 4, 5, 6, 7, 8]) < 0.35);
    }

    #[test]
    fn mmff_fails_for_unparameterised_elements() {
        let mol = explicit("CB(C)C");
        assert!(generate(&mol, EmbeddingMethod::Etdg, 1).is_ok());
        assert!(matches!(
            generate(&mol, EmbeddingMethod::Mmff, 1),
            Err(Error::MissingParameters { .. })
        ));
    }

    #[test]
    fn empty_molecule_fails_every_trial() {
        let mol = Molecule::new();
        let trials = DistanceGeometry::default().generate_trials(&mol, EmbeddingMethod::Kdg, &[1, 2]);
        assert!(trials.iter().all(|t| matches!(t, Err(Error::EmptyMolecule))));
    }

    #[test]
    fn salts_embed_as_separate_fragments() {
        let mol = explicit("[Na+].[Cl-]");
        let conf = generate(&mol, EmbeddingMethod::Uff, 5).unwrap();
        assert_eq!(conf.len(), 2);
        assert_eq!(mol.atoms[0].element, Element::Na);
        assert!(conf.distance(0, 1) > 1.0);
    }
}
