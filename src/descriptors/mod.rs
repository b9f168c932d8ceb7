//! Molecular descriptors.
//!
//! Two catalogues are provided:
//!
//! - **3D** ([`names_3d`]) — charged partial surface areas, geometric
//!   shape, gravitational indices, 3D-MoRSE, principal moments of inertia
//!   and the plane of best fit, evaluated per [`Conformation`]
//! - **2D** ([`names_2d`]) — constitutional counts and additive
//!   properties, topological, connectivity and shape indices, E-state
//!   atom types, walk and path counts, topological charge, adjacency and
//!   distance spectra, BCUT, information content and autocorrelations,
//!   evaluated once per [`Molecule`]
//!
//! Values that are undefined for a given structure (a ratio with a zero
//! denominator, charges for an unparameterised atom) are reported as
//! missing for that descriptor alone.

mod autocorrelation;
mod bcut;
mod constitutional;
mod cpsa;
mod estate;
mod galvez;
mod geometric;
mod graph;
mod information;
mod morse;
mod properties;
mod spectral;
mod surface;
mod topological;
mod walks;

pub use properties::{AtomWeight, AtomicProperty};
pub use surface::{PROBE_RADIUS, solvent_accessible_areas};

use crate::charge::gasteiger_charges;
use crate::model::conformer::Conformation;
use crate::model::molecule::Molecule;
use crate::model::types::Element;
use graph::HeavyGraph;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

static NAMES_3D: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut names = Vec::new();
    cpsa::names(&mut names);
    push_all(&mut names, &geometric::SHAPE_NAMES);
    push_all(&mut names, &geometric::GRAVITATIONAL_NAMES);
    morse::names(&mut names);
    push_all(&mut names, &geometric::INERTIA_NAMES);
    push_all(&mut names, &geometric::PLANE_NAMES);
    names
});

static NAMES_2D: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut names = Vec::new();
    constitutional::names(&mut names);
    topological::names(&mut names);
    estate::names(&mut names);
    walks::names(&mut names);
    galvez::names(&mut names);
    spectral::names(&mut names);
    bcut::names(&mut names);
    information::names(&mut names);
    autocorrelation::names(&mut names);
    names
});

fn push_all(out: &mut Vec<String>, names: &[&str]) {
    out.extend(names.iter().map(|s| s.to_string()));
}

/// Every 3D descriptor name, in output order.
pub fn names_3d() -> &'static [String] {
    &NAMES_3D
}

/// Every 2D descriptor name, in output order.
pub fn names_2d() -> &'static [String] {
    &NAMES_2D
}

/// Named descriptor values in catalogue order. `None` marks a missing
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorSet {
    entries: Vec<(&'static str, Option<f64>)>,
}

impl DescriptorSet {
    /// Pairs `names` with `values`; non-finite values become missing.
    fn from_values(names: &'static [String], values: &[f64], selection: Option<&[usize]>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        let entry = |k: usize| {
            let v = values[k];
            (names[k].as_str(), v.is_finite().then_some(v))
        };
        let entries = match selection {
            Some(indices) => indices.iter().map(|&k| entry(k)).collect(),
            None => (0..names.len()).map(entry).collect(),
        };
        Self { entries }
    }

    fn missing(names: &'static [String], selection: Option<&[usize]>) -> Self {
        let entries = match selection {
            Some(indices) => indices.iter().map(|&k| (names[k].as_str(), None)).collect(),
            None => names.iter().map(|n| (n.as_str(), None)).collect(),
        };
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| *v)
    }

    /// Value at position `index`; `None` if missing or out of range.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.entries.get(index).and_then(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        self.entries.iter().copied()
    }

    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_none()).count()
    }
}

/// Evaluates the descriptor catalogues, optionally restricted to a subset
/// of names.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCalculator {
    selected_2d: Option<Vec<usize>>,
    selected_3d: Option<Vec<usize>>,
}

impl DescriptorCalculator {
    /// Calculator for every descriptor in both catalogues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator restricted to `requested` names. Names found in neither
    /// catalogue are logged and ignored. Catalogue order is kept
    /// regardless of the order of `requested`.
    pub fn with_subset<S: AsRef<str>>(requested: &[S]) -> Self {
        let wanted: HashSet<&str> = requested.iter().map(AsRef::as_ref).collect();
        let known: HashSet<&str> = names_2d()
            .iter()
            .chain(names_3d())
            .map(String::as_str)
            .collect();
        for name in requested.iter().map(AsRef::as_ref) {
            if !known.contains(name) {
                warn!(descriptor = name, "unknown descriptor name ignored");
            }
        }

        let pick = |catalogue: &[String]| {
            catalogue
                .iter()
                .enumerate()
                .filter(|(_, n)| wanted.contains(n.as_str()))
                .map(|(k, _)| k)
                .collect::<Vec<_>>()
        };
        Self {
            selected_2d: Some(pick(names_2d())),
            selected_3d: Some(pick(names_3d())),
        }
    }

    /// Calculator for `subset` when given, otherwise for everything.
    pub fn from_option<S: AsRef<str>>(subset: Option<&[S]>) -> Self {
        subset.map_or_else(Self::new, Self::with_subset)
    }

    pub fn names_2d(&self) -> Vec<&'static str> {
        selected_names(names_2d(), self.selected_2d.as_deref())
    }

    pub fn names_3d(&self) -> Vec<&'static str> {
        selected_names(names_3d(), self.selected_3d.as_deref())
    }

    /// 2D descriptors of `molecule`; implicit or explicit hydrogens are
    /// both accepted.
    pub fn evaluate_2d(&self, molecule: &Molecule) -> DescriptorSet {
        let explicit = molecule.with_explicit_hydrogens();
        let graph = HeavyGraph::new(molecule);
        let charges = match gasteiger_charges(&explicit) {
            Ok(charges) => Some(charges),
            Err(err) => {
                debug!(error = %err, "charge descriptors unavailable");
                None
            }
        };

        let mut values = Vec::with_capacity(names_2d().len());
        constitutional::evaluate(molecule, &explicit, &graph, charges.as_deref(), &mut values);
        topological::evaluate(molecule, &graph, &mut values);
        estate::evaluate(molecule, &graph, &mut values);
        walks::evaluate(&graph, &mut values);
        galvez::evaluate(&graph, &mut values);
        spectral::evaluate(&graph, &mut values);
        bcut::evaluate(molecule, &graph, charges.as_deref(), &mut values);
        information::evaluate(&explicit, &mut values);
        autocorrelation::evaluate(&explicit, charges.as_deref(), &mut values);
        DescriptorSet::from_values(names_2d(), &values, self.selected_2d.as_deref())
    }

    /// Prepares 3D evaluation for a hydrogen-complete molecule.
    pub fn prepare_3d<'m>(&self, molecule: &'m Molecule) -> Evaluator3d<'m, '_> {
        Evaluator3d::new(self, molecule)
    }

    pub fn evaluate_3d(&self, molecule: &Molecule, conformation: &Conformation) -> DescriptorSet {
        self.prepare_3d(molecule).evaluate(conformation)
    }
}

fn selected_names(catalogue: &'static [String], selection: Option<&[usize]>) -> Vec<&'static str> {
    match selection {
        Some(indices) => indices.iter().map(|&k| catalogue[k].as_str()).collect(),
        None => catalogue.iter().map(String::as_str).collect(),
    }
}

/// Conformation-independent state for the 3D descriptors of one molecule.
#[derive(Debug)]
pub struct Evaluator3d<'m, 'c> {
    calculator: &'c DescriptorCalculator,
    molecule: &'m Molecule,
    elements: Vec<Element>,
    masses: Vec<f64>,
    heavy: Vec<bool>,
    radii: Vec<f64>,
    bonds: Vec<(usize, usize)>,
    charges: Option<Vec<f64>>,
}

impl<'m, 'c> Evaluator3d<'m, 'c> {
    fn new(calculator: &'c DescriptorCalculator, molecule: &'m Molecule) -> Self {
        let elements: Vec<Element> = molecule.atoms.iter().map(|a| a.element).collect();
        let charges = match gasteiger_charges(molecule) {
            Ok(charges) => Some(charges),
            Err(err) => {
                debug!(error = %err, "surface charge descriptors unavailable");
                None
            }
        };
        Self {
            calculator,
            molecule,
            masses: elements.iter().map(|e| e.atomic_mass()).collect(),
            heavy: elements.iter().map(|e| !e.is_hydrogen()).collect(),
            radii: elements.iter().map(|e| e.vdw_radius() + PROBE_RADIUS).collect(),
            bonds: molecule.bonds.iter().map(|b| (b.i, b.j)).collect(),
            elements,
            charges,
        }
    }

    pub fn molecule(&self) -> &'m Molecule {
        self.molecule
    }

    /// Evaluates the 3D catalogue. A conformation whose size does not
    /// match the molecule yields an all-missing set.
    pub fn evaluate(&self, conformation: &Conformation) -> DescriptorSet {
        let selection = self.calculator.selected_3d.as_deref();
        if conformation.len() != self.elements.len() || conformation.is_empty() {
            debug!(
                atoms = self.elements.len(),
                positions = conformation.len(),
                "conformation does not match molecule"
            );
            return DescriptorSet::missing(names_3d(), selection);
        }

        let positions = &conformation.positions;
        let mut values = Vec::with_capacity(names_3d().len());
        let areas = solvent_accessible_areas(positions, &self.radii);
        cpsa::evaluate(&areas, self.charges.as_deref(), &mut values);
        geometric::shape(positions, &mut values);
        geometric::gravitational(positions, &self.masses, &self.heavy, &self.bonds, &mut values);
        morse::evaluate(positions, &self.elements, &mut values);
        geometric::inertia(positions, &self.masses, &mut values);
        geometric::plane_fit(positions, &mut values);
        DescriptorSet::from_values(names_3d(), &values, selection)
    }
}

/// Full 2D catalogue for `molecule`.
pub fn evaluate_2d(molecule: &Molecule) -> DescriptorSet {
    DescriptorCalculator::new().evaluate_2d(molecule)
}

/// Full 3D catalogue for a hydrogen-complete `molecule` in `conformation`.
pub fn evaluate_3d(molecule: &Molecule, conformation: &Conformation) -> DescriptorSet {
    DescriptorCalculator::new().evaluate_3d(molecule, conformation)
}
