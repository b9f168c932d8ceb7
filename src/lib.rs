//! A pure Rust batch pipeline for conformer-averaged molecular descriptors.
//! It reads SMILES from a spreadsheet, embeds every molecule repeatedly with six
//! distance-geometry protocols, evaluates 2D and 3D descriptors, and reports the
//! distribution of each 3D descriptor across the trials as one wide table.
//!
//! # Features
//!
//! - **SMILES reading** — Organic subset, bracket atoms, aromaticity, ring
//!   closures and disconnected components
//! - **Conformer generation** — Distance geometry with optional torsion
//!   preferences and basic-knowledge terms, followed by UFF or MMFF-style
//!   relaxation where the method asks for it
//! - **Descriptors** — 213 3D descriptors (CPSA, geometric, gravitational,
//!   3D-MoRSE, inertia, plane of best fit) and 1060 2D descriptors
//!   (constitutional, topological and connectivity, E-state, walk and
//!   path counts, topological charge, matrix spectra, BCUT, information
//!   content, autocorrelation)
//! - **Statistics** — Mean, sample standard deviation and five-number summary
//!   per descriptor and method
//! - **Tables** — Read `.xlsx`, `.xls`, `.xlsb`, `.ods`, `.csv` and `.tsv`; write
//!   `.xlsx`, `.csv` and `.tsv`
//!
//! # Quick Start
//!
//! Single molecules can be embedded and described directly:
//!
//! ```
//! use conformer_forge::{EmbeddingMethod, evaluate_3d, generate, parse_smiles};
//!
//! // Ethanol with its hydrogens as graph nodes, as embedding requires
//! let molecule = parse_smiles("CCO")?.with_explicit_hydrogens();
//! assert_eq!(molecule.atom_count(), 9);
//!
//! // The same seed always gives the same conformer
//! let first = generate(&molecule, EmbeddingMethod::EtkdgV2, 42)?;
//! let again = generate(&molecule, EmbeddingMethod::EtkdgV2, 42)?;
//! assert_eq!(first, again);
//!
//! let descriptors = evaluate_3d(&molecule, &first);
//! assert_eq!(descriptors.len(), 213);
//! assert!(descriptors.get("GeomDiameter").unwrap() > 2.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Whole spreadsheets go through a [`Pipeline`]:
//!
//! ```no_run
//! use conformer_forge::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     trials: 10,
//!     parallel: true,
//!     ..Default::default()
//! };
//! let report = Pipeline::new(config)?.run()?;
//! println!("{:.1}% of the input was usable", report.completeness());
//! # Ok::<(), conformer_forge::PipelineError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`smiles`] — SMILES reader
//! - [`embed`] — Conformer generation, force fields and the [`ConformerGenerator`] seam
//! - [`descriptors`] — 2D and 3D descriptor catalogues
//! - [`stats`] — Summary statistics and column naming
//! - [`pipeline`] — Batch stages, configuration and run report
//! - [`io`] — Tables and SD files
//!
//! # Data Types
//!
//! - [`Molecule`] — Molecular graph with implicit or explicit hydrogens
//! - [`Atom`] — Element, formal charge, aromaticity and hydrogen count
//! - [`Bond`] — Bond between two atoms with bond order
//! - [`Conformation`] — One set of coordinates for a hydrogen-complete molecule
//! - [`DescriptorSet`] — Named descriptor values, `None` where undefined
//! - [`SummaryStats`] — The seven statistics of one descriptor distribution

mod math;
mod model;
mod params;

pub mod charge;
pub mod descriptors;
pub mod embed;
pub mod io;
pub mod pipeline;
pub mod smiles;
pub mod stats;

pub use model::atom::Atom;
pub use model::conformer::Conformation;
pub use model::molecule::{Bond, Molecule, Neighbor};
pub use model::ring::RingInfo;
pub use model::types::{
    BondOrder, Element, Hybridization, ParseBondOrderError, ParseElementError,
};

pub use params::{Parameters, get_default_parameters, load_parameters};

pub use charge::gasteiger_charges;
pub use descriptors::{DescriptorCalculator, DescriptorSet, evaluate_2d, evaluate_3d};
pub use embed::{
    ConformerGenerator, DistanceGeometry, EmbedConfig, EmbeddingMethod, generate,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use smiles::{ParseError, parse_smiles};
pub use stats::{Statistic, SummaryStats};

pub use embed::Error as EmbedError;
pub use pipeline::Error as PipelineError;
