//! Core data structures representing molecules and their conformations.
//!
//! - [`types`] – Elements with tabulated properties, bond orders and hybridization.
//! - [`atom`] – Graph atom with formal charge, aromaticity and implicit hydrogens.
//! - [`molecule`] – Molecular graph with bonds, adjacency and hydrogen expansion.
//! - [`ring`] – Smallest-set-of-smallest-rings perception.
//! - [`conformer`] – A single set of 3D coordinates for a molecule.
//!
//! A [`Molecule`] is pure topology; geometry lives in separate
//! [`Conformation`] values so one graph can carry many conformers.
//!
//! [`Molecule`]: molecule::Molecule
//! [`Conformation`]: conformer::Conformation

pub mod atom;
pub mod conformer;
pub mod molecule;
pub mod ring;
pub mod types;
