//! Error types for conformer embedding.
//!
//! Every variant describes why a single (molecule, method, seed) trial
//! produced no conformation. Trials fail independently; callers record the
//! failure and move on.

use super::config::ForceFieldKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The molecule has no atoms.
    #[error("molecule has no atoms")]
    EmptyMolecule,

    /// Triangle smoothing produced a lower bound above the upper bound.
    #[error(
        "distance bounds are inconsistent between atoms {i} and {j} (lower {lower:.3} > upper {upper:.3})"
    )]
    InconsistentBounds {
        i: usize,
        j: usize,
        lower: f64,
        upper: f64,
    },

    /// The metric matrix had no positive eigenvalue in any attempt.
    #[error("metric matrix is degenerate after {attempts} attempt(s)")]
    DegenerateMetric { attempts: usize },

    /// Refinement never brought the distance error below tolerance.
    #[error("embedding did not converge after {attempts} attempt(s) (residual {residual:.3e})")]
    NotConverged { attempts: usize, residual: f64 },

    /// Coordinates became NaN or infinite.
    #[error("non-finite coordinates produced")]
    NonFinite,

    /// The force field has no parameters for an atom of the molecule.
    #[error("{force_field} has no parameters for atom {atom} (type {atom_type})")]
    MissingParameters {
        force_field: ForceFieldKind,
        atom: usize,
        atom_type: String,
    },

    /// Partial charges needed by the force field could not be assigned.
    #[error("partial charge assignment failed: {0}")]
    Charges(#[from] crate::charge::Error),
}

impl Error {
    pub fn missing_parameters(
        force_field: ForceFieldKind,
        atom: usize,
        atom_type: impl Into<String>,
    ) -> Self {
        Self::MissingParameters {
            force_field,
            atom,
            atom_type: atom_type.into(),
        }
    }
}
