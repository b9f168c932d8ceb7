use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six conformer generation protocols.
///
/// Every method starts from distance geometry; they differ in which extra
/// terms shape the embedding and whether a force field relaxes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmbeddingMethod {
    /// Plain distance geometry followed by UFF minimisation.
    #[serde(rename = "UFF")]
    Uff,
    /// Plain distance geometry followed by MMFF-style minimisation.
    #[serde(rename = "MMFF")]
    Mmff,
    /// Distance geometry with experimental torsion preferences.
    #[serde(rename = "ETDG")]
    Etdg,
    /// Distance geometry with basic chemical knowledge terms.
    #[serde(rename = "KDG")]
    Kdg,
    /// Torsion preferences (first table) plus basic knowledge.
    #[serde(rename = "ETKDGv1", alias = "ETKDG")]
    EtkdgV1,
    /// Refined torsion preferences (second table) plus basic knowledge.
    #[serde(rename = "ETKDGv2")]
    EtkdgV2,
}

/// Which torsion preference table a method draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TorsionTable {
    V1,
    V2,
}

/// Force field used to relax an embedded structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceFieldKind {
    Uff,
    Mmff,
}

impl fmt::Display for ForceFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForceFieldKind::Uff => f.write_str("UFF"),
            ForceFieldKind::Mmff => f.write_str("MMFF"),
        }
    }
}

impl EmbeddingMethod {
    pub const ALL: [EmbeddingMethod; 6] = [
        EmbeddingMethod::Uff,
        EmbeddingMethod::Mmff,
        EmbeddingMethod::Etdg,
        EmbeddingMethod::Kdg,
        EmbeddingMethod::EtkdgV1,
        EmbeddingMethod::EtkdgV2,
    ];

    /// Label used in column names and reports.
    pub fn label(&self) -> &'static str {
        match self {
            EmbeddingMethod::Uff => "UFF",
            EmbeddingMethod::Mmff => "MMFF",
            EmbeddingMethod::Etdg => "ETDG",
            EmbeddingMethod::Kdg => "KDG",
            EmbeddingMethod::EtkdgV1 => "ETKDGv1",
            EmbeddingMethod::EtkdgV2 => "ETKDGv2",
        }
    }

    pub fn torsion_table(&self) -> Option<TorsionTable> {
        match self {
            EmbeddingMethod::Etdg | EmbeddingMethod::EtkdgV1 => Some(TorsionTable::V1),
            EmbeddingMethod::EtkdgV2 => Some(TorsionTable::V2),
            EmbeddingMethod::Uff | EmbeddingMethod::Mmff | EmbeddingMethod::Kdg => None,
        }
    }

    pub fn uses_basic_knowledge(&self) -> bool {
        matches!(
            self,
            EmbeddingMethod::Kdg | EmbeddingMethod::EtkdgV1 | EmbeddingMethod::EtkdgV2
        )
    }

    pub fn force_field(&self) -> Option<ForceFieldKind> {
        match self {
            EmbeddingMethod::Uff => Some(ForceFieldKind::Uff),
            EmbeddingMethod::Mmff => Some(ForceFieldKind::Mmff),
            _ => None,
        }
    }
}

impl fmt::Display for EmbeddingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown embedding method '{0}' (expected UFF, MMFF, ETDG, KDG, ETKDGv1 or ETKDGv2)")]
pub struct ParseMethodError(String);

impl FromStr for EmbeddingMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uff" => Ok(EmbeddingMethod::Uff),
            "mmff" => Ok(EmbeddingMethod::Mmff),
            "etdg" => Ok(EmbeddingMethod::Etdg),
            "kdg" => Ok(EmbeddingMethod::Kdg),
            "etkdg" | "etkdgv1" => Ok(EmbeddingMethod::EtkdgV1),
            "etkdgv2" => Ok(EmbeddingMethod::EtkdgV2),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// Tuning knobs for a single embedding trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    /// Random restarts drawn from the same seeded stream before the trial
    /// is reported as failed.
    pub max_attempts: usize,
    /// Iteration cap for refining coordinates against the distance bounds.
    pub max_iterations: usize,
    /// Iteration cap for force-field relaxation.
    pub force_field_iterations: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_iterations: 400,
            force_field_iterations: 200,
        }
    }
}
