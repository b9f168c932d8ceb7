//! Embedded parameter tables for force fields, embedding preferences and
//! Gasteiger charges.
//!
//! The default table is compiled into the crate and parsed once on first
//! use. A custom table with the same layout can be supplied as TOML text.

use crate::embed::FourierTerm;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

const DEFAULT_PARAMS_TOML: &str = include_str!("../resources/parameters.toml");

static DEFAULT_PARAMS: OnceLock<Parameters> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    pub uff: UffParams,
    pub mmff: MmffParams,
    pub torsion_preferences: TorsionPreferences,
    #[serde(default)]
    pub knowledge: KnowledgeParams,
    pub gasteiger: HashMap<String, GasteigerParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UffParams {
    pub atoms: HashMap<String, UffAtomParams>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UffAtomParams {
    pub r1: f64,
    pub theta0: f64,
    pub x1: f64,
    pub d1: f64,
    pub z1: f64,
    pub v_sp3: f64,
    pub u_sp2: f64,
    pub chi: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MmffParams {
    pub atoms: HashMap<String, MmffAtomParams>,
    pub radii: HashMap<String, Vec<f64>>,
    pub stretch: StretchConstants,
    pub bend: BendConstants,
    #[serde(default)]
    pub torsions: HashMap<String, MmffTorsionParams>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MmffAtomParams {
    pub theta0: f64,
    pub alpha: f64,
    pub n_eff: f64,
    pub a: f64,
    pub g: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StretchConstants {
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub aromatic: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BendConstants {
    pub heavy: f64,
    pub hydrogen: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MmffTorsionParams {
    #[serde(default)]
    pub v1: f64,
    #[serde(default)]
    pub v2: f64,
    #[serde(default)]
    pub v3: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TorsionPreferences {
    pub v1: HashMap<String, Vec<FourierTerm>>,
    pub v2: HashMap<String, Vec<FourierTerm>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeParams {
    #[serde(default = "default_improper_barrier")]
    pub improper_barrier: f64,
    #[serde(default = "default_bonded_weight")]
    pub bonded_weight: f64,
    #[serde(default = "default_aromatic_barrier")]
    pub aromatic_barrier: f64,
}

fn default_improper_barrier() -> f64 {
    5.0
}
fn default_bonded_weight() -> f64 {
    100.0
}
fn default_aromatic_barrier() -> f64 {
    25.0
}

impl Default for KnowledgeParams {
    fn default() -> Self {
        Self {
            improper_barrier: default_improper_barrier(),
            bonded_weight: default_bonded_weight(),
            aromatic_barrier: default_aromatic_barrier(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GasteigerParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl GasteigerParams {
    /// Electronegativity at charge `q`.
    #[inline]
    pub fn chi(&self, q: f64) -> f64 {
        self.a + self.b * q + self.c * q * q
    }

    /// Electronegativity of the cation (q = +1).
    #[inline]
    pub fn chi_plus(&self) -> f64 {
        self.a + self.b + self.c
    }
}

/// Parses a custom table, or returns a copy of the embedded default.
pub fn load_parameters(custom_toml: Option<&str>) -> Result<Parameters, toml::de::Error> {
    match custom_toml {
        Some(toml) => toml::from_str(toml),
        None => Ok(get_default_parameters().clone()),
    }
}

pub fn get_default_parameters() -> &'static Parameters {
    DEFAULT_PARAMS.get_or_init(|| {
        toml::from_str(DEFAULT_PARAMS_TOML)
            .expect("Failed to parse embedded default parameters. This is a library bug.")
    })
}
