use super::Error;
use crate::embed::{EmbedConfig, EmbeddingMethod};
use crate::io::Format;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Settings for one batch run.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```
/// use conformer_forge::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str(
///     r#"
///     input = "molecules.csv"
///     trials = 10
///     methods = ["ETKDGv2", "UFF"]
///     "#,
/// )?;
/// assert_eq!(config.trials, 10);
/// assert_eq!(config.smiles_column, "SMILES");
/// # Ok::<(), conformer_forge::PipelineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Spreadsheet or delimited file holding the molecules.
    pub input: PathBuf,

    /// Result table; `.xlsx`, `.csv` or `.tsv`.
    pub output: PathBuf,

    /// Embedding trials per molecule and method.
    pub trials: usize,

    /// Seed of the first trial; trial `t` uses `seed_base + t`.
    pub seed_base: u64,

    /// Restricts the computed descriptors to these names when set.
    pub descriptors: Option<Vec<String>>,

    /// Embedding methods, in output column order.
    pub methods: Vec<EmbeddingMethod>,

    /// Header of the column holding SMILES strings.
    pub smiles_column: String,

    /// Profile molecules on the rayon thread pool.
    pub parallel: bool,

    pub embedding: EmbedConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("DATA.xlsx"),
            output: PathBuf::from("descriptor_analysis.xlsx"),
            trials: 50,
            seed_base: 42,
            descriptors: None,
            methods: EmbeddingMethod::ALL.to_vec(),
            smiles_column: "SMILES".to_string(),
            parallel: false,
            embedding: EmbedConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        Self::from_toml_str(&text)
    }

    /// Seeds of every trial, in trial order.
    pub fn trial_seeds(&self) -> Vec<u64> {
        (0..self.trials as u64)
            .map(|t| self.seed_base.wrapping_add(t))
            .collect()
    }

    /// Checks the settings that would otherwise fail late in a run.
    pub fn validate(&self) -> Result<(), Error> {
        if self.trials == 0 {
            return Err(Error::InvalidConfig("trials must be at least 1".to_string()));
        }
        if self.methods.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one embedding method is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.methods.iter().find(|m| !seen.insert(**m)) {
            return Err(Error::InvalidConfig(format!(
                "embedding method {dup} is listed more than once"
            )));
        }
        if self.smiles_column.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "smiles_column must not be empty".to_string(),
            ));
        }
        if self.embedding.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "embedding.max_attempts must be at least 1".to_string(),
            ));
        }

        Format::from_path(&self.input)
            .map_err(|_| Error::unsupported_format(&self.input, "unknown extension"))?;
        match Format::from_path(&self.output) {
            Ok(format) if format.is_writable() => Ok(()),
            Ok(format) => Err(Error::unsupported_format(
                &self.output,
                format!("{format} cannot be written"),
            )),
            Err(_) => Err(Error::unsupported_format(&self.output, "unknown extension")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_standard_run() {
        let config = PipelineConfig::default();
        assert_eq!(config.input, PathBuf::from("DATA.xlsx"));
        assert_eq!(config.trials, 50);
        assert_eq!(config.methods.len(), 6);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = PipelineConfig::from_toml_str(
            r#"
            output = "out.csv"
            seed_base = 7
            descriptors = ["MW", "GRAV"]
            methods = ["KDG", "ETKDG"]

            [embedding]
            max_attempts = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert_eq!(config.seed_base, 7);
        assert_eq!(config.descriptors.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(config.methods, [EmbeddingMethod::Kdg, EmbeddingMethod::EtkdgV1]);
        assert_eq!(config.embedding.max_attempts, 2);
        assert_eq!(config.embedding.max_iterations, EmbedConfig::default().max_iterations);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str("trails = 3").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn seeds_count_up_from_the_base() {
        let config = PipelineConfig {
            trials: 3,
            seed_base: u64::MAX - 1,
            ..Default::default()
        };
        assert_eq!(config.trial_seeds(), [u64::MAX - 1, u64::MAX, 0]);
    }

    #[test]
    fn validation_catches_bad_settings() {
        let zero = PipelineConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));

        let dup = PipelineConfig {
            methods: vec![EmbeddingMethod::Uff, EmbeddingMethod::Uff],
            ..Default::default()
        };
        assert!(matches!(dup.validate(), Err(Error::InvalidConfig(_))));

        let ods = PipelineConfig {
            output: PathBuf::from("result.ods"),
            ..Default::default()
        };
        assert!(matches!(ods.validate(), Err(Error::UnsupportedFormat { .. })));

        let txt = PipelineConfig {
            input: PathBuf::from("molecules.txt"),
            ..Default::default()
        };
        assert!(matches!(txt.validate(), Err(Error::UnsupportedFormat { .. })));
    }
}
