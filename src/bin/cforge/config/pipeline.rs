use anyhow::{Context, Result};

use conformer_forge::PipelineConfig;

use super::build_embed_config;
use crate::cli::RunArgs;

/// Loads the TOML file named by `--config` (or the defaults) and applies
/// the remaining command-line options over it.
pub fn build_pipeline_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }

    let sampling = &args.sampling;
    if let Some(trials) = sampling.trials {
        config.trials = trials;
    }
    if let Some(seed) = sampling.seed {
        config.seed_base = seed;
    }
    if !sampling.methods.is_empty() {
        config.methods = sampling.methods.iter().map(|&m| m.into()).collect();
    }
    config.parallel |= sampling.parallel;

    let selection = &args.selection;
    if let Some(column) = &selection.smiles_column {
        config.smiles_column = column.clone();
    }
    if !selection.descriptors.is_empty() {
        config.descriptors = Some(selection.descriptors.clone());
    }

    config.embedding = build_embed_config(config.embedding, &args.embedding);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use conformer_forge::EmbeddingMethod;
    use std::path::Path;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Run(args) => args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn defaults_without_options() {
        let config = build_pipeline_config(&run_args(&["cforge", "run"])).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn command_line_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "input = \"a.csv\"\ntrials = 7\nmethods = [\"UFF\"]\nsmiles_column = \"smi\"\n",
        )
        .unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let config = build_pipeline_config(&run_args(&[
            "cforge", "run", "-c", &path_arg, "-n", "3", "-m", "kdg", "--max-attempts", "2",
        ]))
        .unwrap();

        assert_eq!(config.input, Path::new("a.csv"));
        assert_eq!(config.trials, 3);
        assert_eq!(config.methods, [EmbeddingMethod::Kdg]);
        assert_eq!(config.smiles_column, "smi");
        assert_eq!(config.embedding.max_attempts, 2);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = build_pipeline_config(&run_args(&["cforge", "run", "-c", "/no/such/run.toml"]))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
