//! The batch descriptor pipeline.
//!
//! A run moves through fixed stages, each a plain function of the
//! previous stage's output:
//!
//! 1. [`load_records`] reads the input table and locates the SMILES column
//! 2. [`build_molecules`] parses every SMILES, setting failures aside
//! 3. [`Pipeline::profile`] embeds each molecule `trials` times per method,
//!    evaluates the 3D descriptors of every conformer and summarises them
//!    alongside the molecule's 2D descriptors
//! 4. [`Pipeline::assemble`] lays the profiles out as one row per molecule
//! 5. [`Pipeline::export`] writes the table
//!
//! Only configuration problems stop a run. Unparseable SMILES, failed
//! trials and undefined descriptors are recorded and the run goes on.

mod config;
mod error;
mod report;

pub use config::PipelineConfig;
pub use error::Error;
pub use report::{MethodTally, ParseFailure, PipelineReport, completeness};

use crate::descriptors::{DescriptorCalculator, DescriptorSet};
use crate::embed::{ConformerGenerator, DistanceGeometry, EmbeddingMethod};
use crate::io::{self, Cell, Table};
use crate::model::molecule::Molecule;
use crate::smiles::parse_smiles;
use crate::stats::{Statistic, SummaryStats, column_name};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// The input table with its SMILES column located.
#[derive(Debug, Clone)]
pub struct InputTable {
    pub table: Table,
    pub smiles_column: usize,
}

impl InputTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// SMILES text of data row `row`; empty for blank cells.
    pub fn smiles(&self, row: usize) -> String {
        match self.table.cell(row, self.smiles_column) {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty | Cell::Missing => String::new(),
            other => other.to_string(),
        }
    }
}

/// Reads `path` and finds the `smiles_column` header.
pub fn load_records(path: &Path, smiles_column: &str) -> Result<InputTable, Error> {
    std::fs::metadata(path).map_err(|source| Error::io(path, source))?;
    let table = io::read_table(path).map_err(|e| Error::table(path, e))?;

    let Some(column) = table.column_index(smiles_column) else {
        return Err(Error::MissingColumn {
            column: smiles_column.to_string(),
            available: table.headers.clone(),
        });
    };
    if table.is_empty() {
        return Err(Error::EmptyTable(path.to_path_buf()));
    }

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.column_count(),
        "input table loaded"
    );
    Ok(InputTable {
        table,
        smiles_column: column,
    })
}

/// A successfully parsed input row.
#[derive(Debug, Clone)]
pub struct ParsedMolecule {
    /// Zero-based data row index in the input table.
    pub row: usize,
    pub smiles: String,
    /// Heavy-atom graph with implicit hydrogens.
    pub molecule: Molecule,
    /// Hydrogen-complete graph; conformers index its atoms.
    pub explicit: Molecule,
}

/// Output of the molecule-building stage.
#[derive(Debug, Clone, Default)]
pub struct MoleculeBatch {
    pub molecules: Vec<ParsedMolecule>,
    pub failures: Vec<ParseFailure>,
}

impl MoleculeBatch {
    pub fn total(&self) -> usize {
        self.molecules.len() + self.failures.len()
    }

    pub fn completeness(&self) -> f64 {
        completeness(self.molecules.len(), self.total())
    }
}

/// Parses every row of `input`, in order.
pub fn build_molecules(input: &InputTable) -> MoleculeBatch {
    let mut batch = MoleculeBatch::default();
    for row in 0..input.len() {
        let smiles = input.smiles(row);
        match parse_smiles(&smiles) {
            Ok(molecule) => {
                let explicit = molecule.with_explicit_hydrogens();
                batch.molecules.push(ParsedMolecule {
                    row,
                    smiles,
                    molecule,
                    explicit,
                });
            }
            Err(error) => {
                warn!(row, smiles = %smiles, error = %error, "SMILES rejected");
                batch.failures.push(ParseFailure { row, smiles, error });
            }
        }
    }
    info!(
        parsed = batch.molecules.len(),
        excluded = batch.failures.len(),
        completeness = %format!("{:.1}%", batch.completeness()),
        "molecules built"
    );
    batch
}

/// Summaries of one method's trials for one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodProfile {
    pub method: EmbeddingMethod,
    pub succeeded: usize,
    pub failed: usize,
    /// One entry per selected 3D descriptor, in catalogue order.
    pub summaries: Vec<SummaryStats>,
}

/// Everything computed for one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeProfile {
    pub row: usize,
    pub descriptors_2d: DescriptorSet,
    pub methods: Vec<MethodProfile>,
}

impl MoleculeProfile {
    /// True when at least one trial of any method produced a conformer.
    pub fn has_conformers(&self) -> bool {
        self.methods.iter().any(|m| m.succeeded > 0)
    }
}

/// A configured pipeline over a conformer generator.
#[derive(Debug)]
pub struct Pipeline<G: ConformerGenerator = DistanceGeometry<'static>> {
    config: PipelineConfig,
    generator: G,
    calculator: DescriptorCalculator,
}

impl Pipeline {
    /// Pipeline with the distance-geometry generator tuned by
    /// `config.embedding`.
    pub fn new(config: PipelineConfig) -> Result<Self, Error> {
        let generator = DistanceGeometry::new(config.embedding.clone());
        Self::with_generator(config, generator)
    }
}

impl<G: ConformerGenerator> Pipeline<G> {
    pub fn with_generator(config: PipelineConfig, generator: G) -> Result<Self, Error> {
        config.validate()?;
        let calculator = DescriptorCalculator::from_option(config.descriptors.as_deref());
        Ok(Self {
            config,
            generator,
            calculator,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &DescriptorCalculator {
        &self.calculator
    }

    /// Headers of the descriptor columns, without the input columns.
    pub fn descriptor_headers(&self) -> Vec<String> {
        let names_3d = self.calculator.names_3d();
        let mut headers: Vec<String> = self
            .calculator
            .names_2d()
            .into_iter()
            .map(str::to_string)
            .collect();
        for method in &self.config.methods {
            for name in &names_3d {
                for stat in Statistic::ALL {
                    headers.push(column_name(name, stat, method));
                }
            }
        }
        headers
    }

    /// Embeds and describes one molecule.
    pub fn profile(&self, parsed: &ParsedMolecule) -> MoleculeProfile {
        let descriptors_2d = self.calculator.evaluate_2d(&parsed.molecule);
        let evaluator = self.calculator.prepare_3d(&parsed.explicit);
        let width = self.calculator.names_3d().len();
        let seeds = self.config.trial_seeds();

        let methods = self
            .config
            .methods
            .iter()
            .map(|&method| {
                let mut samples: Vec<Vec<f64>> = vec![Vec::with_capacity(seeds.len()); width];
                let mut succeeded = 0;
                let mut failed = 0;

                let trials = self.generator.generate_trials(&parsed.explicit, method, &seeds);
                for (seed, trial) in seeds.iter().zip(trials) {
                    match trial {
                        Ok(conformation) => {
                            succeeded += 1;
                            let set = evaluator.evaluate(&conformation);
                            for (sample, value) in samples.iter_mut().zip(set.values()) {
                                if let Some(v) = value {
                                    sample.push(v);
                                }
                            }
                        }
                        Err(err) => {
                            failed += 1;
                            debug!(row = parsed.row, %method, seed, error = %err, "trial failed");
                        }
                    }
                }

                if succeeded == 0 {
                    warn!(row = parsed.row, %method, "no trial produced a conformer");
                }
                MethodProfile {
                    method,
                    succeeded,
                    failed,
                    summaries: samples.iter().map(|s| SummaryStats::from_values(s)).collect(),
                }
            })
            .collect();

        MoleculeProfile {
            row: parsed.row,
            descriptors_2d,
            methods,
        }
    }

    /// Profiles every molecule, in input order. `on_done` is called once
    /// per finished molecule, from worker threads when running in
    /// parallel.
    pub fn profile_all<F>(&self, molecules: &[ParsedMolecule], on_done: F) -> Vec<MoleculeProfile>
    where
        F: Fn(&MoleculeProfile) + Sync,
    {
        let run = |parsed: &ParsedMolecule| {
            let profile = self.profile(parsed);
            on_done(&profile);
            profile
        };
        let profiles: Vec<MoleculeProfile> = if self.config.parallel {
            molecules.par_iter().map(run).collect()
        } else {
            molecules.iter().map(run).collect()
        };
        info!(
            molecules = profiles.len(),
            methods = self.config.methods.len(),
            trials = self.config.trials,
            "conformer profiles complete"
        );
        profiles
    }

    /// One output row per profile: input columns, 2D values, then every
    /// statistic of every 3D descriptor per method. Non-finite and
    /// undefined values become missing cells.
    pub fn assemble(&self, input: &InputTable, profiles: &[MoleculeProfile]) -> Table {
        let mut headers = input.table.headers.clone();
        headers.extend(self.descriptor_headers());
        let width = headers.len();
        let input_width = input.table.column_count();

        let mut table = Table::new(headers);
        for profile in profiles {
            let mut row = Vec::with_capacity(width);
            row.extend((0..input_width).map(|c| input.table.cell(profile.row, c).clone()));
            row.extend(profile.descriptors_2d.values().map(Cell::numeric));
            for method in &profile.methods {
                for summary in &method.summaries {
                    row.extend(summary.values().into_iter().map(Cell::numeric));
                }
            }
            table.push_row(row);
        }
        table
    }

    /// Writes `table` to the configured output, replacing any existing
    /// file.
    pub fn export(&self, table: &Table) -> Result<(), Error> {
        let path = &self.config.output;
        io::write_table(path, table).map_err(|e| Error::table(path, e))?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.column_count(),
            "results written"
        );
        Ok(())
    }

    /// Runs every stage from the configured input to the configured
    /// output.
    pub fn run(&self) -> Result<PipelineReport, Error> {
        let input = load_records(&self.config.input, &self.config.smiles_column)?;
        let batch = build_molecules(&input);
        let profiles = self.profile_all(&batch.molecules, |_| {});
        let table = self.assemble(&input, &profiles);
        self.export(&table)?;

        let mut report = self.report(&batch, &profiles, &table);
        report.output = Some(self.config.output.clone());
        Ok(report)
    }

    /// Summarises a finished run.
    pub fn report(
        &self,
        batch: &MoleculeBatch,
        profiles: &[MoleculeProfile],
        table: &Table,
    ) -> PipelineReport {
        let mut methods: Vec<MethodTally> = self
            .config
            .methods
            .iter()
            .map(|&m| MethodTally::new(m))
            .collect();
        for profile in profiles {
            for (tally, method) in methods.iter_mut().zip(&profile.methods) {
                tally.succeeded += method.succeeded;
                tally.failed += method.failed;
            }
        }

        PipelineReport {
            records: batch.total(),
            parsed: batch.molecules.len(),
            parse_failures: batch.failures.clone(),
            methods,
            unembedded: profiles.iter().filter(|p| !p.has_conformers()).count(),
            missing_cells: table
                .rows
                .iter()
                .flatten()
                .filter(|c| matches!(c, Cell::Missing))
                .count(),
            columns: table.column_count(),
            output: None,
        }
    }
}
