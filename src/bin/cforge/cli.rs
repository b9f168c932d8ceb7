use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use conformer_forge::EmbeddingMethod;

#[derive(Parser)]
#[command(
    name = "cforge",
    about = "Conformer-averaged molecular descriptors for SMILES spreadsheets",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the descriptor pipeline over a spreadsheet
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Embed a single SMILES and write the conformer as SDF
    #[command(visible_alias = "e")]
    Embed(EmbedArgs),

    /// List the descriptor catalogue
    #[command(visible_alias = "d")]
    Descriptors(DescriptorsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline configuration (TOML); command-line options override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input spreadsheet (.xlsx, .xls, .xlsb, .ods, .csv, .tsv)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output table (.xlsx, .csv, .tsv)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub sampling: SamplingOptions,

    #[command(flatten)]
    pub selection: SelectionOptions,

    #[command(flatten)]
    pub embedding: EmbeddingOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Sampling")]
pub struct SamplingOptions {
    /// Embedding trials per molecule and method
    #[arg(short = 'n', long, value_name = "N")]
    pub trials: Option<usize>,

    /// Seed of the first trial (trial t uses SEED + t)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Embedding method, repeatable (default: all six)
    #[arg(short, long = "method", value_name = "METHOD", action = ArgAction::Append)]
    pub methods: Vec<Method>,

    /// Profile molecules in parallel
    #[arg(short, long)]
    pub parallel: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Selection")]
pub struct SelectionOptions {
    /// Header of the SMILES column
    #[arg(long, value_name = "NAME")]
    pub smiles_column: Option<String>,

    /// Only compute these descriptors (comma-separated names)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub descriptors: Vec<String>,
}

/// Embedding tuning (advanced).
#[derive(Args)]
#[command(next_help_heading = "Embedding Options")]
pub struct EmbeddingOptions {
    /// Random restarts per trial before it counts as failed
    #[arg(long = "max-attempts", value_name = "N")]
    pub max_attempts: Option<usize>,

    /// Iteration cap for refinement against distance bounds
    #[arg(long = "max-iterations", value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Iteration cap for force-field relaxation
    #[arg(long = "ff-iterations", value_name = "N")]
    pub force_field_iterations: Option<usize>,
}

#[derive(Args)]
pub struct EmbedArgs {
    /// SMILES of the molecule to embed
    #[arg(short, long, value_name = "SMILES")]
    pub smiles: String,

    /// Embedding method
    #[arg(short, long, value_name = "METHOD", default_value = "etkdgv2")]
    pub method: Method,

    /// Seed of the trial
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Output SDF file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub embedding: EmbeddingOptions,
}

#[derive(Args)]
pub struct DescriptorsArgs {
    /// Which catalogue to list
    #[arg(short, long, value_name = "KIND", default_value = "all")]
    pub kind: CatalogueKind,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Method {
    /// Distance geometry + UFF minimisation
    Uff,
    /// Distance geometry + MMFF-style minimisation
    Mmff,
    /// Distance geometry + experimental torsions
    Etdg,
    /// Distance geometry + basic knowledge
    Kdg,
    /// Experimental torsions (v1) + basic knowledge
    #[value(name = "etkdgv1", alias = "etkdg")]
    EtkdgV1,
    /// Experimental torsions (v2) + basic knowledge
    #[value(name = "etkdgv2")]
    EtkdgV2,
}

impl From<Method> for EmbeddingMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Uff => EmbeddingMethod::Uff,
            Method::Mmff => EmbeddingMethod::Mmff,
            Method::Etdg => EmbeddingMethod::Etdg,
            Method::Kdg => EmbeddingMethod::Kdg,
            Method::EtkdgV1 => EmbeddingMethod::EtkdgV1,
            Method::EtkdgV2 => EmbeddingMethod::EtkdgV2,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CatalogueKind {
    /// Per-molecule descriptors
    #[value(name = "2d")]
    TwoD,
    /// Per-conformer descriptors
    #[value(name = "3d")]
    ThreeD,
    /// Both catalogues
    All,
}

pub fn parse() -> Cli {
    Cli::parse()
}
