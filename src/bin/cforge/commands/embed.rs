use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use conformer_forge::io::sdf;
use conformer_forge::{
    Conformation, ConformerGenerator, DistanceGeometry, EmbedConfig, EmbeddingMethod, Molecule,
    parse_smiles,
};

use crate::cli::EmbedArgs;
use crate::config::build_embed_config;
use crate::display::{Context as DisplayContext, Progress, print_molecule_info};

const TOTAL_STEPS: u8 = 3;

pub fn run_embed(args: EmbedArgs, ctx: DisplayContext) -> Result<()> {
    let method: EmbeddingMethod = args.method.into();
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading SMILES");
    let molecule = parse_smiles(&args.smiles)
        .with_context(|| format!("Failed to read SMILES '{}'", args.smiles))?;
    let explicit = molecule.with_explicit_hydrogens();
    progress.complete_step(
        "Reading SMILES",
        &[
            "Perceive rings and aromaticity".to_string(),
            format!("Add {} explicit hydrogens", explicit.hydrogen_count()),
        ],
    );

    if ctx.interactive {
        print_molecule_info(&args.smiles, &explicit);
    }

    progress.step("Embedding conformer");
    let config = build_embed_config(EmbedConfig::default(), &args.embedding);
    let generator = DistanceGeometry::new(config);
    let conformation = generator
        .generate(&explicit, method, args.seed)
        .with_context(|| format!("{method} embedding failed for seed {}", args.seed))?;
    progress.complete_step(
        "Embedding conformer",
        &[format!("{} with seed {}", method.label(), args.seed)],
    );

    progress.step("Writing output");
    let properties = [
        ("SMILES", args.smiles.clone()),
        ("METHOD", method.label().to_string()),
        ("SEED", args.seed.to_string()),
    ];
    let target = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            write_sdf(BufWriter::new(file), &explicit, &conformation, &args.smiles, &properties)?;
            path.display().to_string()
        }
        None => {
            write_sdf(io::stdout().lock(), &explicit, &conformation, &args.smiles, &properties)?;
            "stdout".to_string()
        }
    };
    progress.complete_step("Writing output", &[format!("Write SDF → {target}")]);

    progress.finish();

    Ok(())
}

fn write_sdf<W: Write>(
    mut writer: W,
    molecule: &Molecule,
    conformation: &Conformation,
    title: &str,
    properties: &[(&str, String)],
) -> Result<()> {
    sdf::write(&mut writer, molecule, conformation, title, properties)
        .context("Failed to write SDF")?;
    writer.flush().context("Failed to write SDF")?;
    Ok(())
}
