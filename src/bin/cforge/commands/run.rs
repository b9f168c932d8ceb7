use anyhow::{Context, Result};
use tracing::info;

use conformer_forge::pipeline::{build_molecules, load_records};
use conformer_forge::{Pipeline, PipelineConfig, Statistic};

use crate::cli::RunArgs;
use crate::config::build_pipeline_config;
use crate::display::{
    Context as DisplayContext, Progress, print_method_table, print_parse_failures,
    print_run_summary,
};
use crate::util::text::thousands;

const TOTAL_STEPS: u8 = 4;

pub fn run_pipeline(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_pipeline_config(&args)?;
    let pipeline = Pipeline::new(config).context("Invalid pipeline configuration")?;
    let config = pipeline.config();

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading input table");
    let input = load_records(&config.input, &config.smiles_column)?;
    progress.complete_step(
        "Reading input table",
        &[
            format!("Read {} rows ← {}", thousands(input.len()), file_name(&config.input)),
            format!("SMILES column '{}'", config.smiles_column),
        ],
    );

    progress.step("Parsing SMILES");
    let batch = build_molecules(&input);
    progress.complete_step(
        "Parsing SMILES",
        &[
            format!(
                "Parsed {} of {} molecules ({:.1}%)",
                thousands(batch.molecules.len()),
                thousands(batch.total()),
                batch.completeness()
            ),
            "Add explicit hydrogens".to_string(),
        ],
    );

    if ctx.interactive {
        print_parse_failures(&batch.failures);
    }

    let bar = progress.counted_step("Embedding conformers", batch.molecules.len() as u64);
    let profiles = pipeline.profile_all(&batch.molecules, |_| bar.inc(1));
    bar.finish_and_clear();
    progress.complete_step("Embedding conformers", &build_profile_substeps(config));

    progress.step("Writing output");
    let table = pipeline.assemble(&input, &profiles);
    pipeline.export(&table)?;
    progress.complete_step(
        "Writing output",
        &[format!(
            "Write {} × {} table → {}",
            thousands(table.len()),
            thousands(table.column_count()),
            file_name(&config.output)
        )],
    );

    let mut report = pipeline.report(&batch, &profiles, &table);
    report.output = Some(config.output.clone());

    if ctx.interactive {
        print_run_summary(&report);
        print_method_table(&report.methods);
    }

    info!(
        records = report.records,
        parsed = report.parsed,
        completeness = %format!("{:.1}%", report.completeness()),
        failed_trials = report.total_failed_trials(),
        "run finished"
    );

    progress.finish();

    Ok(())
}

fn build_profile_substeps(config: &PipelineConfig) -> Vec<String> {
    let methods: Vec<&str> = config.methods.iter().map(|m| m.label()).collect();
    let descriptors = match &config.descriptors {
        Some(names) => format!("{} selected descriptors", names.len()),
        None => "full descriptor catalogue".to_string(),
    };
    let stats: Vec<&str> = Statistic::ALL.iter().map(Statistic::label).collect();

    vec![
        format!("{} trials × {}", config.trials, methods.join(", ")),
        format!("Seeds {}..{}", config.seed_base, config.seed_base.wrapping_add(config.trials as u64)),
        format!("Evaluate {descriptors}"),
        format!(
            "Summarise {}{}",
            stats.join(", "),
            if config.parallel { " (parallel)" } else { "" }
        ),
    ]
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
