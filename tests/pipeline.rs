use std::fs;
use std::path::Path;

use conformer_forge::io::{Cell, Table, read_table};
use conformer_forge::pipeline::{build_molecules, load_records};
use conformer_forge::{
    Conformation, ConformerGenerator, EmbedError, EmbeddingMethod, Molecule, Pipeline,
    PipelineConfig,
};

/// Straight-line coordinates; fails every trial of the listed methods.
struct FailingMethods(Vec<EmbeddingMethod>);

impl ConformerGenerator for FailingMethods {
    fn generate(
        &self,
        molecule: &Molecule,
        method: EmbeddingMethod,
        seed: u64,
    ) -> Result<Conformation, EmbedError> {
        if self.0.contains(&method) {
            return Err(EmbedError::DegenerateMetric { attempts: 1 });
        }
        let spacing = 1.0 + (seed % 2) as f64 * 0.5;
        Ok(Conformation::new(
            (0..molecule.atom_count())
                .map(|i| [i as f64 * spacing, 0.0, 0.0])
                .collect(),
        ))
    }
}

fn small_config(dir: &Path, methods: Vec<EmbeddingMethod>) -> PipelineConfig {
    PipelineConfig {
        input: dir.join("molecules.csv"),
        output: dir.join("results.csv"),
        trials: 2,
        methods,
        descriptors: Some(vec!["MW".into(), "GeomDiameter".into()]),
        ..Default::default()
    }
}

fn column<'t>(table: &'t Table, name: &str) -> Vec<&'t Cell> {
    let index = table
        .column_index(name)
        .unwrap_or_else(|| panic!("no column {name}"));
    (0..table.len()).map(|row| table.cell(row, index)).collect()
}

#[test]
fn invalid_smiles_rows_are_excluded_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), vec![EmbeddingMethod::Uff]);
    fs::write(&config.input, "Name,SMILES\nethanol,CCO\nbroken,C1CC\nmethane,C\n").unwrap();

    let pipeline = Pipeline::with_generator(config.clone(), FailingMethods(vec![])).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.records, 3);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.excluded(), 1);
    assert_eq!(report.parse_failures[0].smiles, "C1CC");

    let table = read_table(&config.output).unwrap();
    assert_eq!(table.len(), 2);
    let names: Vec<_> = column(&table, "Name").iter().map(|c| c.to_string()).collect();
    assert_eq!(names, ["ethanol", "methane"]);
}

#[test]
fn a_failing_method_leaves_only_its_columns_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(dir.path(), vec![EmbeddingMethod::Uff, EmbeddingMethod::Mmff]);
    fs::write(&config.input, "SMILES\nCCO\n").unwrap();

    let pipeline =
        Pipeline::with_generator(config.clone(), FailingMethods(vec![EmbeddingMethod::Uff]))
            .unwrap();
    let report = pipeline.run().unwrap();
    assert_eq!(report.methods[0].failed, 2);
    assert_eq!(report.methods[1].succeeded, 2);
    assert_eq!(report.unembedded, 0);

    let table = read_table(&config.output).unwrap();
    for stat in ["mean", "std", "min", "25%", "50%", "75%", "max"] {
        let uff = column(&table, &format!("GeomDiameter_{stat}_UFF"));
        assert_eq!(uff[0].as_text(), Some("NA"), "{stat}");
        let mmff = column(&table, &format!("GeomDiameter_{stat}_MMFF"));
        assert!(mmff[0].as_number().is_some(), "{stat}");
    }
    assert!(column(&table, "MW")[0].as_number().unwrap() > 46.0);
}

#[test]
fn molecules_without_any_conformer_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let methods = vec![EmbeddingMethod::Etdg, EmbeddingMethod::Kdg];
    let config = small_config(dir.path(), methods.clone());
    fs::write(&config.input, "SMILES\nCC\n").unwrap();

    let pipeline = Pipeline::with_generator(config.clone(), FailingMethods(methods)).unwrap();
    let report = pipeline.run().unwrap();
    assert_eq!(report.unembedded, 1);
    assert_eq!(report.total_failed_trials(), 4);
    assert_eq!(report.missing_cells, 2 * 7);

    let table = read_table(&config.output).unwrap();
    assert_eq!(table.len(), 1);
    assert!(column(&table, "MW")[0].as_number().is_some());
}

#[test]
fn completeness_counts_every_input_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("molecules.csv");
    let invalid = ["C1CC", "C=", "Xx", "C(", "CC)", "c1cc"];

    let mut body = String::from("SMILES\n");
    for i in 0..100 {
        if i % 16 == 5 && i / 16 < invalid.len() {
            body.push_str(invalid[i / 16]);
        } else {
            body.push_str(&"C".repeat(1 + i % 5));
        }
        body.push('\n');
    }
    fs::write(&path, body).unwrap();

    let input = load_records(&path, "SMILES").unwrap();
    assert_eq!(input.len(), 100);
    let batch = build_molecules(&input);
    assert_eq!(batch.failures.len(), 6);
    assert!((batch.completeness() - 94.0).abs() < 1e-9);
}

#[test]
fn fixed_seeds_reproduce_the_output_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config(
        dir.path(),
        vec![EmbeddingMethod::EtkdgV2, EmbeddingMethod::Uff],
    );
    fs::write(&config.input, "SMILES\nCCO\nC1CCCCC1\n").unwrap();

    config.output = dir.path().join("first.csv");
    Pipeline::new(config.clone()).unwrap().run().unwrap();

    config.output = dir.path().join("second.csv");
    config.parallel = true;
    Pipeline::new(config.clone()).unwrap().run().unwrap();

    let first = fs::read_to_string(dir.path().join("first.csv")).unwrap();
    let second = fs::read_to_string(dir.path().join("second.csv")).unwrap();
    assert_eq!(first, second);

    let table = read_table(&dir.path().join("first.csv")).unwrap();
    let diameters = column(&table, "GeomDiameter_mean_ETKDGv2");
    assert!(diameters.iter().all(|c| c.as_number().is_some_and(|d| d > 2.0)));
}

#[test]
fn every_method_profiles_ethanol_and_benzene() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        input: dir.path().join("molecules.csv"),
        output: dir.path().join("results.csv"),
        trials: 2,
        methods: EmbeddingMethod::ALL.to_vec(),
        ..Default::default()
    };
    fs::write(
        &config.input,
        "Name,SMILES\nEthanol,CCO\nBenzene,c1ccccc1\nBad,INVALID\n",
    )
    .unwrap();

    let report = Pipeline::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.parsed, 2);
    assert_eq!(report.parse_failures.len(), 1);
    assert_eq!(report.parse_failures[0].smiles, "INVALID");
    assert_eq!(report.unembedded, 0);
    for tally in &report.methods {
        assert_eq!(tally.succeeded, 4, "{}", tally.method);
    }

    let table = read_table(&config.output).unwrap();
    assert_eq!(table.len(), 2);
    let names: Vec<_> = column(&table, "Name").iter().map(|c| c.to_string()).collect();
    assert_eq!(names, ["Ethanol", "Benzene"]);

    let tpsa = column(&table, "TopoPSA");
    assert!((tpsa[0].as_number().unwrap() - 20.23).abs() < 1e-6);
    assert_eq!(tpsa[1].as_number(), Some(0.0));
    for method in EmbeddingMethod::ALL {
        let diameters = column(&table, &format!("GeomDiameter_mean_{}", method.label()));
        assert!(
            diameters.iter().all(|c| c.as_number().is_some_and(|d| d > 2.0)),
            "{method}"
        );
    }
}
