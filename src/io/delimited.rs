//! Comma- or tab-separated tables.

use super::{Cell, Error, Table};
use std::path::Path;

pub fn read(path: &Path, delimiter: u8) -> Result<Table, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_cell).collect());
    }
    Ok(table)
}

/// Types a text field: empty, number, boolean, otherwise text.
fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Cell::Number(v);
        }
    }
    match trimmed {
        "TRUE" | "true" | "True" => Cell::Bool(true),
        "FALSE" | "false" | "False" => Cell::Bool(false),
        _ => Cell::Text(field.to_string()),
    }
}

pub fn write(path: &Path, table: &Table, delimiter: u8) -> Result<(), Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_typed_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "Name,SMILES,pIC50,Active\naspirin,CC(=O)O,5.2,true\nblank,,,\n").unwrap();

        let table = read(&path, b',').unwrap();
        assert_eq!(table.headers, ["Name", "SMILES", "pIC50", "Active"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), &Cell::Text("CC(=O)O".into()));
        assert_eq!(table.cell(0, 2), &Cell::Number(5.2));
        assert_eq!(table.cell(0, 3), &Cell::Bool(true));
        assert_eq!(table.cell(1, 1), &Cell::Empty);
    }

    #[test]
    fn text_that_looks_like_infinity_stays_text() {
        assert_eq!(parse_cell("inf"), Cell::Text("inf".into()));
        assert_eq!(parse_cell("NaN"), Cell::Text("NaN".into()));
        assert_eq!(parse_cell(" 3 "), Cell::Number(3.0));
    }

    #[test]
    fn writes_missing_as_na() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let mut table = Table::new(vec!["SMILES".into(), "MW".into()]);
        table.push_row(vec![Cell::Text("C".into()), Cell::Missing]);
        table.push_row(vec![Cell::Text("CC".into()), Cell::Number(30.07)]);
        write(&path, &table, b'\t').unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "SMILES\tMW\nC\tNA\nCC\t30.07\n");
    }
}
