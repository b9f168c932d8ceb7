//! Spreadsheet workbooks: any calamine-readable format in, `.xlsx` out.

use super::{Cell, Error, Table};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use std::path::Path;

const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

/// Reads the first worksheet; its first row is the header.
pub fn read(path: &Path) -> Result<Table, Error> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(Error::NoWorksheet)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(|d| to_cell(d).to_string()).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(headers);
    for row in rows {
        let mut cells: Vec<Cell> = row.iter().map(to_cell).collect();
        while cells.last() == Some(&Cell::Empty) {
            cells.pop();
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

pub fn write(path: &Path, table: &Table) -> Result<(), Error> {
    let widest = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    if widest > MAX_COLUMNS {
        return Err(Error::TooManyColumns {
            columns: widest,
            limit: MAX_COLUMNS,
        });
    }
    if table.len() + 1 > MAX_ROWS {
        return Err(Error::TooManyRows {
            rows: table.len() + 1,
            limit: MAX_ROWS,
        });
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(v) => {
                    sheet.write_number(r, col, *v)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(r, col, s)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, col, *b)?;
                }
                Cell::Missing => {
                    sheet.write_string(r, col, "NA")?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlsx_survives_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.xlsx");

        let mut table = Table::new(vec!["SMILES".into(), "MW_mean_UFF".into(), "Flag".into()]);
        table.push_row(vec![
            Cell::Text("CCO".into()),
            Cell::Number(46.07),
            Cell::Bool(false),
        ]);
        table.push_row(vec![Cell::Text("C".into()), Cell::Missing]);
        write(&path, &table).unwrap();

        let back = read(&path).unwrap();
        assert_eq!(back.headers, table.headers);
        assert_eq!(back.len(), 2);
        assert_eq!(back.cell(0, 0), &Cell::Text("CCO".into()));
        assert_eq!(back.cell(0, 1), &Cell::Number(46.07));
        assert_eq!(back.cell(0, 2), &Cell::Bool(false));
        assert_eq!(back.cell(1, 1), &Cell::Text("NA".into()));
        assert_eq!(back.cell(1, 2), &Cell::Empty);
    }

    #[test]
    fn rejects_tables_wider_than_a_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.xlsx");
        let headers = (0..MAX_COLUMNS + 1).map(|i| format!("c{i}")).collect();
        let err = write(&path, &Table::new(headers)).unwrap_err();
        assert!(matches!(err, Error::TooManyColumns { columns: 16_385, .. }));
        assert!(!path.exists());
    }
}
