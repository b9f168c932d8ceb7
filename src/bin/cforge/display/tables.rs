use std::io::{self, Write};

use conformer_forge::pipeline::{MethodTally, ParseFailure};
use conformer_forge::{Molecule, PipelineReport};

use crate::util::text::{thousands, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

const MAX_LISTED_FAILURES: usize = 10;

pub fn print_run_summary(report: &PipelineReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Input Records", thousands(report.records)),
        ("Parsed", thousands(report.parsed)),
        ("Excluded", thousands(report.excluded())),
        ("Completeness", format!("{:.1}%", report.completeness())),
        ("Output Columns", thousands(report.columns)),
        ("Missing Cells", thousands(report.missing_cells)),
    ];
    if report.unembedded > 0 {
        rows.push(("Never Embedded", thousands(report.unembedded)));
    }

    print_kv_table(&mut out, "Run Summary", &rows);
}

pub fn print_method_table(methods: &[MethodTally]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let name_w = 9usize;
    let num_w = 9usize;
    let sep_overhead = 10;
    let bar_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + 2 * num_w + sep_overhead);
    let max_bar = bar_w.saturating_sub(8).min(16);

    let line = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{m}{}{m}{}{r}",
            "─".repeat(name_w + 2),
            "─".repeat(num_w + 2),
            "─".repeat(num_w + 2),
            "─".repeat(bar_w + 2),
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ Embedding Trials ─┐");
    let _ = writeln!(out, "{}", line("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>num_w$} │ {:>num_w$} │ {:<bar_w$} │",
        "Method", "Embedded", "Failed", "Success"
    );
    let _ = writeln!(out, "{}", line("├", "┼", "┤"));

    for tally in methods {
        let attempted = tally.attempted();
        let pct = if attempted == 0 {
            0.0
        } else {
            tally.succeeded as f64 * 100.0 / attempted as f64
        };
        let cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar), pct);
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>num_w$} │ {:>num_w$} │ {:<bar_w$} │",
            tally.method.label(),
            thousands(tally.succeeded),
            thousands(tally.failed),
            cell
        );
    }

    let _ = writeln!(out, "{}", line("└", "┴", "┘"));
}

pub fn print_parse_failures(failures: &[ParseFailure]) {
    if failures.is_empty() {
        return;
    }

    let stderr = io::stderr();
    let mut out = stderr.lock();

    let row_w = 6usize;
    let smiles_w = 16usize;
    let sep_overhead = 8;
    let err_w = SAFE_TABLE_WIDTH.saturating_sub(row_w + smiles_w + sep_overhead);

    let _ = writeln!(out, "{INDENT}┌─ Rejected SMILES ─┐");
    let _ = writeln!(
        out,
        "{INDENT}┌{}┬{}┬{}┐",
        "─".repeat(row_w + 2),
        "─".repeat(smiles_w + 2),
        "─".repeat(err_w + 2)
    );
    let _ = writeln!(
        out,
        "{INDENT}│ {:>row_w$} │ {:<smiles_w$} │ {:<err_w$} │",
        "Row", "SMILES", "Reason"
    );
    let _ = writeln!(
        out,
        "{INDENT}├{}┼{}┼{}┤",
        "─".repeat(row_w + 2),
        "─".repeat(smiles_w + 2),
        "─".repeat(err_w + 2)
    );

    for failure in failures.iter().take(MAX_LISTED_FAILURES) {
        let smiles = if failure.smiles.is_empty() {
            "(empty)".to_string()
        } else {
            truncate(&failure.smiles, smiles_w)
        };
        let _ = writeln!(
            out,
            "{INDENT}│ {:>row_w$} │ {:<smiles_w$} │ {:<err_w$} │",
            // Spreadsheet row number: header is row 1.
            failure.row + 2,
            smiles,
            truncate(&failure.error.to_string(), err_w)
        );
    }
    if failures.len() > MAX_LISTED_FAILURES {
        let _ = writeln!(
            out,
            "{INDENT}│ {:>row_w$} │ {:<smiles_w$} │ {:<err_w$} │",
            "...",
            "...",
            format!("({} more)", failures.len() - MAX_LISTED_FAILURES)
        );
    }

    let _ = writeln!(
        out,
        "{INDENT}└{}┴{}┴{}┘",
        "─".repeat(row_w + 2),
        "─".repeat(smiles_w + 2),
        "─".repeat(err_w + 2)
    );
}

pub fn print_molecule_info(smiles: &str, molecule: &Molecule) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("SMILES", smiles.to_string()),
        ("Heavy Atoms", thousands(molecule.heavy_atom_count())),
        ("Total Atoms", thousands(molecule.atom_count())),
        ("Bonds", thousands(molecule.bond_count())),
        ("Rings", thousands(molecule.rings().ring_count())),
        ("Mol. Weight", format!("{:.3}", molecule.molecular_weight())),
    ];

    print_kv_table(&mut out, "Molecule", &rows);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{INDENT}┌─ {} ─┐",
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{INDENT}┌{}┬{}┐",
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    let _ = writeln!(out, "{INDENT}│ {:<key_w$} │ {:>val_w$} │", "Metric", "Value");
    let _ = writeln!(
        out,
        "{INDENT}├{}┼{}┤",
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w)
        );
    }
    let _ = writeln!(
        out,
        "{INDENT}└{}┴{}┘",
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(0.0, 3), "░░░");
        assert_eq!(make_bar(100.0, 2), "██");
    }
}
