use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// First error of type `T` anywhere in the chain.
fn find<T>(err: &Error) -> Option<&T>
where
    T: std::error::Error + Send + Sync + 'static,
{
    err.chain().find_map(|cause| cause.downcast_ref::<T>())
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_pipeline_hints(err);
        collector.collect_table_hints(err);
        collector.collect_smiles_hints(err);
        collector.collect_embed_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_pipeline_hints(&mut self, err: &Error) {
        use conformer_forge::PipelineError;

        let Some(pipeline_err) = find::<PipelineError>(err) else {
            return;
        };

        self.mark_typed();

        match pipeline_err {
            PipelineError::MissingColumn { column, available } => {
                self.add(format!("No header cell reads exactly '{}'", column));
                if !available.is_empty() {
                    self.add(format!("Columns in the file: {}", available.join(", ")));
                }
                self.add("Select another column with --smiles-column <NAME>");
            }

            PipelineError::UnsupportedFormat { .. } => {
                self.add("Formats are chosen by file extension");
                self.add("Supported input formats: xlsx, xls, xlsb, ods, csv, tsv");
                self.add("Supported output formats: xlsx, csv, tsv");
            }

            PipelineError::EmptyTable(_) => {
                self.add("The first row is read as the header; data starts on row 2");
                self.add("Check that the molecules are on the first worksheet");
            }

            PipelineError::InvalidConfig(msg) => {
                let msg_lower = msg.to_lowercase();
                if msg_lower.contains("trial") {
                    self.add("Use at least one trial per method (-n/--trials)");
                } else if msg_lower.contains("method") {
                    self.add("List each method once (-m uff -m etkdgv2 ...)");
                    self.add("Methods: uff, mmff, etdg, kdg, etkdgv1, etkdgv2");
                } else if msg_lower.contains("attempt") {
                    self.add("--max-attempts must be at least 1");
                } else {
                    self.add("Review the configuration file and command-line options");
                }
            }

            PipelineError::ConfigParse(_) => {
                self.add("Configuration file has invalid TOML syntax or unknown keys");
                self.add("Method names are written as in the output: UFF, MMFF, ETDG, KDG, ETKDGv1, ETKDGv2");
            }

            PipelineError::Io { source, .. } => {
                self.collect_std_io_hints(source);
            }

            PipelineError::Table { .. } => {
                // Details come from the wrapped table error.
            }
        }
    }

    fn collect_table_hints(&mut self, err: &Error) {
        use conformer_forge::io::Error as TableError;

        let Some(table_err) = find::<TableError>(err) else {
            return;
        };

        self.mark_typed();

        match table_err {
            TableError::Io { source } => self.collect_std_io_hints(source),

            TableError::Csv(_) => {
                self.add("Delimited text could not be read or written");
                self.add("Check quoting and that the file is UTF-8 encoded");
            }

            TableError::Workbook(_) | TableError::NoWorksheet => {
                self.add("The workbook could not be opened");
                self.add("Verify the file is not password protected or corrupt");
                self.add("Exporting the sheet as CSV is a reliable alternative");
            }

            TableError::WorkbookWrite(_) => {
                self.add("Writing the workbook failed");
                self.add("Close the output file if it is open in a spreadsheet program");
            }

            TableError::TooManyColumns { .. } | TableError::TooManyRows { .. } => {
                self.add("The result does not fit on one worksheet");
                self.add("Write CSV instead (-o results.csv)");
                self.add("Or narrow the columns with --descriptors / --method");
            }

            TableError::UnknownFormat(_) | TableError::UnsupportedWriteFormat(_) => {
                self.add("Supported output formats: xlsx, csv, tsv");
            }

            TableError::ConformationMismatch { .. } => {
                self.add("Coordinates do not belong to this molecule");
                self.add("This may indicate a bug; please report if reproducible");
            }
        }
    }

    fn collect_smiles_hints(&mut self, err: &Error) {
        use conformer_forge::ParseError;

        let Some(parse_err) = find::<ParseError>(err) else {
            return;
        };

        self.mark_typed();

        match parse_err {
            ParseError::Empty => {
                self.add("Pass the molecule with -s/--smiles");
            }

            ParseError::UnknownElement { .. } | ParseError::BracketAtom { .. } => {
                self.add("Elements outside the organic subset need brackets, e.g. [Na+]");
                self.add("Check element capitalisation (Cl, Br, not CL, BR)");
            }

            ParseError::UnmatchedParenthesis { .. } | ParseError::BranchWithoutAtom { .. } => {
                self.add("Check that every '(' has a matching ')' after an atom");
            }

            ParseError::UnclosedRing { .. }
            | ParseError::InvalidRingClosure { .. }
            | ParseError::RingBondConflict { .. } => {
                self.add("Ring closure digits must appear in pairs on different atoms");
                self.add("Use %nn for ring labels above 9");
            }

            ParseError::Valence { .. } => {
                self.add("An atom has more bonds than its element allows");
                self.add("Charged atoms need brackets, e.g. [N+] or [O-]");
            }

            ParseError::AromaticOutsideRing { .. } => {
                self.add("Lowercase aromatic atoms must be part of a ring");
            }

            ParseError::EmptyComponent { .. } => {
                self.add("Every '.' must separate two non-empty fragments");
            }

            ParseError::UnexpectedChar { .. } | ParseError::DanglingBond { .. } => {
                self.add("Quote the SMILES in the shell so characters such as ( or # survive");
                self.add("Stereo and isotope marks are accepted but must be well formed");
            }
        }
    }

    fn collect_embed_hints(&mut self, err: &Error) {
        use conformer_forge::EmbedError;

        let Some(embed_err) = find::<EmbedError>(err) else {
            return;
        };

        self.mark_typed();

        match embed_err {
            EmbedError::EmptyMolecule => {
                self.add("The molecule has no atoms to place");
            }

            EmbedError::InconsistentBounds { .. } => {
                self.add("Distance constraints contradict each other");
                self.add("Strained or unusual ring systems can cause this");
            }

            EmbedError::DegenerateMetric { .. }
            | EmbedError::NotConverged { .. }
            | EmbedError::NonFinite => {
                self.add("Try another --seed or method");
                self.add("Raise --max-attempts or --max-iterations");
            }

            EmbedError::MissingParameters { force_field, .. } => {
                self.add(format!("{} has no parameters for an atom of this molecule", force_field));
                self.add("Use a method without force-field relaxation (etdg, kdg, etkdgv1, etkdgv2)");
            }

            EmbedError::Charges(_) => {
                self.add("Partial charges are needed by the MMFF-style relaxation");
                self.add("Use -m uff or a method without relaxation");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The file may be truncated or incomplete");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
