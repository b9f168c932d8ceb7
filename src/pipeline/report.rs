use crate::embed::EmbeddingMethod;
use crate::smiles::ParseError;
use std::path::PathBuf;

/// A row whose SMILES could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// Zero-based data row index.
    pub row: usize,
    pub smiles: String,
    pub error: ParseError,
}

/// Trial outcomes of one method over all molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodTally {
    pub method: EmbeddingMethod,
    pub succeeded: usize,
    pub failed: usize,
}

impl MethodTally {
    pub fn new(method: EmbeddingMethod) -> Self {
        Self {
            method,
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Percentage of `parsed` among `total`; 0 for an empty input.
pub fn completeness(parsed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        parsed as f64 * 100.0 / total as f64
    }
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Data rows read from the input.
    pub records: usize,
    /// Rows whose SMILES parsed and that appear in the output.
    pub parsed: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub methods: Vec<MethodTally>,
    /// Output rows for which no method produced a single conformer.
    pub unembedded: usize,
    /// Descriptor cells written as missing.
    pub missing_cells: usize,
    pub columns: usize,
    pub output: Option<PathBuf>,
}

impl PipelineReport {
    pub fn excluded(&self) -> usize {
        self.parse_failures.len()
    }

    /// Parsed records as a percentage of all records.
    pub fn completeness(&self) -> f64 {
        completeness(self.parsed, self.records)
    }

    pub fn total_failed_trials(&self) -> usize {
        self.methods.iter().map(|t| t.failed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_is_a_percentage() {
        assert_eq!(completeness(94, 100), 94.0);
        assert!((completeness(2, 3) - 66.6667).abs() < 1e-3);
        assert_eq!(completeness(0, 0), 0.0);
    }

    #[test]
    fn tallies_sum_failures() {
        let mut uff = MethodTally::new(EmbeddingMethod::Uff);
        uff.succeeded = 8;
        uff.failed = 2;
        let report = PipelineReport {
            records: 5,
            parsed: 4,
            parse_failures: vec![ParseFailure {
                row: 3,
                smiles: "C1CC".into(),
                error: ParseError::UnclosedRing { label: 1 },
            }],
            methods: vec![uff, MethodTally::new(EmbeddingMethod::Kdg)],
            unembedded: 0,
            missing_cells: 0,
            columns: 10,
            output: None,
        };
        assert_eq!(uff.attempted(), 10);
        assert_eq!(report.excluded(), 1);
        assert_eq!(report.total_failed_trials(), 2);
        assert_eq!(report.completeness(), 80.0);
    }
}
