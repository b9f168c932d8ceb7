//! Summary statistics of a descriptor's distribution across trials.

use std::fmt;

/// The seven reported statistics, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Mean,
    Std,
    Min,
    Q25,
    Median,
    Q75,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Median,
        Statistic::Q75,
        Statistic::Max,
    ];

    /// Label used in column names.
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Q25 => "25%",
            Statistic::Median => "50%",
            Statistic::Q75 => "75%",
            Statistic::Max => "max",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column name of one statistic of one descriptor under one method.
pub fn column_name(descriptor: &str, stat: Statistic, method: impl fmt::Display) -> String {
    format!("{descriptor}_{stat}_{method}")
}

/// Mean, sample standard deviation and five-number summary.
///
/// Every field is `None` for an empty sample; `std` is also `None` for a
/// single value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryStats {
    /// Summarises the finite entries of `values`; others are ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n >= 2).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Self {
            count: n,
            mean: Some(mean),
            std,
            min: Some(sorted[0]),
            q25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            q75: Some(quantile(&sorted, 0.75)),
            max: Some(sorted[n - 1]),
        }
    }

    pub fn get(&self, stat: Statistic) -> Option<f64> {
        match stat {
            Statistic::Mean => self.mean,
            Statistic::Std => self.std,
            Statistic::Min => self.min,
            Statistic::Q25 => self.q25,
            Statistic::Median => self.median,
            Statistic::Q75 => self.q75,
            Statistic::Max => self.max,
        }
    }

    /// The seven statistics in column order.
    pub fn values(&self) -> [Option<f64>; 7] {
        Statistic::ALL.map(|s| self.get(s))
    }
}

/// Linear interpolation between closest ranks, `h = (n - 1) p`.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
