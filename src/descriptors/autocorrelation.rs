//! Topological autocorrelation of atomic weights over the
//! hydrogen-complete graph.
//!
//! - `ATS{d}{w}` Moreau–Broto, `Σ w_i w_j` over pairs at distance `d`
//! - `AATS{d}{w}` the same averaged over those pairs
//! - `ATSC{d}{w}` centred Moreau–Broto, on `w - mean w`
//! - `AATSC{d}{w}` the centred sum averaged over pairs
//! - `MATS{d}{w}` Moran coefficient
//! - `GATS{d}{w}` Geary coefficient
//!
//! Partial charges only enter the centred families.

use super::graph::{full_adjacency, shortest_paths};
use super::properties::{AtomEnvironment, AtomWeight, AtomicProperty};
use crate::model::molecule::Molecule;
use std::ops::RangeInclusive;

pub const MAX_LAG: usize = 8;

pub const WEIGHTS: [AtomWeight; 9] = [
    AtomWeight::Element(AtomicProperty::Mass),
    AtomWeight::Element(AtomicProperty::VdwVolume),
    AtomWeight::Element(AtomicProperty::Sanderson),
    AtomWeight::Element(AtomicProperty::Pauling),
    AtomWeight::Element(AtomicProperty::Polarizability),
    AtomWeight::Element(AtomicProperty::AtomicNumber),
    AtomWeight::Sigma,
    AtomWeight::Valence,
    AtomWeight::State,
];

/// Charge first, then every entry of [`WEIGHTS`].
fn centred_weights() -> impl Iterator<Item = AtomWeight> {
    std::iter::once(AtomWeight::Charge).chain(WEIGHTS)
}

pub fn names(out: &mut Vec<String>) {
    for prefix in ["ATS", "AATS"] {
        for weight in WEIGHTS {
            for lag in 0..=MAX_LAG {
                out.push(format!("{prefix}{lag}{}", weight.suffix()));
            }
        }
    }
    for prefix in ["ATSC", "AATSC"] {
        for weight in centred_weights() {
            for lag in 0..=MAX_LAG {
                out.push(format!("{prefix}{lag}{}", weight.suffix()));
            }
        }
    }
    for prefix in ["MATS", "GATS"] {
        for weight in centred_weights() {
            for lag in 1..=MAX_LAG {
                out.push(format!("{prefix}{lag}{}", weight.suffix()));
            }
        }
    }
}

/// Per-lag sums for one weighting.
struct LagSums {
    pairs: [usize; MAX_LAG + 1],
    product: [f64; MAX_LAG + 1],
    centred: [f64; MAX_LAG + 1],
    geary: [f64; MAX_LAG + 1],
    variance: f64,
    n: usize,
}

impl LagSums {
    fn new(w: &[f64], distances: &[Vec<usize>]) -> Self {
        let n = w.len();
        let mean = w.iter().sum::<f64>() / n.max(1) as f64;
        let variance = w.iter().map(|v| (v - mean).powi(2)).sum();
        let mut sums = Self {
            pairs: [0; MAX_LAG + 1],
            product: [0.0; MAX_LAG + 1],
            centred: [0.0; MAX_LAG + 1],
            geary: [0.0; MAX_LAG + 1],
            variance,
            n,
        };

        sums.pairs[0] = n;
        sums.product[0] = w.iter().map(|v| v * v).sum();
        sums.centred[0] = variance;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distances[i][j];
                if d == 0 || d > MAX_LAG {
                    continue;
                }
                sums.pairs[d] += 1;
                sums.product[d] += w[i] * w[j];
                sums.centred[d] += (w[i] - mean) * (w[j] - mean);
                sums.geary[d] += (w[i] - w[j]).powi(2);
            }
        }
        sums
    }

    fn per_pair(&self, total: f64, lag: usize) -> f64 {
        if self.pairs[lag] == 0 {
            f64::NAN
        } else {
            total / self.pairs[lag] as f64
        }
    }

    fn moran(&self, lag: usize) -> f64 {
        if self.pairs[lag] == 0 || self.variance == 0.0 {
            return f64::NAN;
        }
        (self.centred[lag] / self.pairs[lag] as f64) / (self.variance / self.n as f64)
    }

    fn geary(&self, lag: usize) -> f64 {
        if self.pairs[lag] == 0 || self.variance == 0.0 || self.n < 2 {
            return f64::NAN;
        }
        (self.geary[lag] / (2.0 * self.pairs[lag] as f64)) / (self.variance / (self.n - 1) as f64)
    }
}

/// Pushes `count` values per weighting, or missing values for a
/// weighting that could not be computed.
fn emit(
    sums: &[Option<LagSums>],
    lags: RangeInclusive<usize>,
    out: &mut Vec<f64>,
    f: impl Fn(&LagSums, usize) -> f64,
) {
    for s in sums {
        match s {
            Some(s) => out.extend(lags.clone().map(|lag| f(s, lag))),
            None => out.extend(std::iter::repeat_n(f64::NAN, lags.clone().count())),
        }
    }
}

/// `molecule` must be hydrogen-complete; `charges` are its Gasteiger
/// charges when available.
pub fn evaluate(molecule: &Molecule, charges: Option<&[f64]>, out: &mut Vec<f64>) {
    let distances = shortest_paths(&full_adjacency(molecule));
    let atoms = AtomEnvironment::of_molecule(molecule);
    let lag_sums = |weight: AtomWeight| {
        weight
            .values(&atoms, charges)
            .map(|w| LagSums::new(&w, &distances))
    };
    let plain: Vec<Option<LagSums>> = WEIGHTS.into_iter().map(lag_sums).collect();
    let centred: Vec<Option<LagSums>> = centred_weights().map(lag_sums).collect();

    emit(&plain, 0..=MAX_LAG, out, |s, lag| s.product[lag]);
    emit(&plain, 0..=MAX_LAG, out, |s, lag| s.per_pair(s.product[lag], lag));
    emit(&centred, 0..=MAX_LAG, out, |s, lag| s.centred[lag]);
    emit(&centred, 0..=MAX_LAG, out, |s, lag| s.per_pair(s.centred[lag], lag));
    emit(&centred, 1..=MAX_LAG, out, LagSums::moran);
    emit(&centred, 1..=MAX_LAG, out, LagSums::geary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charge::gasteiger_charges;
    use crate::model::types::Element;
    use crate::smiles::parse_smiles;

    fn compute(smiles: &str) -> Vec<(String, f64)> {
        let mol = parse_smiles(smiles).unwrap().with_explicit_hydrogens();
        let charges = gasteiger_charges(&mol).ok();
        let mut names_out = Vec::new();
        names(&mut names_out);
        let mut values = Vec::new();
        evaluate(&mol, charges.as_deref(), &mut values);
        assert_eq!(names_out.len(), values.len());
        names_out.into_iter().zip(values).collect()
    }

    fn value(results: &[(String, f64)], name: &str) -> f64 {
        results.iter().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap()
    }

    #[test]
    fn catalogue_size() {
        let mut out = Vec::new();
        names(&mut out);
        assert_eq!(out.len(), 9 * (9 + 9) + 10 * (9 + 9 + 8 + 8));
        assert!(out.contains(&"ATS0m".to_string()));
        assert!(out.contains(&"GATS8pe".to_string()));
        assert!(out.contains(&"ATSC0c".to_string()));
        assert!(out.contains(&"MATS1s".to_string()));
        assert!(!out.contains(&"ATS1c".to_string()));
    }

    #[test]
    fn moreau_broto_of_hydrogen_molecule() {
        let r = compute("[H][H]");
        let h = Element::H.atomic_mass();
        assert!((value(&r, "ATS0m") - 2.0 * h * h).abs() < 1e-9);
        assert!((value(&r, "ATS1m") - h * h).abs() < 1e-9);
        assert!((value(&r, "AATS1m") - h * h).abs() < 1e-9);
        assert_eq!(value(&r, "ATS2m"), 0.0);
        assert!(value(&r, "AATS2m").is_nan());
        // Identical atoms have no variance.
        assert!(value(&r, "MATS1m").is_nan());
    }

    #[test]
    fn methane_lags() {
        let r = compute("C");
        let (c, h) = (Element::C.atomic_mass(), Element::H.atomic_mass());
        assert!((value(&r, "ATS1m") - 4.0 * c * h).abs() < 1e-9);
        assert!((value(&r, "ATS2m") - 6.0 * h * h).abs() < 1e-9);
        // Carbon-hydrogen pairs at lag 1 anti-correlate.
        assert!(value(&r, "MATS1m") < 0.0);
        assert!(value(&r, "GATS1m") > 1.0);
    }

    #[test]
    fn graph_weightings_of_methane() {
        let r = compute("C");
        // Six protons around carbon, four carbon-hydrogen pairs.
        assert!((value(&r, "ATS1Z") - 24.0).abs() < 1e-9);
        // Only the hydrogens have a heavy neighbour.
        assert!((value(&r, "ATS0d") - 4.0).abs() < 1e-9);
        assert_eq!(value(&r, "ATS1d"), 0.0);
        assert!(value(&r, "ATS2s") > 0.0);
    }

    #[test]
    fn centred_sums() {
        let r = compute("[H][H]");
        assert_eq!(value(&r, "ATSC0m"), 0.0);
        assert_eq!(value(&r, "ATSC1m"), 0.0);

        let r = compute("CO");
        assert!(value(&r, "ATSC0c") > 0.0);
        // The polar bond pairs opposite charges.
        assert!(value(&r, "ATSC1c") < 0.0);
        assert!((value(&r, "AATSC0m") - value(&r, "ATSC0m") / 6.0).abs() < 1e-9);
    }

    #[test]
    fn missing_charges_only_blank_the_charge_families() {
        let r = compute("C[Se]C");
        assert!(value(&r, "ATSC1c").is_nan());
        assert!(value(&r, "MATS1c").is_nan());
        assert!(value(&r, "ATSC1m").is_finite());
        assert!(value(&r, "MATS1m").is_finite());
    }
}
