//! 3D-MoRSE: molecule representation of structures based on electron
//! diffraction.
//!
//! `Mor{k}{w}` is `Σ_{i<j} w_i w_j sin(s r_ij) / (s r_ij)` with scattering
//! parameter `s = k - 1` Å⁻¹, `k = 1..=32`. Weights are carbon-relative.

use super::properties::AtomicProperty;
use crate::math::distance;
use crate::model::types::Element;

pub const SCATTERING_STEPS: usize = 32;

/// Weightings in catalogue order; `None` is the unweighted variant.
pub const WEIGHTS: [Option<AtomicProperty>; 5] = [
    None,
    Some(AtomicProperty::Mass),
    Some(AtomicProperty::VdwVolume),
    Some(AtomicProperty::Sanderson),
    Some(AtomicProperty::Polarizability),
];

pub fn names(out: &mut Vec<String>) {
    for weight in WEIGHTS {
        let suffix = weight.map_or("", |w| w.suffix());
        for k in 1..=SCATTERING_STEPS {
            out.push(format!("Mor{k:02}{suffix}"));
        }
    }
}

pub fn evaluate(positions: &[[f64; 3]], elements: &[Element], out: &mut Vec<f64>) {
    let n = positions.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j, distance(&positions[i], &positions[j])));
        }
    }

    for weight in WEIGHTS {
        let w: Vec<f64> = elements
            .iter()
            .map(|&e| weight.map_or(1.0, |p| p.relative(e)))
            .collect();
        for k in 0..SCATTERING_STEPS {
            let s = k as f64;
            let sum: f64 = pairs
                .iter()
                .map(|&(i, j, r)| w[i] * w[j] * sinc(s * r))
                .sum();
            out.push(sum);
        }
    }
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 { 1.0 } else { x.sin() / x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_160_entries() {
        let mut out = Vec::new();
        names(&mut out);
        assert_eq!(out.len(), 160);
        assert_eq!(out[0], "Mor01");
        assert_eq!(out[31], "Mor32");
        assert_eq!(out[32], "Mor01m");
        assert_eq!(out[159], "Mor32p");
    }

    #[test]
    fn first_term_counts_pairs() {
        let positions = [[0.0; 3], [1.5, 0.0, 0.0], [0.0, 1.5, 0.0]];
        let elements = [Element::C, Element::C, Element::C];
        let mut out = Vec::new();
        evaluate(&positions, &elements, &mut out);
        assert_eq!(out.len(), 160);
        assert!((out[0] - 3.0).abs() < 1e-12);
        // Carbon-relative weights leave an all-carbon molecule unchanged.
        assert!((out[32] - out[0]).abs() < 1e-12);
        let r = 1.5f64;
        assert!((out[1] - 2.0 * r.sin() / r - (2f64.sqrt() * r).sin() / (2f64.sqrt() * r)).abs() < 1e-12);
    }

    #[test]
    fn single_atom_gives_zeros() {
        let mut out = Vec::new();
        evaluate(&[[0.0; 3]], &[Element::O], &mut out);
        assert!(out.iter().all(|&v| v == 0.0));
    }
}
