//! Charged partial surface area descriptors.
//!
//! Atomic accessible areas are combined with Gasteiger charges. Atoms with
//! `|q| < 0.2` count as hydrophobic, the rest as polar.
//!
//! The five versions of each partial surface are: the bare area (1), the
//! area times the total charge of that sign (2), the charge-weighted area
//! (3), and version 2 divided by the atom count (4) or by the count of
//! atoms of that sign (5).

const POLAR_CHARGE: f64 = 0.2;
const VERSIONS: usize = 5;

const FAMILIES: [&str; 7] = ["PNSA", "PPSA", "DPSA", "FNSA", "FPSA", "WNSA", "WPSA"];
const SCALARS: [&str; 6] = ["RNCS", "RPCS", "TASA", "TPSA", "RASA", "RPSA"];

pub fn names(out: &mut Vec<String>) {
    for family in FAMILIES {
        for k in 1..=VERSIONS {
            out.push(format!("{family}{k}"));
        }
    }
    out.extend(SCALARS.iter().map(|s| s.to_string()));
}

pub fn count() -> usize {
    FAMILIES.len() * VERSIONS + SCALARS.len()
}

/// Pushes every CPSA value; all are NaN when `charges` is unavailable.
pub fn evaluate(areas: &[f64], charges: Option<&[f64]>, out: &mut Vec<f64>) {
    let Some(charges) = charges else {
        out.extend(std::iter::repeat_n(f64::NAN, count()));
        return;
    };

    let total_area: f64 = areas.iter().sum();
    let mut negative = PartialSurface::default();
    let mut positive = PartialSurface::default();
    let mut hydrophobic = 0.0;
    let mut polar = 0.0;

    for (&a, &q) in areas.iter().zip(charges) {
        if q < 0.0 {
            negative.add(a, q);
        } else if q > 0.0 {
            positive.add(a, q);
        }
        if q.abs() < POLAR_CHARGE {
            hydrophobic += a;
        } else {
            polar += a;
        }
    }
    let charge_neg = negative.charge;
    let charge_pos = positive.charge;

    let pnsa = negative.versions(areas.len());
    let ppsa = positive.versions(areas.len());
    let dpsa: [f64; VERSIONS] = std::array::from_fn(|k| ppsa[k] - pnsa[k]);
    let fnsa = pnsa.map(|v| v / total_area);
    let fpsa = ppsa.map(|v| v / total_area);
    let wnsa = pnsa.map(|v| v * total_area / 1000.0);
    let wpsa = ppsa.map(|v| v * total_area / 1000.0);
    for family in [pnsa, ppsa, dpsa, fnsa, fpsa, wnsa, wpsa] {
        out.extend(family);
    }

    out.push(relative_charge_surface(areas, charges, charge_neg, |a, b| a < b));
    out.push(relative_charge_surface(areas, charges, charge_pos, |a, b| a > b));
    out.push(hydrophobic);
    out.push(polar);
    out.push(hydrophobic / total_area);
    out.push(polar / total_area);
}

/// Running sums over the atoms of one charge sign.
#[derive(Debug, Default)]
struct PartialSurface {
    area: f64,
    charge: f64,
    weighted: f64,
    atoms: usize,
}

impl PartialSurface {
    fn add(&mut self, area: f64, charge: f64) {
        self.area += area;
        self.charge += charge;
        self.weighted += area * charge;
        self.atoms += 1;
    }

    fn versions(&self, atom_count: usize) -> [f64; VERSIONS] {
        let total_weighted = self.charge * self.area;
        let per_signed = if self.atoms == 0 {
            0.0
        } else {
            total_weighted / self.atoms as f64
        };
        [
            self.area,
            total_weighted,
            self.weighted,
            total_weighted / atom_count as f64,
            per_signed,
        ]
    }
}

/// Area of the most extreme atom divided by its relative charge.
fn relative_charge_surface(
    areas: &[f64],
    charges: &[f64],
    total: f64,
    more_extreme: impl Fn(f64, f64) -> bool,
) -> f64 {
    let Some(extreme) = (0..charges.len()).reduce(|best, i| {
        if more_extreme(charges[i], charges[best]) {
            i
        } else {
            best
        }
    }) else {
        return f64::NAN;
    };
    let relative = charges[extreme] / total;
    if relative == 0.0 || !relative.is_finite() {
        return f64::NAN;
    }
    areas[extreme] / relative
}
