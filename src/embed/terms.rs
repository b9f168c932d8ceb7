//! Energy terms over flattened Cartesian coordinates.
//!
//! Coordinates are stored as `[x0, y0, z0, x1, y1, z1, ...]`. Every term
//! adds its energy to the total and its analytic gradient into the shared
//! gradient buffer, so a [`TermSet`] can be handed directly to the
//! minimizer.

use super::optimize::Objective;
use nalgebra::Vector3;
use serde::Deserialize;

/// Conversion from the MMFF stretch constant to kcal/mol/Å².
const MMFF_STRETCH_UNITS: f64 = 143.9325;
const MMFF_STRETCH_CUBIC: f64 = -2.0;
/// Conversion from the MMFF bend constant to kcal/mol/deg².
const MMFF_BEND_UNITS: f64 = 0.043844;
const MMFF_BEND_CUBIC: f64 = -0.006981;
const COULOMB_BUFFER: f64 = 0.05;
const MIN_LENGTH: f64 = 1e-8;

/// One cosine term `v * (1 + sign * cos(n * phi))`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FourierTerm {
    pub n: u8,
    pub v: f64,
    pub sign: f64,
}

impl FourierTerm {
    pub fn new(n: u8, v: f64, sign: f64) -> Self {
        Self { n, v, sign }
    }

    /// Energy and its derivative with respect to `cos(phi)`.
    fn evaluate(&self, cos_phi: f64) -> (f64, f64) {
        let (t, dt) = chebyshev(self.n, cos_phi);
        (
            self.v * (1.0 + self.sign * t),
            self.v * self.sign * dt,
        )
    }
}

/// `T_n(c)` and `dT_n/dc`, so that `cos(n phi)` can be written in `cos(phi)`.
fn chebyshev(n: u8, c: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    // T_n(c) and U_{n-1}(c) by recurrence; dT_n/dc = n U_{n-1}.
    let (mut t_prev, mut t) = (1.0, c);
    let (mut u_prev, mut u) = (0.0, 1.0);
    for _ in 1..n {
        let t_next = 2.0 * c * t - t_prev;
        let u_next = 2.0 * c * u - u_prev;
        t_prev = t;
        t = t_next;
        u_prev = u;
        u = u_next;
    }
    (t, f64::from(n) * u)
}

#[inline]
fn position(x: &[f64], i: usize) -> Vector3<f64> {
    Vector3::new(x[3 * i], x[3 * i + 1], x[3 * i + 2])
}

#[inline]
fn accumulate(grad: &mut [f64], i: usize, v: &Vector3<f64>) {
    grad[3 * i] += v[0];
    grad[3 * i + 1] += v[1];
    grad[3 * i + 2] += v[2];
}

#[derive(Debug, Clone, PartialEq)]
pub enum BondTerm {
    /// `k / 2 * (r - r0)^2`.
    Harmonic { i: usize, j: usize, k: f64, r0: f64 },
    /// MMFF quartic stretch.
    Quartic { i: usize, j: usize, kb: f64, r0: f64 },
}

impl BondTerm {
    fn atoms(&self) -> (usize, usize) {
        match *self {
            BondTerm::Harmonic { i, j, .. } | BondTerm::Quartic { i, j, .. } => (i, j),
        }
    }

    /// Energy and derivative with respect to the bond length.
    fn energy(&self, r: f64) -> (f64, f64) {
        match *self {
            BondTerm::Harmonic { k, r0, .. } => {
                let d = r - r0;
                (0.5 * k * d * d, k * d)
            }
            BondTerm::Quartic { kb, r0, .. } => {
                let c = MMFF_STRETCH_UNITS * kb / 2.0;
                let cs = MMFF_STRETCH_CUBIC;
                let q = 7.0 / 12.0 * cs * cs;
                let d = r - r0;
                let d2 = d * d;
                (
                    c * d2 * (1.0 + cs * d + q * d2),
                    c * d * (2.0 + 3.0 * cs * d + 4.0 * q * d2),
                )
            }
        }
    }

    fn accumulate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        let (i, j) = self.atoms();
        let rij = position(x, i) - position(x, j);
        let r = rij.norm();
        let (e, de_dr) = self.energy(r);
        if r > MIN_LENGTH {
            let g = rij * (de_dr / r);
            accumulate(grad, i, &g);
            accumulate(grad, j, &-g);
        }
        e
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AngleTerm {
    /// UFF cosine expansion `k * (c0 + c1 cos θ + c2 cos 2θ)`.
    Fourier {
        i: usize,
        j: usize,
        k: usize,
        k_force: f64,
        c0: f64,
        c1: f64,
        c2: f64,
    },
    /// Linear centre, `k * (1 + cos θ)`.
    Linear {
        i: usize,
        j: usize,
        k: usize,
        k_force: f64,
    },
    /// MMFF cubic bend around `theta0` (degrees).
    Cubic {
        i: usize,
        j: usize,
        k: usize,
        ka: f64,
        theta0: f64,
    },
}

impl AngleTerm {
    fn atoms(&self) -> (usize, usize, usize) {
        match *self {
            AngleTerm::Fourier { i, j, k, .. }
            | AngleTerm::Linear { i, j, k, .. }
            | AngleTerm::Cubic { i, j, k, .. } => (i, j, k),
        }
    }

    /// Energy and derivative with respect to `cos θ`.
    fn energy(&self, c: f64) -> (f64, f64) {
        match *self {
            AngleTerm::Fourier {
                k_force, c0, c1, c2, ..
            } => (
                k_force * (c0 + c1 * c + c2 * (2.0 * c * c - 1.0)),
                k_force * (c1 + 4.0 * c2 * c),
            ),
            AngleTerm::Linear { k_force, .. } => (k_force * (1.0 + c), k_force),
            AngleTerm::Cubic { ka, theta0, .. } => {
                let theta = c.acos();
                let d = theta.to_degrees() - theta0;
                let pref = MMFF_BEND_UNITS * ka / 2.0;
                let e = pref * d * d * (1.0 + MMFF_BEND_CUBIC * d);
                let de_dtheta =
                    pref * d * (2.0 + 3.0 * MMFF_BEND_CUBIC * d) * 180.0 / std::f64::consts::PI;
                let sin = theta.sin().max(MIN_LENGTH);
                (e, -de_dtheta / sin)
            }
        }
    }

    fn accumulate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        let (i, j, k) = self.atoms();
        let pj = position(x, j);
        let u = position(x, i) - pj;
        let v = position(x, k) - pj;
        let (lu, lv) = (u.norm(), v.norm());
        if lu < MIN_LENGTH || lv < MIN_LENGTH {
            return self.energy(1.0).0;
        }
        let c = (u.dot(&v) / (lu * lv)).clamp(-1.0, 1.0);
        let (e, de_dc) = self.energy(c);

        let inv = 1.0 / (lu * lv);
        let gi = (v * inv - u * (c / (lu * lu))) * de_dc;
        let gk = (u * inv - v * (c / (lv * lv))) * de_dc;
        accumulate(grad, i, &gi);
        accumulate(grad, k, &gk);
        accumulate(grad, j, &-(gi + gk));
        e
    }
}

/// A dihedral `i-j-k-l` carrying a small Fourier series.
#[derive(Debug, Clone, PartialEq)]
pub struct TorsionTerm {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
    pub terms: Vec<FourierTerm>,
}

impl TorsionTerm {
    fn accumulate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        let (p1, p2, p3, p4) = (
            position(x, self.i),
            position(x, self.j),
            position(x, self.k),
            position(x, self.l),
        );
        let r1 = p1 - p2;
        let r2 = p3 - p2;
        let r3 = p2 - p3;
        let r4 = p4 - p3;
        let t1 = r1.cross(&r2);
        let t2 = r3.cross(&r4);
        let (d1, d2) = (t1.norm(), t2.norm());
        if d1 < MIN_LENGTH || d2 < MIN_LENGTH {
            // Collinear atoms: the dihedral is undefined, take the cis value.
            return self.terms.iter().map(|t| t.evaluate(1.0).0).sum();
        }
        let n1 = t1 / d1;
        let n2 = t2 / d2;
        let c = n1.dot(&n2).clamp(-1.0, 1.0);

        let (mut e, mut de_dc) = (0.0, 0.0);
        for term in &self.terms {
            let (te, td) = term.evaluate(c);
            e += te;
            de_dc += td;
        }

        let a = (n2 - n1 * c) / d1;
        let b = (n1 - n2 * c) / d2;
        let g_r1 = r2.cross(&a);
        let g_r2 = a.cross(&r1);
        let g_r3 = r4.cross(&b);
        let g_r4 = b.cross(&r3);

        accumulate(grad, self.i, &(g_r1 * de_dc));
        accumulate(grad, self.j, &((g_r3 - g_r1 - g_r2) * de_dc));
        accumulate(grad, self.k, &((g_r2 - g_r3 - g_r4) * de_dc));
        accumulate(grad, self.l, &(g_r4 * de_dc));
        e
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairTerm {
    /// UFF 12-6 `d * ((x/r)^12 - 2 (x/r)^6)`.
    LennardJones { i: usize, j: usize, x: f64, d: f64 },
    /// MMFF buffered 14-7.
    Buffered147 {
        i: usize,
        j: usize,
        r_star: f64,
        eps: f64,
    },
    /// Buffered Coulomb `qq / (r + 0.05)`; `qq` already carries the unit
    /// conversion and any 1-4 scaling.
    Coulomb { i: usize, j: usize, qq: f64 },
    /// Flat-bottomed penalty on the squared distance, zero inside the bounds.
    DistanceBounds {
        i: usize,
        j: usize,
        lower: f64,
        upper: f64,
        weight: f64,
    },
}

impl PairTerm {
    fn atoms(&self) -> (usize, usize) {
        match *self {
            PairTerm::LennardJones { i, j, .. }
            | PairTerm::Buffered147 { i, j, .. }
            | PairTerm::Coulomb { i, j, .. }
            | PairTerm::DistanceBounds { i, j, .. } => (i, j),
        }
    }

    /// Energy and derivative with respect to the squared distance.
    fn energy(&self, d2: f64) -> (f64, f64) {
        match *self {
            PairTerm::DistanceBounds {
                lower,
                upper,
                weight,
                ..
            } => {
                let (l2, u2) = (lower * lower, upper * upper);
                if d2 > u2 {
                    let t = d2 / u2 - 1.0;
                    (weight * t * t, weight * 2.0 * t / u2)
                } else if d2 < l2 {
                    let s = l2 + d2;
                    let t = 2.0 * l2 / s - 1.0;
                    (weight * t * t, weight * 2.0 * t * (-2.0 * l2 / (s * s)))
                } else {
                    (0.0, 0.0)
                }
            }
            _ => {
                let r = d2.sqrt().max(MIN_LENGTH);
                let (e, de_dr) = self.radial_energy(r);
                (e, de_dr / (2.0 * r))
            }
        }
    }

    fn radial_energy(&self, r: f64) -> (f64, f64) {
        match *self {
            PairTerm::LennardJones { x, d, .. } => {
                let s6 = (x / r).powi(6);
                let s12 = s6 * s6;
                (d * (s12 - 2.0 * s6), 12.0 * d / r * (s6 - s12))
            }
            PairTerm::Buffered147 { r_star, eps, .. } => {
                let shifted = r + 0.07 * r_star;
                let f = (1.07 * r_star / shifted).powi(7);
                let rs7 = r_star.powi(7);
                let denom = r.powi(7) + 0.12 * rs7;
                let g = 1.12 * rs7 / denom - 2.0;
                let df = -7.0 * f / shifted;
                let dg = -1.12 * rs7 * 7.0 * r.powi(6) / (denom * denom);
                (eps * f * g, eps * (df * g + f * dg))
            }
            PairTerm::Coulomb { qq, .. } => {
                let s = r + COULOMB_BUFFER;
                (qq / s, -qq / (s * s))
            }
            PairTerm::DistanceBounds { .. } => (0.0, 0.0),
        }
    }

    fn accumulate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        let (i, j) = self.atoms();
        let rij = position(x, i) - position(x, j);
        let (e, de_dd2) = self.energy(rij.norm_squared());
        if de_dd2 != 0.0 {
            let g = rij * (2.0 * de_dd2);
            accumulate(grad, i, &g);
            accumulate(grad, j, &-g);
        }
        e
    }
}

/// A complete objective: the sum of every term it holds.
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    pub atom_count: usize,
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub torsions: Vec<TorsionTerm>,
    pub pairs: Vec<PairTerm>,
}

impl TermSet {
    pub fn new(atom_count: usize) -> Self {
        Self {
            atom_count,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
            && self.angles.is_empty()
            && self.torsions.is_empty()
            && self.pairs.is_empty()
    }

    pub fn extend(&mut self, other: TermSet) {
        self.bonds.extend(other.bonds);
        self.angles.extend(other.angles);
        self.torsions.extend(other.torsions);
        self.pairs.extend(other.pairs);
    }
}

impl Objective for TermSet {
    fn dimension(&self) -> usize {
        3 * self.atom_count
    }

    fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        grad.iter_mut().for_each(|g| *g = 0.0);
        let mut energy = 0.0;
        for term in &self.bonds {
            energy += term.accumulate(x, grad);
        }
        for term in &self.angles {
            energy += term.accumulate(x, grad);
        }
        for term in &self.torsions {
            energy += term.accumulate(x, grad);
        }
        for term in &self.pairs {
            energy += term.accumulate(x, grad);
        }
        energy
    }
}
