use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(String);

/// Chemical elements recognised by the SMILES reader.
///
/// The discriminant is the atomic number. The set covers the organic subset,
/// the alkali and alkaline-earth counter-ions, the common transition and
/// post-transition metals, gadolinium and uranium. Noble gases and the
/// remaining lanthanides and actinides are not tabulated and read as unknown
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Rb = 37,
    Sr = 38,
    Zr = 40,
    Mo = 42,
    Ru = 44,
    Rh = 45,
    Pd = 46,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Sb = 51,
    Te = 52,
    I = 53,
    Cs = 55,
    Ba = 56,
    Gd = 64,
    W = 74,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
    U = 92,
}

/// Tabulated per-element properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementProps {
    pub symbol: &'static str,
    /// Standard atomic weight (g/mol).
    pub mass: f64,
    /// Single-bond covalent radius (Å).
    pub covalent_radius: f64,
    /// Bondi van der Waals radius (Å).
    pub vdw_radius: f64,
    /// Sanderson electronegativity.
    pub sanderson: f64,
    /// Pauling electronegativity.
    pub pauling: f64,
    /// Atomic polarizability (Å³).
    pub polarizability: f64,
    /// Number of valence electrons.
    pub valence_electrons: u8,
}

const fn props(
    symbol: &'static str,
    mass: f64,
    covalent_radius: f64,
    vdw_radius: f64,
    sanderson: f64,
    pauling: f64,
    polarizability: f64,
    valence_electrons: u8,
) -> ElementProps {
    ElementProps {
        symbol,
        mass,
        covalent_radius,
        vdw_radius,
        sanderson,
        pauling,
        polarizability,
        valence_electrons,
    }
}

impl Element {
    pub const ALL: [Element; 56] = [
        Element::H,
        Element::Li,
        Element::Be,
        Element::B,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::Na,
        Element::Mg,
        Element::Al,
        Element::Si,
        Element::P,
        Element::S,
        Element::Cl,
        Element::K,
        Element::Ca,
        Element::Ti,
        Element::V,
        Element::Cr,
        Element::Mn,
        Element::Fe,
        Element::Co,
        Element::Ni,
        Element::Cu,
        Element::Zn,
        Element::Ga,
        Element::Ge,
        Element::As,
        Element::Se,
        Element::Br,
        Element::Rb,
        Element::Sr,
        Element::Zr,
        Element::Mo,
        Element::Ru,
        Element::Rh,
        Element::Pd,
        Element::Ag,
        Element::Cd,
        Element::In,
        Element::Sn,
        Element::Sb,
        Element::Te,
        Element::I,
        Element::Cs,
        Element::Ba,
        Element::Gd,
        Element::W,
        Element::Pt,
        Element::Au,
        Element::Hg,
        Element::Tl,
        Element::Pb,
        Element::Bi,
        Element::U,
    ];

    pub const fn props(&self) -> ElementProps {
        match self {
            Element::H => props("H", 1.008, 0.31, 1.20, 2.592, 2.20, 0.667, 1),
            Element::Li => props("Li", 6.94, 1.28, 1.82, 0.670, 0.98, 24.3, 1),
            Element::Be => props("Be", 9.0122, 0.96, 1.53, 1.810, 1.57, 5.6, 2),
            Element::B => props("B", 10.81, 0.84, 1.92, 2.275, 2.04, 3.03, 3),
            Element::C => props("C", 12.011, 0.76, 1.70, 2.746, 2.55, 1.76, 4),
            Element::N => props("N", 14.007, 0.71, 1.55, 3.194, 3.04, 1.10, 5),
            Element::O => props("O", 15.999, 0.66, 1.52, 3.654, 3.44, 0.802, 6),
            Element::F => props("F", 18.998, 0.57, 1.47, 4.000, 3.98, 0.557, 7),
            Element::Na => props("Na", 22.990, 1.66, 2.27, 0.560, 0.93, 24.11, 1),
            Element::Mg => props("Mg", 24.305, 1.41, 1.73, 1.318, 1.31, 10.6, 2),
            Element::Al => props("Al", 26.982, 1.21, 1.84, 1.714, 1.61, 6.8, 3),
            Element::Si => props("Si", 28.085, 1.11, 2.10, 2.138, 1.90, 5.38, 4),
            Element::P => props("P", 30.974, 1.07, 1.80, 2.515, 2.19, 3.63, 5),
            Element::S => props("S", 32.06, 1.05, 1.80, 2.957, 2.58, 2.90, 6),
            Element::Cl => props("Cl", 35.45, 1.02, 1.75, 3.475, 3.16, 2.18, 7),
            Element::K => props("K", 39.098, 2.03, 2.75, 0.445, 0.82, 43.4, 1),
            Element::Ca => props("Ca", 40.078, 1.76, 2.31, 0.946, 1.00, 22.8, 2),
            Element::Ti => props("Ti", 47.867, 1.60, 2.11, 1.500, 1.54, 14.6, 4),
            Element::V => props("V", 50.942, 1.53, 2.07, 1.600, 1.63, 12.4, 5),
            Element::Cr => props("Cr", 51.996, 1.39, 2.06, 1.660, 1.66, 11.6, 6),
            Element::Mn => props("Mn", 54.938, 1.39, 2.05, 2.200, 1.55, 9.4, 7),
            Element::Fe => props("Fe", 55.845, 1.32, 2.04, 2.000, 1.83, 8.4, 8),
            Element::Co => props("Co", 58.933, 1.26, 2.00, 2.560, 1.88, 7.5, 9),
            Element::Ni => props("Ni", 58.693, 1.24, 1.63, 2.940, 1.91, 6.8, 10),
            Element::Cu => props("Cu", 63.546, 1.32, 1.40, 2.033, 1.90, 6.2, 11),
            Element::Zn => props("Zn", 65.38, 1.22, 1.39, 2.223, 1.65, 5.75, 12),
            Element::Ga => props("Ga", 69.723, 1.22, 1.87, 2.419, 1.81, 8.12, 3),
            Element::Ge => props("Ge", 72.63, 1.20, 2.11, 2.618, 2.01, 6.07, 4),
            Element::As => props("As", 74.922, 1.19, 1.85, 2.819, 2.18, 4.31, 5),
            Element::Se => props("Se", 78.971, 1.20, 1.90, 3.014, 2.55, 3.77, 6),
            Element::Br => props("Br", 79.904, 1.20, 1.85, 3.219, 2.96, 3.05, 7),
            Element::Rb => props("Rb", 85.468, 2.20, 3.03, 0.312, 0.82, 47.3, 1),
            Element::Sr => props("Sr", 87.62, 1.95, 2.49, 0.721, 0.95, 27.6, 2),
            Element::Zr => props("Zr", 91.224, 1.75, 2.16, 0.900, 1.33, 17.9, 4),
            Element::Mo => props("Mo", 95.95, 1.54, 2.17, 1.150, 2.16, 12.8, 6),
            Element::Ru => props("Ru", 101.07, 1.46, 2.13, 1.360, 2.20, 9.6, 8),
            Element::Rh => props("Rh", 102.91, 1.42, 2.10, 1.450, 2.28, 8.6, 9),
            Element::Pd => props("Pd", 106.42, 1.39, 1.63, 1.500, 2.20, 4.8, 10),
            Element::Ag => props("Ag", 107.87, 1.45, 1.72, 1.826, 1.93, 7.2, 11),
            Element::Cd => props("Cd", 112.41, 1.44, 1.58, 1.978, 1.69, 7.36, 12),
            Element::In => props("In", 114.82, 1.42, 1.93, 2.138, 1.78, 10.2, 3),
            Element::Sn => props("Sn", 118.71, 1.39, 2.17, 2.298, 1.96, 7.7, 4),
            Element::Sb => props("Sb", 121.76, 1.39, 2.06, 2.458, 2.05, 6.6, 5),
            Element::Te => props("Te", 127.6, 1.38, 2.06, 2.618, 2.10, 5.5, 6),
            Element::I => props("I", 126.90, 1.39, 1.98, 2.778, 2.66, 5.35, 7),
            Element::Cs => props("Cs", 132.91, 2.44, 3.43, 0.220, 0.79, 59.42, 1),
            Element::Ba => props("Ba", 137.33, 2.15, 2.68, 0.651, 0.89, 39.7, 2),
            Element::Gd => props("Gd", 157.25, 1.96, 2.37, 1.200, 1.20, 23.5, 3),
            Element::W => props("W", 183.84, 1.62, 2.18, 1.400, 2.36, 11.1, 6),
            Element::Pt => props("Pt", 195.08, 1.36, 1.75, 1.600, 2.28, 6.5, 10),
            Element::Au => props("Au", 196.97, 1.36, 1.66, 1.800, 2.54, 5.8, 11),
            Element::Hg => props("Hg", 200.59, 1.32, 1.55, 2.195, 2.00, 5.02, 12),
            Element::Tl => props("Tl", 204.38, 1.45, 1.96, 2.246, 1.62, 7.6, 3),
            Element::Pb => props("Pb", 207.2, 1.46, 2.02, 2.291, 2.33, 6.8, 4),
            Element::Bi => props("Bi", 208.98, 1.48, 2.07, 2.342, 2.02, 7.4, 5),
            Element::U => props("U", 238.03, 1.96, 2.41, 1.300, 1.38, 24.9, 6),
        }
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.props().symbol
    }

    #[inline]
    pub fn atomic_mass(&self) -> f64 {
        self.props().mass
    }

    #[inline]
    pub fn covalent_radius(&self) -> f64 {
        self.props().covalent_radius
    }

    #[inline]
    pub fn vdw_radius(&self) -> f64 {
        self.props().vdw_radius
    }

    /// Van der Waals volume of the isolated atom sphere (Å³).
    pub fn vdw_volume(&self) -> f64 {
        let r = self.vdw_radius();
        4.0 / 3.0 * std::f64::consts::PI * r * r * r
    }

    /// Principal quantum number of the valence shell.
    pub fn period(&self) -> u8 {
        match self.atomic_number() {
            1..=2 => 1,
            3..=10 => 2,
            11..=18 => 3,
            19..=36 => 4,
            37..=54 => 5,
            55..=86 => 6,
            _ => 7,
        }
    }

    /// Allowed valences used to derive implicit hydrogen counts for
    /// organic-subset atoms. Empty for elements that must be bracketed.
    pub fn default_valences(&self) -> &'static [u8] {
        match self {
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            _ => &[],
        }
    }

    /// Whether the element may be written without brackets in SMILES.
    pub fn is_organic_subset(&self) -> bool {
        !self.default_valences().is_empty()
    }

    pub fn is_halogen(&self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .iter()
            .copied()
            .find(|e| e.symbol() == s)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

/// Bond multiplicity as written in the molecular graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Conventional bond order used by force fields (aromatic = 1.5).
    pub fn multiplier(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Quadruple => 4.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Valence units consumed on each partner for hydrogen counting.
    /// Aromatic bonds count as one; the extra unit is added per atom.
    pub fn valence_units(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    /// SMILES bond symbol.
    pub fn symbol(&self) -> char {
        match self {
            BondOrder::Single => '-',
            BondOrder::Double => '=',
            BondOrder::Triple => '#',
            BondOrder::Quadruple => '$',
            BondOrder::Aromatic => ':',
        }
    }

    /// MDL molfile bond type code.
    pub fn mdl_code(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 8,
            BondOrder::Aromatic => 4,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BondOrder::Single => "Single",
            BondOrder::Double => "Double",
            BondOrder::Triple => "Triple",
            BondOrder::Quadruple => "Quadruple",
            BondOrder::Aromatic => "Aromatic",
        };
        f.write_str(s)
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" | "1" | "Single" | "single" => Ok(BondOrder::Single),
            "=" | "2" | "Double" | "double" => Ok(BondOrder::Double),
            "#" | "3" | "Triple" | "triple" => Ok(BondOrder::Triple),
            "$" | "4" | "Quadruple" | "quadruple" => Ok(BondOrder::Quadruple),
            ":" | "ar" | "Aromatic" | "aromatic" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

/// Orbital hybridization perceived from the bonding pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hybridization {
    /// Hydrogen, isolated ions and anything without a defined geometry.
    Unspecified,
    SP,
    SP2,
    SP3,
}

impl Hybridization {
    /// Ideal bond angle around a centre with this hybridization (degrees).
    pub fn ideal_angle(&self) -> f64 {
        match self {
            Hybridization::SP => 180.0,
            Hybridization::SP2 => 120.0,
            Hybridization::SP3 | Hybridization::Unspecified => 109.47,
        }
    }
}
