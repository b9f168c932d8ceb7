//! Atomic properties used to weight autocorrelation, BCUT and MoRSE terms.

use super::graph::{intrinsic_state, valence_delta};
use crate::model::molecule::Molecule;
use crate::model::types::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicProperty {
    Mass,
    VdwVolume,
    Sanderson,
    Pauling,
    Polarizability,
    AtomicNumber,
}

impl AtomicProperty {
    /// Suffix appended to descriptor names weighted by this property.
    pub fn suffix(&self) -> &'static str {
        match self {
            AtomicProperty::Mass => "m",
            AtomicProperty::VdwVolume => "v",
            AtomicProperty::Sanderson => "se",
            AtomicProperty::Pauling => "pe",
            AtomicProperty::Polarizability => "p",
            AtomicProperty::AtomicNumber => "Z",
        }
    }

    pub fn of(&self, element: Element) -> f64 {
        let props = element.props();
        match self {
            AtomicProperty::Mass => props.mass,
            AtomicProperty::VdwVolume => element.vdw_volume(),
            AtomicProperty::Sanderson => props.sanderson,
            AtomicProperty::Pauling => props.pauling,
            AtomicProperty::Polarizability => props.polarizability,
            AtomicProperty::AtomicNumber => f64::from(element.atomic_number()),
        }
    }

    /// Value scaled so that carbon is one.
    pub fn relative(&self, element: Element) -> f64 {
        self.of(element) / self.of(Element::C)
    }
}

/// What the graph-derived weightings need to know about one atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomEnvironment {
    pub element: Element,
    pub formal_charge: i8,
    /// Number of non-hydrogen neighbours.
    pub heavy_degree: usize,
    pub hydrogens: usize,
}

impl AtomEnvironment {
    /// Environments of every atom of `molecule`, in atom order.
    pub fn of_molecule(molecule: &Molecule) -> Vec<Self> {
        let hydrogens = molecule.attached_hydrogens();
        let mut heavy_degree = vec![0; molecule.atom_count()];
        for bond in &molecule.bonds {
            if !molecule.atoms[bond.j].element.is_hydrogen() {
                heavy_degree[bond.i] += 1;
            }
            if !molecule.atoms[bond.i].element.is_hydrogen() {
                heavy_degree[bond.j] += 1;
            }
        }
        molecule
            .atoms
            .iter()
            .zip(heavy_degree.into_iter().zip(hydrogens))
            .map(|(atom, (heavy_degree, hydrogens))| Self {
                element: atom.element,
                formal_charge: atom.formal_charge,
                heavy_degree,
                hydrogens,
            })
            .collect()
    }
}

/// Per-atom weighting: partial charge, a graph invariant or a tabulated
/// element property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomWeight {
    /// Gasteiger charge.
    Charge,
    /// Sigma electrons, the number of heavy neighbours.
    Sigma,
    /// Kier–Hall valence delta.
    Valence,
    /// Kier–Hall intrinsic state.
    State,
    Element(AtomicProperty),
}

impl AtomWeight {
    pub fn suffix(&self) -> &'static str {
        match self {
            AtomWeight::Charge => "c",
            AtomWeight::Sigma => "d",
            AtomWeight::Valence => "dv",
            AtomWeight::State => "s",
            AtomWeight::Element(property) => property.suffix(),
        }
    }

    /// Weights of `atoms`. `charges` must be index-aligned with `atoms`;
    /// without them [`AtomWeight::Charge`] is unavailable.
    pub fn values(&self, atoms: &[AtomEnvironment], charges: Option<&[f64]>) -> Option<Vec<f64>> {
        let per_atom = |f: &dyn Fn(&AtomEnvironment) -> f64| -> Option<Vec<f64>> {
            Some(atoms.iter().map(f).collect())
        };
        match self {
            AtomWeight::Charge => charges.map(<[f64]>::to_vec),
            AtomWeight::Sigma => per_atom(&|a| a.heavy_degree as f64),
            AtomWeight::Valence => per_atom(&|a| valence_delta(a.element, a.formal_charge, a.hydrogens)),
            AtomWeight::State => per_atom(&|a| intrinsic_state(a.element, a.hydrogens, a.heavy_degree)),
            AtomWeight::Element(property) => per_atom(&|a| property.of(a.element)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn carbon_is_the_reference() {
        for property in [
            AtomicProperty::Mass,
            AtomicProperty::VdwVolume,
            AtomicProperty::Sanderson,
            AtomicProperty::Pauling,
            AtomicProperty::Polarizability,
            AtomicProperty::AtomicNumber,
        ] {
            assert!((property.relative(Element::C) - 1.0).abs() < 1e-12);
        }
        assert!(AtomicProperty::Mass.relative(Element::O) > 1.3);
        assert!(AtomicProperty::VdwVolume.relative(Element::H) < 0.5);
        assert_eq!(AtomicProperty::AtomicNumber.of(Element::Cl), 17.0);
    }

    #[test]
    fn environments_fold_hydrogens_either_way() {
        let implicit = parse_smiles("CO").unwrap();
        let explicit = implicit.with_explicit_hydrogens();
        let a = AtomEnvironment::of_molecule(&implicit);
        let b = AtomEnvironment::of_molecule(&explicit);
        assert_eq!(a[..], b[..2]);
        assert_eq!(a[0].hydrogens, 3);
        assert_eq!(a[1].heavy_degree, 1);
        // A hydrogen sees its carbon as one heavy neighbour.
        assert_eq!(b[2].heavy_degree, 1);
        assert_eq!(b[2].hydrogens, 0);
    }

    #[test]
    fn graph_weights() {
        let atoms = AtomEnvironment::of_molecule(&parse_smiles("CO").unwrap());
        assert_eq!(AtomWeight::Sigma.values(&atoms, None), Some(vec![1.0, 1.0]));
        assert_eq!(AtomWeight::Valence.values(&atoms, None), Some(vec![1.0, 5.0]));
        assert_eq!(AtomWeight::State.values(&atoms, None), Some(vec![2.0, 6.0]));
        assert_eq!(AtomWeight::Charge.values(&atoms, None), None);
        assert_eq!(AtomWeight::Charge.values(&atoms, Some(&[0.1, -0.1])), Some(vec![0.1, -0.1]));
        assert_eq!(AtomWeight::Element(AtomicProperty::AtomicNumber).suffix(), "Z");
    }
}
