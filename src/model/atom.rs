use super::types::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub aromatic: bool,
    /// Hydrogens carried implicitly by this atom (not present as graph nodes).
    pub implicit_hydrogens: u8,
    pub isotope: Option<u16>,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            aromatic: false,
            implicit_hydrogens: 0,
            isotope: None,
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.implicit_hydrogens = count;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.aromatic = true;
        self
    }

    /// Mass including implicit hydrogens.
    pub fn mass_with_hydrogens(&self) -> f64 {
        self.element.atomic_mass() + f64::from(self.implicit_hydrogens) * Element::H.atomic_mass()
    }
}
