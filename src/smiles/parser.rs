use super::error::ParseError;
use super::perception;
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

/// Single-pass SMILES reader.
///
/// Builds the heavy-atom graph left to right, keeping the previous atom,
/// an optional pending bond symbol, a stack of branch points and the open
/// ring-closure labels.
pub(super) struct Parser {
    chars: Vec<char>,
    pos: usize,
    atoms: Vec<Atom>,
    bracketed: Vec<bool>,
    bonds: Vec<Bond>,
    prev: Option<usize>,
    pending: Option<(BondOrder, usize)>,
    branches: Vec<(Option<usize>, usize)>,
    rings: BTreeMap<u32, RingOpening>,
}

impl Parser {
    pub(super) fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            atoms: Vec::new(),
            bracketed: Vec::new(),
            bonds: Vec::new(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    pub(super) fn parse(mut self) -> Result<Molecule, ParseError> {
        if self.chars.is_empty() {
            return Err(ParseError::Empty);
        }

        while let Some(ch) = self.peek() {
            let pos = self.pos;
            match ch {
                '(' => {
                    if self.prev.is_none() {
                        return Err(ParseError::BranchWithoutAtom { pos });
                    }
                    if self.pending.is_some() {
                        return Err(ParseError::UnexpectedChar { ch, pos });
                    }
                    self.branches.push((self.prev, pos));
                    self.pos += 1;
                }
                ')' => {
                    if let Some((_, bond_pos)) = self.pending {
                        return Err(ParseError::DanglingBond { pos: bond_pos });
                    }
                    let (prev, _) = self
                        .branches
                        .pop()
                        .ok_or(ParseError::UnmatchedParenthesis { pos })?;
                    self.prev = prev;
                    self.pos += 1;
                }
                '-' | '=' | '#' | '$' | ':' | '/' | '\\' => {
                    if self.prev.is_none() || self.pending.is_some() {
                        return Err(ParseError::UnexpectedChar { ch, pos });
                    }
                    self.pending = Some((bond_symbol(ch), pos));
                    self.pos += 1;
                }
                '.' => {
                    if let Some((_, bond_pos)) = self.pending {
                        return Err(ParseError::DanglingBond { pos: bond_pos });
                    }
                    if self.prev.is_none() {
                        return Err(ParseError::EmptyComponent { pos });
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                '0'..='9' => {
                    self.pos += 1;
                    let label = ch.to_digit(10).unwrap_or_default();
                    self.ring_closure(label, ch, pos)?;
                }
                '%' => {
                    self.pos += 1;
                    let label = self.read_two_digits().ok_or_else(|| {
                        let ch = self.peek().unwrap_or('%');
                        ParseError::UnexpectedChar { ch, pos: self.pos }
                    })?;
                    self.ring_closure(label, '%', pos)?;
                }
                '[' => {
                    let atom = self.bracket_atom()?;
                    self.push_atom(atom, true);
                }
                c if c.is_ascii_alphabetic() => {
                    let atom = self.organic_atom()?;
                    self.push_atom(atom, false);
                }
                '*' => {
                    return Err(ParseError::UnknownElement {
                        symbol: "*".to_string(),
                        pos,
                    });
                }
                _ => return Err(ParseError::UnexpectedChar { ch, pos }),
            }
        }

        if let Some((_, pos)) = self.pending {
            return Err(ParseError::DanglingBond { pos });
        }
        if self.prev.is_none() && self.chars.last() == Some(&'.') {
            return Err(ParseError::EmptyComponent {
                pos: self.chars.len() - 1,
            });
        }
        if let Some(&(_, pos)) = self.branches.last() {
            return Err(ParseError::UnmatchedParenthesis { pos });
        }
        if let Some((&label, _)) = self.rings.first_key_value() {
            return Err(ParseError::UnclosedRing { label });
        }
        if self.atoms.is_empty() {
            return Err(ParseError::Empty);
        }

        perception::finalize(self.atoms, &self.bracketed, self.bonds)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push_atom(&mut self, atom: Atom, bracketed: bool) {
        let idx = self.atoms.len();
        let aromatic = atom.aromatic;
        self.atoms.push(atom);
        self.bracketed.push(bracketed);

        if let Some(prev) = self.prev {
            let order = match self.pending.take() {
                Some((order, _)) => order,
                None => implicit_order(self.atoms[prev].aromatic, aromatic),
            };
            self.bonds.push(Bond::new(prev, idx, order));
        }
        self.prev = Some(idx);
    }

    fn has_bond(&self, a: usize, b: usize) -> bool {
        self.bonds.iter().any(|bond| bond.contains(a) && bond.contains(b))
    }

    fn ring_closure(&mut self, label: u32, ch: char, pos: usize) -> Result<(), ParseError> {
        let Some(current) = self.prev else {
            return Err(ParseError::UnexpectedChar { ch, pos });
        };
        let pending = self.pending.take().map(|(order, _)| order);

        let Some(open) = self.rings.remove(&label) else {
            self.rings.insert(
                label,
                RingOpening {
                    atom: current,
                    order: pending,
                },
            );
            return Ok(());
        };

        if open.atom == current || self.has_bond(open.atom, current) {
            return Err(ParseError::InvalidRingClosure { label, pos });
        }
        let order = match (open.order, pending) {
            (Some(a), Some(b)) if a != b => {
                return Err(ParseError::RingBondConflict { label, pos });
            }
            (Some(a), _) => a,
            (None, Some(b)) => b,
            (None, None) => implicit_order(
                self.atoms[open.atom].aromatic,
                self.atoms[current].aromatic,
            ),
        };
        self.bonds.push(Bond::new(open.atom, current, order));
        Ok(())
    }

    fn read_two_digits(&mut self) -> Option<u32> {
        let d1 = self.peek()?.to_digit(10)?;
        let d2 = self.peek_at(1)?.to_digit(10)?;
        self.pos += 2;
        Some(d1 * 10 + d2)
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(d);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn organic_atom(&mut self) -> Result<Atom, ParseError> {
        let pos = self.pos;
        let ch = self.peek().unwrap_or_default();
        let next = self.peek_at(1);

        let (element, aromatic, width) = match (ch, next) {
            ('B', Some('r')) => (Element::Br, false, 2),
            ('C', Some('l')) => (Element::Cl, false, 2),
            ('B', _) => (Element::B, false, 1),
            ('C', _) => (Element::C, false, 1),
            ('N', _) => (Element::N, false, 1),
            ('O', _) => (Element::O, false, 1),
            ('P', _) => (Element::P, false, 1),
            ('S', _) => (Element::S, false, 1),
            ('F', _) => (Element::F, false, 1),
            ('I', _) => (Element::I, false, 1),
            ('b', _) => (Element::B, true, 1),
            ('c', _) => (Element::C, true, 1),
            ('n', _) => (Element::N, true, 1),
            ('o', _) => (Element::O, true, 1),
            ('p', _) => (Element::P, true, 1),
            ('s', _) => (Element::S, true, 1),
            _ => {
                let mut symbol = ch.to_string();
                if ch.is_ascii_uppercase() {
                    if let Some(n) = next.filter(char::is_ascii_lowercase) {
                        symbol.push(n);
                    }
                }
                return Err(ParseError::UnknownElement { symbol, pos });
            }
        };

        self.pos += width;
        let atom = Atom::new(element);
        Ok(if aromatic { atom.aromatic() } else { atom })
    }

    fn bracket_atom(&mut self) -> Result<Atom, ParseError> {
        let start = self.pos;
        self.pos += 1;

        let isotope = match self.read_number() {
            Some(n) => Some(
                u16::try_from(n).map_err(|_| ParseError::bracket(start, "isotope out of range"))?,
            ),
            None => None,
        };

        let (element, aromatic) = self.bracket_symbol(start)?;

        if self.peek() == Some('@') {
            self.pos += 1;
            if self.peek() == Some('@') {
                self.pos += 1;
            } else if let (Some(a), Some(b)) = (self.peek(), self.peek_at(1)) {
                if matches!((a, b), ('T', 'H') | ('A', 'L') | ('S', 'P') | ('T', 'B') | ('O', 'H')) {
                    self.pos += 2;
                    self.read_number();
                }
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            let count = self.read_number().unwrap_or(1);
            hydrogens = u8::try_from(count)
                .map_err(|_| ParseError::bracket(start, "hydrogen count out of range"))?;
        }

        let mut charge: i32 = 0;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let unit = if sign == '+' { 1 } else { -1 };
            let magnitude = match self.read_number() {
                Some(n) => i32::try_from(n).unwrap_or(i32::MAX),
                None => {
                    let mut repeats = 1;
                    while self.peek() == Some(sign) {
                        repeats += 1;
                        self.pos += 1;
                    }
                    repeats
                }
            };
            charge = unit * magnitude;
        }
        let formal_charge = i8::try_from(charge)
            .ok()
            .filter(|c| c.abs() <= 15)
            .ok_or_else(|| ParseError::bracket(start, "charge out of range"))?;

        if self.peek() == Some(':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(ParseError::bracket(start, "atom class must be a number"));
            }
        }

        match self.peek() {
            Some(']') => self.pos += 1,
            Some(c) => {
                return Err(ParseError::bracket(
                    start,
                    format!("unexpected '{c}' where ']' was expected"),
                ));
            }
            None => return Err(ParseError::bracket(start, "unterminated bracket atom")),
        }

        let mut atom = Atom::new(element)
            .with_charge(formal_charge)
            .with_hydrogens(hydrogens);
        atom.aromatic = aromatic;
        atom.isotope = isotope;
        Ok(atom)
    }

    fn bracket_symbol(&mut self, start: usize) -> Result<(Element, bool), ParseError> {
        let pos = self.pos;
        let Some(first) = self.peek() else {
            return Err(ParseError::bracket(start, "missing element symbol"));
        };
        let second = self.peek_at(1);

        if first.is_ascii_lowercase() {
            let two: Option<String> = second.map(|s| [first, s].iter().collect());
            let (element, width) = match (first, two.as_deref()) {
                (_, Some("se")) => (Element::Se, 2),
                (_, Some("as")) => (Element::As, 2),
                ('b', _) => (Element::B, 1),
                ('c', _) => (Element::C, 1),
                ('n', _) => (Element::N, 1),
                ('o', _) => (Element::O, 1),
                ('p', _) => (Element::P, 1),
                ('s', _) => (Element::S, 1),
                _ => {
                    return Err(ParseError::UnknownElement {
                        symbol: first.to_string(),
                        pos,
                    });
                }
            };
            self.pos += width;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(ParseError::bracket(start, format!("'{first}' is not an element symbol")));
        }

        if let Some(lower) = second.filter(char::is_ascii_lowercase) {
            let symbol: String = [first, lower].iter().collect();
            return match symbol.parse::<Element>() {
                Ok(element) => {
                    self.pos += 2;
                    Ok((element, false))
                }
                Err(_) => Err(ParseError::UnknownElement { symbol, pos }),
            };
        }

        match first.to_string().parse::<Element>() {
            Ok(element) => {
                self.pos += 1;
                Ok((element, false))
            }
            Err(_) => Err(ParseError::UnknownElement {
                symbol: first.to_string(),
                pos,
            }),
        }
    }
}

fn bond_symbol(ch: char) -> BondOrder {
    match ch {
        '=' => BondOrder::Double,
        '#' => BondOrder::Triple,
        '$' => BondOrder::Quadruple,
        ':' => BondOrder::Aromatic,
        _ => BondOrder::Single,
    }
}

fn implicit_order(a_aromatic: bool, b_aromatic: bool) -> BondOrder {
    if a_aromatic && b_aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}
