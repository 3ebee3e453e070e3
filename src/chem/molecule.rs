use super::element;
use super::MoleculeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Canonical element symbol.
    pub element: String,
    pub atomic_number: u8,
    pub position: [f64; 3],
    pub formal_charge: i32,
    pub partial_charge: Option<f64>,
    /// Atom name as read from formats that carry one.
    pub name: Option<String>,
}

impl Atom {
    pub fn new(symbol: &str, position: [f64; 3]) -> Result<Self, MoleculeError> {
        let atomic_number =
            element::atomic_number(symbol).ok_or_else(|| MoleculeError::UnknownElement(symbol.trim().to_string()))?;
        let element = element::symbol(atomic_number)
            .unwrap_or_default()
            .to_string();
        Ok(Atom {
            element,
            atomic_number,
            position,
            formal_charge: 0,
            partial_charge: None,
            name: None,
        })
    }

    pub fn with_formal_charge(mut self, charge: i32) -> Self {
        self.formal_charge = charge;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

impl Bond {
    /// The atom on the other end, if `atom` is part of this bond.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.a == atom {
            Some(self.b)
        } else if self.b == atom {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Hybridization as implied by the bond orders around an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// SD data items in file order.
    pub properties: Vec<(String, String)>,
}

impl Molecule {
    pub fn new(title: impl Into<String>) -> Self {
        Molecule {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<(), MoleculeError> {
        for index in [a, b] {
            if index >= self.atoms.len() {
                return Err(MoleculeError::AtomIndex {
                    index,
                    n_atoms: self.atoms.len(),
                });
            }
        }
        self.bonds.push(Bond { a, b, order });
        Ok(())
    }

    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = &Bond> {
        self.bonds.iter().filter(move |b| b.a == atom || b.b == atom)
    }

    pub fn neighbors(&self, atom: usize) -> Vec<usize> {
        self.bonds_of(atom).filter_map(|b| b.partner(atom)).collect()
    }

    pub fn hybridization(&self, atom: usize) -> Hybridization {
        let (mut double, mut triple, mut aromatic) = (0, 0, 0);
        for bond in self.bonds_of(atom) {
            match bond.order {
                BondOrder::Double => double += 1,
                BondOrder::Triple => triple += 1,
                BondOrder::Aromatic => aromatic += 1,
                BondOrder::Single => {}
            }
        }
        if triple > 0 || double > 1 {
            Hybridization::Sp
        } else if double == 1 || aromatic > 0 {
            Hybridization::Sp2
        } else {
            Hybridization::Sp3
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn total_formal_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge).sum()
    }

    /// True only if every atom carries a partial charge.
    pub fn has_partial_charges(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.iter().all(|a| a.partial_charge.is_some())
    }

    pub fn coords(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn set_coords(&mut self, coords: &[[f64; 3]]) -> Result<(), MoleculeError> {
        if coords.len() != self.atoms.len() {
            return Err(MoleculeError::AtomCount {
                expected: self.atoms.len(),
                found: coords.len(),
            });
        }
        for (atom, &pos) in self.atoms.iter_mut().zip(coords) {
            atom.position = pos;
        }
        Ok(())
    }

    /// Whether any atom has an atomic number outside `boring`.
    pub fn has_atom_outside(&self, boring: &[u8]) -> bool {
        self.atoms.iter().any(|a| !boring.contains(&a.atomic_number))
    }

    /// Same atoms in the same order; conformers of one molecule share this.
    pub fn same_graph(&self, other: &Molecule) -> bool {
        self.atoms.len() == other.atoms.len()
            && self
                .atoms
                .iter()
                .zip(&other.atoms)
                .all(|(a, b)| a.atomic_number == b.atomic_number)
            && self.bonds.len() == other.bonds.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Water with a 104.5 degree angle.
    pub(crate) fn water() -> Molecule {
        let half = 104.5_f64.to_radians() / 2.0;
        let mut mol = Molecule::new("water");
        let o = mol.add_atom(Atom::new("O", [0.0, 0.0, 0.0]).unwrap());
        let h1 = mol.add_atom(Atom::new("H", [0.9572 * half.sin(), 0.9572 * half.cos(), 0.0]).unwrap());
        let h2 = mol.add_atom(Atom::new("H", [-0.9572 * half.sin(), 0.9572 * half.cos(), 0.0]).unwrap());
        mol.add_bond(o, h1, BondOrder::Single).unwrap();
        mol.add_bond(o, h2, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn neighbors_and_hybridization() {
        let mol = water();
        assert_eq!(mol.neighbors(0), vec![1, 2]);
        assert_eq!(mol.hybridization(0), Hybridization::Sp3);

        let mut co2 = Molecule::new("co2");
        for s in ["O", "C", "O"] {
            co2.add_atom(Atom::new(s, [0.0; 3]).unwrap());
        }
        co2.add_bond(0, 1, BondOrder::Double).unwrap();
        co2.add_bond(1, 2, BondOrder::Double).unwrap();
        assert_eq!(co2.hybridization(1), Hybridization::Sp);
        assert_eq!(co2.hybridization(0), Hybridization::Sp2);
    }

    #[test]
    fn bad_bond_index_rejected() {
        let mut mol = water();
        assert!(matches!(
            mol.add_bond(0, 7, BondOrder::Single),
            Err(MoleculeError::AtomIndex { index: 7, n_atoms: 3 })
        ));
    }

    #[test]
    fn element_filter() {
        let mol = water();
        assert!(!mol.has_atom_outside(&[1, 8]));
        assert!(mol.has_atom_outside(&[1, 6]));
    }

    #[test]
    fn properties_overwrite_in_place() {
        let mut mol = Molecule::new("m");
        mol.set_property("energy", "1.0");
        mol.set_property("other", "x");
        mol.set_property("energy", "2.0");
        assert_eq!(mol.property("energy"), Some("2.0"));
        assert_eq!(mol.properties[0].0, "energy");
    }
}
