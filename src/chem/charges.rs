//! Partial charge assignment.

use thiserror::Error;

use super::{Hybridization, Molecule};

#[derive(Debug, Error, PartialEq)]
pub enum ChargeError {
    #[error("molecule has no atoms")]
    Empty,

    #[error("no charge parameters for {element} ({hybridization:?}) at atom {index}")]
    MissingParameters {
        index: usize,
        element: String,
        hybridization: Hybridization,
    },

    #[error("reference has {reference} atoms but input has {input}")]
    AtomCountMismatch { reference: usize, input: usize },
}

/// Anything that can put partial charges on a molecule.
pub trait ChargeModel {
    fn name(&self) -> &str;

    /// One partial charge per atom, in atom order.
    fn partial_charges(&self, molecule: &Molecule) -> Result<Vec<f64>, ChargeError>;

    /// Compute charges and store them on the atoms. The molecule is left
    /// untouched on failure.
    fn assign(&self, molecule: &mut Molecule) -> Result<(), ChargeError> {
        let charges = self.partial_charges(molecule)?;
        for (atom, q) in molecule.atoms.iter_mut().zip(charges) {
            atom.partial_charge = Some(q);
        }
        Ok(())
    }
}

/// Gasteiger-Marsili partial equalization of orbital electronegativity.
#[derive(Debug, Clone, Copy)]
pub struct GasteigerCharges {
    pub iterations: usize,
    /// Charge transfer in iteration `k` is scaled by `damping^k`.
    pub damping: f64,
}

impl Default for GasteigerCharges {
    fn default() -> Self {
        GasteigerCharges {
            iterations: 6,
            damping: 0.5,
        }
    }
}

/// Electronegativity polynomial `a + b q + c q²`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Polynomial {
    a: f64,
    b: f64,
    c: f64,
}

impl Polynomial {
    const fn new(a: f64, b: f64, c: f64) -> Self {
        Polynomial { a, b, c }
    }

    fn at(&self, q: f64) -> f64 {
        self.a + self.b * q + self.c * q * q
    }

    /// Electronegativity of the cation, used to normalize transfers.
    fn cation(&self, element: &str) -> f64 {
        if element == "H" {
            20.02
        } else {
            self.a + self.b + self.c
        }
    }
}

fn parameters(element: &str, hyb: Hybridization) -> Option<Polynomial> {
    use Hybridization::*;
    let p = match (element, hyb) {
        ("H", _) => Polynomial::new(7.17, 6.24, -0.56),
        ("C", Sp3) => Polynomial::new(7.98, 9.18, 1.88),
        ("C", Sp2) => Polynomial::new(8.79, 9.32, 1.51),
        ("C", Sp) => Polynomial::new(10.39, 9.45, 0.73),
        ("N", Sp3) => Polynomial::new(11.54, 10.82, 1.36),
        ("N", Sp2) => Polynomial::new(12.87, 11.15, 0.85),
        ("N", Sp) => Polynomial::new(15.68, 11.70, -0.27),
        ("O", Sp3) => Polynomial::new(14.18, 12.92, 1.39),
        ("O", Sp2 | Sp) => Polynomial::new(17.07, 13.79, 0.47),
        ("F", _) => Polynomial::new(14.66, 13.85, 2.31),
        ("Cl", _) => Polynomial::new(11.00, 9.69, 1.35),
        ("Br", _) => Polynomial::new(10.08, 8.47, 1.16),
        ("I", _) => Polynomial::new(9.90, 7.96, 0.96),
        ("S", _) => Polynomial::new(10.14, 9.13, 1.38),
        _ => return None,
    };
    Some(p)
}

impl ChargeModel for GasteigerCharges {
    fn name(&self) -> &str {
        "gasteiger"
    }

    fn partial_charges(&self, molecule: &Molecule) -> Result<Vec<f64>, ChargeError> {
        if molecule.atoms.is_empty() {
            return Err(ChargeError::Empty);
        }

        let params = molecule
            .atoms
            .iter()
            .enumerate()
            .map(|(index, atom)| {
                let hybridization = molecule.hybridization(index);
                parameters(&atom.element, hybridization).ok_or_else(|| ChargeError::MissingParameters {
                    index,
                    element: atom.element.clone(),
                    hybridization,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut q: Vec<f64> = molecule.atoms.iter().map(|a| f64::from(a.formal_charge)).collect();
        let mut scale = 1.0;

        for _ in 0..self.iterations {
            scale *= self.damping;
            let chi: Vec<f64> = params.iter().zip(&q).map(|(p, &qi)| p.at(qi)).collect();
            let mut dq = vec![0.0; q.len()];

            for bond in &molecule.bonds {
                let (i, j) = (bond.a, bond.b);
                // electrons move toward the more electronegative end
                let (donor, acceptor) = if chi[j] >= chi[i] { (i, j) } else { (j, i) };
                let cation = params[donor].cation(&molecule.atoms[donor].element);
                let transfer = scale * (chi[acceptor] - chi[donor]) / cation;
                dq[donor] += transfer;
                dq[acceptor] -= transfer;
            }

            for (qi, d) in q.iter_mut().zip(dq) {
                *qi += d;
            }
        }

        log::debug!("{} charges for '{}': {:?}", self.name(), molecule.title, q);
        Ok(q)
    }
}

/// Put the coordinates of `input` onto a copy of `reference`, keeping the
/// reference's charges, names and bonds.
pub fn transfer_coordinates(input: &Molecule, reference: &Molecule) -> Result<Molecule, ChargeError> {
    if input.atoms.len() != reference.atoms.len() {
        return Err(ChargeError::AtomCountMismatch {
            reference: reference.atoms.len(),
            input: input.atoms.len(),
        });
    }
    let mut out = reference.clone();
    for (atom, src) in out.atoms.iter_mut().zip(&input.atoms) {
        atom.position = src.position;
    }
    Ok(out)
}
