//! Small-molecule model, file formats, and partial charges.
//!
//! ```text
//!   .sdf ──► SdfFile  ──┐                      ┌──► SdfFile  ──► .sdf
//!                       ├──► Vec<Molecule> ──► │
//!   .mol2 ─► Mol2File ──┘        │             └──► Mol2File ──► .mol2
//!                                ▼
//!                      ChargeModel / geometry
//! ```

pub mod charges;
pub mod element;
pub mod format;
pub mod geometry;
pub mod mol2;
pub mod molecule;
pub mod sdf;

use thiserror::Error;

pub use charges::{ChargeError, ChargeModel, GasteigerCharges};
pub use format::{MoleculeFile, MoleculeFormat};
pub use mol2::Mol2File;
pub use molecule::{Atom, Bond, BondOrder, Hybridization, Molecule};
pub use sdf::SdfFile;

#[derive(Debug, Error)]
pub enum MoleculeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown element '{0}'")]
    UnknownElement(String),

    #[error("atom index {index} out of range for {n_atoms} atoms")]
    AtomIndex { index: usize, n_atoms: usize },

    #[error("expected {expected} atoms, found {found}")]
    AtomCount { expected: usize, found: usize },

    #[error("unsupported molecule file extension '{0}' (expected sdf, sd, mol or mol2)")]
    UnsupportedFormat(String),
}

impl MoleculeError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MoleculeError::Parse {
            line,
            message: message.into(),
        }
    }
}
