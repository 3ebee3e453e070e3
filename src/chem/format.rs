use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{Mol2File, Molecule, MoleculeError, SdfFile};

/// Reading and writing one molecule file format.
///
/// Implementors handle the format-specific parsing and serialization;
/// the path helpers open buffered files around them.
pub trait MoleculeFile {
    /// Every molecule record in the stream, in order.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, MoleculeError>;

    fn write_to(molecules: &[Molecule], writer: &mut impl Write) -> Result<(), MoleculeError>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>, MoleculeError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(molecules: &[Molecule], path: P) -> Result<(), MoleculeError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecules, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Supported formats, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoleculeFormat {
    Sdf,
    Mol2,
}

impl MoleculeFormat {
    pub fn from_path(path: &Path) -> Result<Self, MoleculeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "sdf" | "sd" | "mol" => Ok(MoleculeFormat::Sdf),
            "mol2" => Ok(MoleculeFormat::Mol2),
            _ => Err(MoleculeError::UnsupportedFormat(ext)),
        }
    }

    /// Whether the format stores per-atom partial charges.
    pub fn carries_partial_charges(self) -> bool {
        matches!(self, MoleculeFormat::Mol2)
    }

    pub fn read_path(self, path: &Path) -> Result<Vec<Molecule>, MoleculeError> {
        match self {
            MoleculeFormat::Sdf => SdfFile::read_from_path(path),
            MoleculeFormat::Mol2 => Mol2File::read_from_path(path),
        }
    }

    pub fn write_path(self, molecules: &[Molecule], path: &Path) -> Result<(), MoleculeError> {
        match self {
            MoleculeFormat::Sdf => SdfFile::write_to_path(molecules, path),
            MoleculeFormat::Mol2 => Mol2File::write_to_path(molecules, path),
        }
    }
}

/// Read every molecule from `path`, choosing the format by extension.
pub fn read_molecules(path: &Path) -> anyhow::Result<Vec<Molecule>> {
    use anyhow::Context;

    let format = MoleculeFormat::from_path(path)?;
    let molecules = format
        .read_path(path)
        .with_context(|| format!("Failed to read molecules from {}", path.display()))?;
    log::info!("Read {} molecule(s) from {}", molecules.len(), path.display());
    Ok(molecules)
}

pub fn write_molecules(molecules: &[Molecule], path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    let format = MoleculeFormat::from_path(path)?;
    format
        .write_path(molecules, path)
        .with_context(|| format!("Failed to write molecules to {}", path.display()))?;
    log::info!("Wrote {} molecule(s) to {}", molecules.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_by_extension() {
        assert_eq!(MoleculeFormat::from_path(Path::new("a/b.SDF")).unwrap(), MoleculeFormat::Sdf);
        assert_eq!(MoleculeFormat::from_path(Path::new("x.mol2")).unwrap(), MoleculeFormat::Mol2);
        assert!(matches!(
            MoleculeFormat::from_path(Path::new("x.pdb")),
            Err(MoleculeError::UnsupportedFormat(e)) if e == "pdb"
        ));
        assert!(MoleculeFormat::from_path(Path::new("noext")).is_err());
        assert!(!MoleculeFormat::Sdf.carries_partial_charges());
    }
}
