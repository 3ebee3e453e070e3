use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context};
use clap::Parser;

use super::{Tool, Verbosity};
use crate::chem::charges::transfer_coordinates;
use crate::chem::format::{read_molecules, write_molecules};
use crate::chem::geometry::{group_conformers, invertible_nitrogen_angle_sums};
use crate::chem::{ChargeModel, GasteigerCharges, Molecule, MoleculeFormat};

// ---------------------------------------------------------------------------
// mol-charge
// ---------------------------------------------------------------------------

/// Assign partial charges and write MOL2.
#[derive(Parser, Debug)]
#[command(name = "mol-charge", version)]
pub struct ChargeArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output file; must be a format that stores charges (.mol2)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Charged molecules to receive the input coordinates instead of
    /// computing charges
    #[arg(short, long, value_name = "PATH")]
    pub reffile: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Charge every molecule, warning about (and keeping) the failures.
pub fn charge_all(molecules: &mut [Molecule], model: &impl ChargeModel) -> usize {
    let mut failed = 0;
    for mol in molecules.iter_mut() {
        if let Err(err) = model.assign(mol) {
            log::warn!("Unable to charge '{}': {err}", mol.title);
            failed += 1;
        }
    }
    failed
}

/// Copy input coordinates onto the matching reference molecules, skipping
/// pairs whose atom counts differ.
pub fn recoordinate(inputs: &[Molecule], references: &[Molecule]) -> Vec<Molecule> {
    if inputs.len() != references.len() {
        log::warn!(
            "{} input molecule(s) but {} reference(s); extra records are ignored",
            inputs.len(),
            references.len()
        );
    }
    inputs
        .iter()
        .zip(references)
        .filter_map(|(input, reference)| match transfer_coordinates(input, reference) {
            Ok(mol) => Some(mol),
            Err(err) => {
                log::warn!("Skipping '{}': {err}", input.title);
                None
            }
        })
        .collect()
}

impl Tool for ChargeArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        ensure!(self.input.exists(), "input file {} does not exist", self.input.display());
        if !MoleculeFormat::from_path(&self.output)?.carries_partial_charges() {
            bail!("{} cannot store partial charges; write a .mol2 file", self.output.display());
        }

        let mut molecules = read_molecules(&self.input)?;
        let molecules = match &self.reffile {
            Some(reffile) => {
                let references = read_molecules(reffile)?;
                recoordinate(&molecules, &references)
            }
            None => {
                let model = GasteigerCharges::default();
                let failed = charge_all(&mut molecules, &model);
                log::info!("{} charges on {} molecule(s), {failed} failed", model.name(), molecules.len());
                molecules
            }
        };
        write_molecules(&molecules, &self.output)
    }
}

// ---------------------------------------------------------------------------
// mol-convert
// ---------------------------------------------------------------------------

/// Convert between molecule file formats.
#[derive(Parser, Debug)]
#[command(name = "mol-convert", version)]
pub struct ConvertArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for ConvertArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        // fail on the output extension before reading anything
        MoleculeFormat::from_path(&self.output)?;
        let molecules = read_molecules(&self.input)?;
        write_molecules(&molecules, &self.output)
    }
}

// ---------------------------------------------------------------------------
// mol-filter
// ---------------------------------------------------------------------------

/// Keep molecules containing an element outside a list.
#[derive(Parser, Debug)]
#[command(name = "mol-filter", version)]
pub struct FilterArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Atomic numbers that alone do not make a molecule interesting
    #[arg(short, long, value_name = "Z", num_args = 1.., default_values_t = [1u8, 6, 7, 8])]
    pub boring: Vec<u8>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

pub fn filter_interesting(molecules: Vec<Molecule>, boring: &[u8]) -> Vec<Molecule> {
    molecules.into_iter().filter(|m| m.has_atom_outside(boring)).collect()
}

impl Tool for FilterArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let molecules = read_molecules(&self.input)?;
        let total = molecules.len();
        let kept = filter_interesting(molecules, &self.boring);
        log::info!("Kept {} of {total} molecule(s)", kept.len());
        write_molecules(&kept, &self.output)
    }
}

// ---------------------------------------------------------------------------
// mol-classify-n
// ---------------------------------------------------------------------------

/// Angle sums around invertible nitrogens, per conformer.
#[derive(Parser, Debug)]
#[command(name = "mol-classify-n", version)]
pub struct ClassifyArgs {
    /// SDF (or MOL2) file; consecutive records with one title are
    /// conformers of one molecule
    #[arg(short = 'f', long, value_name = "PATH")]
    pub filename: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Report lines: a blank line and `title<TAB>conformers` per molecule, then
/// one line per invertible nitrogen of every conformer.
pub fn classification_report(molecules: &[Molecule]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in group_conformers(molecules) {
        lines.push(String::new());
        lines.push(format!("{}\t{}", group.title, group.members.len()));
        for &i in &group.members {
            for (atom, sum) in invertible_nitrogen_angle_sums(&molecules[i]) {
                lines.push(format!("Invertible N with index {atom}: {sum:.6}"));
            }
        }
    }
    lines
}

impl Tool for ClassifyArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let molecules = read_molecules(&self.filename)?;
        for line in classification_report(&molecules) {
            println!("{line}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// mol-combine
// ---------------------------------------------------------------------------

/// Gather the first molecule of every file in a directory into one SDF.
#[derive(Parser, Debug)]
#[command(name = "mol-combine", version)]
pub struct CombineMolsArgs {
    /// Directory holding the molecule files
    #[arg(short, long, value_name = "DIR")]
    pub infiles: PathBuf,

    /// SDF file to create
    #[arg(short, long, value_name = "PATH")]
    pub outfile: PathBuf,

    /// Extension of the files to collect
    #[arg(short, long, default_value = "mol2")]
    pub extension: String,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Existing outputs at most this large are treated as empty.
const EXISTING_OUTPUT_LIMIT: u64 = 10;

/// Sorted files in `dir` with the extension `ext` (case-insensitive).
pub fn files_with_extension(dir: &Path, ext: &str) -> anyhow::Result<Vec<PathBuf>> {
    let ext = ext.trim_start_matches('.');
    let mut files = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    files.retain(|p| {
        p.is_file()
            && p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    });
    files.sort();
    Ok(files)
}

impl Tool for CombineMolsArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        if let Ok(meta) = std::fs::metadata(&self.outfile) {
            ensure!(
                meta.len() <= EXISTING_OUTPUT_LIMIT,
                "output {} already exists",
                self.outfile.display()
            );
        }
        if MoleculeFormat::from_path(&self.outfile)? != MoleculeFormat::Sdf {
            bail!("output must be an .sdf file");
        }

        let mut combined = Vec::new();
        for path in files_with_extension(&self.infiles, &self.extension)? {
            let Some(mut mol) = read_molecules(&path)?.into_iter().next() else {
                log::warn!("No molecule in {}", path.display());
                continue;
            };
            if let Some(stem) = path.file_stem() {
                mol.title = stem.to_string_lossy().into_owned();
            }
            log::info!("{}", path.display());
            combined.push(mol);
        }
        ensure!(!combined.is_empty(), "no .{} molecule files in {}", self.extension, self.infiles.display());
        write_molecules(&combined, &self.outfile)
    }
}
