//! TRIPOS MOL2 files.

use std::io::{BufRead, Write};

use super::{Atom, BondOrder, Hybridization, Molecule, MoleculeError, MoleculeFile};

pub struct Mol2File;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Molecule,
    Atom,
    Bond,
    Other,
}

/// Element part of a SYBYL atom type (`C.ar` → `C`, `Cl` → `Cl`).
fn element_of(sybyl: &str) -> &str {
    sybyl.split('.').next().unwrap_or(sybyl)
}

fn bond_order(kind: &str, line: usize) -> Result<BondOrder, MoleculeError> {
    match kind.to_ascii_lowercase().as_str() {
        "1" | "am" | "du" | "un" | "nc" => Ok(BondOrder::Single),
        "2" => Ok(BondOrder::Double),
        "3" => Ok(BondOrder::Triple),
        "ar" => Ok(BondOrder::Aromatic),
        other => Err(MoleculeError::parse(line, format!("unknown bond type '{other}'"))),
    }
}

fn bond_kind(order: BondOrder) -> &'static str {
    match order {
        BondOrder::Single => "1",
        BondOrder::Double => "2",
        BondOrder::Triple => "3",
        BondOrder::Aromatic => "ar",
    }
}

/// SYBYL atom type derived from element and bonding.
pub fn sybyl_type(mol: &Molecule, atom: usize) -> String {
    let a = &mol.atoms[atom];
    let aromatic = mol.bonds_of(atom).any(|b| b.order == BondOrder::Aromatic);
    let degree = mol.bonds_of(atom).count();
    let hyb = mol.hybridization(atom);
    let suffix = match a.element.as_str() {
        "C" => match (aromatic, hyb) {
            (true, _) => "ar",
            (_, Hybridization::Sp) => "1",
            (_, Hybridization::Sp2) => "2",
            (_, Hybridization::Sp3) => "3",
        },
        "N" => match (aromatic, hyb) {
            (true, _) => "ar",
            (_, Hybridization::Sp) => "1",
            (_, Hybridization::Sp2) => "2",
            (_, Hybridization::Sp3) if degree == 4 => "4",
            (_, Hybridization::Sp3) => "3",
        },
        "O" | "S" => match hyb {
            Hybridization::Sp3 => "3",
            _ => "2",
        },
        "P" => "3",
        _ => return a.element.clone(),
    };
    format!("{}.{}", a.element, suffix)
}

impl MoleculeFile for Mol2File {
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, MoleculeError> {
        let mut molecules: Vec<Molecule> = Vec::new();
        let mut section = Section::None;
        let mut header_line = 0usize;
        let mut charged = true;

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = n + 1;
            let trimmed = line.trim();

            if let Some(name) = trimmed.strip_prefix("@<TRIPOS>") {
                section = match name {
                    "MOLECULE" => {
                        molecules.push(Molecule::default());
                        header_line = 0;
                        charged = true;
                        Section::Molecule
                    }
                    "ATOM" => Section::Atom,
                    "BOND" => Section::Bond,
                    _ => Section::Other,
                };
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some(mol) = molecules.last_mut() else {
                continue;
            };
            let fields: Vec<&str> = trimmed.split_whitespace().collect();

            match section {
                Section::Molecule => {
                    match header_line {
                        0 => mol.title = trimmed.to_string(),
                        3 => charged = !trimmed.eq_ignore_ascii_case("NO_CHARGES"),
                        _ => {}
                    }
                    header_line += 1;
                }
                Section::Atom => {
                    if fields.len() < 6 {
                        return Err(MoleculeError::parse(line_no, "atom line needs id, name, x, y, z, type"));
                    }
                    let coord = |i: usize| {
                        fields[i]
                            .parse::<f64>()
                            .map_err(|_| MoleculeError::parse(line_no, format!("invalid coordinate '{}'", fields[i])))
                    };
                    let mut atom = Atom::new(element_of(fields[5]), [coord(2)?, coord(3)?, coord(4)?])?;
                    atom.name = Some(fields[1].to_string());
                    if charged {
                        if let Some(q) = fields.get(8) {
                            atom.partial_charge = Some(
                                q.parse()
                                    .map_err(|_| MoleculeError::parse(line_no, format!("invalid charge '{q}'")))?,
                            );
                        }
                    }
                    mol.add_atom(atom);
                }
                Section::Bond => {
                    if fields.len() < 4 {
                        return Err(MoleculeError::parse(line_no, "bond line needs id, atom, atom, type"));
                    }
                    let index = |i: usize| {
                        fields[i]
                            .parse::<usize>()
                            .ok()
                            .and_then(|v| v.checked_sub(1))
                            .ok_or_else(|| MoleculeError::parse(line_no, format!("invalid atom id '{}'", fields[i])))
                    };
                    let order = bond_order(fields[3], line_no)?;
                    mol.add_bond(index(1)?, index(2)?, order)?;
                }
                Section::None | Section::Other => {}
            }
        }
        Ok(molecules)
    }

    fn write_to(molecules: &[Molecule], writer: &mut impl Write) -> Result<(), MoleculeError> {
        for mol in molecules {
            let charges = if mol.has_partial_charges() {
                "USER_CHARGES"
            } else {
                "NO_CHARGES"
            };
            writeln!(writer, "@<TRIPOS>MOLECULE")?;
            writeln!(writer, "{}", mol.title)?;
            writeln!(writer, "{:>5} {:>5}     1     0     0", mol.atoms.len(), mol.bonds.len())?;
            writeln!(writer, "SMALL")?;
            writeln!(writer, "{charges}")?;
            writeln!(writer)?;
            writeln!(writer, "@<TRIPOS>ATOM")?;
            for (i, atom) in mol.atoms.iter().enumerate() {
                let [x, y, z] = atom.position;
                let name = atom
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", atom.element, i + 1));
                writeln!(
                    writer,
                    "{:>7} {:<8} {x:>10.4} {y:>10.4} {z:>10.4} {:<6} {:>4}  {:<8} {:>10.6}",
                    i + 1,
                    name,
                    sybyl_type(mol, i),
                    1,
                    "UNL1",
                    atom.partial_charge.unwrap_or(0.0)
                )?;
            }
            writeln!(writer, "@<TRIPOS>BOND")?;
            for (i, bond) in mol.bonds.iter().enumerate() {
                writeln!(
                    writer,
                    "{:>6} {:>5} {:>5} {:>4}",
                    i + 1,
                    bond.a + 1,
                    bond.b + 1,
                    bond_kind(bond.order)
                )?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::molecule::tests::water;

    const BENZENE_RING: &str = "\
@<TRIPOS>MOLECULE
ring
 2 1 1 0 0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
      1 C1     0.0000  0.0000  0.0000 C.ar   1  UNL1  -0.0620
      2 N2     1.3900  0.0000  0.0000 N.ar   1  UNL1   0.0620
@<TRIPOS>BOND
     1     1     2   ar
";

    #[test]
    fn reads_atoms_bonds_and_charges() {
        let mols = Mol2File::read_from(&mut BENZENE_RING.as_bytes()).unwrap();
        assert_eq!(mols.len(), 1);
        let mol = &mols[0];
        assert_eq!(mol.title, "ring");
        assert_eq!(mol.atoms[1].element, "N");
        assert_eq!(mol.atoms[1].name.as_deref(), Some("N2"));
        assert_eq!(mol.atoms[0].partial_charge, Some(-0.062));
        assert_eq!(mol.bonds[0].order, BondOrder::Aromatic);
        assert_eq!(sybyl_type(mol, 0), "C.ar");
    }

    #[test]
    fn no_charges_header_ignores_column() {
        let text = BENZENE_RING.replace("USER_CHARGES", "NO_CHARGES");
        let mols = Mol2File::read_from(&mut text.as_bytes()).unwrap();
        assert!(!mols[0].has_partial_charges());
    }

    #[test]
    fn write_then_read_keeps_charges() {
        let mut mol = water();
        for (atom, q) in mol.atoms.iter_mut().zip([-0.8, 0.4, 0.4]) {
            atom.partial_charge = Some(q);
        }
        let mut buf = Vec::new();
        Mol2File::write_to(&[mol.clone(), water()], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("O.3"));
        let back = Mol2File::read_from(&mut text.as_bytes()).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].atoms[0].partial_charge, Some(-0.8));
        assert!(!back[1].has_partial_charges());
        assert_eq!(back[0].bonds, mol.bonds);
    }
}
