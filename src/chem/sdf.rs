//! MDL V2000 molfiles and SD files.

use std::io::{BufRead, Write};

use super::{Atom, BondOrder, Molecule, MoleculeError, MoleculeFile};

pub struct SdfFile;

/// Fixed-width field, tolerant of short lines.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn parse_field<T: std::str::FromStr>(line: &str, start: usize, end: usize, line_no: usize, what: &str) -> Result<T, MoleculeError> {
    let raw = column(line, start, end);
    raw.parse()
        .map_err(|_| MoleculeError::parse(line_no, format!("invalid {what} '{raw}'")))
}

fn charge_from_code(code: i32) -> i32 {
    match code {
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        _ => 0,
    }
}

fn code_from_charge(charge: i32) -> i32 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

fn bond_order(code: u8, line_no: usize) -> Result<BondOrder, MoleculeError> {
    match code {
        1 => Ok(BondOrder::Single),
        2 => Ok(BondOrder::Double),
        3 => Ok(BondOrder::Triple),
        4 => Ok(BondOrder::Aromatic),
        other => Err(MoleculeError::parse(line_no, format!("unsupported bond type {other}"))),
    }
}

fn bond_code(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Cursor over numbered lines.
struct Lines {
    lines: Vec<String>,
    pos: usize,
}

impl Lines {
    fn next(&mut self) -> Option<(usize, &str)> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line.trim_end_matches('\r')))
    }

    fn require(&mut self, what: &str) -> Result<(usize, &str), MoleculeError> {
        let at = self.pos + 1;
        self.next()
            .ok_or_else(|| MoleculeError::parse(at, format!("unexpected end of file, expected {what}")))
    }

    fn at_end(&self) -> bool {
        self.lines[self.pos..].iter().all(|l| l.trim().is_empty())
    }
}

fn read_record(lines: &mut Lines) -> Result<Molecule, MoleculeError> {
    let (_, title) = lines.require("title line")?;
    let mut mol = Molecule::new(title.trim());
    lines.require("program line")?;
    lines.require("comment line")?;

    let (n, counts) = lines.require("counts line")?;
    let counts = counts.to_string();
    let n_atoms: usize = parse_field(&counts, 0, 3, n, "atom count")?;
    let n_bonds: usize = parse_field(&counts, 3, 6, n, "bond count")?;

    for _ in 0..n_atoms {
        let (n, line) = lines.require("atom line")?;
        let line = line.to_string();
        let x = parse_field(&line, 0, 10, n, "x coordinate")?;
        let y = parse_field(&line, 10, 20, n, "y coordinate")?;
        let z = parse_field(&line, 20, 30, n, "z coordinate")?;
        let symbol = column(&line, 31, 34);
        let code: i32 = match column(&line, 36, 39) {
            "" => 0,
            _ => parse_field(&line, 36, 39, n, "charge code")?,
        };
        let atom = Atom::new(symbol, [x, y, z])?.with_formal_charge(charge_from_code(code));
        mol.add_atom(atom);
    }

    for _ in 0..n_bonds {
        let (n, line) = lines.require("bond line")?;
        let line = line.to_string();
        let a: usize = parse_field(&line, 0, 3, n, "bond atom")?;
        let b: usize = parse_field(&line, 3, 6, n, "bond atom")?;
        let order = bond_order(parse_field(&line, 6, 9, n, "bond type")?, n)?;
        if a == 0 || b == 0 {
            return Err(MoleculeError::parse(n, "bond atoms are numbered from 1"));
        }
        mol.add_bond(a - 1, b - 1, order)?;
    }

    // properties block; the first M  CHG replaces atom-block charges
    let mut charges_reset = false;
    loop {
        let (n, line) = match lines.next() {
            Some(l) => l,
            None => return Ok(mol),
        };
        if line.starts_with("M  END") {
            break;
        }
        if line.starts_with("$$$$") {
            return Ok(mol);
        }
        if let Some(rest) = line.strip_prefix("M  CHG") {
            if !charges_reset {
                mol.atoms.iter_mut().for_each(|a| a.formal_charge = 0);
                charges_reset = true;
            }
            let values: Vec<i64> = rest
                .split_whitespace()
                .map(|t| t.parse().map_err(|_| MoleculeError::parse(n, format!("invalid M  CHG entry '{t}'"))))
                .collect::<Result<_, _>>()?;
            for pair in values.get(1..).unwrap_or(&[]).chunks(2) {
                if let [idx, charge] = *pair {
                    let atom = (idx as usize)
                        .checked_sub(1)
                        .and_then(|i| mol.atoms.get_mut(i))
                        .ok_or_else(|| MoleculeError::parse(n, format!("M  CHG names missing atom {idx}")))?;
                    atom.formal_charge = charge as i32;
                }
            }
        }
    }

    // data items up to the record separator
    let mut tag: Option<String> = None;
    let mut value: Vec<String> = Vec::new();
    while let Some((_, line)) = lines.next() {
        if line.starts_with("$$$$") {
            break;
        }
        if line.starts_with('>') {
            if let Some(t) = tag.take() {
                mol.set_property(t, value.join("\n"));
            }
            value.clear();
            tag = line
                .find('<')
                .zip(line.rfind('>').filter(|&e| e > 0))
                .and_then(|(s, e)| line.get(s + 1..e))
                .map(str::to_string);
        } else if line.trim().is_empty() {
            if let Some(t) = tag.take() {
                mol.set_property(t, value.join("\n"));
                value.clear();
            }
        } else if tag.is_some() {
            value.push(line.to_string());
        }
    }
    if let Some(t) = tag {
        mol.set_property(t, value.join("\n"));
    }
    Ok(mol)
}

impl MoleculeFile for SdfFile {
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, MoleculeError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        let mut cursor = Lines { lines, pos: 0 };
        let mut molecules = Vec::new();
        while !cursor.at_end() {
            molecules.push(read_record(&mut cursor)?);
        }
        Ok(molecules)
    }

    fn write_to(molecules: &[Molecule], writer: &mut impl Write) -> Result<(), MoleculeError> {
        for mol in molecules {
            writeln!(writer, "{}", mol.title)?;
            writeln!(writer, "  rchem     3D")?;
            writeln!(writer)?;
            writeln!(
                writer,
                "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
                mol.atoms.len(),
                mol.bonds.len()
            )?;
            for atom in &mol.atoms {
                let [x, y, z] = atom.position;
                writeln!(
                    writer,
                    "{x:>10.4}{y:>10.4}{z:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
                    atom.element,
                    code_from_charge(atom.formal_charge)
                )?;
            }
            for bond in &mol.bonds {
                writeln!(
                    writer,
                    "{:>3}{:>3}{:>3}  0  0  0  0",
                    bond.a + 1,
                    bond.b + 1,
                    bond_code(bond.order)
                )?;
            }
            let charged: Vec<(usize, i32)> = mol
                .atoms
                .iter()
                .enumerate()
                .filter(|(_, a)| a.formal_charge != 0)
                .map(|(i, a)| (i + 1, a.formal_charge))
                .collect();
            for chunk in charged.chunks(8) {
                write!(writer, "M  CHG{:>3}", chunk.len())?;
                for (idx, charge) in chunk {
                    write!(writer, " {idx:>3} {charge:>3}")?;
                }
                writeln!(writer)?;
            }
            writeln!(writer, "M  END")?;
            for (key, value) in &mol.properties {
                writeln!(writer, "> <{key}>")?;
                writeln!(writer, "{value}")?;
                writeln!(writer)?;
            }
            writeln!(writer, "$$$$")?;
        }
        Ok(())
    }
}
