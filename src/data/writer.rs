use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;

/// Formatting for [`write_table`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub delimiter: char,
    /// Fixed decimals; `None` prints the shortest round-trip form.
    pub precision: Option<usize>,
    /// Written as a `# `-prefixed first line.
    pub header: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: ' ',
            precision: None,
            header: None,
        }
    }
}

/// Write a table as delimited text, one row per line.
pub fn write_table(path: &Path, table: &Table, options: &WriteOptions) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_table_to(&mut out, table, options)?;
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} to {}", table, path.display());
    Ok(())
}

pub fn write_table_to(out: &mut impl Write, table: &Table, options: &WriteOptions) -> Result<()> {
    if let Some(header) = &options.header {
        writeln!(out, "# {header}")?;
    }
    let sep = options.delimiter.to_string();
    for row in table.rows() {
        let line = row
            .iter()
            .map(|v| format_value(*v, options.precision))
            .collect::<Vec<_>>()
            .join(&sep);
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn format_value(v: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{v:.p$}"),
        None => format!("{v}"),
    }
}

/// Append lines to the end of an existing file, adding a newline first if
/// the file does not already end with one.
pub fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for appending", path.display()))?;

    let len = file.metadata()?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
