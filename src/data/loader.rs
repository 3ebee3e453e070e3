use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{BarRecords, Table};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How fields are separated in a plain text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Any run of whitespace (the `np.loadtxt` default).
    #[default]
    Whitespace,
    Char(char),
}

impl Delimiter {
    /// Parse a user-supplied delimiter; empty or blank means whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Delimiter::Whitespace),
            (Some(c), None) if c.is_whitespace() => Ok(Delimiter::Whitespace),
            (Some(c), None) => Ok(Delimiter::Char(c)),
            _ => bail!("delimiter must be a single character, got '{s}'"),
        }
    }

    fn split<'a>(&self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match *self {
            Delimiter::Whitespace => Box::new(line.split_whitespace()),
            Delimiter::Char(c) => Box::new(line.split(c).map(str::trim).filter(|t| !t.is_empty())),
        }
    }
}

/// Options for plain text tables.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub delimiter: Delimiter,
    /// Leading lines to drop before anything else (e.g. a heading line).
    pub skip_rows: usize,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – numeric columns, cast to `f64`
/// * `.json`    – `[[1.0, 2.0], [3.0, 4.0], ...]` (row-major)
/// * `.csv`     – header row followed by numeric records
/// * anything else – whitespace (or `options.delimiter`) separated text,
///   `#` comment lines and blank lines skipped
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        _ => load_text(path, options),
    }
    .with_context(|| format!("loading table from {}", path.display()))?;

    log::info!("Loaded {} from {}", table, path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Plain text loader
// ---------------------------------------------------------------------------

fn load_text(path: &Path, options: &LoadOptions) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading text file")?;
    parse_text_table(&text, options)
}

/// Parse a delimited numeric table from text.
pub fn parse_text_table(text: &str, options: &LoadOptions) -> Result<Table> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for (line_no, line) in data_lines(text, options.skip_rows) {
        let row = options
            .delimiter
            .split(line)
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>()
                    .with_context(|| format!("line {line_no}, field {j}: '{tok}' is not a number"))
            })
            .collect::<Result<Vec<f64>>>()?;

        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                bail!("line {line_no}: expected {w} values, found {}", row.len())
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    Ok(Table::from_rows(rows)?)
}

/// Non-comment, non-blank lines with their 1-based line numbers.
fn data_lines(text: &str, skip_rows: usize) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .skip(skip_rows)
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (row-major, `np.savetxt`-like):
///
/// ```json
/// [
///   [0.0, 1.25, 3.5],
///   [1.0, 1.30, 3.1]
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| json_array_to_f64(rec, i))
        .collect::<Result<Vec<_>>>()?;

    Ok(Table::from_rows(rows)?)
}

fn json_array_to_f64(val: &JsonValue, row: usize) -> Result<Vec<f64>> {
    let arr = val
        .as_array()
        .with_context(|| format!("Row {row}: expected an array of numbers"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Row {row}, [{j}]: not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then numeric records.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    log::debug!("CSV columns: {:?}", headers.iter().collect::<Vec<_>>());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>().with_context(|| {
                    let name = headers.get(j).unwrap_or("?");
                    format!("CSV row {row_no}, column '{name}': '{tok}' is not a number")
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Table::from_rows(rows)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are all numeric.
///
/// Integer and float columns of any width are cast to `f64`; nulls become
/// `NaN`. Works with files written by Pandas, Polars and `generate-sample`.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = vec![Vec::with_capacity(batch.num_rows()); batch.num_columns()];
        } else if columns.len() != batch.num_columns() {
            bail!(
                "record batch has {} columns, expected {}",
                batch.num_columns(),
                columns.len()
            );
        }

        for (i, col) in batch.columns().iter().enumerate() {
            let values = extract_f64_column(col)
                .with_context(|| format!("column '{}'", schema.field(i).name()))?;
            columns[i].extend(values);
        }
    }

    Ok(Table::from_columns(columns)?)
}

/// Cast a numeric Arrow column to `Vec<f64>`.
fn extract_f64_column(col: &ArrayRef) -> Result<Vec<f64>> {
    if !col.data_type().is_numeric() {
        bail!("expected a numeric column, got {:?}", col.data_type());
    }
    let cast = arrow::compute::cast(col, &DataType::Float64).context("casting to Float64")?;
    let values = cast.as_primitive::<Float64Type>();
    Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

// ---------------------------------------------------------------------------
// Bar records: `x;y[;label[;err]]`
// ---------------------------------------------------------------------------

/// Load semicolon-separated bar chart records.
///
/// Labels are kept only if every record has a third field, error bars only
/// if every record has a fourth.
pub fn load_bar_records(path: &Path) -> Result<BarRecords> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading bar records from {}", path.display()))?;
    parse_bar_records(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_bar_records(text: &str) -> Result<BarRecords> {
    let body: String = data_lines(text, 0)
        .map(|(_, line)| format!("{line}\n"))
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut records = BarRecords::default();
    let mut labels = Vec::new();
    let mut errors = Vec::new();
    let mut min_fields = usize::MAX;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("record {row_no}"))?;
        min_fields = min_fields.min(record.len());
        if record.len() < 2 {
            bail!("record {row_no}: expected at least x;y");
        }
        let field = |j: usize| record.get(j).unwrap_or("");
        let number = |j: usize| {
            field(j)
                .parse::<f64>()
                .with_context(|| format!("record {row_no}, field {j}: '{}' is not a number", field(j)))
        };

        records.x.push(number(0)?);
        records.y.push(number(1)?);
        labels.push(field(2).to_string());
        errors.push(if record.len() > 3 { number(3)? } else { 0.0 });
    }

    if min_fields >= 3 && min_fields != usize::MAX {
        records.labels = labels;
    }
    records.errors = if min_fields >= 4 && min_fields != usize::MAX {
        errors
    } else {
        vec![0.0; records.x.len()]
    };

    Ok(records)
}

// ---------------------------------------------------------------------------
// Labelled rows: `label v1 v2 ...`
// ---------------------------------------------------------------------------

/// Whitespace rows whose first field is a text label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledRows {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Load whitespace rows with a leading label column, skipping `skip_rows`
/// heading lines.
pub fn load_labeled_rows(path: &Path, skip_rows: usize) -> Result<LabeledRows> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_labeled_rows(&text, skip_rows).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_labeled_rows(text: &str, skip_rows: usize) -> Result<LabeledRows> {
    let mut out = LabeledRows::default();
    for (line_no, line) in data_lines(text, skip_rows) {
        let mut fields = line.split_whitespace();
        let label = fields.next().unwrap_or_default().to_string();
        let values = fields
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>()
                    .with_context(|| format!("line {line_no}, field {}: '{tok}' is not a number", j + 1))
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = out.values.first() {
            if first.len() != values.len() {
                bail!("line {line_no}: expected {} values, found {}", first.len(), values.len());
            }
        }
        out.labels.push(label);
        out.values.push(values);
    }
    Ok(out)
}
