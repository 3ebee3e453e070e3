use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use super::{Tool, Verbosity};
use crate::data::columns::{all_columns, data_columns};
use crate::data::writer::{append_lines, write_table, WriteOptions};
use crate::data::{load_table, ColumnSelection, Delimiter, LoadOptions, Table};
use crate::transform::combine::{combine_with_mean, sum_columns};
use crate::transform::column_stats;

/// Text table input options shared by the column tools.
#[derive(clap::Args, Debug, Clone)]
pub struct TableInput {
    /// Field separator for text tables; whitespace when omitted
    #[arg(short, long, default_value = "")]
    pub delimiter: String,

    /// Heading lines to skip before the data
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub skip_rows: usize,
}

impl TableInput {
    pub fn options(&self) -> anyhow::Result<LoadOptions> {
        Ok(LoadOptions {
            delimiter: Delimiter::parse(&self.delimiter)?,
            skip_rows: self.skip_rows,
        })
    }

    pub fn load(&self, path: &std::path::Path) -> anyhow::Result<Table> {
        load_table(path, &self.options()?)
    }
}

/// Mean and population standard deviation of table columns.
#[derive(Parser, Debug)]
#[command(name = "column-stats", version)]
pub struct StatsArgs {
    /// Data file (text, .csv, .json or .parquet)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Zero-based columns to summarise, e.g. "1;2;4" (default: all)
    #[arg(short, long, value_name = "LIST")]
    pub columns: Option<ColumnSelection>,

    /// Also report per-column minimum and maximum
    #[arg(long)]
    pub minmax: bool,

    /// Append the averages and deviations to the input file as comments
    #[arg(short, long)]
    pub output: bool,

    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub table: TableInput,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for StatsArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let table = self.table.load(&self.input)?;
        if let Some(selection) = &self.columns {
            selection.validate(table.n_cols())?;
        }
        let columns = ColumnSelection::resolve(self.columns.as_ref(), || all_columns(&table));
        let stats = column_stats(&table, &columns, self.minmax)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            for line in stats.summary_lines().iter().chain(&stats.minmax_lines()) {
                println!("{line}");
            }
        }

        if self.output {
            append_lines(&self.input, &stats.summary_lines())?;
            log::info!("Appended statistics to {}", self.input.display());
        }
        Ok(())
    }
}

/// Row-wise sum of selected columns next to the independent column.
#[derive(Parser, Debug)]
#[command(name = "column-sum", version)]
pub struct SumArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Columns to add up, e.g. "1;3" (default: every column but the first)
    #[arg(short, long, value_name = "LIST")]
    pub columns: Option<ColumnSelection>,

    /// Column holding the independent variable
    #[arg(short = 'x', long, default_value_t = 0)]
    pub x_column: usize,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub table: TableInput,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for SumArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let table = self.table.load(&self.input)?;
        if let Some(selection) = &self.columns {
            selection.validate(table.n_cols())?;
        }
        let columns = ColumnSelection::resolve(self.columns.as_ref(), || data_columns(&table));
        if columns.contains(&self.x_column) {
            log::warn!("Column {} is the independent column and is summed as well", self.x_column);
        }
        let summed = sum_columns(&table, self.x_column, &columns)?;
        write_table(&self.output, &summed, &WriteOptions::default())
    }
}

/// Concatenate dependent columns of several files and add their mean.
#[derive(Parser, Debug)]
#[command(name = "column-combine", version)]
pub struct CombineArgs {
    /// Files sharing the independent column 0 and the row count
    #[arg(short, long = "input", value_name = "PATH", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub table: TableInput,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for CombineArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let tables = self
            .inputs
            .iter()
            .map(|path| self.table.load(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let names: Vec<String> = self.inputs.iter().map(|p| p.display().to_string()).collect();

        let combined = combine_with_mean(&tables, &names).context("combining columns")?;
        let options = WriteOptions {
            delimiter: '\t',
            precision: Some(3),
            header: Some("Columns in order of x, y1, y2, ..., avg(y)".to_string()),
        };
        write_table(&self.output, &combined, &options)
    }
}
