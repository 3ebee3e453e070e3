use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context};
use clap::Parser;

use super::columns::TableInput;
use super::{split_list, FigureArgs, Tool, Verbosity};
use crate::chem::format::read_molecules;
use crate::data::columns::data_columns;
use crate::data::loader::{load_bar_records, load_labeled_rows};
use crate::data::{ColumnSelection, SeriesSet};
use crate::grid::{read_dx, Axis};
use crate::plot::bar::{BarChart, BarMode};
use crate::plot::contour::ContourSlice;
use crate::plot::histogram::NormalizedHistograms;
use crate::plot::polar::PolarHistogram;
use crate::plot::profile::{profile_table, sd_tag_profile, ProfilePlot};
use crate::plot::scatter::ScatterPlot;
use crate::plot::save_figure;
use crate::plot::xy::XyPlot;
use crate::transform::histogram::{angular_histogram, normalized_histogram};
use crate::transform::series::apply_mode;
use crate::transform::{ProcessingMode, StatisticalInefficiency};

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Explicit labels from `"a;b"`, falling back to file stems.
fn labels_for(paths: &[PathBuf], explicit: Option<&str>) -> Vec<String> {
    let given = explicit.map(split_list).unwrap_or_default();
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| given.get(i).cloned().unwrap_or_else(|| file_label(p)))
        .collect()
}

// ---------------------------------------------------------------------------
// plot-bar
// ---------------------------------------------------------------------------

/// Bar chart of `x;y[;label[;err]]` records.
#[derive(Parser, Debug)]
#[command(name = "plot-bar", version)]
pub struct BarArgs {
    /// Semicolon-separated records
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Cluster bars by runs of adjacent x and color by position in the run
    #[arg(short, long)]
    pub group: bool,

    /// Dashed stems with a marker instead of bars
    #[arg(short, long, conflicts_with = "group")]
    pub line: bool,

    /// Horizontal bars
    #[arg(long)]
    pub horiz: bool,

    /// Legend entries for the grouped colors, e.g. "wt;mutant"
    #[arg(long)]
    pub legend: Option<String>,

    #[command(flatten)]
    pub figure: FigureArgs,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for BarArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let records = load_bar_records(&self.input)?;
        let mode = if self.group {
            BarMode::Grouped
        } else if self.line {
            BarMode::Stems
        } else {
            BarMode::Plain
        };
        let mut chart = BarChart::new(records, mode, self.horiz, self.figure.labels());
        if let Some(legend) = &self.legend {
            chart.group_names = split_list(legend);
        }
        save_figure(&chart, &self.figure.output, &self.figure.style())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-xy
// ---------------------------------------------------------------------------

/// Line plot of table columns against column 0.
#[derive(Parser, Debug)]
#[command(name = "plot-xy", version)]
pub struct XyArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Columns to plot, e.g. "1;3" (default: every column but the first)
    #[arg(short, long, value_name = "LIST")]
    pub columns: Option<ColumnSelection>,

    /// Table of uncertainties shaped like the input, drawn as error bars
    #[arg(short, long, value_name = "PATH", conflicts_with = "mean")]
    pub errors: Option<PathBuf>,

    /// Moving average window
    #[arg(short, long, value_name = "N", conflicts_with = "subsample")]
    pub mean: Option<usize>,

    /// Keep only statistically decorrelated samples
    #[arg(long)]
    pub subsample: bool,

    /// x spacing of the averaged points
    #[arg(long, default_value_t = 0.02)]
    pub x_scale: f64,

    /// Split a single column into this many consecutive groups
    #[arg(short, long, value_name = "K")]
    pub group: Option<usize>,

    /// Side-by-side panels for the groups; must divide the group count
    #[arg(long, default_value_t = 1)]
    pub subplots: usize,

    /// Shade the x span A:B (repeatable)
    #[arg(long, value_name = "A:B", value_parser = parse_span)]
    pub shade: Vec<(f64, f64)>,

    /// Series labels, e.g. "run 1;run 2"
    #[arg(long)]
    pub legend: Option<String>,

    /// Hide the grid
    #[arg(long)]
    pub no_grid: bool,

    #[command(flatten)]
    pub table: TableInput,

    #[command(flatten)]
    pub figure: FigureArgs,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

fn parse_span(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s.split_once(':').ok_or_else(|| format!("expected A:B, got '{s}'"))?;
    let num = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}"));
    let (a, b) = (num(a)?, num(b)?);
    Ok((a.min(b), a.max(b)))
}

impl XyArgs {
    fn series(&self) -> anyhow::Result<SeriesSet> {
        let table = self.table.load(&self.input)?;
        if let Some(selection) = &self.columns {
            selection.validate(table.n_cols())?;
        }
        let columns = ColumnSelection::resolve(self.columns.as_ref(), || {
            if table.n_cols() > 1 {
                data_columns(&table)
            } else {
                vec![0]
            }
        });
        let mut set = SeriesSet::from_table(&table, 0, &columns)?;

        if let Some(path) = &self.errors {
            let errors = self.table.load(path)?;
            ensure!(
                errors.n_rows() == table.n_rows(),
                "{} has {} rows, the data has {}",
                path.display(),
                errors.n_rows(),
                table.n_rows()
            );
            for (series, &c) in set.series.iter_mut().zip(&columns) {
                let err = errors
                    .column(c)
                    .with_context(|| format!("uncertainties in {}", path.display()))?
                    .to_vec();
                *series = series.clone().with_errors(err)?;
            }
        }
        if let Some(legend) = &self.legend {
            set.relabel(&split_list(legend));
        }
        Ok(set)
    }
}

impl Tool for XyArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let mode = ProcessingMode::from_options(self.subsample, self.mean, self.x_scale).map_err(anyhow::Error::msg)?;
        let set = apply_mode(&self.series()?, mode, &StatisticalInefficiency::default())?;
        for s in &set {
            log::info!("Series '{}': {} points", s.label, s.len());
        }

        let mut plot = match self.group {
            Some(groups) => {
                let [single] = set.series.as_slice() else {
                    bail!("grouping needs exactly one column, {} selected", set.len());
                };
                XyPlot::grouped(&single.y, groups, self.subplots, self.figure.labels())?
            }
            None => {
                let mut plot = XyPlot::single(set, self.figure.labels());
                plot.show_legend = self.legend.is_some();
                plot
            }
        };
        plot.shaded = self.shade.clone();
        plot.grid = !self.no_grid;
        save_figure(&plot, &self.figure.output, &self.figure.style())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-scatter
// ---------------------------------------------------------------------------

/// Labeled points with error bars from `label x _ v1 e1 [v2 e2 ...]` rows.
#[derive(Parser, Debug)]
#[command(name = "plot-scatter", version)]
pub struct ScatterArgs {
    /// Whitespace table; the first line is a heading
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Draw y = x and y = x ± 1
    #[arg(long)]
    pub guides: bool,

    /// Names of the value columns, e.g. "calc;expt"
    #[arg(long)]
    pub sets: Option<String>,

    #[command(flatten)]
    pub figure: FigureArgs,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for ScatterArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let rows = load_labeled_rows(&self.input, 1)?;
        log::info!("{} rows from {}", rows.labels.len(), self.input.display());
        let mut plot = ScatterPlot::from_rows(&rows, self.figure.labels())?;
        plot.guides = self.guides;
        if let Some(sets) = &self.sets {
            for (name, given) in plot.set_names.iter_mut().zip(split_list(sets)) {
                *name = given;
            }
        }
        save_figure(&plot, &self.figure.output, &self.figure.style())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-polar
// ---------------------------------------------------------------------------

/// Rose diagram of angles in degrees.
#[derive(Parser, Debug)]
#[command(name = "plot-polar", version)]
pub struct PolarArgs {
    /// Time/angle table
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// More tables overlaid on the first
    #[arg(short, long, value_name = "PATH", num_args = 1..)]
    pub extra: Vec<PathBuf>,

    /// Column holding the angle in degrees
    #[arg(short, long, default_value_t = 1)]
    pub column: usize,

    /// Angular bins over the full circle
    #[arg(short, long, default_value_t = 72)]
    pub bins: usize,

    /// Radial limit
    #[arg(long, value_name = "COUNT")]
    pub rmax: Option<f64>,

    /// Legend entries, e.g. "apo;holo" (default: file names)
    #[arg(long)]
    pub legend: Option<String>,

    #[command(flatten)]
    pub table: TableInput,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Figure title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Use the compact publication layout
    #[arg(long)]
    pub publish: bool,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for PolarArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        ensure!(self.bins > 0, "bin count must be positive");
        let paths: Vec<PathBuf> = std::iter::once(self.input.clone()).chain(self.extra.iter().cloned()).collect();
        let names = labels_for(&paths, self.legend.as_deref());

        let mut histograms = Vec::with_capacity(paths.len());
        for (path, name) in paths.iter().zip(names) {
            let table = self.table.load(path)?;
            let radians: Vec<f64> = table.column(self.column)?.iter().map(|d| d.to_radians()).collect();
            histograms.push((name, angular_histogram(&radians, self.bins)));
        }

        let mut plot = PolarHistogram::new(histograms);
        plot.r_max = self.rmax;
        plot.title = self.title.clone();
        let style = crate::plot::FigureStyle::from_flag(self.publish);
        save_figure(&plot, &self.output, &style)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-hist
// ---------------------------------------------------------------------------

/// Normalized histograms of one column from several files.
#[derive(Parser, Debug)]
#[command(name = "plot-hist", version)]
pub struct HistArgs {
    #[arg(short, long = "input", value_name = "PATH", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Column to bin
    #[arg(short, long, default_value_t = 1)]
    pub column: usize,

    #[arg(short, long, default_value_t = 100)]
    pub bins: usize,

    /// Lower edge of the binned range
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper edge of the binned range
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max: f64,

    /// Overlay all histograms horizontally in one panel
    #[arg(long)]
    pub together: bool,

    /// Legend entries, e.g. "a;b" (default: file names)
    #[arg(long)]
    pub legend: Option<String>,

    #[command(flatten)]
    pub table: TableInput,

    #[command(flatten)]
    pub figure: FigureArgs,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for HistArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        ensure!(self.max > self.min, "empty range {}..{}", self.min, self.max);
        ensure!(self.bins > 0, "bin count must be positive");
        let names = labels_for(&self.inputs, self.legend.as_deref());
        let entries = self
            .inputs
            .iter()
            .zip(names)
            .map(|(path, name)| {
                let table = self.table.load(path)?;
                let values = table.column(self.column)?;
                Ok::<_, anyhow::Error>((name, normalized_histogram(values, self.min, self.max, self.bins)))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let plot = NormalizedHistograms::new(entries, self.together, self.figure.labels());
        save_figure(&plot, &self.figure.output, &self.figure.style())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-dx
// ---------------------------------------------------------------------------

/// Filled contour of one plane of an OpenDX grid.
#[derive(Parser, Debug)]
#[command(name = "plot-dx", version)]
pub struct DxArgs {
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Axis the plane is orthogonal to
    #[arg(short, long, value_enum)]
    pub axis: Axis,

    /// Grid index along the axis (default: the middle plane)
    #[arg(short = 'n', long)]
    pub index: Option<usize>,

    /// Factor applied to the grid values (kT/e to mV by default)
    #[arg(long, default_value_t = 25.7)]
    pub scale: f64,

    /// Number of filled bands
    #[arg(long, default_value_t = 6)]
    pub levels: usize,

    #[arg(long, allow_negative_numbers = true)]
    pub vmin: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub vmax: Option<f64>,

    /// Color bar title
    #[arg(long, default_value = "mV")]
    pub unit: String,

    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Figure title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Use the compact publication layout
    #[arg(long)]
    pub publish: bool,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for DxArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        ensure!(self.levels > 0, "level count must be positive");
        let grid = read_dx(&self.input)?;
        let index = self.index.unwrap_or(grid.counts[self.axis.index()] / 2);
        log::info!("Slicing {} = {index}", self.axis);
        let slice = grid.slice(self.axis, index)?.scaled_from_zero(self.scale);
        if let Some((lo, hi)) = slice.min_max() {
            log::info!("Scaled values span {lo:.3} to {hi:.3} {}", self.unit);
        }

        let mut plot = ContourSlice::new(slice, self.levels);
        plot.vmin = self.vmin;
        plot.vmax = self.vmax;
        plot.unit = self.unit.clone();
        plot.title = self.title.clone();
        save_figure(&plot, &self.output, &crate::plot::FigureStyle::from_flag(self.publish))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// plot-sdf
// ---------------------------------------------------------------------------

/// Relative energies along a scan stored as SD data items.
#[derive(Parser, Debug)]
#[command(name = "plot-sdf", version)]
pub struct SdfArgs {
    /// SDF files whose titles are the scan step
    #[arg(short, long = "input", value_name = "PATH", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Data tags holding energies in Hartree
    #[arg(long = "tag", value_name = "TAG", num_args = 1.., required = true)]
    pub tags: Vec<String>,

    /// Also print the profile values
    #[arg(long)]
    pub table: bool,

    #[command(flatten)]
    pub figure: FigureArgs,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Tool for SdfArgs {
    fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    fn run(self) -> anyhow::Result<()> {
        let mut series = Vec::new();
        for path in &self.inputs {
            let molecules = read_molecules(path)?;
            for tag in &self.tags {
                let label = if self.inputs.len() == 1 {
                    tag.clone()
                } else {
                    format!("{} {tag}", file_label(path))
                };
                series.push(sd_tag_profile(&molecules, tag, label).with_context(|| path.display().to_string())?);
            }
        }
        let set = SeriesSet::new(series);
        if self.table {
            for line in profile_table(&set) {
                println!("{line}");
            }
        }

        let mut labels = self.figure.labels();
        if labels.y.is_empty() {
            labels.y = "Relative energy (kcal/mol)".to_string();
        }
        let plot = ProfilePlot { series: set, labels };
        save_figure(&plot, &self.figure.output, &self.figure.style())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_ordered() {
        assert_eq!(parse_span("5:2.5"), Ok((2.5, 5.0)));
        assert!(parse_span("5").is_err());
    }

    #[test]
    fn labels_fall_back_to_stems() {
        let paths = vec![PathBuf::from("dir/apo.dat"), PathBuf::from("holo.dat")];
        assert_eq!(labels_for(&paths, None), vec!["apo", "holo"]);
        assert_eq!(labels_for(&paths, Some("A")), vec!["A", "holo"]);
    }

    #[test]
    fn xy_mode_flags_conflict() {
        let parsed = XyArgs::try_parse_from(["plot-xy", "-i", "a.dat", "-o", "a.png", "--mean", "5", "--subsample"]);
        assert!(parsed.is_err());
        let parsed = XyArgs::try_parse_from(["plot-xy", "-i", "a.dat", "-o", "a.png", "--shade", "1:2", "--shade", "4:3"]);
        assert_eq!(parsed.unwrap().shade, vec![(1.0, 2.0), (3.0, 4.0)]);
    }
}
