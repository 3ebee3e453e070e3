//! Figure rendering with [`plotters`].
//!
//! Every figure implements [`Figure`] and is drawn onto whichever backend
//! the output extension asks for: `.png` goes through the bitmap backend,
//! `.svg` through the SVG backend.

pub mod bar;
pub mod contour;
pub mod histogram;
pub mod polar;
pub mod profile;
pub mod scatter;
pub mod style;
pub mod xy;

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

pub use style::FigureStyle;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported output format '{0}' (expected .png or .svg)")]
    UnsupportedOutput(String),
}

pub type Result<T> = core::result::Result<T, PlotError>;

pub(crate) fn area_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

pub(crate) fn config_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

pub(crate) fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Plain numeric cartesian chart used by most figures.
pub type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Something that can draw itself into a drawing area.
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()>;
}

/// Image format picked from an output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(PlotError::UnsupportedOutput(ext)),
        }
    }
}

/// Render `figure` to `path`.
pub fn save_figure(figure: &impl Figure, path: &Path, style: &FigureStyle) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, style.size).into_drawing_area();
            render(figure, &root, style)
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, style.size).into_drawing_area();
            render(figure, &root, style)
        }
    }?;
    log::info!("Saved figure to {}", path.display());
    Ok(())
}

fn render<DB: DrawingBackend>(figure: &impl Figure, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
    root.fill(&WHITE).map_err(area_err)?;
    figure.draw(root, style)?;
    root.present().map_err(draw_err)
}

/// Axis text shared by the simple figures.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    pub title: Option<String>,
    pub x: String,
    pub y: String,
}

/// Pad a data range so nothing sits on the frame; degenerate ranges get
/// a unit width.
pub fn padded(range: Option<(f64, f64)>, fraction: f64) -> (f64, f64) {
    match range {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * fraction;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

/// Cartesian chart with caption, label areas and mesh already drawn.
pub(crate) fn cartesian<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    style: &FigureStyle,
    labels: &Labels,
    x: (f64, f64),
    y: (f64, f64),
    grid: bool,
) -> Result<Chart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    if let Some(title) = &labels.title {
        builder.caption(title, style.title_font());
    }
    let mut chart = builder
        .margin(style.margin)
        .x_label_area_size(style.x_label_area)
        .y_label_area_size(style.y_label_area)
        .build_cartesian_2d(x.0..x.1, y.0..y.1)
        .map_err(config_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font());
    if !grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(draw_err)?;
    Ok(chart)
}

/// Draw the legend box for series registered with `.label(..)`.
pub(crate) fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, style: &FigureStyle) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(style.legend_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)
}

/// Dash segments along the straight line `from -> to`, gaps as long as
/// dashes.
pub(crate) fn dashed(from: (f64, f64), to: (f64, f64), dashes: usize) -> impl Iterator<Item = Vec<(f64, f64)>> {
    let n = (2 * dashes.max(1)) as f64;
    let step = ((to.0 - from.0) / n, (to.1 - from.1) / n);
    (0..dashes.max(1)).map(move |k| {
        let t = (2 * k) as f64;
        let start = (from.0 + step.0 * t, from.1 + step.1 * t);
        vec![start, (start.0 + step.0, start.1 + step.1)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.PNG")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")).unwrap(), OutputFormat::Svg);
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.jpg")),
            Err(PlotError::UnsupportedOutput(e)) if e == "jpg"
        ));
    }

    #[test]
    fn padding() {
        assert_eq!(padded(Some((0.0, 10.0)), 0.1), (-1.0, 11.0));
        assert_eq!(padded(Some((2.0, 2.0)), 0.1), (1.5, 2.5));
        assert_eq!(padded(None, 0.1), (0.0, 1.0));
    }

    #[test]
    fn dashes_alternate() {
        let segs: Vec<_> = dashed((1.0, 0.0), (1.0, 4.0), 2).collect();
        assert_eq!(segs, vec![vec![(1.0, 0.0), (1.0, 1.0)], vec![(1.0, 2.0), (1.0, 3.0)]]);
    }
}
