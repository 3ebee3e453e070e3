use plotters::coord::Shift;
use plotters::prelude::*;

use super::{cartesian, draw_err, draw_legend, padded, Figure, FigureStyle, Labels, PlotError, Result};
use crate::chem::Molecule;
use crate::color::ColorCycle;
use crate::data::{Series, SeriesSet};

/// Hartree to kcal/mol.
pub const HARTREE_TO_KCAL: f64 = 627.5095;

/// Energy profile from an SD data tag.
///
/// x is the molecule title read as an integer, y the tag value relative to
/// the first record that carries it, converted to kcal/mol. Records
/// without a numeric tag or title are skipped.
pub fn sd_tag_profile(molecules: &[Molecule], tag: &str, label: impl Into<String>) -> Result<Series> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut reference = None;

    for mol in molecules {
        let Some(value) = mol.property(tag).and_then(|v| v.trim().parse::<f64>().ok()) else {
            log::debug!("'{}' has no numeric {tag} tag, skipped", mol.title);
            continue;
        };
        let Ok(step) = mol.title.trim().parse::<i64>() else {
            log::warn!("Title '{}' is not an integer, skipped", mol.title);
            continue;
        };
        let first = *reference.get_or_insert(value);
        x.push(step as f64);
        y.push((value - first) * HARTREE_TO_KCAL);
    }

    if x.is_empty() {
        return Err(PlotError::InvalidData(format!("no record carries a numeric '{tag}' tag")));
    }
    Series::new(label, x, y).map_err(|e| PlotError::InvalidData(e.to_string()))
}

/// `label x y` lines for every point of every series.
pub fn profile_table(set: &SeriesSet) -> Vec<String> {
    set.iter()
        .flat_map(|s| {
            s.x.iter()
                .zip(&s.y)
                .map(move |(x, y)| format!("{}\t{x}\t{y:.4}", s.label))
        })
        .collect()
}

/// Relative energies of several files and tags, lines with markers.
#[derive(Debug, Clone)]
pub struct ProfilePlot {
    pub series: SeriesSet,
    pub labels: Labels,
}

impl Figure for ProfilePlot {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.series.is_empty() {
            return Err(PlotError::InvalidData("no profiles to plot".into()));
        }
        let x = padded(self.series.x_bounds(), 0.03);
        let y = padded(self.series.y_bounds(), 0.05);
        let mut chart = cartesian(root, style, &self.labels, x, y, true)?;
        let cycle = ColorCycle::Tab10;

        for (i, s) in self.series.iter().enumerate() {
            let color = cycle.color(i);
            let points: Vec<(f64, f64)> = s.x.iter().copied().zip(s.y.iter().copied()).collect();
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(style.line_width)))
                .map_err(draw_err)?
                .label(s.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, style.marker_size, color.filled())))
                .map_err(draw_err)?;
        }
        draw_legend(&mut chart, style)
    }
}
