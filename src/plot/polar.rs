use std::f64::consts::TAU;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{config_err, draw_err, draw_legend, Figure, FigureStyle, PlotError, Result};
use crate::color::generate_palette;
use crate::transform::histogram::AngularHistogram;

/// Arc points per wedge.
const ARC_STEPS: usize = 8;
const RINGS: usize = 4;

/// Rose diagram of one or more angular histograms, overlaid with alpha.
#[derive(Debug, Clone)]
pub struct PolarHistogram {
    pub histograms: Vec<(String, AngularHistogram)>,
    /// Radial limit; defaults to the largest bin.
    pub r_max: Option<f64>,
    pub title: Option<String>,
}

impl PolarHistogram {
    pub fn new(histograms: Vec<(String, AngularHistogram)>) -> Self {
        PolarHistogram {
            histograms,
            r_max: None,
            title: None,
        }
    }

    fn radius(&self) -> f64 {
        let data_max = self
            .histograms
            .iter()
            .map(|(_, h)| h.max_count())
            .fold(0.0, f64::max);
        match self.r_max {
            Some(r) if r > 0.0 => r,
            _ if data_max > 0.0 => data_max,
            _ => 1.0,
        }
    }
}

/// Closed polygon of a wedge centered on `center` (radians, counter-
/// clockwise from +x) spanning `width`, out to `radius`.
pub fn wedge(center: f64, width: f64, radius: f64, steps: usize) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let start = center - width / 2.0;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((0.0, 0.0));
    for s in 0..=steps {
        let a = start + width * s as f64 / steps as f64;
        points.push((radius * a.cos(), radius * a.sin()));
    }
    points
}

fn circle(radius: f64) -> Vec<(f64, f64)> {
    (0..=72)
        .map(|s| {
            let a = TAU * s as f64 / 72.0;
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

impl Figure for PolarHistogram {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.histograms.is_empty() {
            return Err(PlotError::InvalidData("no angle data".into()));
        }
        let r = self.radius();
        let lim = r * 1.15;

        // keep the disc round: draw into the largest centered square
        let (w, h) = root.dim_in_pixel();
        let side = w.min(h);
        let area = root.clone().shrink(((w - side) / 2, (h - side) / 2), (side, side));

        let mut builder = ChartBuilder::on(&area);
        if let Some(title) = &self.title {
            builder.caption(title, style.title_font());
        }
        let mut chart = builder
            .margin(style.margin)
            .build_cartesian_2d(-lim..lim, -lim..lim)
            .map_err(config_err)?;

        let grid = RGBColor(190, 190, 190);
        for k in 1..=RINGS {
            let ring = r * k as f64 / RINGS as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(circle(ring), grid.stroke_width(1))))
                .map_err(draw_err)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{ring:.0}"),
                    (ring * 0.38, ring * 0.92),
                    style.tick_font(),
                )))
                .map_err(draw_err)?;
        }
        for deg in (0..360).step_by(45) {
            let a = (deg as f64).to_radians();
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, 0.0), (r * a.cos(), r * a.sin())],
                    grid.stroke_width(1),
                )))
                .map_err(draw_err)?;
            let at = (1.08 * r * a.cos(), 1.08 * r * a.sin());
            chart
                .draw_series(std::iter::once(Text::new(format!("{deg}°"), at, style.tick_font())))
                .map_err(draw_err)?;
        }

        let colors = generate_palette(self.histograms.len());
        for ((label, hist), &color) in self.histograms.iter().zip(&colors) {
            let wedges = hist
                .centers()
                .into_iter()
                .zip(&hist.counts)
                .filter(|(_, n)| **n > 0.0)
                .map(|(c, &n)| Polygon::new(wedge(c, hist.bin_width, n.min(r), ARC_STEPS), color.mix(0.5).filled()));
            chart
                .draw_series(wedges)
                .map_err(draw_err)?
                .label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.mix(0.5).filled()));
        }

        if self.histograms.len() > 1 {
            draw_legend(&mut chart, style)?;
        }
        Ok(())
    }
}
