use plotters::coord::Shift;
use plotters::prelude::*;

use super::{cartesian, dashed, draw_err, draw_legend, padded, Chart, Figure, FigureStyle, Labels, PlotError, Result};
use crate::color::generate_palette;
use crate::transform::histogram::Histogram;

/// Normalized histograms of several files, either stacked in rows sharing
/// the x axis or overlaid horizontally in one panel.
#[derive(Debug, Clone)]
pub struct NormalizedHistograms {
    pub entries: Vec<(String, Histogram)>,
    pub together: bool,
    pub labels: Labels,
    /// Upper frequency limit of the stacked panels.
    pub y_max: f64,
}

impl NormalizedHistograms {
    pub fn new(entries: Vec<(String, Histogram)>, together: bool, labels: Labels) -> Self {
        NormalizedHistograms {
            entries,
            together,
            labels,
            y_max: 0.15,
        }
    }

    fn value_range(&self) -> (f64, f64) {
        let edges = || self.entries.iter().map(|(_, h)| &h.edges);
        let lo = edges().filter_map(|e| e.first()).copied().fold(f64::INFINITY, f64::min);
        let hi = edges().filter_map(|e| e.last()).copied().fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi.is_finite() {
            (lo, hi)
        } else {
            (-1.0, 1.0)
        }
    }

    fn frequency_max(&self) -> f64 {
        let data = self.entries.iter().map(|(_, h)| h.max_count()).fold(0.0, f64::max);
        if self.together {
            padded(Some((0.0, data)), 0.05).1
        } else {
            self.y_max.max(data)
        }
    }

    fn draw_stacked<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        let areas = root.split_evenly((self.entries.len(), 1));
        let x = self.value_range();
        let y = (0.0, self.frequency_max());
        let colors = generate_palette(self.entries.len());
        let last = self.entries.len() - 1;

        for (i, (area, (name, hist))) in areas.iter().zip(&self.entries).enumerate() {
            let mut labels = self.labels.clone();
            if i > 0 {
                labels.title = None;
            }
            if i != last {
                labels.x.clear();
            }
            let mut chart = cartesian(area, style, &labels, x, y, false)?;
            let color = colors[i];
            chart
                .draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(e, &c)| {
                    Rectangle::new([(e[0], 0.0), (e[1], c)], color.mix(0.8).filled())
                }))
                .map_err(draw_err)?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
            zero_line(&mut chart, y, false)?;
            draw_legend(&mut chart, style)?;
        }
        Ok(())
    }

    fn draw_overlay<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        // horizontal: frequency across, value up
        let labels = Labels {
            title: self.labels.title.clone(),
            x: self.labels.y.clone(),
            y: self.labels.x.clone(),
        };
        let values = self.value_range();
        let mut chart = cartesian(root, style, &labels, (0.0, self.frequency_max()), values, true)?;
        let colors = generate_palette(self.entries.len());

        for ((name, hist), &color) in self.entries.iter().zip(&colors) {
            chart
                .draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(e, &c)| {
                    Rectangle::new([(0.0, e[0]), (c, e[1])], color.mix(0.7).filled())
                }))
                .map_err(draw_err)?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.mix(0.7).filled()));
        }
        zero_line(&mut chart, (0.0, self.frequency_max()), true)?;
        draw_legend(&mut chart, style)
    }
}

/// Dashed silver marker at value zero.
fn zero_line<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, span: (f64, f64), horizontal: bool) -> Result<()> {
    let (from, to) = if horizontal {
        ((span.0, 0.0), (span.1, 0.0))
    } else {
        ((0.0, span.0), (0.0, span.1))
    };
    chart
        .draw_series(dashed(from, to, 20).map(|seg| PathElement::new(seg, RGBColor(192, 192, 192).stroke_width(2))))
        .map_err(draw_err)?;
    Ok(())
}

impl Figure for NormalizedHistograms {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.entries.is_empty() {
            return Err(PlotError::InvalidData("no histograms to draw".into()));
        }
        if self.together {
            self.draw_overlay(root, style)
        } else {
            self.draw_stacked(root, style)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::histogram::normalized_histogram;

    fn entries() -> Vec<(String, Histogram)> {
        vec![
            ("a".into(), normalized_histogram(&[-0.5, 0.0, 0.5], -1.0, 1.0, 100)),
            ("b".into(), normalized_histogram(&[0.9, 0.9, 0.9, 0.9], -1.0, 1.0, 100)),
        ]
    }

    #[test]
    fn stacked_panels_keep_fixed_limit_unless_exceeded() {
        let plot = NormalizedHistograms::new(entries(), false, Labels::default());
        assert_eq!(plot.value_range(), (-1.0, 1.0));
        // one bin of "b" holds everything
        assert_eq!(plot.frequency_max(), 1.0);

        let spread: Vec<f64> = (0..100).map(|i| -1.0 + 0.02 * i as f64).collect();
        let low = vec![("c".into(), normalized_histogram(&spread, -1.0, 1.0, 100))];
        let plot = NormalizedHistograms::new(low, false, Labels::default());
        assert_eq!(plot.frequency_max(), 0.15);
    }

    #[test]
    fn overlay_pads_data_maximum() {
        let plot = NormalizedHistograms::new(entries(), true, Labels::default());
        assert!(plot.frequency_max() > 1.0);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        for together in [false, true] {
            let path = dir.path().join(format!("hist_{together}.png"));
            let plot = NormalizedHistograms::new(entries(), together, Labels::default());
            super::super::save_figure(&plot, &path, &FigureStyle::standard()).unwrap();
            assert!(path.exists());
        }
    }
}
