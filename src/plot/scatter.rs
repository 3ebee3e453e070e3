use plotters::coord::Shift;
use plotters::prelude::*;

use super::{cartesian, draw_err, draw_legend, padded, Chart, Figure, FigureStyle, Labels, PlotError, Result};
use crate::color::ColorCycle;
use crate::data::loader::LabeledRows;

/// Open marker shapes, one per value/error column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Cross,
}

impl Marker {
    const ALL: [Marker; 4] = [Marker::Circle, Marker::Square, Marker::Triangle, Marker::Cross];

    pub fn nth(i: usize) -> Self {
        Self::ALL[i % Self::ALL.len()]
    }
}

/// Labeled points with error bars: every row gets a color, every
/// value/error pair a marker shape.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    pub row_labels: Vec<String>,
    pub x: Vec<f64>,
    /// `sets[k][row] = (value, error)`.
    pub sets: Vec<Vec<(f64, f64)>>,
    pub set_names: Vec<String>,
    pub labels: Labels,
    /// Draw y = x and y = x ± 1.
    pub guides: bool,
}

impl ScatterPlot {
    /// Rows laid out as `label x _ v1 e1 v2 e2 ...`.
    pub fn from_rows(rows: &LabeledRows, labels: Labels) -> Result<Self> {
        let width = rows.values.first().map_or(0, Vec::len);
        if width < 4 || (width - 2) % 2 != 0 {
            return Err(PlotError::InvalidData(format!(
                "expected columns 'label x _ v1 e1 [v2 e2 ...]', found {width} numeric columns"
            )));
        }
        let n_sets = (width - 2) / 2;
        let sets = (0..n_sets)
            .map(|k| {
                rows.values
                    .iter()
                    .map(|row| (row[2 + 2 * k], row[3 + 2 * k]))
                    .collect()
            })
            .collect();
        Ok(ScatterPlot {
            row_labels: rows.labels.clone(),
            x: rows.values.iter().map(|row| row[0]).collect(),
            sets,
            set_names: (1..=n_sets).map(|k| format!("set {k}")).collect(),
            labels,
            guides: false,
        })
    }

    fn x_range(&self) -> (f64, f64) {
        let (lo, hi) = crate::data::model::bounds(&self.x).unwrap_or((0.0, 1.0));
        let pad = if self.guides { 0.4 } else { 0.3 };
        (lo - pad, hi + pad)
    }

    fn y_range(&self) -> (f64, f64) {
        let spans = self.sets.iter().flatten().map(|&(v, e)| (v - e.abs(), v + e.abs()));
        let mut merged = spans.reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
        if self.guides {
            let (xl, xh) = self.x_range();
            merged = merged.map(|(l, h)| (l.min(xl - 1.0), h.max(xh + 1.0)));
        }
        padded(merged, 0.05)
    }
}

fn draw_marker<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    marker: Marker,
    at: (f64, f64),
    size: u32,
    style: ShapeStyle,
) -> Result<()> {
    let s = size as i32;
    match marker {
        Marker::Circle => chart.draw_series(std::iter::once(Circle::new(at, size, style))),
        Marker::Square => chart.draw_series(std::iter::once(
            EmptyElement::at(at) + Rectangle::new([(-s, -s), (s, s)], style),
        )),
        Marker::Triangle => chart.draw_series(std::iter::once(TriangleMarker::new(at, size, style))),
        Marker::Cross => chart.draw_series(std::iter::once(Cross::new(at, size, style))),
    }
    .map(|_| ())
    .map_err(draw_err)
}

impl Figure for ScatterPlot {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.x.is_empty() {
            return Err(PlotError::InvalidData("no rows to plot".into()));
        }
        let x_range = self.x_range();
        let mut chart = cartesian(root, style, &self.labels, x_range, self.y_range(), true)?;

        if self.guides {
            let (lo, hi) = x_range;
            for (offset, alpha) in [(0.0, 1.0), (1.0, 0.5), (-1.0, 0.5)] {
                chart
                    .draw_series(LineSeries::new(
                        [(lo, lo + offset), (hi, hi + offset)],
                        RGBColor(128, 128, 128).mix(alpha).stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }
        }

        let colors = ColorCycle::Even(self.x.len());
        for (k, set) in self.sets.iter().enumerate() {
            let marker = Marker::nth(k);
            for (row, &(v, e)) in set.iter().enumerate() {
                let color = colors.color(row);
                let x = self.x[row];
                chart
                    .draw_series(std::iter::once(ErrorBar::new_vertical(
                        x,
                        v - e.abs(),
                        v,
                        v + e.abs(),
                        color.stroke_width(1),
                        style.marker_size * 2,
                    )))
                    .map_err(draw_err)?;
                draw_marker(&mut chart, marker, (x, v), style.marker_size + 2, color.stroke_width(2))?;
            }
        }

        // legend: one color swatch per row, one black marker per set
        for (row, label) in self.row_labels.iter().enumerate() {
            let color = colors.color(row);
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), u32>>())
                .map_err(draw_err)?
                .label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }
        for (k, name) in self.set_names.iter().enumerate().take(self.sets.len()) {
            let anno = chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), u32>>())
                .map_err(draw_err)?
                .label(name.as_str());
            match Marker::nth(k) {
                Marker::Circle => anno.legend(|(x, y)| Circle::new((x + 7, y), 6, BLACK.stroke_width(2))),
                Marker::Triangle => anno.legend(|(x, y)| TriangleMarker::new((x + 7, y), 6, BLACK.stroke_width(2))),
                Marker::Cross => anno.legend(|(x, y)| Cross::new((x + 7, y), 6, BLACK.stroke_width(2))),
                Marker::Square => {
                    anno.legend(|(x, y)| Rectangle::new([(x + 1, y - 6), (x + 13, y + 6)], BLACK.stroke_width(2)))
                }
            };
        }
        draw_legend(&mut chart, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_labeled_rows;

    const ROWS: &str = "name x skip taut1 err1 taut2 err2\nA 1.0 0 1.5 0.2 2.5 0.1\nB 2.0 0 2.0 0.3 1.0 0.4\n";

    #[test]
    fn pairs_values_with_errors() {
        let rows = parse_labeled_rows(ROWS, 1).unwrap();
        let plot = ScatterPlot::from_rows(&rows, Labels::default()).unwrap();
        assert_eq!(plot.x, vec![1.0, 2.0]);
        assert_eq!(plot.sets.len(), 2);
        assert_eq!(plot.sets[1], vec![(2.5, 0.1), (1.0, 0.4)]);
        assert_eq!(plot.row_labels, vec!["A", "B"]);
    }

    #[test]
    fn odd_value_columns_rejected() {
        let rows = parse_labeled_rows("h\nA 1 0 2 0.1 3\n", 1).unwrap();
        assert!(ScatterPlot::from_rows(&rows, Labels::default()).is_err());
    }

    #[test]
    fn guides_widen_ranges() {
        let rows = parse_labeled_rows(ROWS, 1).unwrap();
        let mut plot = ScatterPlot::from_rows(&rows, Labels::default()).unwrap();
        let (xl, xh) = plot.x_range();
        assert!((xl - 0.7).abs() < 1e-12 && (xh - 2.3).abs() < 1e-12);
        plot.guides = true;
        let (lo, hi) = plot.y_range();
        assert!(lo < -0.4 && hi > 3.4);
    }
}
