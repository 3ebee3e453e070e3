use plotters::coord::Shift;
use plotters::prelude::*;

use super::{cartesian, draw_err, draw_legend, padded, Figure, FigureStyle, Labels, PlotError, Result};
use crate::color::ColorCycle;
use crate::data::{Series, SeriesSet};
use crate::transform::series::{factorize, split_groups};

/// Line plot of one or more series, optionally spread over side-by-side
/// panels that share the y range.
#[derive(Debug, Clone)]
pub struct XyPlot {
    pub panels: Vec<SeriesSet>,
    pub labels: Labels,
    /// Vertical bands `(x_from, x_to)` shaded behind the data.
    pub shaded: Vec<(f64, f64)>,
    pub show_legend: bool,
    pub grid: bool,
    pub cycle: ColorCycle,
}

impl XyPlot {
    pub fn single(series: SeriesSet, labels: Labels) -> Self {
        XyPlot {
            panels: vec![series],
            labels,
            shaded: Vec::new(),
            show_legend: false,
            grid: true,
            cycle: ColorCycle::Tab20,
        }
    }

    /// Split one column into `groups` consecutive pieces, each plotted over
    /// its own index, laid out on `subplots` panels. Lines are labeled by
    /// their group count starting at 1.
    pub fn grouped(values: &[f64], groups: usize, subplots: usize, labels: Labels) -> Result<Self> {
        let pieces = split_groups(values, groups).map_err(|e| PlotError::InvalidData(e.to_string()))?;
        if subplots == 0 || groups % subplots != 0 {
            return Err(PlotError::InvalidData(format!(
                "{groups} groups cannot be spread evenly over {subplots} subplots; use one of {:?}",
                factorize(groups)
            )));
        }
        let per_panel = groups / subplots;
        log::info!("{} points in {groups} groups over {subplots} subplot(s)", values.len());

        let mut panels = Vec::with_capacity(subplots);
        let mut iter = pieces.into_iter().enumerate();
        for _ in 0..subplots {
            let series = iter
                .by_ref()
                .take(per_panel)
                .map(|(g, y)| {
                    let x = (0..y.len()).map(|i| i as f64).collect();
                    Series::new((g + 1).to_string(), x, y)
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| PlotError::InvalidData(e.to_string()))?;
            panels.push(SeriesSet::new(series));
        }

        Ok(XyPlot {
            panels,
            labels,
            shaded: Vec::new(),
            show_legend: true,
            grid: true,
            cycle: ColorCycle::Tab10,
        })
    }

    fn shared_y_range(&self) -> (f64, f64) {
        let merged = self
            .panels
            .iter()
            .filter_map(SeriesSet::y_bounds)
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
        padded(merged, 0.05)
    }
}

impl Figure for XyPlot {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.panels.iter().all(SeriesSet::is_empty) {
            return Err(PlotError::InvalidData("nothing to plot".into()));
        }
        let y_range = self.shared_y_range();
        let areas = root.split_evenly((1, self.panels.len().max(1)));

        for (p, (area, set)) in areas.iter().zip(&self.panels).enumerate() {
            let mut labels = self.labels.clone();
            if p > 0 {
                labels.y.clear();
            }
            let x_range = padded(set.x_bounds(), 0.02);
            let mut chart = cartesian(area, style, &labels, x_range, y_range, self.grid)?;

            let shade = RGBColor(211, 211, 211).mix(0.25).filled();
            chart
                .draw_series(
                    self.shaded
                        .iter()
                        .map(|&(a, b)| Rectangle::new([(a, y_range.0), (b, y_range.1)], shade)),
                )
                .map_err(draw_err)?;

            for (i, series) in set.iter().enumerate() {
                let color = self.cycle.color(i).mix(0.8);
                let line = color.stroke_width(style.line_width);
                let points = series.x.iter().copied().zip(series.y.iter().copied());
                chart
                    .draw_series(LineSeries::new(points, line))
                    .map_err(draw_err)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

                if let Some(err) = &series.err {
                    let bars = series.x.iter().zip(&series.y).zip(err).map(|((&x, &y), &e)| {
                        ErrorBar::new_vertical(x, y - e.abs(), y, y + e.abs(), color.filled(), 4)
                    });
                    chart.draw_series(bars).map_err(draw_err)?;
                }
            }

            if self.show_legend {
                draw_legend(&mut chart, style)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_spread_over_panels() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let plot = XyPlot::grouped(&values, 4, 2, Labels::default()).unwrap();
        assert_eq!(plot.panels.len(), 2);
        let labels: Vec<&str> = plot.panels[1].iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["3", "4"]);
        // array_split: sizes 3, 3, 2, 2; each group restarts at x = 0
        assert_eq!(plot.panels[0].series[0].y, vec![0.0, 1.0, 2.0]);
        assert_eq!(plot.panels[1].series[1].x, vec![0.0, 1.0]);
        assert!(plot.show_legend);
    }

    #[test]
    fn subplots_must_divide_groups() {
        let values = vec![1.0; 12];
        let err = XyPlot::grouped(&values, 6, 4, Labels::default()).unwrap_err();
        assert!(err.to_string().contains("[1, 2, 3, 6]"));
        assert!(XyPlot::grouped(&values, 13, 1, Labels::default()).is_err());
    }

    #[test]
    fn y_range_is_shared() {
        let a = Series::new("a", vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let b = Series::new("b", vec![0.0, 1.0], vec![5.0, 9.0]).unwrap();
        let mut plot = XyPlot::single(SeriesSet::new(vec![a]), Labels::default());
        plot.panels.push(SeriesSet::new(vec![b]));
        let (lo, hi) = plot.shared_y_range();
        assert!(lo < 0.0 && hi > 9.0);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xy.png");
        let s = Series::new("a", vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 2.0])
            .unwrap()
            .with_errors(vec![0.1, 0.2, 0.1])
            .unwrap();
        let mut plot = XyPlot::single(SeriesSet::new(vec![s]), Labels::default());
        plot.shaded.push((0.5, 1.0));
        super::super::save_figure(&plot, &path, &FigureStyle::publication()).unwrap();
        assert!(path.exists());
    }
}
