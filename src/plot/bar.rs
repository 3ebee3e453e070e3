use plotters::coord::Shift;
use plotters::prelude::*;

use super::{config_err, dashed, draw_err, draw_legend, padded, Figure, FigureStyle, Labels, Result};
use crate::color::ColorCycle;
use crate::data::model::{bounds, BarRecords};
use crate::transform::grouping::group_by_position;

/// How the bars are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    /// One color, error bars.
    #[default]
    Plain,
    /// Bars clustered by adjacent x, colored by position in the cluster.
    Grouped,
    /// Dashed stems from zero with a marker on top (vertical only).
    Stems,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub records: BarRecords,
    pub mode: BarMode,
    pub horizontal: bool,
    pub labels: Labels,
    /// Legend entries for the color groups of grouped mode.
    pub group_names: Vec<String>,
}

const BAR_WIDTH: f64 = 1.0;

impl BarChart {
    pub fn new(records: BarRecords, mode: BarMode, horizontal: bool, labels: Labels) -> Self {
        BarChart {
            records,
            mode,
            horizontal,
            labels,
            group_names: Vec::new(),
        }
    }

    /// Bar index lists, one per color.
    fn color_groups(&self) -> Vec<Vec<usize>> {
        match self.mode {
            BarMode::Grouped => group_by_position(&self.records.x),
            _ => vec![(0..self.records.len()).collect()],
        }
    }

    /// Extent of bar positions, widened by half a bar.
    fn position_range(&self) -> (f64, f64) {
        let (lo, hi) = bounds(&self.records.x).unwrap_or((0.0, 1.0));
        let half = BAR_WIDTH / 2.0;
        padded(Some((lo - half, hi + half)), 0.02)
    }

    /// Extent of bar heights including zero and error bars.
    fn value_range(&self) -> (f64, f64) {
        let r = &self.records;
        let lows = r.y.iter().zip(&r.errors).map(|(y, e)| y - e.abs());
        let highs = r.y.iter().zip(&r.errors).map(|(y, e)| y + e.abs());
        let lo = lows.fold(0.0, f64::min);
        let hi = highs.fold(0.0, f64::max);
        padded(Some((lo, hi)), 0.05)
    }

    /// Tick label for a bar position, if a record sits there.
    fn tick_label(&self, position: f64) -> String {
        if !self.records.has_labels() {
            return format!("{position}");
        }
        self.records
            .x
            .iter()
            .position(|x| (x - position).abs() < 1e-6)
            .map(|i| self.records.labels[i].clone())
            .unwrap_or_default()
    }
}

impl Figure for BarChart {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.records.is_empty() {
            return Err(super::PlotError::InvalidData("no bar records".into()));
        }
        let horizontal = self.horizontal && self.mode != BarMode::Stems;
        if self.horizontal && !horizontal {
            log::warn!("Horizontal stems are not supported; drawing vertically");
        }

        let pos = self.position_range();
        let val = self.value_range();
        let (x_range, y_range) = if horizontal { (val, pos) } else { (pos, val) };

        let mut builder = ChartBuilder::on(root);
        if let Some(title) = &self.labels.title {
            builder.caption(title, style.title_font());
        }
        let mut chart = builder
            .margin(style.margin)
            .x_label_area_size(style.x_label_area)
            .y_label_area_size(style.y_label_area)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
            .map_err(config_err)?;

        let n_ticks = self.records.len() * 2 + 2;
        let tick = |v: &f64| self.tick_label(*v);
        let plain = |v: &f64| format!("{v:.2}");
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(self.labels.x.as_str())
            .y_desc(self.labels.y.as_str())
            .axis_desc_style(style.label_font())
            .label_style(style.tick_font())
            .light_line_style(WHITE);
        if horizontal {
            mesh.y_labels(n_ticks).y_label_formatter(&tick).x_label_formatter(&plain);
        } else {
            mesh.x_labels(n_ticks).x_label_formatter(&tick).y_label_formatter(&plain);
        }
        mesh.draw().map_err(draw_err)?;

        let r = &self.records;
        let half = BAR_WIDTH / 2.0;
        let cycle = ColorCycle::Tab10;

        for (g, members) in self.color_groups().iter().enumerate() {
            let color = cycle.color(g);

            if self.mode == BarMode::Stems {
                for &i in members {
                    let c = cycle.color(i);
                    chart
                        .draw_series(
                            dashed((r.x[i], 0.0), (r.x[i], r.y[i]), 12)
                                .map(|seg| PathElement::new(seg, c.stroke_width(style.line_width))),
                        )
                        .map_err(draw_err)?;
                    chart
                        .draw_series(std::iter::once(Circle::new((r.x[i], r.y[i]), style.marker_size, c.filled())))
                        .map_err(draw_err)?;
                }
                continue;
            }

            let rects = members.iter().map(|&i| {
                let (p, v) = (r.x[i], r.y[i]);
                let corners = if horizontal {
                    [(0.0, p - half), (v, p + half)]
                } else {
                    [(p - half, 0.0), (p + half, v)]
                };
                Rectangle::new(corners, color.mix(0.9).filled())
            });
            let anno = chart.draw_series(rects).map_err(draw_err)?;
            if let Some(name) = self.group_names.get(g) {
                anno.label(name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
            }

            // white separators between touching bars
            let outlines = members.iter().map(|&i| {
                let (p, v) = (r.x[i], r.y[i]);
                let corners = if horizontal {
                    [(0.0, p - half), (v, p + half)]
                } else {
                    [(p - half, 0.0), (p + half, v)]
                };
                Rectangle::new(corners, WHITE.stroke_width(1))
            });
            chart.draw_series(outlines).map_err(draw_err)?;

            let whisker = (style.marker_size * 2).max(6);
            let with_error = members.iter().copied().filter(|&i| r.errors[i] != 0.0);
            let spans = with_error.map(|i| (r.x[i], r.y[i], r.errors[i].abs()));
            if horizontal {
                chart
                    .draw_series(spans.map(|(p, v, e)| {
                        ErrorBar::new_horizontal(p, v - e, v, v + e, BLACK.filled(), whisker)
                    }))
                    .map_err(draw_err)?;
            } else {
                chart
                    .draw_series(spans.map(|(p, v, e)| {
                        ErrorBar::new_vertical(p, v - e, v, v + e, BLACK.filled(), whisker)
                    }))
                    .map_err(draw_err)?;
            }
        }

        if self.mode == BarMode::Grouped && !self.group_names.is_empty() {
            draw_legend(&mut chart, style)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> BarRecords {
        BarRecords {
            x: vec![1.0, 2.0, 3.0, 5.0, 6.0],
            y: vec![2.0, -1.0, 4.0, 3.0, 1.0],
            labels: ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect(),
            errors: vec![0.5, 0.0, 1.0, 0.0, 0.0],
        }
    }

    #[test]
    fn ranges_cover_bars_and_errors() {
        let chart = BarChart::new(records(), BarMode::Plain, false, Labels::default());
        let (lo, hi) = chart.value_range();
        assert!(lo < -1.0 && hi > 5.0);
        let (plo, phi) = chart.position_range();
        assert!(plo < 0.5 && phi > 6.5);
    }

    #[test]
    fn grouped_mode_colors_by_run_position() {
        let chart = BarChart::new(records(), BarMode::Grouped, false, Labels::default());
        assert_eq!(chart.color_groups(), vec![vec![0, 3], vec![1, 4], vec![2]]);
        let plain = BarChart::new(records(), BarMode::Plain, false, Labels::default());
        assert_eq!(plain.color_groups(), vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn tick_labels_follow_records() {
        let chart = BarChart::new(records(), BarMode::Plain, false, Labels::default());
        assert_eq!(chart.tick_label(3.0), "c");
        assert_eq!(chart.tick_label(4.0), "");
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.svg");
        let chart = BarChart::new(records(), BarMode::Grouped, true, Labels::default());
        super::super::save_figure(&chart, &path, &FigureStyle::standard()).unwrap();
        assert!(path.exists());
    }
}
