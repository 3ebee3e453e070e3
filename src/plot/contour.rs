use plotters::coord::Shift;
use plotters::prelude::*;

use super::{cartesian, config_err, draw_err, Figure, FigureStyle, Labels, PlotError, Result};
use crate::color::Colormap;
use crate::grid::GridSlice;

/// Filled-band contour of a grid plane with a color bar on the right.
#[derive(Debug, Clone)]
pub struct ContourSlice {
    pub slice: GridSlice,
    pub levels: usize,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// Color bar caption.
    pub unit: String,
    pub title: Option<String>,
}

impl ContourSlice {
    pub fn new(slice: GridSlice, levels: usize) -> Self {
        ContourSlice {
            slice,
            levels,
            vmin: None,
            vmax: None,
            unit: "mV".to_string(),
            title: None,
        }
    }

    /// Band limits, explicit values winning over the data range.
    pub fn value_range(&self) -> (f64, f64) {
        let (lo, hi) = self.slice.min_max().unwrap_or((0.0, 1.0));
        (self.vmin.unwrap_or(lo), self.vmax.unwrap_or(hi))
    }

    /// Level boundaries, `levels + 1` values from vmin to vmax.
    pub fn boundaries(&self) -> Vec<f64> {
        let (lo, hi) = self.value_range();
        let n = self.levels.max(1);
        (0..=n).map(|i| lo + (hi - lo) * i as f64 / n as f64).collect()
    }
}

/// Band holding `value` among `levels` equal bands over `[vmin, vmax]`;
/// values outside clamp to the first or last band.
pub fn band_index(value: f64, vmin: f64, vmax: f64, levels: usize) -> usize {
    let levels = levels.max(1);
    if !(vmax > vmin) || !value.is_finite() {
        return 0;
    }
    let t = (value - vmin) / (vmax - vmin);
    ((t * levels as f64).floor().max(0.0) as usize).min(levels - 1)
}

impl Figure for ContourSlice {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, style: &FigureStyle) -> Result<()> {
        if self.slice.n_rows() == 0 || self.slice.n_cols() == 0 {
            return Err(PlotError::InvalidData("empty grid slice".into()));
        }
        let (vmin, vmax) = self.value_range();
        let levels = self.levels.max(1);
        let palette = Colormap::cividis().sample(levels);
        let colors = &palette;
        let (across, up) = self.slice.centered_axes();

        let (w, _) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(w.saturating_sub(w / 7));

        let labels = Labels {
            title: self.title.clone(),
            x: format!("{} position", self.slice.across),
            y: format!("{} position", self.slice.up),
        };
        let x_range = (across[0] - 0.5, across[across.len() - 1] + 0.5);
        let y_range = (up[0] - 0.5, up[up.len() - 1] + 0.5);
        let mut chart = cartesian(&main, style, &labels, x_range, y_range, false)?;

        let cells = self.slice.rows.iter().zip(&up).flat_map(|(row, &y)| {
            row.iter().zip(&across).map(move |(&v, &x)| {
                let color = colors[band_index(v, vmin, vmax, levels)];
                Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color.filled())
            })
        });
        chart.draw_series(cells).map_err(draw_err)?;

        // color bar
        let bounds = self.boundaries();
        let mut legend = ChartBuilder::on(&bar)
            .caption(self.unit.as_str(), style.label_font())
            .margin(style.margin)
            .margin_top(style.margin + style.x_label_area / 2)
            .x_label_area_size(style.x_label_area)
            .y_label_area_size(style.y_label_area)
            .build_cartesian_2d(0.0..1.0, vmin..vmax.max(vmin + f64::EPSILON))
            .map_err(config_err)?;
        legend
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(levels + 1)
            .y_label_formatter(&|v| format!("{v:.1}"))
            .label_style(style.tick_font())
            .draw()
            .map_err(draw_err)?;
        legend
            .draw_series(
                bounds
                    .windows(2)
                    .zip(colors)
                    .map(|(b, &c)| Rectangle::new([(0.0, b[0]), (1.0, b[1])], c.filled())),
            )
            .map_err(draw_err)?;
        Ok(())
    }
}
