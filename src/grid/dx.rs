//! OpenDX volumetric grids as written by VMD and APBS.
//!
//! Only the subset those tools emit is understood: a `gridpositions`
//! object with `counts`, `origin` and three `delta` lines, followed by a
//! scalar `array` object whose values are listed with z varying fastest.

use std::path::Path;

use anyhow::{Context, Result};

use super::{Axis, GridError};

/// Regular 3-D grid of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct DxGrid {
    pub counts: [usize; 3],
    pub origin: [f64; 3],
    /// Diagonal spacing along x, y, z.
    pub delta: [f64; 3],
    values: Vec<f64>,
}

impl DxGrid {
    pub fn new(counts: [usize; 3], origin: [f64; 3], delta: [f64; 3], values: Vec<f64>) -> Result<Self, GridError> {
        let expected = counts.iter().product::<usize>();
        if values.len() != expected {
            return Err(GridError::ValueCount {
                expected,
                found: values.len(),
            });
        }
        Ok(DxGrid {
            counts,
            origin,
            delta,
            values,
        })
    }

    /// Value at grid point `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [nx, ny, nz] = self.counts;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.values.get((i * ny + j) * nz + k).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Plane orthogonal to `axis` at `index`.
    ///
    /// Viewed down x the plane is (y across, z up); down y it is (x across,
    /// z up); down z it is (x across, y up). Rows run along the vertical
    /// axis.
    pub fn slice(&self, axis: Axis, index: usize) -> Result<GridSlice, GridError> {
        let size = self.counts[axis.index()];
        if index >= size {
            return Err(GridError::SliceOutOfRange { axis, index, size });
        }
        let [nx, ny, nz] = self.counts;
        let (across, up) = axis.plane();
        let (n_cols, n_rows) = (self.counts[across.index()], self.counts[up.index()]);

        let mut rows = Vec::with_capacity(n_rows);
        for r in 0..n_rows {
            let mut row = Vec::with_capacity(n_cols);
            for c in 0..n_cols {
                let (i, j, k) = match axis {
                    Axis::X => (index, c, r),
                    Axis::Y => (c, index, r),
                    Axis::Z => (c, r, index),
                };
                debug_assert!(i < nx && j < ny && k < nz);
                row.push(self.values[(i * ny + j) * nz + k]);
            }
            rows.push(row);
        }
        Ok(GridSlice {
            across,
            up,
            rows,
        })
    }
}

/// A 2-D plane cut out of a [`DxGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridSlice {
    pub across: Axis,
    pub up: Axis,
    /// `rows[r][c]`: r along `up`, c along `across`.
    pub rows: Vec<Vec<f64>>,
}

impl GridSlice {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        crate::data::model::bounds(&self.rows.concat())
    }

    /// Multiply by `factor`, then shift so the minimum becomes zero.
    pub fn scaled_from_zero(mut self, factor: f64) -> Self {
        for v in self.rows.iter_mut().flatten() {
            *v *= factor;
        }
        if let Some((min, _)) = self.min_max() {
            for v in self.rows.iter_mut().flatten() {
                *v -= min;
            }
        }
        self
    }

    /// Index coordinates centered on their median (`i - (n - 1) / 2`),
    /// across then up.
    pub fn centered_axes(&self) -> (Vec<f64>, Vec<f64>) {
        let centered = |n: usize| {
            let mid = (n as f64 - 1.0) / 2.0;
            (0..n).map(|i| i as f64 - mid).collect::<Vec<_>>()
        };
        (centered(self.n_cols()), centered(self.n_rows()))
    }
}

/// Read a grid from a `.dx` file.
pub fn read_dx(path: &Path) -> Result<DxGrid> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read DX file: {}", path.display()))?;
    let grid = parse_dx(&text).with_context(|| format!("Invalid DX file: {}", path.display()))?;
    log::info!(
        "Grid {}x{}x{} origin {:?} delta {:?}",
        grid.counts[0],
        grid.counts[1],
        grid.counts[2],
        grid.origin,
        grid.delta
    );
    Ok(grid)
}

pub fn parse_dx(text: &str) -> Result<DxGrid, GridError> {
    let mut counts: Option<[usize; 3]> = None;
    let mut origin: Option<[f64; 3]> = None;
    let mut deltas: Vec<[f64; 3]> = Vec::new();
    let mut items: Option<usize> = None;
    let mut values: Vec<f64> = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();

        if line.starts_with("object") {
            if line.contains("gridpositions") {
                counts = Some(parse_triple(after(&fields, "counts"), line_no)?);
            } else if line.contains("class array") {
                let n = after(&fields, "items")
                    .first()
                    .and_then(|s| s.parse().ok())
                    .ok_or(GridError::Syntax {
                        line: line_no,
                        message: "array object without item count".into(),
                    })?;
                items = Some(n);
            }
        } else if fields[0] == "origin" {
            origin = Some(parse_triple(&fields[1..], line_no)?);
        } else if fields[0] == "delta" {
            deltas.push(parse_triple(&fields[1..], line_no)?);
        } else if matches!(items, Some(n) if values.len() < n) {
            for f in fields {
                let v = f.parse::<f64>().map_err(|_| GridError::Syntax {
                    line: line_no,
                    message: format!("'{f}' is not a number"),
                })?;
                values.push(v);
            }
        }
    }

    let counts = counts.ok_or(GridError::Missing("gridpositions counts"))?;
    let origin = origin.ok_or(GridError::Missing("origin"))?;
    if deltas.len() != 3 {
        return Err(GridError::Missing("three delta lines"));
    }
    let delta = [deltas[0][0], deltas[1][1], deltas[2][2]];
    if let Some(n) = items {
        if n != values.len() {
            return Err(GridError::ValueCount {
                expected: n,
                found: values.len(),
            });
        }
    }
    DxGrid::new(counts, origin, delta, values)
}

fn after<'a, 'b>(fields: &'b [&'a str], key: &str) -> &'b [&'a str] {
    fields
        .iter()
        .position(|f| *f == key)
        .map_or(&[][..], |p| &fields[p + 1..])
}

fn parse_triple<T: std::str::FromStr>(fields: &[&str], line: usize) -> Result<[T; 3], GridError> {
    let bad = || GridError::Syntax {
        line,
        message: "expected three values".into(),
    };
    if fields.len() < 3 {
        return Err(bad());
    }
    let mut parsed = fields[..3].iter().map(|f| f.parse::<T>().map_err(|_| bad()));
    Ok([
        parsed.next().ok_or_else(bad)??,
        parsed.next().ok_or_else(bad)??,
        parsed.next().ok_or_else(bad)??,
    ])
}

/// Serialize a grid in the same OpenDX subset [`parse_dx`] reads.
pub fn format_dx(grid: &DxGrid) -> String {
    let [nx, ny, nz] = grid.counts;
    let [ox, oy, oz] = grid.origin;
    let [dx, dy, dz] = grid.delta;
    let mut out = String::new();
    out.push_str(&format!("object 1 class gridpositions counts {nx} {ny} {nz}\n"));
    out.push_str(&format!("origin {ox} {oy} {oz}\n"));
    out.push_str(&format!("delta {dx} 0 0\ndelta 0 {dy} 0\ndelta 0 0 {dz}\n"));
    out.push_str(&format!("object 2 class gridconnections counts {nx} {ny} {nz}\n"));
    out.push_str(&format!(
        "object 3 class array type double rank 0 items {} data follows\n",
        grid.values.len()
    ));
    for chunk in grid.values.chunks(3) {
        let line: Vec<String> = chunk.iter().map(|v| format!("{v:e}")).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out.push_str("attribute \"dep\" string \"positions\"\n");
    out.push_str("object \"regular positions regular connections\" class field\n");
    out.push_str("component \"positions\" value 1\ncomponent \"connections\" value 2\ncomponent \"data\" value 3\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2 x 3 x 4 grid whose value encodes its own index as `100i + 10j + k`.
    fn sample() -> String {
        let mut values = Vec::new();
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    values.push((100 * i + 10 * j + k) as f64);
                }
            }
        }
        let grid = DxGrid::new([2, 3, 4], [-1.0, 0.0, 2.5], [0.5, 0.5, 1.0], values).unwrap();
        format!("# written by a test\n{}", format_dx(&grid))
    }

    #[test]
    fn parses_header_and_values() {
        let grid = parse_dx(&sample()).unwrap();
        assert_eq!(grid.counts, [2, 3, 4]);
        assert_eq!(grid.origin, [-1.0, 0.0, 2.5]);
        assert_eq!(grid.delta, [0.5, 0.5, 1.0]);
        assert_eq!(grid.get(1, 2, 3), Some(123.0));
        assert_eq!(grid.get(2, 0, 0), None);
    }

    #[test]
    fn slice_orientation() {
        let grid = parse_dx(&sample()).unwrap();

        let sx = grid.slice(Axis::X, 1).unwrap();
        assert_eq!((sx.across, sx.up), (Axis::Y, Axis::Z));
        assert_eq!((sx.n_cols(), sx.n_rows()), (3, 4));
        assert_eq!(sx.rows[3][2], 123.0);

        let sy = grid.slice(Axis::Y, 2).unwrap();
        assert_eq!((sy.n_cols(), sy.n_rows()), (2, 4));
        assert_eq!(sy.rows[1][1], 121.0);

        let sz = grid.slice(Axis::Z, 0).unwrap();
        assert_eq!((sz.n_cols(), sz.n_rows()), (2, 3));
        assert_eq!(sz.rows[2][1], 120.0);
    }

    #[test]
    fn slice_index_out_of_range() {
        let grid = parse_dx(&sample()).unwrap();
        let err = grid.slice(Axis::Z, 4).unwrap_err();
        assert_eq!(
            err,
            GridError::SliceOutOfRange {
                axis: Axis::Z,
                index: 4,
                size: 4
            }
        );
    }

    #[test]
    fn scaling_shifts_minimum_to_zero() {
        let grid = parse_dx(&sample()).unwrap();
        let s = grid.slice(Axis::X, 1).unwrap().scaled_from_zero(2.0);
        assert_eq!(s.min_max(), Some((0.0, 46.0)));
        let (across, up) = s.centered_axes();
        assert_eq!(across, vec![-1.0, 0.0, 1.0]);
        assert_eq!(up, vec![-1.5, -0.5, 0.5, 1.5]);
    }

    #[test]
    fn truncated_data_is_rejected() {
        let text = "object 1 class gridpositions counts 1 1 2\norigin 0 0 0\ndelta 1 0 0\ndelta 0 1 0\ndelta 0 0 1\nobject 3 class array type double rank 0 items 2 data follows\n1.0\n";
        assert!(matches!(
            parse_dx(text),
            Err(GridError::ValueCount { expected: 2, found: 1 })
        ));
        assert!(matches!(parse_dx("origin 0 0 0\n"), Err(GridError::Missing(_))));
    }
}
