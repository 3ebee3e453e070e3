use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Table – a rectangular numeric table, stored column-major
// ---------------------------------------------------------------------------

/// A loaded numeric table. Every column has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl Table {
    /// Build a table from rows. All rows must have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let width = rows.first().map_or(0, Vec::len);
        let mut columns = vec![Vec::with_capacity(rows.len()); width];

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DataError::RaggedRow {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col, &value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }

        Ok(Table {
            n_rows: rows.len(),
            columns,
        })
    }

    /// Build a table from columns. All columns must have the same length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, Vec::len);
        if let Some((i, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != n_rows) {
            return Err(DataError::ColumnLength {
                column: i,
                expected: n_rows,
                found: col.len(),
            });
        }
        Ok(Table { columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrow one column, failing if the index is out of range.
    pub fn column(&self, index: usize) -> Result<&[f64], DataError> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DataError::ColumnOutOfRange {
                index,
                n_cols: self.columns.len(),
            })
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Copy out one row.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.n_rows).then(|| self.columns.iter().map(|c| c[index]).collect())
    }

    /// Iterate over rows as owned vectors.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.n_rows).map(move |i| self.columns.iter().map(|c| c[i]).collect())
    }

    /// A new table holding only the given columns, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Table, DataError> {
        let columns = indices
            .iter()
            .map(|&i| self.column(i).map(<[f64]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table {
            columns,
            n_rows: self.n_rows,
        })
    }
}

// ---------------------------------------------------------------------------
// Series – one named data series (x, y and optional error bars)
// ---------------------------------------------------------------------------

/// A single plottable series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// Independent axis (x).
    pub x: Vec<f64>,
    /// Dependent axis (y) – same length as `x`.
    pub y: Vec<f64>,
    /// Optional symmetric uncertainty per point – same length as `y`.
    pub err: Option<Vec<f64>>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Result<Self, DataError> {
        if x.len() != y.len() {
            return Err(DataError::SeriesLength {
                x: x.len(),
                y: y.len(),
            });
        }
        Ok(Series {
            label: label.into(),
            x,
            y,
            err: None,
        })
    }

    /// Attach per-point uncertainties.
    pub fn with_errors(mut self, err: Vec<f64>) -> Result<Self, DataError> {
        if err.len() != self.y.len() {
            return Err(DataError::SeriesLength {
                x: self.y.len(),
                y: err.len(),
            });
        }
        self.err = Some(err);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// (min, max) over y, widened by the error bars when present.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, &y) in self.y.iter().enumerate() {
            let e = self.err.as_ref().map_or(0.0, |err| err[i].abs());
            lo = lo.min(y - e);
            hi = hi.max(y + e);
        }
        (lo <= hi).then_some((lo, hi))
    }

    /// (min, max) over x.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(&self.x)
    }
}

// ---------------------------------------------------------------------------
// SeriesSet – the ordered collection handed to smoothing and plotting
// ---------------------------------------------------------------------------

/// An ordered collection of series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    pub series: Vec<Series>,
}

impl SeriesSet {
    pub fn new(series: Vec<Series>) -> Self {
        SeriesSet { series }
    }

    /// One series per selected table column, all sharing `x_column` as x.
    ///
    /// Labels default to `col <index>`.
    pub fn from_table(table: &Table, x_column: usize, y_columns: &[usize]) -> Result<Self, DataError> {
        let x = table.column(x_column)?.to_vec();
        let series = y_columns
            .iter()
            .map(|&c| Series::new(format!("col {c}"), x.clone(), table.column(c)?.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SeriesSet { series })
    }

    /// Replace labels in order; extra labels are ignored, missing ones keep
    /// their current value.
    pub fn relabel<S: AsRef<str>>(&mut self, labels: &[S]) {
        for (series, label) in self.series.iter_mut().zip(labels) {
            series.label = label.as_ref().to_string();
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    /// Combined x range over every series.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        merge_bounds(self.series.iter().filter_map(Series::x_bounds))
    }

    /// Combined y range over every series (error bars included).
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        merge_bounds(self.series.iter().filter_map(Series::y_bounds))
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// (min, max) of a slice, ignoring NaN. `None` for empty input.
pub fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo <= hi).then_some((lo, hi))
}

fn merge_bounds(iter: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    iter.reduce(|(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)))
}

// ---------------------------------------------------------------------------
// BarRecords – the semicolon-separated bar chart input
// ---------------------------------------------------------------------------

/// Parsed `x;y[;label[;err]]` records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarRecords {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Tick labels; empty unless every record carries one.
    pub labels: Vec<String>,
    /// Error bar half-widths; zeros when the column is absent.
    pub errors: Vec<f64>,
}

impl BarRecords {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn has_labels(&self) -> bool {
        !self.labels.is_empty() && self.labels.len() == self.x.len()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.n_rows, self.columns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_transposes() {
        let t = Table::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.n_cols(), 3);
        assert_eq!(t.column(1).unwrap(), &[2.0, 5.0]);
        assert_eq!(t.row(1).unwrap(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, DataError::RaggedRow { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn column_out_of_range_never_wraps() {
        let t = Table::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        for bad in [3, 4, 100] {
            let err = t.column(bad).unwrap_err();
            assert!(matches!(err, DataError::ColumnOutOfRange { n_cols: 3, .. }));
        }
        assert!(t.select(&[0, 3]).is_err());
    }

    #[test]
    fn series_set_from_table_shares_x() {
        let t = Table::from_rows(vec![vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 4.0]]).unwrap();
        let set = SeriesSet::from_table(&t, 0, &[1, 2]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.series[0].x, vec![0.0, 1.0]);
        assert_eq!(set.series[1].y, vec![2.0, 4.0]);
        assert_eq!(set.y_bounds(), Some((1.0, 4.0)));
    }

    #[test]
    fn error_bars_widen_bounds() {
        let s = Series::new("a", vec![0.0, 1.0], vec![1.0, 2.0])
            .unwrap()
            .with_errors(vec![0.5, 1.0])
            .unwrap();
        assert_eq!(s.y_bounds(), Some((0.5, 3.0)));
    }
}
