use serde::Serialize;

use crate::data::{DataError, Table};

/// Per-column summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub columns: Vec<usize>,
    pub means: Vec<f64>,
    /// Population standard deviation (divides by N).
    pub stds: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mins: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxs: Option<Vec<f64>>,
}

/// Mean and population standard deviation of a slice. `None` if empty.
///
/// A constant slice yields exactly that constant and a zero deviation.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return Some((first, 0.0));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Statistics over the given columns of a table.
pub fn column_stats(table: &Table, columns: &[usize], with_minmax: bool) -> Result<ColumnStats, DataError> {
    if table.is_empty() {
        return Err(DataError::Empty);
    }

    let mut means = Vec::with_capacity(columns.len());
    let mut stds = Vec::with_capacity(columns.len());
    let mut mins = Vec::new();
    let mut maxs = Vec::new();

    for &c in columns {
        let col = table.column(c)?;
        let (mean, std) = mean_std(col).ok_or(DataError::Empty)?;
        means.push(mean);
        stds.push(std);
        if with_minmax {
            mins.push(col.iter().copied().fold(f64::INFINITY, f64::min));
            maxs.push(col.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        }
    }

    Ok(ColumnStats {
        columns: columns.to_vec(),
        means,
        stds,
        mins: with_minmax.then_some(mins),
        maxs: with_minmax.then_some(maxs),
    })
}

impl ColumnStats {
    /// `# Avgs: [...]` and `# Stds: [...]`, the lines appended to data files.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("# Avgs: {}", format_array(&self.means)),
            format!("# Stds: {}", format_array(&self.stds)),
        ]
    }

    /// `# Min: [...]` and `# Max: [...]` when min/max were computed.
    pub fn minmax_lines(&self) -> Vec<String> {
        match (&self.mins, &self.maxs) {
            (Some(mins), Some(maxs)) => vec![
                format!("# Min: {}", format_array(mins)),
                format!("# Max: {}", format_array(maxs)),
            ],
            _ => Vec::new(),
        }
    }
}

/// `[1.0000 2.5000]`
pub fn format_array(values: &[f64]) -> String {
    let inner = values
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{inner}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<f64>>) -> Table {
        Table::from_rows(rows).unwrap()
    }

    #[test]
    fn two_row_example() {
        let t = table(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let stats = column_stats(&t, &[0, 1, 2], false).unwrap();
        assert_eq!(stats.means, vec![2.5, 3.5, 4.5]);
        assert_eq!(stats.stds, vec![1.5, 1.5, 1.5]);
        assert!(stats.mins.is_none());
    }

    #[test]
    fn constant_rows_have_zero_std() {
        let row = vec![3.25, -1.0, 7.0];
        let t = table(vec![row.clone(); 10]);
        let stats = column_stats(&t, &[0, 1, 2], true).unwrap();
        assert_eq!(stats.means, row);
        assert_eq!(stats.stds, vec![0.0, 0.0, 0.0]);
        assert_eq!(stats.mins.as_deref(), Some(row.as_slice()));
        assert_eq!(stats.maxs.as_deref(), Some(row.as_slice()));
    }

    #[test]
    fn inexact_constants_stay_exact() {
        let row = vec![0.1, 0.3, 1.1, 2.675];
        let t = table(vec![row.clone(); 10]);
        let stats = column_stats(&t, &[0, 1, 2, 3], false).unwrap();
        assert_eq!(stats.means, row);
        assert_eq!(stats.stds, vec![0.0; 4]);
        assert_eq!(mean_std(&[0.1; 7]), Some((0.1, 0.0)));
    }

    #[test]
    fn out_of_range_column_fails() {
        let t = table(vec![vec![1.0, 2.0]]);
        let err = column_stats(&t, &[0, 2], false).unwrap_err();
        assert_eq!(err, DataError::ColumnOutOfRange { index: 2, n_cols: 2 });
    }

    #[test]
    fn empty_table_fails() {
        let t = Table::from_rows(Vec::new()).unwrap();
        assert_eq!(column_stats(&t, &[], false), Err(DataError::Empty));
    }

    #[test]
    fn summary_lines_format() {
        let t = table(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let stats = column_stats(&t, &[0, 1], true).unwrap();
        assert_eq!(
            stats.summary_lines(),
            vec!["# Avgs: [2.0000 3.0000]", "# Stds: [1.0000 1.0000]"]
        );
        assert_eq!(stats.minmax_lines()[1], "# Max: [3.0000 4.0000]");
    }
}
