use crate::data::{DataError, Table};

/// Tolerance when checking that independent columns agree across files.
const X_TOLERANCE: f64 = 1e-9;

/// Combine tables sharing an independent column.
///
/// Each input holds the independent variable in column 0 and dependent
/// values in the remaining columns. The result keeps the first table's
/// column 0, then every dependent column in input order, then the row-wise
/// mean of all dependent columns.
///
/// `names` are used in error messages only and must match `tables` in
/// length.
pub fn combine_with_mean(tables: &[Table], names: &[String]) -> Result<Table, DataError> {
    let first = tables.first().ok_or(DataError::Empty)?;
    let n_rows = first.n_rows();

    for (table, name) in tables.iter().zip(names) {
        if table.n_rows() != n_rows {
            return Err(DataError::RowCountMismatch {
                name: name.clone(),
                expected: n_rows,
                found: table.n_rows(),
            });
        }
    }

    let x = first.column(0)?.to_vec();
    let mut columns = vec![x.clone()];

    for (table, name) in tables.iter().zip(names) {
        let other_x = table.column(0)?;
        if other_x
            .iter()
            .zip(&x)
            .any(|(a, b)| (a - b).abs() > X_TOLERANCE)
        {
            log::warn!("Independent column of '{name}' differs from the first file; keeping the first");
        }
        for c in 1..table.n_cols() {
            columns.push(table.column(c)?.to_vec());
        }
    }

    let dependent = &columns[1..];
    if dependent.is_empty() {
        return Err(DataError::ColumnOutOfRange { index: 1, n_cols: 1 });
    }
    let mean = (0..n_rows)
        .map(|i| dependent.iter().map(|c| c[i]).sum::<f64>() / dependent.len() as f64)
        .collect();
    columns.push(mean);

    Table::from_columns(columns)
}

/// Two-column table: the independent column and the row-wise sum of the
/// selected columns.
pub fn sum_columns(table: &Table, x_column: usize, columns: &[usize]) -> Result<Table, DataError> {
    let x = table.column(x_column)?.to_vec();
    let selected = columns
        .iter()
        .map(|&c| table.column(c))
        .collect::<Result<Vec<_>, _>>()?;
    let sums = (0..table.n_rows())
        .map(|i| selected.iter().map(|c| c[i]).sum())
        .collect();
    Table::from_columns(vec![x, sums])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn combines_and_averages() {
        let a = Table::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]]).unwrap();
        let b = Table::from_rows(vec![vec![1.0, 4.0], vec![2.0, 8.0], vec![3.0, 0.0]]).unwrap();
        let out = combine_with_mean(&[a, b], &names(2)).unwrap();
        assert_eq!(out.n_rows(), 3);
        assert_eq!(out.n_cols(), 4);
        assert_eq!(out.column(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(out.column(3).unwrap(), &[3.0, 6.0, 3.0]);
    }

    #[test]
    fn mismatched_rows_fail() {
        let a = Table::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let b = Table::from_rows(vec![vec![1.0, 4.0]]).unwrap();
        let err = combine_with_mean(&[a, b], &names(2)).unwrap_err();
        assert_eq!(
            err,
            DataError::RowCountMismatch {
                name: "f1".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn multi_column_inputs_are_flattened() {
        let a = Table::from_rows(vec![vec![0.0, 1.0, 3.0]]).unwrap();
        let b = Table::from_rows(vec![vec![0.0, 5.0]]).unwrap();
        let out = combine_with_mean(&[a, b], &names(2)).unwrap();
        assert_eq!(out.row(0).unwrap(), vec![0.0, 1.0, 3.0, 5.0, 3.0]);
    }

    #[test]
    fn sums_selected_columns() {
        let t = Table::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 4.0, 5.0, 6.0]]).unwrap();
        let out = sum_columns(&t, 0, &[1, 3]).unwrap();
        assert_eq!(out.column(1).unwrap(), &[4.0, 10.0]);
        assert!(sum_columns(&t, 0, &[4]).is_err());
    }
}
