use thiserror::Error;

/// Shape and indexing errors for numeric tables and series.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("column index {index} is out of range (table has {n_cols} columns)")]
    ColumnOutOfRange { index: usize, n_cols: usize },

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column {column} has {found} values, expected {expected}")]
    ColumnLength {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("series length mismatch: {x} x values but {y} y values")]
    SeriesLength { x: usize, y: usize },

    #[error("row count mismatch: '{name}' has {found} rows, expected {expected}")]
    RowCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid column specification '{0}'")]
    InvalidColumnSpec(String),

    #[error("table is empty")]
    Empty,
}
