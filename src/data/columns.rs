use std::str::FromStr;

use super::error::DataError;
use super::model::Table;

/// A list of zero-based column indices parsed from `"2;3;4"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection(Vec<usize>);

impl ColumnSelection {
    pub fn new(indices: Vec<usize>) -> Self {
        ColumnSelection(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Fail if any index is not below `n_cols`.
    pub fn validate(&self, n_cols: usize) -> Result<(), DataError> {
        match self.0.iter().find(|&&i| i >= n_cols) {
            Some(&index) => Err(DataError::ColumnOutOfRange { index, n_cols }),
            None => Ok(()),
        }
    }

    /// The explicit selection, or `default` when none was given.
    pub fn resolve(selection: Option<&ColumnSelection>, default: impl FnOnce() -> Vec<usize>) -> Vec<usize> {
        selection.map_or_else(default, |s| s.0.clone())
    }
}

impl FromStr for ColumnSelection {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(';')
            .map(str::trim)
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<usize>()
                    .map_err(|_| DataError::InvalidColumnSpec(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if indices.is_empty() {
            return Err(DataError::InvalidColumnSpec(s.to_string()));
        }
        Ok(ColumnSelection(indices))
    }
}

/// Every column of the table.
pub fn all_columns(table: &Table) -> Vec<usize> {
    (0..table.n_cols()).collect()
}

/// Every column except the first (the independent variable).
pub fn data_columns(table: &Table) -> Vec<usize> {
    (1..table.n_cols()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_lists() {
        let sel: ColumnSelection = "2;3; 4".parse().unwrap();
        assert_eq!(sel.indices(), &[2, 3, 4]);
        let single: ColumnSelection = "1".parse().unwrap();
        assert_eq!(single.indices(), &[1]);
    }

    #[test]
    fn rejects_garbage() {
        assert!("a;b".parse::<ColumnSelection>().is_err());
        assert!("-1".parse::<ColumnSelection>().is_err());
        assert!("".parse::<ColumnSelection>().is_err());
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let sel = ColumnSelection::new(vec![0, 5, 7]);
        assert_eq!(
            sel.validate(3),
            Err(DataError::ColumnOutOfRange { index: 5, n_cols: 3 })
        );
        assert!(ColumnSelection::new(vec![0, 2]).validate(3).is_ok());
    }
}
