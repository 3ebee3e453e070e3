//! Volumetric grid input.

pub mod dx;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use dx::{read_dx, DxGrid, GridSlice};

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("expected {expected} grid values, found {found}")]
    ValueCount { expected: usize, found: usize },
    #[error("index {index} is outside the {axis} axis (0..{size})")]
    SliceOutOfRange { axis: Axis, index: usize, size: usize },
    #[error("unknown axis '{0}', expected x, y or z")]
    UnknownAxis(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Horizontal and vertical axes of the plane seen when looking down
    /// this axis.
    pub fn plane(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

impl FromStr for Axis {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(GridError::UnknownAxis(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_parsing() {
        assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
        assert!("w".parse::<Axis>().is_err());
        assert_eq!(Axis::Z.plane(), (Axis::X, Axis::Y));
    }
}
