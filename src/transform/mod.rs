//! Pure numeric transforms between loading and output.

pub mod combine;
pub mod decorrelation;
pub mod grouping;
pub mod histogram;
pub mod series;
pub mod stats;

pub use decorrelation::{DecorrelationEstimator, StatisticalInefficiency};
pub use series::{ProcessingMode, moving_average};
pub use stats::{ColumnStats, column_stats};
