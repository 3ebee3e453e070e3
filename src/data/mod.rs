/// Data layer: core types, loading, column selection and writing.
///
/// Architecture:
/// ```text
///  .dat / .txt / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  columns │  "2;3;4" → validated column indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ SeriesSet │  Vec<Series> handed to transforms and plots
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer  │  Table → delimited text / appended comments
///   └──────────┘
/// ```

pub mod columns;
pub mod error;
pub mod loader;
pub mod model;
pub mod writer;

pub use columns::ColumnSelection;
pub use error::DataError;
pub use loader::{Delimiter, LoadOptions, load_table};
pub use model::{BarRecords, Series, SeriesSet, Table};
