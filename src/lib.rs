//! Post-processing and plotting utilities for computational chemistry
//! data.
//!
//! Each tool under `src/bin/` is a thin wrapper around an argument struct
//! in [`cli`]; the library modules hold the loaders, transforms and sinks
//! they share.

pub mod chem;
pub mod cli;
pub mod color;
pub mod data;
pub mod grid;
pub mod insert;
pub mod plot;
pub mod transform;
