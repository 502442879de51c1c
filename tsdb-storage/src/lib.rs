//! The in-memory series store for the TSDB core, plus an optional
//! write-ahead persistence layer.
//!
//! Re-exports `tsdb_core::{Error, Result}` rather than defining its own
//! error type: storage failures are a subset of the protocol's error
//! taxonomy (`SeriesNotFound`, `SeriesAlreadyExists`,
//! `DimensionMismatch`, `InvalidArgument`), so there is nothing this
//! crate needs to add.

mod registry;
mod wal;

pub use registry::{SeriesRegistry, SeriesSnapshot, SeriesStats};
pub use tsdb_core::{Error, Result};
pub use wal::Wal;
