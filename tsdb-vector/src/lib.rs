//! Vector math kernel, similarity search and matrix-profile analytics
//! for TSDB core.
//!
//! This crate is storage-independent: every function here takes plain
//! `&[tsdb_core::series::Point]` slices, so it can run against a
//! `tsdb_storage::SeriesSnapshot` without ever taking a lock itself.

pub mod distance;
pub mod matrix_profile;
pub mod similarity;

pub use matrix_profile::{anomalies, motifs, MatrixProfile, ProfileMatch};
pub use similarity::{find_similar, SimilarityMatch};
