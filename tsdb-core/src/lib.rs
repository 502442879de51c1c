//! Core types shared by the TSDB workspace.
//!
//! This crate carries no I/O: it defines the error taxonomy, the wire
//! protocol (`Command`/`Response`), and the series domain types. Every
//! other crate in the workspace depends on it and nothing here depends
//! on them.

pub mod error;
pub mod protocol;
pub mod series;

pub use error::{Error, ErrorKind};
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol version advertised by this server implementation.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Hard cap on a single command line, to bound memory use against
/// malformed or oversized input.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;
