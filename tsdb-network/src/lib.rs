//! Connection handling and command dispatch for the TSDB TCP frontend.
//!
//! This crate owns everything between an accepted `TcpStream` and a
//! [`tsdb_storage::SeriesRegistry`]: newline framing ([`connection`])
//! and JSON decode/route/encode ([`dispatcher`]). It does not listen
//! on a socket itself — `tsdb-server` owns the `TcpListener` and the
//! accept loop, and hands each accepted connection to
//! [`connection::handle_connection`].

pub mod connection;
pub mod dispatcher;

pub use connection::handle_connection;
pub use dispatcher::dispatch;
