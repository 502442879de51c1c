//! Per-connection framing: one newline-delimited JSON object in, one
//! newline-delimited JSON object out.
//!
//! `tokio_util::codec::{FramedRead, LinesCodec}` turns a `TcpStream`
//! half into a `Stream<Item = io::Result<String>>` that enforces a
//! maximum line length, bounding memory use against an unterminated
//! or oversized line.

use std::net::SocketAddr;

use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::Instrument;

use tsdb_storage::SeriesRegistry;

use crate::dispatcher::dispatch;

/// Handle every request line sent on one connection until the peer
/// closes the socket or a framing error occurs.
///
/// Decode/I-O errors at this layer terminate the connection silently
/// with no reply; validation errors produced by the dispatcher are
/// replied to and the loop continues.
///
/// The whole connection future is wrapped with `.instrument(span)`
/// rather than entered with a `span.enter()` guard: the guard is
/// `!Send` and would leak across every `.await` below, making this
/// future unfit for `tokio::spawn`.
pub async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    registry: &SeriesRegistry,
    max_line_bytes: usize,
) {
    let span = tracing::info_span!("connection", %peer);
    run_connection(socket, registry, max_line_bytes)
        .instrument(span)
        .await
}

async fn run_connection(socket: TcpStream, registry: &SeriesRegistry, max_line_bytes: usize) {
    tracing::debug!("connection accepted");

    let (read_half, write_half) = socket.into_split();
    let mut lines = FramedRead::new(read_half, LinesCodec::new_with_max_length(max_line_bytes));
    let mut writer = BufWriter::new(write_half);

    loop {
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                tracing::warn!("command line exceeded max_line_bytes, closing connection");
                break;
            }
            Some(Err(err)) => {
                tracing::warn!(error = %err, "framing error, closing connection");
                break;
            }
            None => break,
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = dispatch(registry, &line).await;
        let mut encoded = response.to_line();
        encoded.push('\n');

        if let Err(err) = writer.write_all(encoded.as_bytes()).await {
            tracing::warn!(error = %err, "write failed, closing connection");
            break;
        }
        if let Err(err) = writer.flush().await {
            tracing::warn!(error = %err, "flush failed, closing connection");
            break;
        }
    }

    tracing::debug!("connection closed");
}
