//! TSDB TCP server: builds the shared [`SeriesRegistry`], accepts
//! connections, and hands each one to `tsdb_network::handle_connection`.

pub mod config;

use std::sync::Arc;

use tokio::net::TcpListener;
use tsdb_storage::{SeriesRegistry, Wal};

pub use config::ServerConfig;

/// Construct the shared registry described by `config`: in-memory only
/// unless `persistence_path` is set, in which case state is replayed
/// from the write-ahead log at that path before the listener starts.
pub async fn build_registry(config: &ServerConfig) -> anyhow::Result<SeriesRegistry> {
    match &config.persistence_path {
        Some(path) => {
            tracing::info!(path, "opening write-ahead log");
            let wal = Wal::open(path)?;
            Ok(SeriesRegistry::with_wal(wal).await?)
        }
        None => Ok(SeriesRegistry::new()),
    }
}

/// Serve connections accepted on `listener` until `shutdown` resolves.
/// Each connection runs on its own spawned task sharing one
/// `Arc<SeriesRegistry>`.
pub async fn run(
    listener: TcpListener,
    registry: Arc<SeriesRegistry>,
    max_line_bytes: usize,
    shutdown: impl std::future::Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    tsdb_network::handle_connection(socket, peer, &registry, max_line_bytes).await;
                });
            }
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }
    Ok(())
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve(
    config: ServerConfig,
    registry: Arc<SeriesRegistry>,
    shutdown: impl std::future::Future<Output = ()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), "listening");
    run(listener, registry, config.max_line_bytes, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn accepted_connection_round_trips_a_command() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let registry = Arc::new(SeriesRegistry::new());
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(run(listener, registry, 1_048_576, async {
            let _ = rx.await;
        }));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        write_half
            .write_all(b"{\"type\":\"CreateSeries\",\"data\":{\"name\":\"s\",\"dimension\":1}}\n")
            .await
            .unwrap();

        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["status"], "Created");

        let _ = tx.send(());
    }

    #[tokio::test]
    async fn a_second_connection_is_independent_of_the_first() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let registry = Arc::new(SeriesRegistry::new());
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(run(listener, registry, 1_048_576, async {
            let _ = rx.await;
        }));
        tokio::time::sleep(Duration::from_millis(20)).await;

        for _ in 0..2 {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            write_half
                .write_all(b"{\"type\":\"GetStats\",\"data\":{\"series\":\"missing\"}}\n")
                .await
                .unwrap();

            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let response: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(response["status"], "Error");
            assert_eq!(response["data"]["kind"], "SeriesNotFound");
        }

        let _ = tx.send(());
    }
}
