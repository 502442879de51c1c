//! A minimal TSDB protocol client.
//!
//! Demonstrates the line-delimited JSON command protocol: connect
//! once, then send `CreateSeries`/`Insert`/`Query`/`FindSimilar` lines
//! and read one reply line per command.
//!
//! Run the server first:
//! ```bash
//! cargo run -p tsdb-server
//! ```
//!
//! Then run this example:
//! ```bash
//! cargo run -p tsdb-server --example simple_client
//! ```

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

const ADDR: &str = "127.0.0.1:9999";

async fn send(
    reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    request: Value,
) -> anyhow::Result<Value> {
    let mut line = request.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;

    let mut reply = String::new();
    reader.read_line(&mut reply).await?;
    Ok(serde_json::from_str(&reply)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Connecting to {ADDR}...");
    let stream = TcpStream::connect(ADDR).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let resp = send(
        &mut reader,
        &mut write_half,
        json!({"type": "CreateSeries", "data": {"name": "demo_prices", "dimension": 2}}),
    )
    .await?;
    println!("CreateSeries -> {resp}");

    let points = [[100.0, 1.5], [101.2, 1.6], [99.8, 1.4], [102.5, 1.7]];
    for values in points {
        let resp = send(
            &mut reader,
            &mut write_half,
            json!({"type": "Insert", "data": {"series": "demo_prices", "values": values}}),
        )
        .await?;
        println!("Insert {values:?} -> {resp}");
    }

    let resp = send(
        &mut reader,
        &mut write_half,
        json!({"type": "GetStats", "data": {"series": "demo_prices"}}),
    )
    .await?;
    println!("GetStats -> {resp}");

    let resp = send(
        &mut reader,
        &mut write_half,
        json!({
            "type": "FindSimilar",
            "data": {"series": "demo_prices", "vector": [100.0, 1.5], "limit": 2, "threshold": 0.0}
        }),
    )
    .await?;
    println!("FindSimilar -> {resp}");

    let resp = send(
        &mut reader,
        &mut write_half,
        json!({"type": "Anomaly", "data": {"series": "demo_prices", "window": 2, "k": 1}}),
    )
    .await?;
    println!("Anomaly -> {resp}");

    Ok(())
}
