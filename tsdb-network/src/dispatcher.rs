//! Routes a parsed [`Command`] to the series registry and the vector
//! engines, and formats the resulting [`Response`].
//!
//! One `match` arm per command: validate, call into storage or the
//! vector engines, wrap the result.

use tsdb_core::protocol::{parse_command, Command, Response};
use tsdb_core::Result;
use tsdb_storage::SeriesRegistry;

/// Parse and execute one request line, never returning an `Err`: every
/// failure becomes an `Error`-status [`Response`] instead (framing/decode
/// failures below the JSON level are the caller's concern, not this
/// function's).
pub async fn dispatch(registry: &SeriesRegistry, line: &str) -> Response {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(err) => return Response::from_error(&err),
    };

    match execute(registry, command).await {
        Ok(response) => response,
        Err(err) => Response::from_error(&err),
    }
}

async fn execute(registry: &SeriesRegistry, command: Command) -> Result<Response> {
    match command {
        Command::CreateSeries(req) => {
            registry.create_series(&req.name, req.dimension).await?;
            Ok(Response::ok(
                "Created",
                serde_json::json!({ "name": req.name, "dimension": req.dimension }),
            ))
        }

        Command::Insert(req) => {
            let index = registry.insert(&req.series, req.values).await?;
            Ok(Response::ok("Inserted", serde_json::json!({ "index": index })))
        }

        Command::Query(req) => {
            let points = registry.query(&req.series).await?;
            Ok(Response::ok("Data", serde_json::to_value(points)?))
        }

        Command::GetStats(req) => {
            let stats = registry.stats(&req.series).await?;
            Ok(Response::ok("Stats", serde_json::to_value(stats)?))
        }

        Command::FindSimilar(req) => {
            let snapshot = registry.snapshot(&req.series).await?;
            let matches = tsdb_vector::find_similar(
                &snapshot.points,
                snapshot.dimension,
                &req.vector,
                req.limit,
                req.threshold,
            )?;
            Ok(Response::ok("Similar", serde_json::to_value(matches)?))
        }

        Command::Anomaly(req) => {
            let snapshot = registry.snapshot(&req.series).await?;
            let picks = tsdb_vector::anomalies(&snapshot.points, snapshot.dimension, req.window, req.k)?;
            Ok(Response::ok("Anomalies", serde_json::to_value(picks)?))
        }

        Command::Motif(req) => {
            let snapshot = registry.snapshot(&req.series).await?;
            let picks = tsdb_vector::motifs(&snapshot.points, snapshot.dimension, req.window, req.k)?;
            Ok(Response::ok("Motifs", serde_json::to_value(picks)?))
        }

        Command::DeleteSeries(req) => {
            registry.delete_series(&req.name).await?;
            Ok(Response::ok("Deleted", serde_json::Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_insert_query_round_trips() {
        let registry = SeriesRegistry::new();

        let resp = dispatch(&registry, r#"{"type":"CreateSeries","data":{"name":"s","dimension":2}}"#).await;
        assert_eq!(resp.status, "Created");

        let resp = dispatch(&registry, r#"{"type":"Insert","data":{"series":"s","values":[1.0,2.0]}}"#).await;
        assert_eq!(resp.status, "Inserted");

        let resp = dispatch(&registry, r#"{"type":"Query","data":{"series":"s"}}"#).await;
        assert_eq!(resp.status, "Data");
        assert_eq!(resp.data, serde_json::json!([{"values": [1.0, 2.0]}]));
    }

    #[tokio::test]
    async fn unknown_command_type_is_an_error_response() {
        let registry = SeriesRegistry::new();
        let resp = dispatch(&registry, r#"{"type":"DropTable","data":{}}"#).await;
        assert_eq!(resp.status, "Error");
        assert_eq!(resp.data["kind"], "UnknownCommand");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_an_error_response_not_a_panic() {
        let registry = SeriesRegistry::new();
        dispatch(&registry, r#"{"type":"CreateSeries","data":{"name":"s","dimension":2}}"#).await;
        let resp = dispatch(&registry, r#"{"type":"Insert","data":{"series":"s","values":[1.0]}}"#).await;
        assert_eq!(resp.status, "Error");
        assert_eq!(resp.data["kind"], "DimensionMismatch");
    }

    #[tokio::test]
    async fn find_similar_end_to_end() {
        let registry = SeriesRegistry::new();
        dispatch(&registry, r#"{"type":"CreateSeries","data":{"name":"t","dimension":2}}"#).await;
        for values in [[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [-1.0, 0.0]] {
            let line = format!(
                r#"{{"type":"Insert","data":{{"series":"t","values":[{},{}]}}}}"#,
                values[0], values[1]
            );
            dispatch(&registry, &line).await;
        }

        let resp = dispatch(
            &registry,
            r#"{"type":"FindSimilar","data":{"series":"t","vector":[1.0,0.0],"limit":2,"threshold":0.0}}"#,
        )
        .await;
        assert_eq!(resp.status, "Similar");
        let matches = resp.data.as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["values"], serde_json::json!([1.0, 0.0]));
    }

    #[tokio::test]
    async fn delete_series_then_query_is_not_found() {
        let registry = SeriesRegistry::new();
        dispatch(&registry, r#"{"type":"CreateSeries","data":{"name":"s","dimension":1}}"#).await;
        let resp = dispatch(&registry, r#"{"type":"DeleteSeries","data":{"name":"s"}}"#).await;
        assert_eq!(resp.status, "Deleted");

        let resp = dispatch(&registry, r#"{"type":"Query","data":{"series":"s"}}"#).await;
        assert_eq!(resp.status, "Error");
        assert_eq!(resp.data["kind"], "SeriesNotFound");
    }
}
