//! Wire protocol: the tagged command envelope and the typed requests it
//! decodes into, plus the response shapes the dispatcher produces.
//!
//! Nothing downstream of [`parse_command`] ever touches a raw
//! `serde_json::Value` for a command field — every field is validated
//! here, at the boundary, via `validator`.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::Error;

/// The outer envelope every request line must deserialize into:
/// `{ "type": "...", "data": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    command_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

fn validate_finite_vec(values: &[f64]) -> Result<(), ValidationError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSeriesRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InsertRequest {
    #[validate(length(min = 1))]
    pub series: String,
    #[validate(custom(function = "validate_finite_vec"))]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(min = 1))]
    pub series: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetStatsRequest {
    #[validate(length(min = 1))]
    pub series: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FindSimilarRequest {
    #[validate(length(min = 1))]
    pub series: String,
    #[validate(custom(function = "validate_finite_vec"))]
    pub vector: Vec<f64>,
    #[validate(range(min = 1))]
    pub limit: usize,
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnomalyRequest {
    #[validate(length(min = 1))]
    pub series: String,
    #[validate(range(min = 2))]
    pub window: usize,
    #[validate(range(min = 1))]
    pub k: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MotifRequest {
    #[validate(length(min = 1))]
    pub series: String,
    #[validate(range(min = 2))]
    pub window: usize,
    #[validate(range(min = 1))]
    pub k: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteSeriesRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

/// A fully parsed, field-validated command ready to be routed to an engine.
#[derive(Debug, Clone)]
pub enum Command {
    CreateSeries(CreateSeriesRequest),
    Insert(InsertRequest),
    Query(QueryRequest),
    GetStats(GetStatsRequest),
    FindSimilar(FindSimilarRequest),
    Anomaly(AnomalyRequest),
    Motif(MotifRequest),
    DeleteSeries(DeleteSeriesRequest),
}

fn decode<T>(data: serde_json::Value) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let req: T = serde_json::from_value(data).map_err(|e| Error::MalformedRequest(e.to_string()))?;
    req.validate()
        .map_err(|e| Error::InvalidArgument(e.to_string()))?;
    Ok(req)
}

/// Parse and validate one line of the wire protocol into a [`Command`].
///
/// Decode failures (bad JSON, wrong field types) and unknown `type`
/// values are distinguished in the returned error's kind so the
/// dispatcher can apply the right propagation policy.
pub fn parse_command(line: &str) -> Result<Command, Error> {
    let envelope: Envelope =
        serde_json::from_str(line).map_err(|e| Error::MalformedRequest(e.to_string()))?;

    match envelope.command_type.as_str() {
        "CreateSeries" => Ok(Command::CreateSeries(decode(envelope.data)?)),
        "Insert" => Ok(Command::Insert(decode(envelope.data)?)),
        "Query" => Ok(Command::Query(decode(envelope.data)?)),
        "GetStats" => Ok(Command::GetStats(decode(envelope.data)?)),
        "FindSimilar" => Ok(Command::FindSimilar(decode(envelope.data)?)),
        "Anomaly" => Ok(Command::Anomaly(decode(envelope.data)?)),
        "Motif" => Ok(Command::Motif(decode(envelope.data)?)),
        "DeleteSeries" => Ok(Command::DeleteSeries(decode(envelope.data)?)),
        other => Err(Error::UnknownCommand(other.to_string())),
    }
}

/// `{ "status": ..., "data": ... }`, the shape of every reply line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status: String,
    pub data: serde_json::Value,
}

impl Response {
    pub fn ok(status: &str, data: serde_json::Value) -> Self {
        Self {
            status: status.to_string(),
            data,
        }
    }

    pub fn from_error(err: &Error) -> Self {
        Self {
            status: "Error".to_string(),
            data: serde_json::json!({
                "message": err.to_string(),
                "kind": err.kind(),
            }),
        }
    }

    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"status":"Error","data":{"message":"failed to encode response","kind":"Internal"}}"#
                .to_string()
        })
    }
}
