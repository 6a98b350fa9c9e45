//! Decoding of the open-data API response bodies.
//!
//! The service reports some failures with HTTP 200 and an error body, either a
//! bare status string (`"403"`) or an object with `statusCode` and `message`.
//! Both shapes are turned into [`FetchFailure::Api`] before the payload is read.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchFailure;
use crate::model::{Population, Prefecture};

#[derive(Debug, Deserialize)]
struct PrefecturesResponse {
    result: Vec<Prefecture>,
}

#[derive(Debug, Deserialize)]
struct PopulationResponse {
    result: PopulationResult,
}

#[derive(Debug, Deserialize)]
struct PopulationResult {
    #[serde(default)]
    data: Vec<Population>,
}

pub fn parse_prefectures(body: &str) -> Result<Vec<Prefecture>, FetchFailure> {
    decode::<PrefecturesResponse>(body).map(|response| response.result)
}

/// Returns the first series of the response (`result.data[0]`).
pub fn parse_population(body: &str) -> Result<Population, FetchFailure> {
    decode::<PopulationResponse>(body)?
        .result
        .data
        .into_iter()
        .next()
        .ok_or(FetchFailure::EmptyPayload)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchFailure> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| FetchFailure::Decode(err.to_string()))?;
    if let Some(failure) = error_envelope(&value) {
        return Err(failure);
    }
    serde_json::from_value(value).map_err(|err| FetchFailure::Decode(err.to_string()))
}

fn error_envelope(value: &Value) -> Option<FetchFailure> {
    match value {
        Value::String(status) => Some(FetchFailure::Api {
            status: status.clone(),
            message: String::new(),
        }),
        Value::Object(map) if map.get("result").is_none_or(Value::is_null) => {
            let status = map.get("statusCode").map(status_text)?;
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(FetchFailure::Api { status, message })
        }
        _ => None,
    }
}

fn status_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
