use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const PLUGIN_PREFIX: &str = "/plugins/org.graylog.plugins.pipelineprocessor";

pub mod paths {
    use super::PLUGIN_PREFIX;

    pub fn connections() -> String {
        format!("{PLUGIN_PREFIX}/system/pipelines/connections")
    }

    pub fn connections_to_stream() -> String {
        format!("{PLUGIN_PREFIX}/system/pipelines/connections/to_stream")
    }

    pub fn connections_to_pipeline() -> String {
        format!("{PLUGIN_PREFIX}/system/pipelines/connections/to_pipeline")
    }

    pub fn simulate() -> String {
        format!("{PLUGIN_PREFIX}/system/pipelines/simulate")
    }

    /// Core message API, served outside the plugin prefix.
    pub fn message(index: &str, message_id: &str) -> String {
        format!("/messages/{index}/{message_id}")
    }
}

/// Pipelines attached to one stream. The server keeps at most one per stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub stream_id: String,
    #[serde(default)]
    pub pipeline_ids: BTreeSet<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamConnectionRequest {
    pub stream_id: String,
    pub pipeline_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineConnectionRequest {
    pub pipeline_id: String,
    pub stream_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub stream_id: String,
    pub index: String,
    pub message_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimulationResponse {
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub took_microseconds: u64,
}

/// A message as returned by the search and simulation endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawMessage {
    pub message: Map<String, Value>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlight_ranges: Map<String, Value>,
    #[serde(default)]
    pub decoration_stats: Option<Value>,
}

/// Simulated messages carry explicit nulls where stored ones carry objects.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body Graylog attaches to non-2xx responses.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
