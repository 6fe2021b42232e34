use crate::modules::error::ConsoleError;
use crate::modules::formatter::{format_message_summary, MessageSummary};
use crate::modules::notify::Notifier;
use crate::modules::protocol::{paths, SimulationRequest, SimulationResponse};
use crate::modules::transport::{post_json, Transport};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    pub id: String,
    pub title: String,
}

impl Stream {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub messages: Vec<MessageSummary>,
    pub took_microseconds: u64,
}

impl SimulationResult {
    /// No output messages means the pipelines would drop the input.
    pub fn is_dropped(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Runs one server-side simulation per call. Calls are independent: nothing
/// is cancelled or sequenced here.
pub struct SimulatorStore<T, N> {
    transport: T,
    notifier: N,
}

impl<T: Transport, N: Notifier> SimulatorStore<T, N> {
    pub fn new(transport: T, notifier: N) -> Self {
        Self { transport, notifier }
    }

    pub async fn simulate(
        &self,
        stream: &Stream,
        index: &str,
        message_id: &str,
    ) -> Result<SimulationResult, ConsoleError> {
        let request = SimulationRequest {
            stream_id: stream.id.clone(),
            index: index.to_string(),
            message_id: message_id.to_string(),
        };
        debug!(stream_id = %request.stream_id, index, message_id, "simulating");

        match post_json::<_, SimulationResponse>(&self.transport, &paths::simulate(), &request).await {
            Ok(resp) => Ok(SimulationResult {
                messages: resp.messages.into_iter().map(format_message_summary).collect(),
                took_microseconds: resp.took_microseconds,
            }),
            Err(e) => {
                warn!(error = %e, message_id, "simulation failed");
                self.notifier.error(
                    &format!("Simulating processing on message failed with status: {e}"),
                    "Could not simulate processing on message",
                );
                Err(e)
            }
        }
    }
}
