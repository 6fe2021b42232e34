use crate::modules::error::ConsoleError;
use crate::modules::formatter::{format_message_summary, MessageSummary};
use crate::modules::notify::Notifier;
use crate::modules::protocol::{paths, RawMessage};
use crate::modules::transport::{get_json, Transport};
use tracing::warn;

/// Fetches a stored message to use as simulation input.
pub struct MessageLoader<T, N> {
    transport: T,
    notifier: N,
}

impl<T: Transport, N: Notifier> MessageLoader<T, N> {
    pub fn new(transport: T, notifier: N) -> Self {
        Self { transport, notifier }
    }

    pub async fn load(&self, index: &str, message_id: &str) -> Result<MessageSummary, ConsoleError> {
        let path = paths::message(index, message_id);
        match get_json::<RawMessage>(&self.transport, &path).await {
            Ok(mut raw) => {
                if raw.index.is_none() {
                    raw.index = Some(index.to_string());
                }
                Ok(format_message_summary(raw))
            }
            Err(e) => {
                warn!(error = %e, index, message_id, "loading message failed");
                self.notifier.error(
                    &format!("Loading message failed with status: {e}"),
                    "Could not load message",
                );
                Err(e)
            }
        }
    }
}
