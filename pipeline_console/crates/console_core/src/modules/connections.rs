use crate::modules::error::ConsoleError;
use crate::modules::notify::Notifier;
use crate::modules::protocol::{
    paths, Connection, PipelineConnectionRequest, StreamConnectionRequest,
};
use crate::modules::reconcile::{merge_connection, merge_connections};
use crate::modules::sequencer::RequestSequencer;
use crate::modules::transport::{get_json, post_json, Transport};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const SUBSCRIBER_CAP: usize = 32;
const UPDATE_SUCCESS: &str = "Pipeline connections updated successfully";

/// One stream and the pipelines that should process it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConnection {
    pub stream: String,
    pub pipelines: Vec<String>,
}

/// One pipeline and the streams it should be attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConnection {
    pub pipeline: String,
    pub streams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionsSnapshot {
    pub connections: Vec<Connection>,
}

/// Local mirror of the server's stream<->pipeline connections.
///
/// The cache is `None` until the first successful [`ConnectionsStore::list`];
/// mutating calls made before that start from an empty collection. Every
/// change is published to subscribers as a full snapshot.
pub struct ConnectionsStore<T, N> {
    transport: T,
    notifier: N,
    connections: Mutex<Option<Vec<Connection>>>,
    list_requests: RequestSequencer,
    tx: broadcast::Sender<ConnectionsSnapshot>,
}

impl<T: Transport, N: Notifier> ConnectionsStore<T, N> {
    pub fn new(transport: T, notifier: N) -> Self {
        let (tx, _) = broadcast::channel(SUBSCRIBER_CAP);
        Self {
            transport,
            notifier,
            connections: Mutex::new(None),
            list_requests: RequestSequencer::new(),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionsSnapshot> {
        self.tx.subscribe()
    }

    pub fn connections(&self) -> Option<Vec<Connection>> {
        self.cache().clone()
    }

    pub async fn list(&self) -> Result<Vec<Connection>, ConsoleError> {
        let token = self.list_requests.issue();
        let path = paths::connections();

        let connections: Vec<Connection> = match get_json(&self.transport, &path).await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "listing pipeline connections failed");
                self.notifier.error(
                    &format!("Fetching pipeline connections failed with status: {e}"),
                    "Could not retrieve pipeline connections",
                );
                return Err(e);
            }
        };

        {
            let mut cache = self.cache();
            if !self.list_requests.try_commit(token) {
                debug!(token = token.value(), "discarding superseded connections list");
                return Ok(connections);
            }
            *cache = Some(connections.clone());
        }
        self.publish(connections.clone());
        Ok(connections)
    }

    pub async fn connect_to_stream(&self, connection: StreamConnection) -> Result<Connection, ConsoleError> {
        let request = StreamConnectionRequest {
            stream_id: connection.stream,
            pipeline_ids: connection.pipelines,
        };

        let updated: Connection =
            match post_json(&self.transport, &paths::connections_to_stream(), &request).await {
                Ok(c) => c,
                Err(e) => return Err(self.fail_update(e)),
            };

        let snapshot = {
            let mut cache = self.cache();
            let connections = cache.get_or_insert_with(Vec::new);
            merge_connection(connections, updated.clone());
            connections.clone()
        };
        info!(stream_id = %updated.stream_id, pipelines = updated.pipeline_ids.len(), "stream connection updated");

        self.publish(snapshot);
        self.notifier.success(UPDATE_SUCCESS);
        Ok(updated)
    }

    pub async fn connect_to_pipeline(
        &self,
        reverse: PipelineConnection,
    ) -> Result<Vec<Connection>, ConsoleError> {
        let request = PipelineConnectionRequest {
            pipeline_id: reverse.pipeline,
            stream_ids: reverse.streams,
        };

        let updated: Vec<Connection> =
            match post_json(&self.transport, &paths::connections_to_pipeline(), &request).await {
                Ok(c) => c,
                Err(e) => return Err(self.fail_update(e)),
            };

        let snapshot = {
            let mut cache = self.cache();
            let connections = cache.get_or_insert_with(Vec::new);
            merge_connections(connections, updated.iter().cloned());
            connections.clone()
        };
        info!(pipeline_id = %request.pipeline_id, streams = updated.len(), "pipeline connections updated");

        self.publish(snapshot);
        self.notifier.success(UPDATE_SUCCESS);
        Ok(updated)
    }

    fn fail_update(&self, e: ConsoleError) -> ConsoleError {
        warn!(error = %e, "updating pipeline connections failed");
        self.notifier.error(
            &format!("Updating pipeline connections failed with status: {e}"),
            "Could not update pipeline connections",
        );
        e
    }

    fn publish(&self, connections: Vec<Connection>) {
        // No subscribers is fine.
        let _ = self.tx.send(ConnectionsSnapshot { connections });
    }

    fn cache(&self) -> MutexGuard<'_, Option<Vec<Connection>>> {
        match self.connections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
