use crate::modules::error::ConsoleError;
use crate::modules::formatter::MessageSummary;
use crate::modules::notify::Notifier;
use crate::modules::render::{results_panel, ResultsPanel};
use crate::modules::sequencer::{RequestSequencer, RequestToken};
use crate::modules::simulator::{SimulationResult, SimulatorStore, Stream};
use crate::modules::transport::Transport;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorPhase {
    Idle,
    Loading,
    Result,
    Error,
}

/// What has to be sent to the simulator for a load started with
/// [`SimulatorView::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSimulation {
    pub token: RequestToken,
    pub index: String,
    pub message_id: String,
}

/// Load/simulate/render state for one stream.
///
/// Each load gets a fresh token; a completion carrying anything but the
/// latest token is dropped, so a slow response can never overwrite the state
/// of a newer load.
#[derive(Debug)]
pub struct SimulatorView {
    stream: Stream,
    message: Option<MessageSummary>,
    simulation: Option<SimulationResult>,
    loading: bool,
    error: Option<String>,
    requests: RequestSequencer,
}

impl SimulatorView {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            message: None,
            simulation: None,
            loading: false,
            error: None,
            requests: RequestSequencer::new(),
        }
    }

    pub fn begin_load(&mut self, message: MessageSummary) -> PendingSimulation {
        let token = self.requests.issue();
        let pending = PendingSimulation {
            token,
            index: message.index.clone().unwrap_or_default(),
            message_id: message.id.clone(),
        };
        self.message = Some(message);
        self.simulation = None;
        self.error = None;
        self.loading = true;
        pending
    }

    /// Returns `false` when the outcome belonged to a superseded load.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<SimulationResult, ConsoleError>,
    ) -> bool {
        if !self.requests.is_latest(token) {
            debug!(token = token.value(), "discarding stale simulation result");
            return false;
        }
        match outcome {
            Ok(result) => self.simulation = Some(result),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
        true
    }

    pub async fn load_message<T: Transport, N: Notifier>(
        &mut self,
        store: &SimulatorStore<T, N>,
        message: MessageSummary,
    ) -> SimulatorPhase {
        let pending = self.begin_load(message);
        let outcome = store
            .simulate(&self.stream, &pending.index, &pending.message_id)
            .await;
        self.complete(pending.token, outcome);
        self.phase()
    }

    pub fn phase(&self) -> SimulatorPhase {
        if self.loading {
            SimulatorPhase::Loading
        } else if self.error.is_some() {
            SimulatorPhase::Error
        } else if self.simulation.is_some() {
            SimulatorPhase::Result
        } else {
            SimulatorPhase::Idle
        }
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    pub fn message(&self) -> Option<&MessageSummary> {
        self.message.as_ref()
    }

    pub fn simulation(&self) -> Option<&SimulationResult> {
        self.simulation.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render(&self) -> Option<ResultsPanel> {
        results_panel(self)
    }
}
