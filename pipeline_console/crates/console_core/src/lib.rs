mod modules;

pub use modules::{
    config, connections, diff, error, formatter, loader, notify, protocol, reconcile, render,
    sequencer, simulator, simulator_view, transport,
};

pub use modules::config::ConsoleConfig;
pub use modules::connections::{ConnectionsStore, PipelineConnection, StreamConnection};
pub use modules::error::{ConsoleError, FetchError};
pub use modules::loader::MessageLoader;
pub use modules::notify::{Notifier, TracingNotifier};
pub use modules::simulator::{SimulationResult, SimulatorStore, Stream};
pub use modules::simulator_view::{SimulatorPhase, SimulatorView};
pub use modules::transport::{Method, RestClient, Transport};
