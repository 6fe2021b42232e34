pub use pipeline_protocol::{
    paths, ApiErrorBody, Connection, PipelineConnectionRequest, RawMessage, SimulationRequest,
    SimulationResponse, StreamConnectionRequest, PLUGIN_PREFIX,
};
