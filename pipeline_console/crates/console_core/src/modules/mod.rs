pub mod config;
pub mod connections;
pub mod diff;
pub mod error;
pub mod formatter;
pub mod loader;
pub mod notify;
pub mod protocol;
pub mod reconcile;
pub mod render;
pub mod sequencer;
pub mod simulator;
pub mod simulator_view;
pub mod transport;
