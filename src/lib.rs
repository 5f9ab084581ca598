pub mod api_client;
pub mod configuration;
pub mod context;
pub mod domain;
pub mod expectations;
pub mod runner;
pub mod scenarios;
pub mod sequencer;
pub mod telemetry;
pub mod utils;
