//! Application layer: configuration consumed by the pipeline and CLI.

pub mod config;

pub use config::{LearnerConfig, SessionConfig};
