//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training a learner against a simulated maze
//! - Rolling out the learned greedy policy
//! - Recording observations during training

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver, SharedObserver,
    StepObservation,
};
pub use training::{RunSummary, TrainingConfig, TrainingPipeline, TrainingResult, greedy_rollout};

pub use crate::ports::Observer;
