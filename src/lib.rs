//! Micromouse maze learner
//!
//! This crate provides:
//! - Grid navigation primitives and a wall map built from sensor readings
//! - State encoding and a tabular Q-learning agent with ε-greedy exploration
//! - The per-turn robot controller that talks to an external maze driver
//! - A simulated 12x12 maze, a training pipeline and observers
//! - A CLI for training and evaluating learners

pub mod adapters;
pub mod app;
pub mod cli;
pub mod encoder;
pub mod error;
pub mod navigation;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod robot;
pub mod session;
pub mod types;

pub use adapters::{GridMaze, MazeSimulator};
pub use app::{LearnerConfig, SessionConfig};
pub use encoder::{StateEncoder, StateKey};
pub use error::{Error, Result};
pub use navigation::{Action, Direction, Heading, Motion, Pose, Position};
pub use ports::MazeModel;
pub use q_learning::{QLearner, SavedLearner};
pub use reward::{MoveOutcome, RewardSchedule};
pub use robot::{Response, Robot, TurnReport};
pub use session::{Session, Transition};
pub use types::SensorTriple;
