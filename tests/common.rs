//! Common test utilities for the micromouse test suite.

#![allow(dead_code)]

use micromouse::{GridMaze, LearnerConfig, QLearner, Session};

/// Reading at the start pose of the built-in maze: walls left and right,
/// two open cells ahead.
pub const START_READINGS: [i64; 3] = [0, 2, 0];

/// Learner with default hyperparameters and a fixed seed.
pub fn seeded_learner(seed: u64) -> QLearner {
    QLearner::new(&LearnerConfig::default().with_seed(seed)).unwrap()
}

/// Seeded learner, fresh session and the built-in maze.
pub fn builtin_setup(seed: u64) -> (QLearner, Session, GridMaze) {
    let maze = GridMaze::builtin();
    let session = Session::for_maze(&maze, 3).unwrap();
    (seeded_learner(seed), session, maze)
}
