//! Adapters implementing domain ports.
//!
//! This module contains the driver-side collaborators of the robot: a grid
//! maze that implements [`crate::ports::MazeModel`] and a simulator that
//! produces sensor readings and carries out commands against it.

pub mod grid_maze;
pub mod simulator;

pub use grid_maze::GridMaze;
pub use simulator::{Applied, MazeSimulator};
