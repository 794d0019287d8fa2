//! Maze port - abstraction for the environment the robot moves through
//!
//! The learner never reads maze geometry directly. Its only contact with the
//! maze is through the sensors and the reward paid for each committed motion,
//! both supplied by an implementation of this trait.

use crate::{
    Result,
    navigation::{Direction, GoalRegion, Motion, Pose, Position},
};

/// Maze trait - static geometry plus the reward for a move.
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture. The built-in
/// grid maze is one adapter; a physical robot bridge or a maze generator
/// would be others.
///
/// # Examples
///
/// ```no_run
/// use micromouse::{
///     navigation::{Direction, Motion, Pose, Position},
///     ports::MazeModel,
/// };
///
/// struct OpenField;
///
/// impl MazeModel for OpenField {
///     fn dim(&self) -> usize {
///         4
///     }
///
///     fn is_open(&self, position: Position, direction: Direction) -> bool {
///         position.step(direction, 4).is_some()
///     }
///
///     fn move_robot(&self, _pose: &Pose, _motion: Motion) -> f64 {
///         -1.0
///     }
/// }
/// ```
pub trait MazeModel {
    /// Side length of the square maze, in cells.
    fn dim(&self) -> usize;

    /// Whether the side of `position` facing `direction` has no wall.
    /// The outer boundary is always closed.
    fn is_open(&self, position: Position, direction: Direction) -> bool;

    /// Reward for executing `motion` from `pose`.
    ///
    /// Called once per turn with the motion the robot commits to. Does not
    /// change any state; the caller tracks where the robot ends up.
    fn move_robot(&self, pose: &Pose, motion: Motion) -> f64;

    /// Goal region derived from the maze dimension.
    fn goal(&self) -> Result<GoalRegion> {
        GoalRegion::for_dim(self.dim())
    }
}
