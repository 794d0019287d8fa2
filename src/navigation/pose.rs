//! Grid positions, robot poses and the goal region

use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::{Direction, Heading};
use crate::{Error, Result};

/// A cell on the maze grid. `x` is the column, `y` the row (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Create a position, checking it lies inside a `dim`×`dim` maze.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] for cells outside the grid.
    pub fn checked(x: usize, y: usize, dim: usize) -> Result<Self> {
        if x < dim && y < dim {
            Ok(Self { x, y })
        } else {
            Err(Error::PositionOutOfBounds {
                x: x as i64,
                y: y as i64,
                dim,
            })
        }
    }

    /// Neighbouring cell in `direction`, or `None` when it would leave the grid.
    pub fn step(self, direction: Direction, dim: usize) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = self.x as i64 + dx;
        let y = self.y as i64 + dy;
        if x < 0 || y < 0 || x >= dim as i64 || y >= dim as i64 {
            None
        } else {
            Some(Position::new(x as usize, y as usize))
        }
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where the robot believes it is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub heading: Heading,
}

impl Pose {
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// Standard start pose: bottom-left corner, facing up.
    pub fn start(dim: usize) -> Self {
        Self::new(Position::new(0, dim.saturating_sub(1)), Direction::Up)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.position, self.heading)
    }
}

/// The four centre cells of an even-sized maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRegion {
    cells: [Position; 4],
}

impl GoalRegion {
    /// Derive the goal region for a `dim`×`dim` maze.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaze`] unless `dim` is even and at least 2.
    pub fn for_dim(dim: usize) -> Result<Self> {
        if dim < 2 || !dim.is_multiple_of(2) {
            return Err(Error::InvalidMaze {
                message: format!("maze dimension must be an even number >= 2, got {dim}"),
            });
        }
        Ok(Self::centre(dim))
    }

    /// Centre cells of a maze whose dimension is already known to be valid.
    pub(crate) const fn centre(dim: usize) -> Self {
        let low = dim / 2 - 1;
        let high = dim / 2;
        Self {
            cells: [
                Position::new(low, low),
                Position::new(low, high),
                Position::new(high, low),
                Position::new(high, high),
            ],
        }
    }

    pub fn cells(&self) -> &[Position; 4] {
        &self.cells
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Manhattan distance from `position` to the nearest goal cell.
    pub fn distance(&self, position: Position) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.manhattan(position))
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_region_for_twelve() {
        let goal = GoalRegion::for_dim(12).unwrap();
        for (x, y) in [(5, 5), (5, 6), (6, 5), (6, 6)] {
            assert!(goal.contains(Position::new(x, y)));
        }
        assert!(!goal.contains(Position::new(4, 5)));
        assert_eq!(goal.distance(Position::new(0, 11)), 10);
    }

    #[test]
    fn test_odd_dimension_rejected() {
        assert!(GoalRegion::for_dim(7).is_err());
        assert!(GoalRegion::for_dim(0).is_err());
    }

    #[test]
    fn test_step_respects_bounds() {
        let corner = Position::new(0, 11);
        assert_eq!(corner.step(Direction::Left, 12), None);
        assert_eq!(corner.step(Direction::Down, 12), None);
        assert_eq!(corner.step(Direction::Up, 12), Some(Position::new(0, 10)));
        assert!(Position::checked(12, 0, 12).is_err());
    }

    #[test]
    fn test_start_pose() {
        let pose = Pose::start(12);
        assert_eq!(pose.position, Position::new(0, 11));
        assert_eq!(pose.heading, Direction::Up);
    }
}
