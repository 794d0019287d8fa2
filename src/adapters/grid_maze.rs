//! In-memory grid maze with per-cell wall bitmasks

use std::{collections::VecDeque, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    navigation::{Direction, GoalRegion, MAX_MOVEMENT, Motion, Pose, Position},
    ports::MazeModel,
    reward::{MoveOutcome, RewardSchedule},
};

/// Built-in 12×12 training maze, one row per `y`, top row first.
const BUILTIN_ROWS: [[u8; 12]; 12] = [
    [2, 14, 10, 12, 6, 14, 10, 14, 10, 12, 2, 12],
    [6, 9, 4, 7, 11, 9, 2, 15, 8, 7, 14, 13],
    [3, 12, 7, 9, 6, 10, 12, 5, 6, 13, 3, 13],
    [6, 9, 3, 8, 5, 6, 13, 7, 15, 13, 6, 9],
    [7, 10, 14, 10, 11, 11, 15, 11, 13, 3, 11, 12],
    [3, 12, 7, 14, 8, 6, 13, 6, 9, 6, 14, 9],
    [6, 11, 9, 3, 12, 3, 9, 3, 10, 11, 11, 12],
    [7, 10, 10, 14, 11, 14, 10, 10, 10, 12, 4, 5],
    [1, 6, 14, 11, 12, 1, 6, 10, 12, 3, 9, 5],
    [6, 11, 15, 8, 5, 6, 13, 4, 3, 12, 6, 13],
    [7, 14, 15, 12, 3, 9, 5, 7, 12, 7, 13, 5],
    [1, 3, 9, 3, 10, 10, 11, 9, 3, 11, 9, 1],
];

/// On-disk maze description.
///
/// ```json
/// { "dim": 4, "cells": [[2, 12, 6, 8], ...] }
/// ```
///
/// `cells[y][x]` is the sum of the open sides of cell `(x, y)`:
/// 1 = up, 2 = right, 4 = down, 8 = left.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MazeFile {
    dim: usize,
    cells: Vec<Vec<u8>>,
}

/// A square maze whose walls are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMaze {
    dim: usize,
    cells: Vec<Vec<u8>>,
    goal: GoalRegion,
    rewards: RewardSchedule,
}

impl GridMaze {
    /// The 12×12 maze used for training when no maze file is given.
    pub fn builtin() -> Self {
        let cells = BUILTIN_ROWS.iter().map(|row| row.to_vec()).collect();
        Self {
            dim: BUILTIN_ROWS.len(),
            cells,
            goal: GoalRegion::centre(BUILTIN_ROWS.len()),
            rewards: RewardSchedule::default(),
        }
    }

    /// Build a maze from rows of open-side bitmasks, top row first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaze`] if the grid is not square with an even
    /// side, a wall is only present on one side, the boundary has an
    /// opening, or the goal cannot be reached from the start.
    pub fn from_rows(cells: Vec<Vec<u8>>) -> Result<Self> {
        let dim = cells.len();
        let goal = GoalRegion::for_dim(dim)?;
        let maze = Self {
            dim,
            cells,
            goal,
            rewards: RewardSchedule::default(),
        };
        maze.validate()?;
        Ok(maze)
    }

    /// Load a maze from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read maze {}", path.display()),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: MazeFile = serde_json::from_str(json)?;
        if file.cells.len() != file.dim {
            return Err(Error::InvalidMaze {
                message: format!("declared dim {} but found {} rows", file.dim, file.cells.len()),
            });
        }
        Self::from_rows(file.cells)
    }

    /// Serialize to the JSON layout accepted by [`GridMaze::from_json`].
    pub fn to_json(&self) -> Result<String> {
        let file = MazeFile {
            dim: self.dim,
            cells: self.cells.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Use `rewards` when scoring moves.
    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn rewards(&self) -> &RewardSchedule {
        &self.rewards
    }

    pub fn goal_region(&self) -> &GoalRegion {
        &self.goal
    }

    fn cell(&self, position: Position) -> Option<u8> {
        self.cells.get(position.y)?.get(position.x).copied()
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidMaze { message });

        for (y, row) in self.cells.iter().enumerate() {
            if row.len() != self.dim {
                return invalid(format!(
                    "row {y} has {} cells, expected {}",
                    row.len(),
                    self.dim
                ));
            }
            for (x, &cell) in row.iter().enumerate() {
                if cell > 0b1111 {
                    return invalid(format!("cell ({x}, {y}) has invalid wall mask {cell}"));
                }
            }
        }

        for y in 0..self.dim {
            for x in 0..self.dim {
                let position = Position::new(x, y);
                for direction in Direction::ALL {
                    if !self.is_open(position, direction) {
                        continue;
                    }
                    let Some(neighbour) = position.step(direction, self.dim) else {
                        return invalid(format!(
                            "cell {position} is open to the {direction} on the boundary"
                        ));
                    };
                    if !self.is_open(neighbour, direction.reverse()) {
                        return invalid(format!(
                            "wall between {position} and {neighbour} is one-sided"
                        ));
                    }
                }
            }
        }

        if self.shortest_path_len().is_none() {
            return invalid("goal region is unreachable from the start cell".to_string());
        }
        Ok(())
    }

    /// Fewest cell-to-cell moves from the start cell to any goal cell.
    pub fn shortest_path_len(&self) -> Option<usize> {
        let start = Pose::start(self.dim).position;
        let mut distances = vec![vec![None; self.dim]; self.dim];
        distances[start.y][start.x] = Some(0);
        let mut queue = VecDeque::from([start]);

        while let Some(position) = queue.pop_front() {
            let distance = distances[position.y][position.x]?;
            if self.goal.contains(position) {
                return Some(distance);
            }
            for direction in Direction::ALL {
                if !self.is_open(position, direction) {
                    continue;
                }
                if let Some(next) = position.step(direction, self.dim)
                    && distances[next.y][next.x].is_none()
                {
                    distances[next.y][next.x] = Some(distance + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Where `motion` actually takes a robot at `pose`, and whether it ran
    /// into a wall on the way.
    pub fn resolve(&self, pose: &Pose, motion: Motion) -> (Pose, bool) {
        let heading = motion.heading_after(pose.heading);
        let mut position = pose.position;
        let mut collided = false;

        if let Some(direction) = motion.travel_direction(pose.heading) {
            for _ in 0..motion.movement.unsigned_abs().min(MAX_MOVEMENT) {
                match position.step(direction, self.dim) {
                    Some(next) if self.is_open(position, direction) => position = next,
                    _ => {
                        collided = true;
                        break;
                    }
                }
            }
        }
        (Pose::new(position, heading), collided)
    }

    /// Distance to the nearest wall from `position` looking `direction`,
    /// capped at `cap`.
    pub fn clearance(&self, position: Position, direction: Direction, cap: u32) -> u32 {
        let mut distance = 0;
        let mut cell = position;
        while distance < cap && self.is_open(cell, direction) {
            match cell.step(direction, self.dim) {
                Some(next) => cell = next,
                None => break,
            }
            distance += 1;
        }
        distance
    }
}

impl Default for GridMaze {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MazeModel for GridMaze {
    fn dim(&self) -> usize {
        self.dim
    }

    fn is_open(&self, position: Position, direction: Direction) -> bool {
        self.cell(position)
            .is_some_and(|cell| cell & direction.open_bit() != 0)
    }

    fn move_robot(&self, pose: &Pose, motion: Motion) -> f64 {
        let (landed, collided) = self.resolve(pose, motion);
        let outcome = MoveOutcome::classify(&self.goal, pose.position, landed.position, collided);
        self.rewards.reward(outcome)
    }

    fn goal(&self) -> Result<GoalRegion> {
        Ok(self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2×2 maze: every cell is a goal cell, only the top-left is walled off
    /// from the bottom-left.
    fn tiny() -> Vec<Vec<u8>> {
        vec![vec![2, 12], vec![2, 9]]
    }

    #[test]
    fn test_builtin_is_valid() {
        let maze = GridMaze::builtin();
        assert_eq!(maze.dim(), 12);
        GridMaze::from_rows(maze.cells.clone()).unwrap();
        assert_eq!(maze.shortest_path_len(), Some(18));
    }

    #[test]
    fn test_is_open_reads_bitmask() {
        let maze = GridMaze::builtin();
        let start = Position::new(0, 11);
        assert!(maze.is_open(start, Direction::Up));
        assert!(!maze.is_open(start, Direction::Right));
        assert!(!maze.is_open(start, Direction::Left));
        assert!(!maze.is_open(Position::new(12, 0), Direction::Up));
    }

    #[test]
    fn test_rejects_one_sided_wall() {
        let mut cells = tiny();
        cells[1][1] = 1;
        let err = GridMaze::from_rows(cells).unwrap_err();
        assert!(err.to_string().contains("one-sided"));
    }

    #[test]
    fn test_rejects_open_boundary() {
        let mut cells = tiny();
        cells[0][0] |= Direction::Up.open_bit();
        let err = GridMaze::from_rows(cells).unwrap_err();
        assert!(err.to_string().contains("boundary"));
    }

    #[test]
    fn test_rejects_ragged_and_odd_grids() {
        assert!(GridMaze::from_rows(vec![vec![0, 0], vec![0]]).is_err());
        assert!(GridMaze::from_rows(vec![vec![0; 3]; 3]).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let maze = GridMaze::from_rows(tiny()).unwrap();
        let restored = GridMaze::from_json(&maze.to_json().unwrap()).unwrap();
        assert_eq!(restored, maze);
        assert!(GridMaze::from_json(r#"{"dim": 4, "cells": [[2, 8], [2, 8]]}"#).is_err());
    }

    #[test]
    fn test_resolve_stops_at_walls() {
        let maze = GridMaze::builtin();
        let start = Pose::start(12);

        let (pose, collided) = maze.resolve(&start, Motion::new(Motion::FORWARD.rotation, 3));
        assert!(collided);
        assert_eq!(pose.position, Position::new(0, 9));

        let (pose, collided) = maze.resolve(&start, Motion::TURN_RIGHT);
        assert!(collided);
        assert_eq!(pose, Pose::new(start.position, Direction::Right));
    }

    #[test]
    fn test_move_rewards_follow_schedule() {
        let maze = GridMaze::builtin();
        let rewards = *maze.rewards();
        let start = Pose::start(12);

        assert_eq!(maze.move_robot(&start, Motion::FORWARD), rewards.closer);
        assert_eq!(maze.move_robot(&start, Motion::TURN_LEFT), rewards.collision);
        assert_eq!(maze.move_robot(&start, Motion::TURN_IN_PLACE), rewards.stationary);
    }

    #[test]
    fn test_clearance_is_capped() {
        let maze = GridMaze::builtin();
        assert_eq!(maze.clearance(Position::new(0, 11), Direction::Up, 3), 2);
        assert_eq!(maze.clearance(Position::new(0, 11), Direction::Up, 1), 1);
        assert_eq!(maze.clearance(Position::new(0, 11), Direction::Left, 3), 0);
    }
}
