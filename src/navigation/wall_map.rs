//! Walls the robot has learned about from its own sensors and movement

use std::collections::HashMap;

use super::{Direction, Pose, Position};
use crate::types::SensorTriple;

/// Partial knowledge of the maze walls, keyed by cell edge.
///
/// Each interior edge is stored once, as the right or bottom side of the cell
/// it belongs to. The outer boundary is always known to be closed and is
/// never stored.
#[derive(Debug, Clone, Default)]
pub struct WallMap {
    dim: usize,
    edges: HashMap<(Position, Direction), bool>,
}

impl WallMap {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            edges: HashMap::new(),
        }
    }

    fn edge_key(&self, position: Position, direction: Direction) -> Option<(Position, Direction)> {
        let neighbour = position.step(direction, self.dim)?;
        Some(match direction {
            Direction::Right | Direction::Down => (position, direction),
            Direction::Up | Direction::Left => (neighbour, direction.reverse()),
        })
    }

    /// Record whether the edge on `direction` side of `position` is open.
    /// Boundary edges are ignored.
    pub fn record(&mut self, position: Position, direction: Direction, open: bool) {
        if let Some(key) = self.edge_key(position, direction) {
            self.edges.insert(key, open);
        }
    }

    /// `Some(true)` if known open, `Some(false)` if known closed, `None` if
    /// never observed.
    pub fn status(&self, position: Position, direction: Direction) -> Option<bool> {
        match self.edge_key(position, direction) {
            Some(key) => self.edges.get(&key).copied(),
            None => Some(false),
        }
    }

    pub fn is_known_open(&self, position: Position, direction: Direction) -> bool {
        self.status(position, direction) == Some(true)
    }

    /// Fold one sensor reading taken at `pose` into the map.
    ///
    /// A reading of `d` opens `d` consecutive edges; a wall follows them
    /// unless the reading sits at `cap`, where the sensor stops reporting.
    pub fn observe(&mut self, pose: &Pose, sensors: &SensorTriple, cap: u32) {
        for (direction, distance) in pose
            .heading
            .sensor_directions()
            .into_iter()
            .zip(sensors.as_array())
        {
            let mut cell = pose.position;
            for _ in 0..distance.min(cap) {
                self.record(cell, direction, true);
                match cell.step(direction, self.dim) {
                    Some(next) => cell = next,
                    None => break,
                }
            }
            if distance < cap {
                self.record(cell, direction, false);
            }
        }
    }

    /// Number of interior edges with known state.
    pub fn known_edges(&self) -> usize {
        self.edges.len()
    }
}
