//! State encoding: turns a pose and a sensor reading into a table key
//!
//! The key combines the cell the robot believes it occupies, its heading, and
//! one "blocked" flag per sensor. Keeping the absolute cell in the key lets
//! the learner attach values to specific places in the maze; the flags keep
//! the key faithful to what the sensors actually saw there.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    navigation::{Heading, Pose, Position},
    types::SensorTriple,
};

/// Which of the `[left, front, right]` sensors report a wall directly adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleFlags {
    pub left: bool,
    pub front: bool,
    pub right: bool,
}

impl ObstacleFlags {
    pub fn from_sensors(sensors: &SensorTriple) -> Self {
        Self {
            left: sensors.left() == 0,
            front: sensors.front() == 0,
            right: sensors.right() == 0,
        }
    }
}

impl fmt::Display for ObstacleFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |blocked: bool, c: char| if blocked { c } else { '.' };
        write!(
            f,
            "{}{}{}",
            flag(self.left, 'L'),
            flag(self.front, 'F'),
            flag(self.right, 'R')
        )
    }
}

/// Discrete state used as the value-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub position: Position,
    pub heading: Heading,
    pub obstacles: ObstacleFlags,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}|{}|{}",
            self.position.x, self.position.y, self.heading, self.obstacles
        )
    }
}

/// Pure encoder from raw observations to [`StateKey`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEncoder;

impl StateEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode raw driver input.
    ///
    /// `heading` accepts `up`, `down`, `left`, `right` and their first
    /// letters; `readings` must be `[left, front, right]`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidHeading`] for an unrecognised heading
    /// and [`crate::Error::InvalidSensor`] for a malformed reading.
    pub fn encode(&self, position: Position, heading: &str, readings: &[i64]) -> Result<StateKey> {
        let heading: Heading = heading.parse()?;
        let sensors = SensorTriple::new(readings)?;
        Ok(self.encode_pose(&Pose::new(position, heading), &sensors))
    }

    /// Encode an already validated pose and reading.
    pub fn encode_pose(&self, pose: &Pose, sensors: &SensorTriple) -> StateKey {
        StateKey {
            position: pose.position,
            heading: pose.heading,
            obstacles: ObstacleFlags::from_sensors(sensors),
        }
    }
}
