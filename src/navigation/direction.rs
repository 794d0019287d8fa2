//! Compass directions, headings and quarter-turn rotations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the four compass directions on the maze grid.
///
/// `Up` decreases `y`, `Down` increases it, `Right` increases `x` and `Left`
/// decreases it. Variants are declared in clockwise order, which is what
/// [`Direction::index`] and the rotation helpers rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// The direction the robot is facing.
pub type Heading = Direction;

/// The absolute direction the robot decides to travel in.
pub type Action = Direction;

impl Direction {
    /// All directions in clockwise order starting from `Up`.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Position of this direction in [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    fn from_index(index: usize) -> Direction {
        Self::ALL[index % 4]
    }

    /// Direction after a quarter turn clockwise.
    pub fn clockwise(self) -> Direction {
        Self::from_index(self.index() + 1)
    }

    /// Direction after a quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    /// The opposite direction.
    pub fn reverse(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Apply a rotation to this direction.
    pub fn rotate(self, rotation: Rotation) -> Direction {
        match rotation {
            Rotation::CounterClockwise => self.counter_clockwise(),
            Rotation::None => self,
            Rotation::Clockwise => self.clockwise(),
        }
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Absolute directions covered by the `[left, front, right]` sensors when
    /// facing this way.
    pub fn sensor_directions(self) -> [Direction; 3] {
        [self.counter_clockwise(), self, self.clockwise()]
    }

    /// Bit set in a maze cell code when the side facing this direction is open.
    pub fn open_bit(self) -> u8 {
        1 << self.index()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Accepts the full names and their single-letter abbreviations,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "right" | "r" => Ok(Direction::Right),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            _ => Err(Error::InvalidHeading {
                heading: s.to_string(),
            }),
        }
    }
}

/// Quarter-turn rotation requested from the driver before moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    CounterClockwise,
    None,
    Clockwise,
}

impl Rotation {
    /// Rotation in degrees as the driver expects it: -90, 0 or +90.
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::CounterClockwise => -90,
            Rotation::None => 0,
            Rotation::Clockwise => 90,
        }
    }

    /// Parse a driver rotation. Anything other than ±90 means no rotation.
    pub fn from_degrees(degrees: i32) -> Rotation {
        match degrees {
            -90 => Rotation::CounterClockwise,
            90 => Rotation::Clockwise,
            _ => Rotation::None,
        }
    }
}
