//! Mapping from (heading, action) to the rotation and movement sent to the driver

use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::{Action, Direction, Heading, Rotation};

/// Largest number of cells a single motion can cover; the driver truncates
/// anything longer.
pub const MAX_MOVEMENT: u32 = 3;

/// A single driver command: rotate first, then move `movement` cells along
/// the new heading (negative values move backward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Motion {
    pub rotation: Rotation,
    pub movement: i32,
}

impl Motion {
    pub const FORWARD: Motion = Motion::new(Rotation::None, 1);
    pub const TURN_RIGHT: Motion = Motion::new(Rotation::Clockwise, 1);
    pub const TURN_LEFT: Motion = Motion::new(Rotation::CounterClockwise, 1);
    pub const BACKWARD: Motion = Motion::new(Rotation::None, -1);
    /// Quarter turn clockwise without moving. Used when a reverse cannot be
    /// executed safely.
    pub const TURN_IN_PLACE: Motion = Motion::new(Rotation::Clockwise, 0);

    pub const fn new(rotation: Rotation, movement: i32) -> Self {
        Self { rotation, movement }
    }

    /// Heading after the rotation has been applied.
    pub fn heading_after(&self, heading: Heading) -> Heading {
        heading.rotate(self.rotation)
    }

    /// Absolute direction of travel, or `None` for a rotation in place.
    pub fn travel_direction(&self, heading: Heading) -> Option<Direction> {
        let facing = self.heading_after(heading);
        match self.movement.signum() {
            1 => Some(facing),
            -1 => Some(facing.reverse()),
            _ => None,
        }
    }

    /// `(rotation_degrees, movement)` as exchanged with the driver.
    pub fn as_pair(&self) -> (i32, i32) {
        (self.rotation.degrees(), self.movement)
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rotation.degrees(), self.movement)
    }
}

/// Motion for every heading × action pair, indexed by
/// `[heading.index()][action.index()]`.
///
/// Travelling the way the robot faces moves forward, a side direction turns
/// a quarter and moves forward, and the opposite direction backs up without
/// turning.
pub const MOTION_TABLE: [[Motion; 4]; 4] = [
    // heading up:      up, right, down, left
    [
        Motion::FORWARD,
        Motion::TURN_RIGHT,
        Motion::BACKWARD,
        Motion::TURN_LEFT,
    ],
    // heading right
    [
        Motion::TURN_LEFT,
        Motion::FORWARD,
        Motion::TURN_RIGHT,
        Motion::BACKWARD,
    ],
    // heading down
    [
        Motion::BACKWARD,
        Motion::TURN_LEFT,
        Motion::FORWARD,
        Motion::TURN_RIGHT,
    ],
    // heading left
    [
        Motion::TURN_RIGHT,
        Motion::BACKWARD,
        Motion::TURN_LEFT,
        Motion::FORWARD,
    ],
];

/// Look up the motion that carries a robot facing `heading` toward `action`.
pub fn motion_for(heading: Heading, action: Action) -> Motion {
    MOTION_TABLE[heading.index()][action.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_exhaustive_and_reaches_action() {
        for heading in Direction::ALL {
            for action in Direction::ALL {
                let motion = motion_for(heading, action);
                assert_eq!(
                    motion.travel_direction(heading),
                    Some(action),
                    "heading {heading} action {action}"
                );
                assert!(motion.movement.abs() <= 3);
            }
        }
    }

    #[test]
    fn test_heading_up_matches_driver_convention() {
        assert_eq!(motion_for(Direction::Up, Direction::Up).as_pair(), (0, 1));
        assert_eq!(motion_for(Direction::Up, Direction::Right).as_pair(), (90, 1));
        assert_eq!(motion_for(Direction::Up, Direction::Down).as_pair(), (0, -1));
        assert_eq!(motion_for(Direction::Up, Direction::Left).as_pair(), (-90, 1));
    }

    #[test]
    fn test_backward_keeps_heading() {
        let motion = motion_for(Direction::Left, Direction::Right);
        assert_eq!(motion.heading_after(Direction::Left), Direction::Left);
        assert_eq!(Motion::TURN_IN_PLACE.travel_direction(Direction::Up), None);
    }
}
