//! Grid navigation primitives: compass directions, poses, motions and the
//! wall map the robot builds from its sensors.

pub mod direction;
pub mod motion;
pub mod pose;
pub mod wall_map;

pub use direction::{Action, Direction, Heading, Rotation};
pub use motion::{MAX_MOVEMENT, MOTION_TABLE, Motion, motion_for};
pub use pose::{GoalRegion, Pose, Position};
pub use wall_map::WallMap;
