//! Driver-side simulator: holds the true pose and produces sensor readings

use crate::{
    navigation::{Motion, Pose},
    robot::Response,
    types::SensorTriple,
};

use super::GridMaze;

/// Plays the tester's role for a [`GridMaze`]: reads the sensors at the
/// robot's true pose and carries out the commands it sends back.
#[derive(Debug, Clone)]
pub struct MazeSimulator<'a> {
    maze: &'a GridMaze,
    pose: Pose,
    sensor_cap: u32,
}

/// What happened when a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Moved { from: Pose, to: Pose, collided: bool },
    Reset,
}

impl<'a> MazeSimulator<'a> {
    pub fn new(maze: &'a GridMaze, sensor_cap: u32) -> Self {
        Self {
            maze,
            pose: Pose::start(maze.dim()),
            sensor_cap,
        }
    }

    /// True pose of the robot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// `[left, front, right]` distances to the nearest wall, capped.
    pub fn sensors(&self) -> SensorTriple {
        let [left, front, right] = self
            .pose
            .heading
            .sensor_directions()
            .map(|direction| self.maze.clearance(self.pose.position, direction, self.sensor_cap));
        SensorTriple::from_distances(left, front, right)
    }

    /// Sensor reading in the raw form a driver hands to the robot.
    pub fn readings(&self) -> [i64; 3] {
        self.sensors().as_array().map(i64::from)
    }

    pub fn apply(&mut self, response: &Response) -> Applied {
        match response {
            Response::Reset => {
                self.reset();
                Applied::Reset
            }
            Response::Move(motion) => self.apply_motion(*motion),
        }
    }

    /// Rotate then move, stopping at the first wall. Movement beyond the
    /// per-turn maximum is dropped.
    pub fn apply_motion(&mut self, motion: Motion) -> Applied {
        let from = self.pose;
        let (to, collided) = self.maze.resolve(&from, motion);
        self.pose = to;
        Applied::Moved { from, to, collided }
    }

    pub fn reset(&mut self) {
        self.pose = Pose::start(self.maze.dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Direction, Position, Rotation};

    #[test]
    fn test_start_readings() {
        let maze = GridMaze::builtin();
        let sim = MazeSimulator::new(&maze, 3);
        assert_eq!(sim.readings(), [0, 2, 0]);
    }

    #[test]
    fn test_excess_movement_is_truncated() {
        let maze = GridMaze::from_rows(vec![
            vec![4, 6, 10, 12],
            vec![5, 5, 6, 13],
            vec![5, 3, 9, 5],
            vec![3, 10, 10, 9],
        ])
        .unwrap();
        let mut sim = MazeSimulator::new(&maze, 3);
        // From (0, 3) facing right the bottom row is open for three cells.
        sim.apply(&Response::Move(Motion::TURN_RIGHT));
        assert_eq!(sim.pose().position, Position::new(1, 3));

        let applied = sim.apply(&Response::Move(Motion::new(Rotation::None, 7)));
        assert_eq!(sim.pose(), Pose::new(Position::new(3, 3), Direction::Right));
        assert!(matches!(applied, Applied::Moved { collided: true, .. }));
    }

    #[test]
    fn test_reset_returns_to_start() {
        let maze = GridMaze::builtin();
        let mut sim = MazeSimulator::new(&maze, 3);
        sim.apply(&Response::Move(Motion::FORWARD));
        assert_eq!(sim.pose().position, Position::new(0, 10));
        assert_eq!(sim.apply(&Response::Reset), Applied::Reset);
        assert_eq!(sim.pose(), Pose::start(12));
    }
}
