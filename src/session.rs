//! Per-session context: the robot's believed pose and what it knows about the maze
//!
//! A [`Session`] is owned by whoever drives the turn loop and passed by
//! `&mut` into every turn. It survives goal resets; only the pose and the
//! pending transition are cleared when a run ends.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    encoder::StateKey,
    navigation::{Action, GoalRegion, Motion, Pose, Position, WallMap, motion_for},
    ports::MazeModel,
    types::SensorTriple,
};

/// A decision whose reward is known but whose successor state is not yet
/// encoded. It is learned from at the start of the following turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    dim: usize,
    start: Pose,
    pose: Pose,
    goal: GoalRegion,
    walls: WallMap,
    sensor_cap: u32,
    pending: Option<Transition>,
    completed_runs: usize,
    run_turns: usize,
}

impl Session {
    /// Start a session in a `dim`×`dim` maze at the standard start pose.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMaze`] if `dim` has no centre goal.
    pub fn new(dim: usize, sensor_cap: u32) -> Result<Self> {
        Ok(Self::with_goal(dim, GoalRegion::for_dim(dim)?, sensor_cap))
    }

    /// Start a session sized for `maze`, aiming at the goal the maze reports.
    pub fn for_maze<M: MazeModel + ?Sized>(maze: &M, sensor_cap: u32) -> Result<Self> {
        Ok(Self::with_goal(maze.dim(), maze.goal()?, sensor_cap))
    }

    fn with_goal(dim: usize, goal: GoalRegion, sensor_cap: u32) -> Self {
        let start = Pose::start(dim);
        Self {
            dim,
            start,
            pose: start,
            goal,
            walls: WallMap::new(dim),
            sensor_cap,
            pending: None,
            completed_runs: 0,
            run_turns: 0,
        }
    }

    /// Place the robot at an arbitrary pose.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PositionOutOfBounds`] if the pose lies outside
    /// the maze.
    pub fn with_pose(mut self, pose: Pose) -> Result<Self> {
        Position::checked(pose.position.x, pose.position.y, self.dim)?;
        self.pose = pose;
        Ok(self)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn goal(&self) -> &GoalRegion {
        &self.goal
    }

    pub fn walls(&self) -> &WallMap {
        &self.walls
    }

    pub fn sensor_cap(&self) -> u32 {
        self.sensor_cap
    }

    pub fn at_goal(&self) -> bool {
        self.goal.contains(self.pose.position)
    }

    pub fn completed_runs(&self) -> usize {
        self.completed_runs
    }

    /// Moves issued since the current run started.
    pub fn run_turns(&self) -> usize {
        self.run_turns
    }

    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    /// Fold a sensor reading taken at the current pose into the wall map.
    pub fn observe(&mut self, sensors: &SensorTriple) {
        self.walls.observe(&self.pose, sensors, self.sensor_cap);
    }

    /// Motion that carries out `action` from the current pose.
    ///
    /// A reverse is only driven backward when the edge behind the robot is
    /// known to be open. Otherwise the robot turns in place, since a blocked
    /// backward move cannot be detected by the front-facing sensors.
    pub fn motion_for(&self, action: Action) -> Motion {
        let motion = motion_for(self.pose.heading, action);
        if motion.movement < 0
            && !self
                .walls
                .is_known_open(self.pose.position, self.pose.heading.reverse())
        {
            Motion::TURN_IN_PLACE
        } else {
            motion
        }
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub(crate) fn record_open(&mut self, position: Position, action: Action) {
        self.walls.record(position, action, true);
    }

    pub(crate) fn set_pending(&mut self, transition: Transition) {
        self.pending = Some(transition);
        self.run_turns += 1;
    }

    pub(crate) fn take_pending(&mut self) -> Option<Transition> {
        self.pending.take()
    }

    /// End the current run after reaching the goal: the pose returns to the
    /// start, everything learned about the maze is kept.
    pub fn finish_run(&mut self) {
        self.completed_runs += 1;
        info!(
            run = self.completed_runs,
            turns = self.run_turns,
            "Reached goal, resetting to start"
        );
        self.restart();
    }

    /// Abandon the current run without counting it as completed.
    pub fn abandon_run(&mut self) {
        self.restart();
    }

    fn restart(&mut self) {
        self.pose = self.start;
        self.pending = None;
        self.run_turns = 0;
    }
}
