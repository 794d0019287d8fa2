//! Turn driver: one call per sensor reading, one command back
//!
//! Each turn runs sense → encode → learn → act in that order. Learning for a
//! decision is deferred to the following turn, because the state the action
//! led to is only known once the next reading arrives.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    encoder::{StateEncoder, StateKey},
    navigation::{Action, Motion},
    ports::MazeModel,
    q_learning::{PoseUpdate, QLearner},
    session::{Session, Transition},
    types::SensorTriple,
};

/// Command returned to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Rotate then move, as `(rotation_degrees, movement)`.
    Move(Motion),
    /// End the run and return the robot to the start.
    Reset,
}

impl Response {
    pub fn is_reset(&self) -> bool {
        matches!(self, Response::Reset)
    }

    /// `(rotation_degrees, movement)`, or `None` for a reset.
    pub fn as_pair(&self) -> Option<(i32, i32)> {
        match self {
            Response::Move(motion) => Some(motion.as_pair()),
            Response::Reset => None,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Move(motion) => write!(f, "{motion}"),
            Response::Reset => write!(f, "(Reset, Reset)"),
        }
    }
}

/// Everything that happened in one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnReport {
    pub state: StateKey,
    pub sensors: SensorTriple,
    pub response: Response,
    /// Action chosen; `None` on a reset turn
    pub action: Option<Action>,
    /// Reward paid by the maze for the committed motion
    pub reward: Option<f64>,
    pub update: Option<PoseUpdate>,
    /// Exploration rate after the decision
    pub epsilon: f64,
}

impl TurnReport {
    pub fn reached_goal(&self) -> bool {
        self.response.is_reset()
    }

    pub fn collided(&self) -> bool {
        self.update.is_some_and(|update| update.blocked)
    }
}

/// Stateless turn driver. All mutable state lives in the learner and the
/// session passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Robot {
    encoder: StateEncoder,
}

impl Robot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the next command for raw `[left, front, right]` readings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSensor`] for a malformed reading.
    /// Nothing in the learner or session is touched in that case.
    pub fn next_move<M: MazeModel + ?Sized>(
        &self,
        learner: &mut QLearner,
        session: &mut Session,
        maze: &M,
        readings: &[i64],
    ) -> Result<Response> {
        self.step(learner, session, maze, readings)
            .map(|report| report.response)
    }

    /// Like [`Robot::next_move`], but reports the whole turn.
    pub fn step<M: MazeModel + ?Sized>(
        &self,
        learner: &mut QLearner,
        session: &mut Session,
        maze: &M,
        readings: &[i64],
    ) -> Result<TurnReport> {
        let sensors = SensorTriple::new(readings)?;

        session.observe(&sensors);
        let state = self.encoder.encode_pose(&session.pose(), &sensors);
        learner.create_q(&state);

        if let Some(previous) = session.take_pending() {
            learner.learn(&previous.state, previous.action, previous.reward, &state);
        }

        if session.at_goal() {
            session.finish_run();
            return Ok(TurnReport {
                state,
                sensors,
                response: Response::Reset,
                action: None,
                reward: None,
                update: None,
                epsilon: learner.epsilon(),
            });
        }

        let action = learner.choose_action(&state);
        let motion = session.motion_for(action);
        let reward = maze.move_robot(&session.pose(), motion);
        let update = learner.update(session, action, &sensors);
        session.set_pending(Transition {
            state,
            action,
            reward,
        });

        debug!(
            %state,
            %action,
            %motion,
            reward,
            pose = %update.to,
            epsilon = learner.epsilon(),
            "Turn"
        );

        Ok(TurnReport {
            state,
            sensors,
            response: Response::Move(motion),
            action: Some(action),
            reward: Some(reward),
            update: Some(update),
            epsilon: learner.epsilon(),
        })
    }
}
