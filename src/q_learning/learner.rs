//! Tabular Q-learning agent
//!
//! The learner owns the value table and the exploration schedule for a whole
//! session. It is built once, before the turn loop, and borrowed by every
//! turn; nothing it has learned is lost when a run resets.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    policy::EpsilonSchedule,
    q_table::{ActionValueTable, ActionValues},
};
use crate::{
    Result,
    app::LearnerConfig,
    encoder::StateKey,
    navigation::{Action, Direction, Motion, Pose, Rotation},
    session::Session,
    types::SensorTriple,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LearnerState {
    pub entries: Vec<(StateKey, ActionValues)>,
    pub neutral: f64,
    pub schedule: EpsilonSchedule,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Result of advancing the believed pose by one committed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoseUpdate {
    pub motion: Motion,
    pub from: Pose,
    pub to: Pose,
    /// The motion asked to move and the sensors showed a wall in the way.
    pub blocked: bool,
}

impl PoseUpdate {
    pub fn moved(&self) -> bool {
        self.from.position != self.to.position
    }
}

/// Q-learning agent (off-policy TD control) over [`StateKey`]s.
#[derive(Debug, Clone)]
pub struct QLearner {
    table: ActionValueTable,
    schedule: EpsilonSchedule,
    learning_rate: f64,
    discount_factor: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearner {
    /// Create a learner from validated hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if any parameter is out
    /// of range.
    pub fn new(config: &LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: ActionValueTable::new(config.q_init),
            schedule: EpsilonSchedule::new(
                config.epsilon,
                config.epsilon_decay,
                config.min_epsilon,
            ),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Replace the exploration schedule, e.g. with
    /// [`EpsilonSchedule::greedy`] for evaluation.
    pub fn with_schedule(mut self, schedule: EpsilonSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Ensure `state` is in the table. Repeated calls are no-ops.
    pub fn create_q(&mut self, state: &StateKey) {
        if self.table.ensure(state) {
            trace!(%state, states = self.table.len(), "Created state");
        }
    }

    /// ε-greedy action selection.
    ///
    /// Explores uniformly with probability ε, otherwise picks uniformly among
    /// the actions tied for the highest value. The table is left untouched;
    /// the exploration rate decays by one step.
    pub fn choose_action(&mut self, state: &StateKey) -> Action {
        let action = if self.rng.random::<f64>() < self.schedule.current() {
            self.random_action()
        } else {
            self.greedy_action(state)
        };
        self.schedule.step();
        action
    }

    /// Best action for `state`, ties broken uniformly at random.
    pub fn greedy_action(&mut self, state: &StateKey) -> Action {
        let best = self.table.best_actions(state);
        match best.choose(&mut self.rng) {
            Some(action) => *action,
            None => self.random_action(),
        }
    }

    fn random_action(&mut self) -> Action {
        let index = self.rng.random_range(0..Direction::ALL.len());
        Direction::ALL[index]
    }

    /// Temporal-difference update of `Q(state, action)` toward
    /// `reward + γ · max Q(next_state, ·)`. Both states are created first if
    /// unseen. Returns the updated value.
    pub fn learn(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
    ) -> f64 {
        self.create_q(state);
        self.create_q(next_state);

        let current = self.table.get(state, action).unwrap_or(self.table.neutral());
        let target = reward + self.discount_factor * self.table.max_value(next_state);
        let updated = current + self.learning_rate * (target - current);
        self.table.set(state, action, updated);

        trace!(%state, %action, reward, current, updated, "TD update");
        updated
    }

    /// Advance the session's believed pose by the action just committed.
    ///
    /// `sensors` must be the reading the action was chosen from. A forward
    /// move into a side the sensors reported as a wall leaves the position
    /// unchanged; any rotation still applies. Cells actually traversed are
    /// recorded as open in the session's wall map.
    pub fn update(
        &self,
        session: &mut Session,
        action: Action,
        sensors: &SensorTriple,
    ) -> PoseUpdate {
        let motion = session.motion_for(action);
        let from = session.pose();
        let heading = motion.heading_after(from.heading);

        let blocked = match motion.movement {
            m if m > 0 => {
                let clearance = match motion.rotation {
                    Rotation::CounterClockwise => sensors.left(),
                    Rotation::None => sensors.front(),
                    Rotation::Clockwise => sensors.right(),
                };
                clearance == 0
            }
            _ => false,
        };

        let mut position = from.position;
        if !blocked
            && let Some(direction) = motion.travel_direction(from.heading)
            && let Some(next) = position.step(direction, session.dim())
        {
            session.record_open(position, direction);
            position = next;
        }

        let to = Pose::new(position, heading);
        session.set_pose(to);
        PoseUpdate {
            motion,
            from,
            to,
            blocked,
        }
    }

    /// Value of `action` in `state`, if the state has been created.
    pub fn value(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.table.get(state, action)
    }

    pub fn table(&self) -> &ActionValueTable {
        &self.table
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.current()
    }

    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Number of states in the table.
    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn export_state(&self) -> LearnerState {
        LearnerState {
            entries: self.table.sorted_entries(),
            neutral: self.table.neutral(),
            schedule: self.schedule,
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: LearnerState) -> Self {
        Self {
            table: ActionValueTable::from_entries(state.neutral, state.entries),
            schedule: state.schedule,
            learning_rate: state.learning_rate,
            discount_factor: state.discount_factor,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}
