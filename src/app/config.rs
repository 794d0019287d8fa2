//! Configuration types for learner and session creation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, reward::RewardSchedule};

/// Hyperparameters for a [`crate::QLearner`].
///
/// # Examples
///
/// ```
/// use micromouse::app::LearnerConfig;
///
/// let config = LearnerConfig::default()
///     .with_seed(42)
///     .with_learning_rate(0.3)
///     .with_epsilon(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// α, in (0, 1]
    pub learning_rate: f64,
    /// γ, in [0, 1)
    pub discount_factor: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied after every decision
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Value given to every action of a newly created state
    pub q_init: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            epsilon: 0.2,
            epsilon_decay: 0.9995,
            min_epsilon: 0.02,
            q_init: 0.0,
            seed: None,
        }
    }
}

impl LearnerConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the per-decision decay and the floor it stops at.
    pub fn with_epsilon_decay(mut self, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter lies in its valid range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return invalid(format!(
                "discount factor must be in [0, 1), got {}",
                self.discount_factor
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return invalid(format!(
                "epsilon decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }
        if !(0.0..=self.epsilon).contains(&self.min_epsilon) {
            return invalid(format!(
                "epsilon floor must be in [0, {}], got {}",
                self.epsilon, self.min_epsilon
            ));
        }
        if !self.q_init.is_finite() {
            return invalid(format!("initial Q-value must be finite, got {}", self.q_init));
        }
        Ok(())
    }
}

/// Everything needed to run a training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub learner: LearnerConfig,
    pub rewards: RewardSchedule,
    /// Largest distance a sensor reports
    pub sensor_cap: u32,
    /// Training turn budget
    pub turns: usize,
    /// Turns after which an unfinished run is abandoned
    pub run_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            learner: LearnerConfig::default(),
            rewards: RewardSchedule::default(),
            sensor_cap: 3,
            turns: 10_000,
            run_limit: None,
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_learner(mut self, learner: LearnerConfig) -> Self {
        self.learner = learner;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_turns(mut self, turns: usize) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_run_limit(mut self, run_limit: usize) -> Self {
        self.run_limit = Some(run_limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.learner.validate()?;
        self.rewards.validate()?;
        if self.sensor_cap == 0 {
            return Err(Error::InvalidConfiguration {
                message: "sensor cap must be at least 1".to_string(),
            });
        }
        if self.turns == 0 {
            return Err(Error::InvalidConfiguration {
                message: "turn budget must be at least 1".to_string(),
            });
        }
        if self.run_limit == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "run limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
