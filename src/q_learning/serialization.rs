//! Serialization support for trained learners.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::learner::{LearnerState, QLearner};

/// Provenance recorded alongside a saved learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Maze dimension the learner was trained on
    pub maze_dim: Option<usize>,
    /// Training turns taken
    pub turns_trained: Option<usize>,
    /// Runs that reached the goal
    pub runs_completed: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Maze file trained on; `None` for the built-in maze
    pub maze_source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLearner {
    pub version: u32,
    state: LearnerState,
    pub metadata: TrainingMetadata,
}

impl SavedLearner {
    pub const VERSION: u32 = 1;

    pub fn from_learner(learner: &QLearner, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: learner.export_state(),
            metadata,
        }
    }

    /// Rebuild the learner, rejecting save formats this build does not know.
    pub fn to_learner(&self) -> Result<QLearner> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported learner save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(QLearner::from_state(self.state.clone()))
    }

    /// Number of states in the saved table.
    pub fn state_count(&self) -> usize {
        self.state.entries.len()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize learner")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize learner")
    }
}
