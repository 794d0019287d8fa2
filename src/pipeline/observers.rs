//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the turn loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::RunSummary;
use crate::{Result, ports::Observer, robot::TurnReport};

/// Observation of a single turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Turn number within the run
    pub step_num: usize,
    /// Encoded state the decision was made in
    pub state: String,
    /// Sensor reading `[left, front, right]`
    pub sensors: [u32; 3],
    /// Chosen action, absent on the reset turn
    pub action: Option<String>,
    /// `(rotation, movement)` sent to the driver, absent on the reset turn
    pub command: Option<(i32, i32)>,
    pub reward: Option<f64>,
    pub epsilon: f64,
}

/// Complete observation of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub summary: RunSummary,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    turns: u64,
    goals: usize,
    last_run: Option<usize>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            turns: 0,
            goals: 0,
            last_run: None,
        }
    }

    fn message(&self) -> String {
        match self.last_run {
            Some(turns) => format!("{} (last run {turns} moves)", self.goals),
            None => self.goals.to_string(),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_turns: usize) -> Result<()> {
        let pb = ProgressBar::new(total_turns as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} turns (goals: {msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_message("0");
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_turn(&mut self, _run: usize, _report: &TurnReport) -> Result<()> {
        self.turns += 1;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.turns);
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        if summary.reached_goal {
            self.goals += 1;
            self.last_run = Some(summary.turns);
            if let Some(pb) = &self.progress_bar {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    runs: usize,
    goals: usize,
    total_turns: usize,
    total_reward: f64,
    collisions: usize,
    run_lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            runs: 0,
            goals: 0,
            total_turns: 0,
            total_reward: 0.0,
            collisions: 0,
            run_lengths: Vec::new(),
        }
    }

    /// Fraction of finished runs that reached the goal
    pub fn goal_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.goals as f64 / self.runs as f64
        }
    }

    /// Mean length of runs that reached the goal
    pub fn avg_run_length(&self) -> f64 {
        if self.run_lengths.is_empty() {
            0.0
        } else {
            self.run_lengths.iter().sum::<usize>() as f64 / self.run_lengths.len() as f64
        }
    }

    /// Fraction of moves that ran into a wall
    pub fn collision_rate(&self) -> f64 {
        if self.total_turns == 0 {
            0.0
        } else {
            self.collisions as f64 / self.total_turns as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            runs: self.runs,
            goals: self.goals,
            goal_rate: self.goal_rate(),
            avg_run_length: self.avg_run_length(),
            best_run_length: self.run_lengths.iter().copied().min(),
            total_reward: self.total_reward,
            collisions: self.collisions,
            collision_rate: self.collision_rate(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub runs: usize,
    pub goals: usize,
    pub goal_rate: f64,
    pub avg_run_length: f64,
    pub best_run_length: Option<usize>,
    pub total_reward: f64,
    pub collisions: usize,
    pub collision_rate: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        self.runs += 1;
        self.total_turns += summary.turns;
        self.total_reward += summary.total_reward;
        self.collisions += summary.collisions;
        if summary.reached_goal {
            self.goals += 1;
            self.run_lengths.push(summary.turns);
        }
        Ok(())
    }
}

/// JSONL observer - Exports one observation per run in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_run_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_run_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_run_start(&mut self, _run: usize) -> Result<()> {
        self.current_run_steps.clear();
        Ok(())
    }

    fn on_turn(&mut self, _run: usize, report: &TurnReport) -> Result<()> {
        self.current_run_steps.push(StepObservation {
            step_num: self.current_run_steps.len(),
            state: report.state.to_string(),
            sensors: report.sensors.as_array(),
            action: report.action.map(|action| action.to_string()),
            command: report.response.as_pair(),
            reward: report.reward,
            epsilon: report.epsilon,
        });
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        let observation = Observation {
            summary: summary.clone(),
            steps: std::mem::take(&mut self.current_run_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

/// Shared observer - Lets the caller read an observer back after the
/// pipeline has taken ownership of it
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Handle to the wrapped observer that outlives the pipeline.
    pub fn handle(&self) -> Arc<Mutex<O>> {
        Arc::clone(&self.inner)
    }

    fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_turns: usize) -> Result<()> {
        self.lock().on_training_start(total_turns)
    }

    fn on_run_start(&mut self, run: usize) -> Result<()> {
        self.lock().on_run_start(run)
    }

    fn on_turn(&mut self, run: usize, report: &TurnReport) -> Result<()> {
        self.lock().on_turn(run, report)
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        self.lock().on_run_end(summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}
