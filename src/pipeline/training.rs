//! Training pipeline driving the robot through a simulated maze

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Result,
    adapters::{GridMaze, MazeSimulator},
    app::SessionConfig,
    encoder::StateEncoder,
    ports::Observer,
    q_learning::{EpsilonSchedule, QLearner},
    robot::{Robot, TurnReport},
    session::Session,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Total turns across all runs
    pub turns: usize,

    /// Turns after which an unfinished run is abandoned
    pub run_limit: Option<usize>,

    /// Largest distance the simulated sensors report
    pub sensor_cap: u32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            turns: 10_000,
            run_limit: None,
            sensor_cap: 3,
        }
    }
}

impl From<&SessionConfig> for TrainingConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            turns: config.turns,
            run_limit: config.run_limit,
            sensor_cap: config.sensor_cap,
        }
    }
}

/// Outcome of one run from the start pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run number (0-based)
    pub run: usize,
    /// Moves issued, not counting the final reset
    pub turns: usize,
    pub reached_goal: bool,
    pub total_reward: f64,
    /// Moves that ran into a wall
    pub collisions: usize,
}

impl RunSummary {
    fn new(run: usize) -> Self {
        Self {
            run,
            turns: 0,
            reached_goal: false,
            total_reward: 0.0,
            collisions: 0,
        }
    }

    fn record(&mut self, report: &TurnReport) {
        if report.reached_goal() {
            self.reached_goal = true;
            return;
        }
        self.turns += 1;
        self.total_reward += report.reward.unwrap_or(0.0);
        if report.collided() {
            self.collisions += 1;
        }
    }
}

/// Result of a training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Turns taken, including reset turns
    pub total_turns: usize,

    /// Runs that reached the goal
    pub completed_runs: usize,

    /// Runs cut off at the run limit
    pub abandoned_runs: usize,

    /// Length in moves of each completed run, in order
    pub run_lengths: Vec<usize>,

    /// Exploration rate at the end of training
    pub final_epsilon: f64,

    /// Distinct states in the value table
    pub states_learned: usize,
}

impl TrainingResult {
    /// Shortest completed run, if any
    pub fn best_run(&self) -> Option<usize> {
        self.run_lengths.iter().copied().min()
    }

    /// Length of the last completed run, if any
    pub fn last_run(&self) -> Option<usize> {
        self.run_lengths.last().copied()
    }

    pub fn mean_run_length(&self) -> f64 {
        if self.run_lengths.is_empty() {
            0.0
        } else {
            self.run_lengths.iter().sum::<usize>() as f64 / self.run_lengths.len() as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner in a single maze
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train `learner` in `maze` for the configured turn budget.
    ///
    /// The session is returned to the start pose first. It keeps the wall
    /// knowledge gathered during training, so it can seed a later
    /// [`greedy_rollout`].
    pub fn run(
        &mut self,
        learner: &mut QLearner,
        session: &mut Session,
        maze: &GridMaze,
    ) -> Result<TrainingResult> {
        session.abandon_run();
        let mut simulator = MazeSimulator::new(maze, self.config.sensor_cap);
        let robot = Robot::new();

        info!(
            turns = self.config.turns,
            run_limit = ?self.config.run_limit,
            dim = maze.dim(),
            "Starting training"
        );
        for observer in &mut self.observers {
            observer.on_training_start(self.config.turns)?;
        }

        let mut run_lengths = Vec::new();
        let mut abandoned_runs = 0;
        let mut next_run = 0;
        let mut in_progress: Option<RunSummary> = None;

        for _ in 0..self.config.turns {
            let mut summary = match in_progress.take() {
                Some(summary) => summary,
                None => {
                    for observer in &mut self.observers {
                        observer.on_run_start(next_run)?;
                    }
                    next_run += 1;
                    RunSummary::new(next_run - 1)
                }
            };

            let report = robot.step(learner, session, maze, &simulator.readings())?;
            simulator.apply(&report.response);
            summary.record(&report);

            for observer in &mut self.observers {
                observer.on_turn(summary.run, &report)?;
            }

            // A move that lands in the goal is let through, so the next
            // turn can learn its reward and answer `Reset`.
            let limit_hit = !session.at_goal()
                && self
                    .config
                    .run_limit
                    .is_some_and(|limit| summary.turns >= limit);

            if summary.reached_goal {
                run_lengths.push(summary.turns);
            } else if limit_hit {
                warn!(
                    run = summary.run,
                    turns = summary.turns,
                    "Run limit reached, abandoning run"
                );
                session.abandon_run();
                simulator.reset();
                abandoned_runs += 1;
            } else {
                in_progress = Some(summary);
                continue;
            }

            for observer in &mut self.observers {
                observer.on_run_end(&summary)?;
            }
        }

        if let Some(unfinished) = in_progress {
            for observer in &mut self.observers {
                observer.on_run_end(&unfinished)?;
            }
        }

        let result = TrainingResult {
            total_turns: self.config.turns,
            completed_runs: run_lengths.len(),
            abandoned_runs,
            run_lengths,
            final_epsilon: learner.epsilon(),
            states_learned: learner.state_count(),
        };

        info!(
            completed_runs = result.completed_runs,
            abandoned_runs = result.abandoned_runs,
            best_run = ?result.best_run(),
            states = result.states_learned,
            epsilon = result.final_epsilon,
            "Training finished"
        );
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(result)
    }
}

/// Follow the learned policy with ε = 0 from the start pose.
///
/// `session` is used as scratch space: its pose is reset but any wall
/// knowledge it carries is kept. The learner itself is not modified.
/// Returns the number of moves taken to reach the goal, or `None` if the
/// goal was not reached within `max_moves`.
pub fn greedy_rollout(
    learner: &QLearner,
    mut session: Session,
    maze: &GridMaze,
    max_moves: usize,
) -> Option<usize> {
    let mut learner = learner.clone().with_schedule(EpsilonSchedule::greedy());
    let mut simulator = MazeSimulator::new(maze, session.sensor_cap());
    let encoder = StateEncoder::new();
    session.abandon_run();

    for moves in 0..=max_moves {
        let sensors = simulator.sensors();
        session.observe(&sensors);
        if session.at_goal() {
            return Some(moves);
        }
        if moves == max_moves {
            break;
        }

        let state = encoder.encode_pose(&session.pose(), &sensors);
        let action = learner.greedy_action(&state);
        let update = learner.update(&mut session, action, &sensors);
        simulator.apply_motion(update.motion);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LearnerConfig;

    fn setup(seed: u64) -> (QLearner, Session, GridMaze) {
        let learner = QLearner::new(&LearnerConfig::default().with_seed(seed)).unwrap();
        let maze = GridMaze::builtin();
        let session = Session::for_maze(&maze, 3).unwrap();
        (learner, session, maze)
    }

    #[test]
    fn test_training_result_rates() {
        let result = TrainingResult {
            total_turns: 100,
            completed_runs: 3,
            abandoned_runs: 0,
            run_lengths: vec![40, 30, 20],
            final_epsilon: 0.1,
            states_learned: 50,
        };
        assert_eq!(result.best_run(), Some(20));
        assert_eq!(result.last_run(), Some(20));
        assert!((result.mean_run_length() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_turn_budget_is_respected() {
        let (mut learner, mut session, maze) = setup(1);
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            turns: 250,
            ..TrainingConfig::default()
        });
        let result = pipeline.run(&mut learner, &mut session, &maze).unwrap();

        assert_eq!(result.total_turns, 250);
        assert!(result.states_learned > 0);
        assert!(result.final_epsilon < 0.2);
    }

    #[test]
    fn test_run_limit_abandons_runs() {
        let (mut learner, mut session, maze) = setup(2);
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            turns: 100,
            run_limit: Some(5),
            ..TrainingConfig::default()
        });
        let result = pipeline.run(&mut learner, &mut session, &maze).unwrap();

        // The goal is 18 moves away, so no 5-move run can reach it.
        assert_eq!(result.completed_runs, 0);
        assert_eq!(result.abandoned_runs, 20);
    }

    #[test]
    fn test_goal_on_limit_move_completes_run() {
        let (mut learner, mut session, maze) = setup(0);
        TrainingPipeline::new(TrainingConfig::default())
            .run(&mut learner, &mut session, &maze)
            .unwrap();
        let moves = greedy_rollout(&learner, session.clone(), &maze, 100).unwrap();

        let runs_before = session.completed_runs();
        let mut greedy = learner.with_schedule(EpsilonSchedule::greedy());
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            turns: moves + 1,
            run_limit: Some(moves),
            ..TrainingConfig::default()
        });
        let result = pipeline.run(&mut greedy, &mut session, &maze).unwrap();

        assert_eq!(result.completed_runs, 1);
        assert_eq!(result.abandoned_runs, 0);
        assert_eq!(result.run_lengths, vec![moves]);
        assert_eq!(session.completed_runs(), runs_before + 1);
    }

    #[test]
    fn test_untrained_rollout_can_fail() {
        let (learner, session, maze) = setup(3);
        assert_eq!(greedy_rollout(&learner, session, &maze, 5), None);
    }

    #[test]
    fn test_result_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = TrainingResult {
            total_turns: 10,
            completed_runs: 1,
            abandoned_runs: 0,
            run_lengths: vec![9],
            final_epsilon: 0.19,
            states_learned: 7,
        };
        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.run_lengths, vec![9]);
        assert_eq!(loaded.states_learned, 7);
    }
}
