//! Train command - Train a Q-learning agent in a maze

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::PoisonError,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use super::{load_maze, maze_label};
use crate::{
    app::SessionConfig,
    cli::output::{format_moves, format_number, print_section, print_stats_table},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver,
        TrainingConfig, TrainingPipeline, TrainingResult, greedy_rollout,
    },
    q_learning::{QLearner, SavedLearner, TrainingMetadata},
    session::Session,
};

#[derive(Debug, Serialize)]
struct RolloutSummary {
    moves: Option<usize>,
    shortest_path: Option<usize>,
    max_moves: usize,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    metrics: MetricsSummary,
    rollout: RolloutSummary,
    config: SessionConfig,
    maze: String,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a learner in a maze")]
pub struct TrainArgs {
    /// Maze file (JSON); the built-in 12x12 maze when omitted
    #[arg(long, short = 'm')]
    pub maze: Option<PathBuf>,

    /// Session configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Training turn budget
    #[arg(long, short = 't')]
    pub turns: Option<usize>,

    /// Abandon a run after this many moves
    #[arg(long)]
    pub run_limit: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub discount_factor: Option<f64>,

    /// Initial exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Output file for the trained learner
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL observations, one line per run
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Move limit for the greedy rollout after training
    #[arg(long, default_value_t = 500)]
    pub max_moves: usize,
}

/// Merge the configuration file (if any) with command-line overrides.
pub(crate) fn build_config(args: &TrainArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(turns) = args.turns {
        config.turns = turns;
    }
    if let Some(limit) = args.run_limit {
        config.run_limit = Some(limit);
    }
    if let Some(seed) = args.seed {
        config.learner.seed = Some(seed);
    }
    if let Some(learning_rate) = args.learning_rate {
        config.learner.learning_rate = learning_rate;
    }
    if let Some(discount_factor) = args.discount_factor {
        config.learner.discount_factor = discount_factor;
    }
    if let Some(epsilon) = args.epsilon {
        config.learner.epsilon = epsilon;
        config.learner.min_epsilon = config.learner.min_epsilon.min(epsilon);
    }

    config.validate()?;
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = build_config(&args)?;
    let maze = load_maze(args.maze.as_deref())?.with_rewards(config.rewards);
    let maze_name = maze_label(args.maze.as_deref());

    print_section("Training");
    print_stats_table(&[
        ("Maze", maze_name.clone()),
        ("Turns", format_number(config.turns)),
        (
            "Run limit",
            config
                .run_limit
                .map_or_else(|| "none".to_string(), |limit| limit.to_string()),
        ),
        ("Learning rate", config.learner.learning_rate.to_string()),
        ("Discount factor", config.learner.discount_factor.to_string()),
        (
            "Epsilon",
            format!(
                "{} (decay {}, floor {})",
                config.learner.epsilon, config.learner.epsilon_decay, config.learner.min_epsilon
            ),
        ),
        (
            "Seed",
            config
                .learner
                .seed
                .map_or_else(|| "random".to_string(), |seed| seed.to_string()),
        ),
    ]);

    let mut learner = QLearner::new(&config.learner)?;
    let mut session = Session::for_maze(&maze, config.sensor_cap)?;

    let metrics = SharedObserver::new(MetricsObserver::new());
    let metrics_handle = metrics.handle();
    let mut pipeline =
        TrainingPipeline::new(TrainingConfig::from(&config)).with_observer(Box::new(metrics));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut learner, &mut session, &maze)?;
    let metrics = metrics_handle
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    let shortest_path = maze.shortest_path_len();
    let rollout = greedy_rollout(&learner, session.clone(), &maze, args.max_moves);

    print_section("Results");
    print_stats_table(&[
        ("Runs completed", result.completed_runs.to_string()),
        ("Runs abandoned", result.abandoned_runs.to_string()),
        ("Best run", format_moves(result.best_run())),
        ("Last run", format_moves(result.last_run())),
        ("Mean run", format!("{:.1} moves", result.mean_run_length())),
        ("Collision rate", format!("{:.1}%", metrics.collision_rate * 100.0)),
        ("States learned", format_number(result.states_learned)),
        ("Final epsilon", format!("{:.4}", result.final_epsilon)),
        ("Greedy rollout", format_moves(rollout)),
        ("Shortest path", format_moves(shortest_path)),
    ]);

    if rollout.is_none() {
        println!(
            "\n⚠️  Greedy policy did not reach the goal within {} moves",
            args.max_moves
        );
    }

    if let Some(output_path) = &args.output {
        let metadata = TrainingMetadata {
            maze_dim: Some(maze.dim()),
            turns_trained: Some(result.total_turns),
            runs_completed: Some(result.completed_runs),
            seed: config.learner.seed,
            maze_source: args.maze.as_ref().map(|path| path.display().to_string()),
        };
        SavedLearner::from_learner(&learner, metadata).save_to_file(output_path)?;
        println!("\n✓ Learner saved to: {}", output_path.display());
        println!("  Stored states: {}", learner.state_count());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: result,
            metrics,
            rollout: RolloutSummary {
                moves: rollout,
                shortest_path,
                max_moves: args.max_moves,
            },
            config,
            maze: maze_name,
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> TrainArgs {
        let mut argv = vec!["train"];
        argv.extend_from_slice(extra);
        TrainArgs::parse_from(argv)
    }

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.JSON")),
            PathBuf::from("out/summary.JSON")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/")),
            PathBuf::from("out/training_summary.json")
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(&args(&[
            "--turns",
            "200",
            "--seed",
            "5",
            "--epsilon",
            "0.01",
            "--run-limit",
            "50",
        ]))
        .unwrap();
        assert_eq!(config.turns, 200);
        assert_eq!(config.learner.seed, Some(5));
        assert_eq!(config.learner.epsilon, 0.01);
        assert_eq!(config.learner.min_epsilon, 0.01);
        assert_eq!(config.run_limit, Some(50));
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(build_config(&args(&["--learning-rate", "2.0"])).is_err());
    }
}
