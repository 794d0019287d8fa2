//! Evaluate command - Run a trained learner greedily through a maze

use std::{fs::File, path::PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use serde::Serialize;

use super::{load_maze, maze_label};
use crate::{
    cli::output::{format_moves, print_section, print_stats_table},
    pipeline::greedy_rollout,
    q_learning::SavedLearner,
    session::Session,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained learner")]
pub struct EvaluateArgs {
    /// Path to trained learner file
    pub learner: PathBuf,

    /// Maze file (JSON); the built-in 12x12 maze when omitted
    #[arg(long, short = 'm')]
    pub maze: Option<PathBuf>,

    /// Give up on a rollout after this many moves
    #[arg(long, default_value_t = 500)]
    pub max_moves: usize,

    /// Number of greedy rollouts; ties between equal values break randomly
    #[arg(long, short = 'n', default_value_t = 1)]
    pub trials: usize,

    /// Largest distance the simulated sensors report
    #[arg(long, default_value_t = 3)]
    pub sensor_cap: u32,

    /// Random seed for tie-breaking (defaults to the training seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationResults {
    maze: String,
    trials: usize,
    successes: usize,
    rollouts: Vec<Option<usize>>,
    best: Option<usize>,
    shortest_path: Option<usize>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    if args.trials == 0 {
        bail!("--trials must be at least 1");
    }

    println!("Loading trained learner from: {}", args.learner.display());
    let saved = SavedLearner::load_from_file(&args.learner)?;
    let learner = saved.to_learner()?;
    let maze = load_maze(args.maze.as_deref())?;

    print_section("Loaded Learner");
    let metadata = &saved.metadata;
    let mut info = vec![("States", saved.state_count().to_string())];
    if let Some(turns) = metadata.turns_trained {
        info.push(("Turns trained", turns.to_string()));
    }
    if let Some(runs) = metadata.runs_completed {
        info.push(("Runs completed", runs.to_string()));
    }
    info.push((
        "Trained on",
        metadata
            .maze_source
            .clone()
            .unwrap_or_else(|| "built-in 12x12".to_string()),
    ));
    print_stats_table(&info);

    if let Some(dim) = metadata.maze_dim
        && dim != maze.dim()
    {
        println!(
            "\n⚠️  Learner was trained on a {dim}x{dim} maze, evaluating on {0}x{0}",
            maze.dim()
        );
    }

    let base_seed = args.seed.or(metadata.seed).unwrap_or(0);
    let rollouts: Vec<Option<usize>> = (0..args.trials)
        .map(|trial| -> Result<Option<usize>> {
            let learner = learner
                .clone()
                .with_seed(base_seed.wrapping_add(trial as u64));
            let session = Session::for_maze(&maze, args.sensor_cap)?;
            Ok(greedy_rollout(&learner, session, &maze, args.max_moves))
        })
        .collect::<Result<_>>()?;

    let successes = rollouts.iter().filter(|moves| moves.is_some()).count();
    let best = rollouts.iter().flatten().copied().min();
    let shortest_path = maze.shortest_path_len();

    print_section("Evaluation Results");
    print_stats_table(&[
        ("Maze", maze_label(args.maze.as_deref())),
        ("Trials", args.trials.to_string()),
        (
            "Reached goal",
            format!(
                "{successes} ({:.1}%)",
                100.0 * successes as f64 / args.trials as f64
            ),
        ),
        ("Best rollout", format_moves(best)),
        ("Shortest path", format_moves(shortest_path)),
    ]);

    if let (Some(best), Some(shortest)) = (best, shortest_path)
        && shortest > 0
    {
        println!("  Ratio to optimal:        {:.2}", best as f64 / shortest as f64);
    }

    if let Some(export_path) = &args.export {
        let results = EvaluationResults {
            maze: maze_label(args.maze.as_deref()),
            trials: args.trials,
            successes,
            rollouts,
            best,
            shortest_path,
        };
        let file = File::create(export_path)?;
        serde_json::to_writer_pretty(file, &results)?;
        println!("\n✓ Results exported to: {}", export_path.display());
    }

    Ok(())
}
