//! Subcommands of the `micromouse` binary

pub mod evaluate;
pub mod train;

use std::path::Path;

use anyhow::{Context, Result};

use crate::adapters::GridMaze;

/// Load the maze at `path`, or the built-in maze when no path is given.
pub(crate) fn load_maze(path: Option<&Path>) -> Result<GridMaze> {
    match path {
        Some(path) => GridMaze::from_json_file(path)
            .with_context(|| format!("Failed to load maze from {}", path.display())),
        None => Ok(GridMaze::builtin()),
    }
}

/// Human-readable name for where a maze came from.
pub(crate) fn maze_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "built-in 12x12".to_string(),
    }
}
