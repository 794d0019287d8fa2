//! Observer port - hooks into the training turn loop
//!
//! Progress display, metrics and trace export all hang off these callbacks,
//! so the loop itself never knows where its data ends up.

use crate::{Result, pipeline::RunSummary, robot::TurnReport};

/// Receives run and turn events from the training pipeline.
///
/// Observers can be composed to collect different types of data during
/// training, such as progress bars, JSONL export and metrics tracking.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_turns)` - Once at the beginning
/// 2. For each run:
///    - `on_run_start(run)`
///    - `on_turn(run, report)` - For each turn of the run
///    - `on_run_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// A run still in progress when the turn budget runs out gets an
/// `on_run_end` with `reached_goal == false`.
///
/// # Examples
///
/// ```no_run
/// use micromouse::{pipeline::RunSummary, ports::Observer};
///
/// struct GoalCounter {
///     goals: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_run_end(&mut self, summary: &RunSummary) -> micromouse::Result<()> {
///         if summary.reached_goal {
///             self.goals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_turns` - Turn budget for the whole session
    fn on_training_start(&mut self, _total_turns: usize) -> Result<()> {
        Ok(())
    }

    /// Called when the robot sets off from the start pose.
    fn on_run_start(&mut self, _run: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every turn, including the final `Reset` turn of a run.
    fn on_turn(&mut self, _run: usize, _report: &TurnReport) -> Result<()> {
        Ok(())
    }

    /// Called when a run reaches the goal, hits the run limit or is cut
    /// short by the end of training.
    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }

    /// Called once the turn budget is spent. Flush files and finish
    /// progress output here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
