//! Tests for the training pipeline and its observers

mod common;

use std::{
    io::{BufRead, BufReader},
    sync::{Arc, Mutex},
};

use common::builtin_setup;
use micromouse::{
    Result, TurnReport,
    pipeline::{
        JsonlObserver, MetricsObserver, Observation, Observer, RunSummary, SharedObserver,
        TrainingConfig, TrainingPipeline,
    },
};

/// Records every callback so ordering can be checked.
#[derive(Default)]
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_turns: usize) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {total_turns}"));
        Ok(())
    }

    fn on_run_start(&mut self, run: usize) -> Result<()> {
        self.events.lock().unwrap().push(format!("run {run}"));
        Ok(())
    }

    fn on_turn(&mut self, _run: usize, _report: &TurnReport) -> Result<()> {
        self.events.lock().unwrap().push("turn".to_string());
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("end {}", summary.run));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("done".to_string());
        Ok(())
    }
}

#[test]
fn test_observer_callbacks_are_ordered() {
    let (mut learner, mut session, maze) = builtin_setup(11);
    let log = EventLog::default();
    let events = Arc::clone(&log.events);

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        turns: 12,
        run_limit: Some(5),
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(log));
    pipeline.run(&mut learner, &mut session, &maze).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("start 12"));
    assert_eq!(events.last().map(String::as_str), Some("done"));
    assert_eq!(events.iter().filter(|e| *e == "turn").count(), 12);

    // 5 + 5 + 2 turns: two abandoned runs and one cut short by the budget.
    let runs: Vec<_> = events.iter().filter(|e| e.starts_with("run ")).collect();
    let ends: Vec<_> = events.iter().filter(|e| e.starts_with("end ")).collect();
    assert_eq!(runs, ["run 0", "run 1", "run 2"]);
    assert_eq!(ends, ["end 0", "end 1", "end 2"]);
}

#[test]
fn test_metrics_agree_with_result() {
    let (mut learner, mut session, maze) = builtin_setup(12);
    let metrics = SharedObserver::new(MetricsObserver::new());
    let handle = metrics.handle();

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        turns: 3_000,
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(metrics));
    let result = pipeline.run(&mut learner, &mut session, &maze).unwrap();

    let summary = handle.lock().unwrap().summary();
    assert_eq!(summary.goals, result.completed_runs);
    assert_eq!(summary.best_run_length, result.best_run());
    assert!(summary.collision_rate >= 0.0 && summary.collision_rate <= 1.0);
    assert_eq!(session.completed_runs(), result.completed_runs);
}

#[test]
fn test_jsonl_observer_writes_one_line_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");
    let (mut learner, mut session, maze) = builtin_setup(13);

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        turns: 40,
        run_limit: Some(10),
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(JsonlObserver::new(&path).unwrap()));
    let result = pipeline.run(&mut learner, &mut session, &maze).unwrap();
    drop(pipeline);

    let file = std::fs::File::open(&path).unwrap();
    let observations: Vec<Observation> = BufReader::new(file)
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(observations.len(), result.abandoned_runs + result.completed_runs);
    let first = &observations[0];
    assert_eq!(first.summary.run, 0);
    assert_eq!(first.steps.len(), 10);
    assert_eq!(first.steps[0].sensors, [0, 2, 0]);
    assert!(first.steps[0].state.starts_with("0,11|up|"));
    assert!(first.steps.iter().all(|step| step.command.is_some()));
}
