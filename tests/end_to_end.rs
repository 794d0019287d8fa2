//! Training in the built-in maze until the greedy policy finds the centre

mod common;

use common::builtin_setup;
use micromouse::{
    GridMaze, Response, Robot,
    adapters::{Applied, MazeSimulator},
    navigation::{MAX_MOVEMENT, Pose, Position},
    pipeline::{TrainingConfig, TrainingPipeline, greedy_rollout},
};

#[test]
fn builtin_maze_shape() {
    let maze = GridMaze::builtin();
    assert_eq!(maze.dim(), 12);
    assert_eq!(Pose::start(12).position, Position::new(0, 11));
    for cell in [(5, 5), (5, 6), (6, 5), (6, 6)] {
        assert!(maze.goal_region().contains(Position::new(cell.0, cell.1)));
    }
    assert_eq!(maze.shortest_path_len(), Some(18));
}

#[test]
fn trained_policy_reaches_goal_within_bound() {
    let (mut learner, mut session, maze) = builtin_setup(42);
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        turns: 10_000,
        ..TrainingConfig::default()
    });
    let result = pipeline.run(&mut learner, &mut session, &maze).unwrap();
    assert!(result.completed_runs > 0);

    let optimal = maze.shortest_path_len().unwrap();
    let bound = 4 * optimal;
    let moves = greedy_rollout(&learner, session.clone(), &maze, bound)
        .expect("greedy policy should reach the goal");

    assert!(moves >= optimal);
    assert!(moves <= bound, "took {moves} moves, bound {bound}");
}

#[test]
fn driver_loop_produces_bounded_commands_and_resets() {
    let (mut learner, mut session, maze) = builtin_setup(9);
    let mut simulator = MazeSimulator::new(&maze, session.sensor_cap());
    let robot = Robot::new();
    let mut resets = 0;

    for _ in 0..3_000 {
        let readings = simulator.readings();
        let response = robot
            .next_move(&mut learner, &mut session, &maze, &readings)
            .unwrap();

        match response {
            Response::Move(motion) => {
                let (rotation, movement) = motion.as_pair();
                assert!([-90, 0, 90].contains(&rotation));
                assert!(movement.unsigned_abs() <= MAX_MOVEMENT);
            }
            Response::Reset => {
                assert!(maze.goal_region().contains(simulator.pose().position));
                resets += 1;
            }
        }

        let applied = simulator.apply(&response);
        if let Applied::Moved { to, .. } = applied {
            // Believed pose tracks the simulator exactly.
            assert_eq!(session.pose(), to);
        }
    }

    assert!(resets > 0);
    assert_eq!(session.completed_runs(), resets);
}
