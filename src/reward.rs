//! Reward shaping for maze moves

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    navigation::{GoalRegion, Position},
};

/// How a single move turned out, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Entered a goal cell.
    Goal,
    /// Reduced the distance to the nearest goal cell.
    Closer,
    /// Did not change cell (rotation only).
    Stationary,
    /// Increased (or kept) the distance to the nearest goal cell.
    Farther,
    /// Tried to move through a wall.
    Collision,
}

impl MoveOutcome {
    /// Classify a move from `from` to `to`.
    pub fn classify(goal: &GoalRegion, from: Position, to: Position, collided: bool) -> Self {
        if collided {
            MoveOutcome::Collision
        } else if from == to {
            MoveOutcome::Stationary
        } else if goal.contains(to) {
            MoveOutcome::Goal
        } else if goal.distance(to) < goal.distance(from) {
            MoveOutcome::Closer
        } else {
            MoveOutcome::Farther
        }
    }
}

/// Reward paid for each [`MoveOutcome`].
///
/// Step rewards are kept non-positive by default so that a table initialised
/// at zero is optimistic about moves it has not tried yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    pub goal: f64,
    pub closer: f64,
    pub stationary: f64,
    pub farther: f64,
    pub collision: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            goal: 10.0,
            closer: 0.0,
            stationary: -0.5,
            farther: -1.0,
            collision: -5.0,
        }
    }
}

impl RewardSchedule {
    pub fn reward(&self, outcome: MoveOutcome) -> f64 {
        match outcome {
            MoveOutcome::Goal => self.goal,
            MoveOutcome::Closer => self.closer,
            MoveOutcome::Stationary => self.stationary,
            MoveOutcome::Farther => self.farther,
            MoveOutcome::Collision => self.collision,
        }
    }

    /// Check that the schedule is finite and strictly ordered
    /// goal > closer > stationary > farther > collision.
    pub fn validate(&self) -> Result<()> {
        let ladder = [
            ("goal", self.goal),
            ("closer", self.closer),
            ("stationary", self.stationary),
            ("farther", self.farther),
            ("collision", self.collision),
        ];

        if let Some((name, value)) = ladder.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::InvalidConfiguration {
                message: format!("{name} reward must be finite, got {value}"),
            });
        }

        for pair in ladder.windows(2) {
            let (better, better_value) = pair[0];
            let (worse, worse_value) = pair[1];
            if better_value <= worse_value {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "{better} reward ({better_value}) must exceed {worse} reward ({worse_value})"
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_valid() {
        RewardSchedule::default().validate().unwrap();
    }

    #[test]
    fn test_out_of_order_schedule_rejected() {
        let schedule = RewardSchedule {
            farther: -10.0,
            collision: -5.0,
            ..RewardSchedule::default()
        };
        let err = schedule.validate().unwrap_err();
        assert!(err.to_string().contains("farther"));
    }

    #[test]
    fn test_classify() {
        let goal = GoalRegion::for_dim(12).unwrap();
        let start = Position::new(0, 11);
        let up = Position::new(0, 10);

        assert_eq!(
            MoveOutcome::classify(&goal, start, start, true),
            MoveOutcome::Collision
        );
        assert_eq!(
            MoveOutcome::classify(&goal, start, start, false),
            MoveOutcome::Stationary
        );
        assert_eq!(MoveOutcome::classify(&goal, start, up, false), MoveOutcome::Closer);
        assert_eq!(MoveOutcome::classify(&goal, up, start, false), MoveOutcome::Farther);
        assert_eq!(
            MoveOutcome::classify(&goal, Position::new(5, 4), Position::new(5, 5), false),
            MoveOutcome::Goal
        );
    }
}
