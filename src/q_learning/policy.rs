//! ε-greedy exploration schedule

use serde::{Deserialize, Serialize};

/// Exploration rate that decays geometrically toward a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    epsilon: f64,
    initial: f64,
    decay: f64,
    floor: f64,
}

impl EpsilonSchedule {
    pub fn new(initial: f64, decay: f64, floor: f64) -> Self {
        Self {
            epsilon: initial,
            initial,
            decay,
            floor,
        }
    }

    /// A schedule that never explores.
    pub fn greedy() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn current(&self) -> f64 {
        self.epsilon
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Advance one decision.
    pub fn step(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decays_to_floor() {
        let mut schedule = EpsilonSchedule::new(0.5, 0.5, 0.1);
        schedule.step();
        assert_eq!(schedule.current(), 0.25);
        schedule.step();
        schedule.step();
        assert_eq!(schedule.current(), 0.1);
        schedule.reset();
        assert_eq!(schedule.current(), 0.5);
    }

    #[test]
    fn test_greedy_stays_at_zero() {
        let mut schedule = EpsilonSchedule::greedy();
        schedule.step();
        assert_eq!(schedule.current(), 0.0);
    }
}
