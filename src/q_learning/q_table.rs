//! State-action value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    encoder::StateKey,
    navigation::{Action, Direction},
};

/// Values of the four actions in one state, indexed by [`Direction::index`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionValues([f64; 4]);

impl ActionValues {
    pub fn filled(value: f64) -> Self {
        Self([value; 4])
    }

    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    /// Highest value over all four actions.
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose value equals the maximum, in clockwise order.
    pub fn best_actions(&self) -> Vec<Action> {
        let max = self.max();
        Direction::ALL
            .into_iter()
            .filter(|action| self.get(*action) == max)
            .collect()
    }

    pub fn as_array(&self) -> [f64; 4] {
        self.0
    }
}

/// Q-table mapping encoded states to the values of their four actions.
///
/// Every state present in the table carries all four actions. States are
/// only ever added, never removed, for the lifetime of a learning session.
#[derive(Debug, Clone)]
pub struct ActionValueTable {
    values: HashMap<StateKey, ActionValues>,
    /// Value given to every action of a newly created state
    neutral: f64,
}

impl ActionValueTable {
    pub fn new(neutral: f64) -> Self {
        Self {
            values: HashMap::new(),
            neutral,
        }
    }

    /// Insert `state` with all actions at the neutral value unless it is
    /// already present. Returns `true` when the state was created.
    pub fn ensure(&mut self, state: &StateKey) -> bool {
        if self.values.contains_key(state) {
            return false;
        }
        self.values.insert(*state, ActionValues::filled(self.neutral));
        true
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.values.contains_key(state)
    }

    pub fn values(&self, state: &StateKey) -> Option<&ActionValues> {
        self.values.get(state)
    }

    /// Value of `action` in `state`, or `None` for a state never created.
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.values.get(state).map(|values| values.get(action))
    }

    /// Set the value of `action` in `state`, creating the state if needed.
    pub fn set(&mut self, state: &StateKey, action: Action, value: f64) {
        self.ensure(state);
        if let Some(values) = self.values.get_mut(state) {
            values.set(action, value);
        }
    }

    /// Maximum action value in `state`; the neutral value for unseen states.
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.values
            .get(state)
            .map_or(self.neutral, ActionValues::max)
    }

    /// Actions tied for the maximum value. All four for unseen states.
    pub fn best_actions(&self, state: &StateKey) -> Vec<Action> {
        self.values
            .get(state)
            .map_or_else(|| Direction::ALL.to_vec(), ActionValues::best_actions)
    }

    pub fn neutral(&self) -> f64 {
        self.neutral
    }

    /// Number of states stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.values.iter()
    }

    /// Entries sorted by state, for stable output.
    pub fn sorted_entries(&self) -> Vec<(StateKey, ActionValues)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub(crate) fn from_entries(neutral: f64, entries: Vec<(StateKey, ActionValues)>) -> Self {
        Self {
            values: entries.into_iter().collect(),
            neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoder::StateEncoder, navigation::Position};

    fn state(x: usize) -> StateKey {
        StateEncoder::new()
            .encode(Position::new(x, 0), "up", &[0, 1, 0])
            .unwrap()
    }

    #[test]
    fn test_ensure_initialises_all_actions() {
        let mut table = ActionValueTable::new(0.0);
        assert!(table.ensure(&state(0)));
        for action in Direction::ALL {
            assert_eq!(table.get(&state(0), action), Some(0.0));
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut table = ActionValueTable::new(0.0);
        table.ensure(&state(1));
        table.set(&state(1), Direction::Left, 2.5);
        assert!(!table.ensure(&state(1)));
        assert_eq!(table.get(&state(1), Direction::Left), Some(2.5));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unseen_state_reads_neutral() {
        let table = ActionValueTable::new(0.25);
        assert_eq!(table.get(&state(2), Direction::Up), None);
        assert_eq!(table.max_value(&state(2)), 0.25);
        assert_eq!(table.best_actions(&state(2)).len(), 4);
    }

    #[test]
    fn test_best_actions_reports_ties() {
        let mut table = ActionValueTable::new(0.0);
        table.set(&state(3), Direction::Up, 1.0);
        table.set(&state(3), Direction::Down, 1.0);
        table.set(&state(3), Direction::Left, -1.0);
        assert_eq!(
            table.best_actions(&state(3)),
            vec![Direction::Up, Direction::Down]
        );
        assert_eq!(table.max_value(&state(3)), 1.0);
    }
}
