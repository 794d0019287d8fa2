//! Tabular Q-learning for maze navigation
//!
//! The learner keeps one value per (state, action) pair and improves it with
//! the off-policy temporal difference rule
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! Actions are chosen ε-greedily, with ε decaying geometrically toward a
//! floor and ties between equally valued actions broken uniformly at random.
//!
//! ## Usage Example
//!
//! ```no_run
//! use micromouse::{
//!     app::LearnerConfig,
//!     encoder::StateEncoder,
//!     navigation::{Direction, Position},
//!     q_learning::QLearner,
//! };
//!
//! let mut learner = QLearner::new(&LearnerConfig::default().with_seed(7)).unwrap();
//! let state = StateEncoder::new()
//!     .encode(Position::new(0, 11), "up", &[0, 3, 0])
//!     .unwrap();
//! learner.create_q(&state);
//! let action = learner.choose_action(&state);
//! assert!(Direction::ALL.contains(&action));
//! ```

pub mod learner;
pub mod policy;
pub mod q_table;
pub mod serialization;

pub use learner::{PoseUpdate, QLearner};
pub use policy::EpsilonSchedule;
pub use q_table::{ActionValueTable, ActionValues};
pub use serialization::{SavedLearner, TrainingMetadata};
