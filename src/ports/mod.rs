//! Ports (trait boundaries) for external collaborators.
//!
//! This module defines the interfaces between the learning core and the
//! world around it. Following hexagonal architecture, these traits are owned
//! by the domain and implemented by adapters.

pub mod maze;
pub mod observer;

pub use maze::MazeModel;
pub use observer::Observer;
