//! Command-line interface for training and evaluating maze learners

pub mod commands;
pub mod output;
