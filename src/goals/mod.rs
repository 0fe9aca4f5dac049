//! Goal evaluation module
//!
//! Compares the selected property's figures against its configured threshold.

pub mod evaluator;

pub use evaluator::{evaluate_goal, goal_metric_value, GoalStatus};
