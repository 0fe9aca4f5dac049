//! Goal evaluator

use serde::{Deserialize, Serialize};

use crate::models::numeric::finite_or_zero;
use crate::models::{GoalConfig, Metric, MonthlyPoint};
use crate::trends::amount_for_month;

/// Outcome of checking a goal against loaded data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalStatus {
    pub met: bool,
    pub value: f64,
}

/// The figure a goal is checked against
///
/// Amount goals look at the current month only (0 if it has no charges yet).
/// Consumption goals use the mean monthly consumption of the loaded series.
pub fn goal_metric_value(goal: &GoalConfig, monthly: &[MonthlyPoint], current_month: &str) -> f64 {
    match goal.metric {
        Metric::Amount => amount_for_month(monthly, current_month),
        Metric::Consumption => {
            let total: f64 = monthly.iter().map(|m| finite_or_zero(m.total_consumption)).sum();
            total / monthly.len().max(1) as f64
        }
    }
}

/// Evaluate a property's goal
///
/// Returns `None` when no goal is configured or no data has been loaded.
/// Hitting the threshold exactly counts as met.
pub fn evaluate_goal(
    goal: Option<&GoalConfig>,
    monthly: Option<&[MonthlyPoint]>,
    current_month: &str,
) -> Option<GoalStatus> {
    let goal = goal?;
    let monthly = monthly?;

    let value = goal_metric_value(goal, monthly, current_month);
    Some(GoalStatus {
        met: value <= goal.threshold,
        value,
    })
}
