//! Month-over-month mover ranking

use std::cmp::Ordering;

use super::cumulative::order_by_month;
use super::{Mover, MOVER_LIMIT};
use crate::models::numeric::finite_or_zero;
use crate::models::{Metric, MonthlyPoint};

/// Percentage change against the previous month
///
/// A previous value of exactly 0 is replaced by a divisor of 1, so the
/// result is the absolute delta times 100 rather than a true percentage.
pub fn change_percent(previous: f64, current: f64) -> f64 {
    let divisor = if previous == 0.0 { 1.0 } else { previous };
    finite_or_zero((current - previous) / divisor * 100.0)
}

/// Top movers by absolute month-over-month change, largest first
pub fn top_movers(monthly: &[MonthlyPoint], metric: Metric) -> Vec<Mover> {
    rank_movers(monthly, metric, MOVER_LIMIT)
}

/// Rank every month after the first by `|change_percent|`, keep `limit`
pub fn rank_movers(monthly: &[MonthlyPoint], metric: Metric, limit: usize) -> Vec<Mover> {
    let ordered = order_by_month(monthly);

    let mut movers: Vec<Mover> = ordered
        .windows(2)
        .map(|pair| {
            let previous = finite_or_zero(metric.select(pair[0].total_amount, pair[0].total_consumption));
            let current = finite_or_zero(metric.select(pair[1].total_amount, pair[1].total_consumption));
            Mover {
                label: pair[1].month.clone(),
                change_percent: change_percent(previous, current),
            }
        })
        .collect();

    // Stable sort keeps chronological order among equal magnitudes
    movers.sort_by(|a, b| {
        b.change_percent
            .abs()
            .partial_cmp(&a.change_percent.abs())
            .unwrap_or(Ordering::Equal)
    });
    movers.truncate(limit);

    tracing::debug!("Ranked {} movers from {} months", movers.len(), ordered.len());
    movers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: &str, amount: f64, consumption: f64) -> MonthlyPoint {
        MonthlyPoint::new(month, amount, consumption)
    }

    #[test]
    fn test_single_step_mover() {
        let movers = top_movers(
            &[point("2024-01", 100.0, 10.0), point("2024-02", 110.0, 11.0)],
            Metric::Amount,
        );

        assert_eq!(movers.len(), 1);
        assert_eq!(movers[0].label, "2024-02");
        assert!((movers[0].change_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_movers_capped_and_sorted_by_magnitude() {
        let months = [
            point("2024-01", 100.0, 0.0),
            point("2024-02", 105.0, 0.0),  // +5%
            point("2024-03", 52.5, 0.0),   // -50%
            point("2024-04", 63.0, 0.0),   // +20%
            point("2024-05", 126.0, 0.0),  // +100%
            point("2024-06", 119.7, 0.0),  // -5%
            point("2024-07", 131.67, 0.0), // +10%
        ];

        let movers = top_movers(&months, Metric::Amount);

        assert_eq!(movers.len(), 4);
        let labels: Vec<&str> = movers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-05", "2024-03", "2024-04", "2024-07"]);
        for pair in movers.windows(2) {
            assert!(pair[0].change_percent.abs() >= pair[1].change_percent.abs());
        }
        assert!(movers.iter().all(|m| m.label != "2024-01"));
    }

    #[test]
    fn test_zero_previous_uses_unit_divisor() {
        let movers = top_movers(
            &[point("2024-01", 0.0, 0.0), point("2024-02", 3.5, 0.0)],
            Metric::Amount,
        );
        assert!((movers[0].change_percent - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_consumption_metric_and_unsorted_input() {
        let movers = top_movers(
            &[point("2024-02", 999.0, 15.0), point("2024-01", 1.0, 10.0)],
            Metric::Consumption,
        );
        assert_eq!(movers.len(), 1);
        assert!((movers[0].change_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_than_two_months() {
        assert!(top_movers(&[], Metric::Amount).is_empty());
        assert!(top_movers(&[point("2024-01", 5.0, 1.0)], Metric::Amount).is_empty());
    }
}
