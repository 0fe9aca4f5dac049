//! Series ordering and cumulative projection
//!
//! Orders the monthly series chronologically and attaches running totals.

use super::CumulativePoint;
use crate::models::numeric::finite_or_zero;
use crate::models::MonthlyPoint;

/// Sort monthly points ascending by month
///
/// Zero-padded `YYYY-MM` keys sort lexicographically in calendar order.
/// Duplicate months are kept in input order.
pub fn order_by_month(points: &[MonthlyPoint]) -> Vec<MonthlyPoint> {
    let mut ordered = points.to_vec();
    ordered.sort_by(|a, b| a.month.cmp(&b.month));
    ordered
}

/// Ordered series with running amount and consumption totals
///
/// A server-supplied `cumulative_amount` wins for the point that carries it
/// and becomes the base the following points accumulate onto. Consumption
/// has no server counterpart and is always summed here.
pub fn with_cumulative(points: &[MonthlyPoint]) -> Vec<CumulativePoint> {
    let mut cumulative_amount = 0.0;
    let mut cumulative_consumption = 0.0;

    order_by_month(points)
        .into_iter()
        .map(|point| {
            let total_amount = finite_or_zero(point.total_amount);
            let total_consumption = finite_or_zero(point.total_consumption);

            cumulative_amount = match point.cumulative_amount.filter(|v| v.is_finite()) {
                Some(server_value) => server_value,
                None => cumulative_amount + total_amount,
            };
            cumulative_consumption += total_consumption;

            CumulativePoint {
                month: point.month,
                total_amount,
                total_consumption,
                cumulative_amount,
                cumulative_consumption,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: &str, amount: f64, consumption: f64) -> MonthlyPoint {
        MonthlyPoint::new(month, amount, consumption)
    }

    #[test]
    fn test_order_by_month() {
        let ordered = order_by_month(&[
            point("2024-03", 3.0, 0.0),
            point("2023-12", 1.0, 0.0),
            point("2024-01", 2.0, 0.0),
        ]);
        let months: Vec<&str> = ordered.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-03"]);
    }

    #[test]
    fn test_with_cumulative_running_sums() {
        let series = with_cumulative(&[
            point("2024-02", 110.0, 11.0),
            point("2024-01", 100.0, 10.0),
            point("2024-03", 90.0, 9.0),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].month, "2024-01");
        assert_eq!(series[0].cumulative_amount, 100.0);
        assert_eq!(series[1].cumulative_amount, 210.0);
        assert_eq!(series[2].cumulative_amount, 300.0);
        assert_eq!(series[2].cumulative_consumption, 30.0);
    }

    #[test]
    fn test_with_cumulative_empty() {
        assert!(with_cumulative(&[]).is_empty());
    }

    #[test]
    fn test_last_point_equals_sum_of_totals() {
        let points: Vec<MonthlyPoint> = (1..=12)
            .map(|m| point(&format!("2025-{:02}", m), m as f64 * 12.5, m as f64 * 0.75))
            .collect();

        let series = with_cumulative(&points);
        let last = series.last().unwrap();
        let amount_sum: f64 = points.iter().map(|p| p.total_amount).sum();
        let consumption_sum: f64 = points.iter().map(|p| p.total_consumption).sum();

        assert!((last.cumulative_amount - amount_sum).abs() < 1e-9);
        assert!((last.cumulative_consumption - consumption_sum).abs() < 1e-9);
    }

    #[test]
    fn test_server_cumulative_is_preferred() {
        let mut anchor = point("2024-01", 100.0, 10.0);
        anchor.cumulative_amount = Some(1000.0);

        let series = with_cumulative(&[point("2024-02", 50.0, 5.0), anchor]);

        assert_eq!(series[0].cumulative_amount, 1000.0);
        // Later points accumulate on top of the server anchor
        assert_eq!(series[1].cumulative_amount, 1050.0);
        assert_eq!(series[1].cumulative_consumption, 15.0);
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let series = with_cumulative(&[
            point("2024-01", f64::NAN, 1.0),
            point("2024-02", 20.0, f64::INFINITY),
        ]);

        assert_eq!(series[0].total_amount, 0.0);
        assert_eq!(series[1].cumulative_amount, 20.0);
        assert_eq!(series[1].cumulative_consumption, 1.0);
    }
}
