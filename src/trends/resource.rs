//! Resource-grouped projection
//!
//! Pivots the (month, resource) breakdown into one row per month of the
//! primary series, suitable for stacked bar charts.

use std::collections::{BTreeSet, HashMap};

use super::{ResourceRow, ResourceSeries};
use crate::models::numeric::finite_or_zero;
use crate::models::{Metric, MonthlyPoint, ResourceMonthlyPoint};

/// Resource types in order of first appearance in the breakdown
pub fn resource_order(breakdown: &[ResourceMonthlyPoint]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for cell in breakdown {
        if !order.iter().any(|r| r == &cell.resource_type) {
            order.push(cell.resource_type.clone());
        }
    }
    order
}

/// Distinct months of the primary series, ascending
pub fn distinct_months(monthly: &[MonthlyPoint]) -> Vec<String> {
    monthly
        .iter()
        .map(|p| p.month.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pivot the breakdown onto the primary series' months
///
/// Months come from `monthly`, not from the breakdown, so a resource with
/// no activity in a month still gets a 0 cell. With `cumulative` set each
/// resource carries its own running total across months.
pub fn group_by_resource(
    monthly: &[MonthlyPoint],
    breakdown: &[ResourceMonthlyPoint],
    metric: Metric,
    cumulative: bool,
) -> ResourceSeries {
    let resources = resource_order(breakdown);

    // First cell wins if the server ever repeats a (month, resource) pair
    let mut cells: HashMap<(&str, &str), &ResourceMonthlyPoint> = HashMap::new();
    for cell in breakdown {
        cells
            .entry((cell.month.as_str(), cell.resource_type.as_str()))
            .or_insert(cell);
    }

    let mut running = vec![0.0; resources.len()];

    let rows = distinct_months(monthly)
        .into_iter()
        .map(|month| {
            let values = resources
                .iter()
                .enumerate()
                .map(|(idx, resource)| {
                    let raw = cells
                        .get(&(month.as_str(), resource.as_str()))
                        .map(|cell| finite_or_zero(metric.select(cell.amount, cell.consumption)))
                        .unwrap_or(0.0);
                    running[idx] += raw;
                    let value = if cumulative { running[idx] } else { raw };
                    (resource.clone(), value)
                })
                .collect();

            ResourceRow { month, values }
        })
        .collect();

    ResourceSeries { resources, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(months: &[&str]) -> Vec<MonthlyPoint> {
        months.iter().map(|m| MonthlyPoint::new(*m, 0.0, 0.0)).collect()
    }

    fn breakdown() -> Vec<ResourceMonthlyPoint> {
        vec![
            ResourceMonthlyPoint::new("2024-01", "electricity", 120.0, 850.0),
            ResourceMonthlyPoint::new("2024-01", "gas", 40.0, 320.0),
            ResourceMonthlyPoint::new("2024-02", "electricity", 130.0, 920.0),
            ResourceMonthlyPoint::new("2024-03", "gas", 44.0, 350.0),
        ]
    }

    #[test]
    fn test_resource_order_is_first_appearance() {
        assert_eq!(resource_order(&breakdown()), vec!["electricity", "gas"]);
        assert!(resource_order(&[]).is_empty());
    }

    #[test]
    fn test_one_row_per_primary_month_with_zero_fill() {
        let grouped = group_by_resource(
            &monthly(&["2024-03", "2024-01", "2024-02"]),
            &breakdown(),
            Metric::Amount,
            false,
        );

        assert_eq!(grouped.rows.len(), 3);
        assert_eq!(grouped.rows[0].month, "2024-01");
        assert_eq!(grouped.rows[0].value("electricity"), Some(850.0));
        assert_eq!(grouped.rows[0].value("gas"), Some(320.0));
        // No gas reading in February: present, but zero
        assert_eq!(grouped.rows[1].value("gas"), Some(0.0));
        assert_eq!(grouped.rows[2].value("electricity"), Some(0.0));
        assert_eq!(grouped.rows[2].value("gas"), Some(350.0));
    }

    #[test]
    fn test_cumulative_runs_per_resource() {
        let grouped = group_by_resource(
            &monthly(&["2024-01", "2024-02", "2024-03"]),
            &breakdown(),
            Metric::Consumption,
            true,
        );

        assert_eq!(grouped.rows[1].value("electricity"), Some(250.0));
        assert_eq!(grouped.rows[1].value("gas"), Some(40.0));
        assert_eq!(grouped.rows[2].value("electricity"), Some(250.0));
        assert_eq!(grouped.rows[2].value("gas"), Some(84.0));
    }

    #[test]
    fn test_months_missing_from_primary_are_dropped() {
        let grouped = group_by_resource(&monthly(&["2024-02"]), &breakdown(), Metric::Amount, true);

        assert_eq!(grouped.rows.len(), 1);
        // January is outside the primary series and never accumulated
        assert_eq!(grouped.rows[0].value("electricity"), Some(920.0));
    }

    #[test]
    fn test_empty_breakdown_degenerates() {
        let grouped = group_by_resource(&monthly(&["2024-01"]), &[], Metric::Amount, false);
        assert!(grouped.is_empty());
        assert_eq!(grouped.rows.len(), 1);
        assert!(grouped.rows[0].values.is_empty());
    }
}
