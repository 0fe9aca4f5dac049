//! Trend derivation module
//!
//! This module turns the server's monthly series into chart-ready views:
//! - Chronological ordering with running cumulative totals
//! - Per-resource pivot for stacked charts
//! - Month-over-month movers
//! - Calendar-aware average per day

pub mod cumulative;
pub mod movers;
pub mod period;
pub mod resource;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::numeric::finite_or_zero;
use crate::models::{AnalyticsResponse, Grouping, Metric, MonthlyPoint};

/// Maximum number of movers shown in the "sharpest changes" table
pub const MOVER_LIMIT: usize = 4;

/// A monthly point with running totals attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Month in YYYY-MM format
    pub month: String,
    pub total_amount: f64,
    pub total_consumption: f64,
    pub cumulative_amount: f64,
    pub cumulative_consumption: f64,
}

impl CumulativePoint {
    /// Raw or running value of the selected metric
    pub fn value(&self, metric: Metric, cumulative: bool) -> f64 {
        if cumulative {
            metric.select(self.cumulative_amount, self.cumulative_consumption)
        } else {
            metric.select(self.total_amount, self.total_consumption)
        }
    }
}

/// Single-line chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub month: String,
    pub value: f64,
}

/// One month of the per-resource pivot
///
/// Serializes flat (`{"month": "2024-01", "gas": 320.0, ...}`) so chart
/// libraries can use resource keys directly as data keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    pub month: String,
    /// (resource_type, value) in resource order
    pub values: Vec<(String, f64)>,
}

impl ResourceRow {
    pub fn value(&self, resource_type: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(r, _)| r == resource_type)
            .map(|(_, v)| *v)
    }
}

impl Serialize for ResourceRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("month", &self.month)?;
        for (resource, value) in &self.values {
            map.serialize_entry(resource, value)?;
        }
        map.end()
    }
}

/// Per-resource pivot with its column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSeries {
    pub resources: Vec<String>,
    pub rows: Vec<ResourceRow>,
}

impl ResourceSeries {
    /// True when the breakdown had no resources at all
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// What the explorer chart renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorerSeries {
    Total { points: Vec<SeriesPoint> },
    ByResource { resources: Vec<String>, rows: Vec<ResourceRow> },
}

impl ExplorerSeries {
    pub fn len(&self) -> usize {
        match self {
            ExplorerSeries::Total { points } => points.len(),
            ExplorerSeries::ByResource { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Month-over-month change entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    /// Month in YYYY-MM format
    pub label: String,
    pub change_percent: f64,
}

/// Average per calendar day of the selected period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageDaily {
    pub value: f64,
    pub unit_label: String,
    pub day_count: i64,
}

/// Current vs previous month amount card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverMonth {
    pub current_month: String,
    pub previous_month: String,
    pub current_amount: f64,
    pub previous_amount: f64,
    pub delta: f64,
}

/// Build the explorer chart series
///
/// Resource grouping is used only when the payload carries a non-empty
/// breakdown; otherwise the chart falls back to the total line.
pub fn build_explorer_series(
    payload: &AnalyticsResponse,
    grouping: Grouping,
    metric: Metric,
    cumulative: bool,
) -> ExplorerSeries {
    if grouping == Grouping::Resource {
        let grouped =
            resource::group_by_resource(&payload.monthly, payload.breakdown(), metric, cumulative);
        if !grouped.is_empty() {
            return ExplorerSeries::ByResource {
                resources: grouped.resources,
                rows: grouped.rows,
            };
        }
        tracing::debug!("Resource grouping requested without breakdown, using totals");
    }

    let points = cumulative::with_cumulative(&payload.monthly)
        .into_iter()
        .map(|p| SeriesPoint {
            value: p.value(metric, cumulative),
            month: p.month,
        })
        .collect();

    ExplorerSeries::Total { points }
}

/// Amount charged in `month`, 0 when the month is absent
pub fn amount_for_month(monthly: &[MonthlyPoint], month: &str) -> f64 {
    monthly
        .iter()
        .find(|p| p.month == month)
        .map(|p| finite_or_zero(p.total_amount))
        .unwrap_or(0.0)
}

/// Month with the highest amount; the earliest one wins ties
pub fn peak_month(monthly: &[MonthlyPoint]) -> Option<String> {
    let ordered = cumulative::order_by_month(monthly);
    let mut peak: Option<&MonthlyPoint> = None;
    for point in &ordered {
        match peak {
            Some(current) if finite_or_zero(point.total_amount) <= finite_or_zero(current.total_amount) => {}
            _ => peak = Some(point),
        }
    }
    peak.map(|p| p.month.clone())
}

/// Difference between this month's and last month's amount
pub fn month_over_month(
    monthly: &[MonthlyPoint],
    current_month: &str,
    previous_month: &str,
) -> MonthOverMonth {
    let current_amount = amount_for_month(monthly, current_month);
    let previous_amount = amount_for_month(monthly, previous_month);

    MonthOverMonth {
        current_month: current_month.to_string(),
        previous_month: previous_month.to_string(),
        current_amount,
        previous_amount,
        delta: current_amount - previous_amount,
    }
}
