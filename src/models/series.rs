//! Analytics payload types
//!
//! Shapes returned by the analytics endpoint. Everything here is already
//! aggregated server-side; the engine only reorders and derives.

use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_i64, lenient_opt_f64};

/// One calendar month's aggregate for the selected properties/resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Month in YYYY-MM format
    pub month: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_consumption: f64,
    /// Running total as computed by the server, when it sends one
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub cumulative_amount: Option<f64>,
}

impl MonthlyPoint {
    pub fn new(month: impl Into<String>, total_amount: f64, total_consumption: f64) -> Self {
        Self {
            month: month.into(),
            total_amount,
            total_consumption,
            cumulative_amount: None,
        }
    }
}

/// One (month, resource) cell of the breakdown matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMonthlyPoint {
    pub month: String,
    pub resource_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub consumption: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

impl ResourceMonthlyPoint {
    pub fn new(
        month: impl Into<String>,
        resource_type: impl Into<String>,
        consumption: f64,
        amount: f64,
    ) -> Self {
        Self {
            month: month.into(),
            resource_type: resource_type.into(),
            consumption,
            amount,
        }
    }
}

/// Per-resource totals over the whole period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub resource_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_consumption: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Per-property totals when several properties are compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(alias = "property__id", deserialize_with = "lenient_i64")]
    pub property_id: i64,
    #[serde(alias = "property__name", default)]
    pub property_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_consumption: f64,
}

/// Inclusive calendar-month range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPeriod {
    pub start_year: i32,
    pub start_month: i32,
    pub end_year: i32,
    pub end_month: i32,
}

impl AnalyticsPeriod {
    pub fn new(start_year: i32, start_month: i32, end_year: i32, end_month: i32) -> Self {
        Self {
            start_year,
            start_month,
            end_year,
            end_month,
        }
    }
}

/// Period-level summary block of the analytics payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_consumption: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub average_daily_amount: Option<f64>,
    #[serde(default)]
    pub peak_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<ResourceSummary>>,
}

/// Full analytics payload for one parameter selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub period: AnalyticsPeriod,
    #[serde(default)]
    pub monthly: Vec<MonthlyPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_by_resource: Option<Vec<ResourceMonthlyPoint>>,
    #[serde(default)]
    pub summary: AnalyticsSummary,
    #[serde(default)]
    pub comparison: Vec<ComparisonRow>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub forecast_amount: f64,
}

impl AnalyticsResponse {
    /// Resource breakdown, empty when the server omitted it
    pub fn breakdown(&self) -> &[ResourceMonthlyPoint] {
        self.monthly_by_resource.as_deref().unwrap_or(&[])
    }

    /// Resource summaries, empty when the server omitted them
    pub fn resources(&self) -> &[ResourceSummary] {
        self.summary.resources.as_deref().unwrap_or(&[])
    }
}
