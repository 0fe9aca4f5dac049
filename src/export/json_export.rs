//! JSON export functionality
//!
//! Writes the analytics view as a single pretty-printed report with the
//! parameters it was built from.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{ExportError, ExportableInsight, ExportableMover, ExportableSeriesRow};
use crate::commands::AnalyticsView;
use crate::models::{AnalyticsPeriod, Grouping, Metric};
use crate::trends::AverageDaily;

const EXPORT_VERSION: &str = "1.0.0";

/// Complete analytics export structure
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub period: AnalyticsPeriod,
    pub metric: Metric,
    pub grouping: Grouping,
    pub cumulative: bool,
    pub series: Vec<ExportableSeriesRow>,
    pub movers: Vec<ExportableMover>,
    pub insights: Vec<ExportableInsight>,
    pub summary: AnalyticsExportSummary,
}

/// Headline figures of the exported view
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsExportSummary {
    pub total_amount: f64,
    pub total_consumption: f64,
    pub average_daily: AverageDaily,
    pub forecast_amount: f64,
    pub peak_month: Option<String>,
}

impl AnalyticsExportJson {
    pub fn from_view(view: &AnalyticsView) -> Self {
        Self {
            export_date: chrono::Utc::now().to_rfc3339(),
            export_version: EXPORT_VERSION,
            period: view.period,
            metric: view.params.metric,
            grouping: view.params.grouping,
            cumulative: view.params.cumulative,
            series: ExportableSeriesRow::from_series(&view.explorer),
            movers: view.movers.iter().map(ExportableMover::from).collect(),
            insights: view.insights.iter().map(ExportableInsight::from).collect(),
            summary: AnalyticsExportSummary {
                total_amount: view.total_amount,
                total_consumption: view.total_consumption,
                average_daily: view.average_daily.clone(),
                forecast_amount: view.forecast_amount,
                peak_month: view.peak_month.clone(),
            },
        }
    }
}

/// Write the analytics view to a JSON report
pub fn write_analytics_json(view: &AnalyticsView, path: &Path) -> Result<(), ExportError> {
    let export = AnalyticsExportJson::from_view(view);
    let json = serde_json::to_string_pretty(&export)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}
