//! CSV export functionality

use std::path::Path;

use csv::Writer;
use serde::Serialize;

use super::{ExportError, ExportableInsight, ExportableMover, ExportableSeriesRow};
use crate::commands::AnalyticsView;

/// Combined record so one file carries every section of the view
#[derive(Debug, Serialize)]
struct AnalyticsRecord<'a> {
    section: &'static str,
    month: Option<&'a str>,
    series: Option<&'a str>,
    value: Option<f64>,
    title: Option<&'a str>,
    detail: Option<&'a str>,
}

/// Write series, movers and insights to a single CSV
///
/// Rows are tagged with a `section` column (`series`, `mover`, `insight`)
/// and unused columns are left empty.
pub fn write_analytics_csv(view: &AnalyticsView, path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;

    let series = ExportableSeriesRow::from_series(&view.explorer);
    for row in &series {
        writer.serialize(AnalyticsRecord {
            section: "series",
            month: Some(&row.month),
            series: Some(&row.series),
            value: Some(row.value),
            title: None,
            detail: None,
        })?;
    }

    let movers: Vec<ExportableMover> = view.movers.iter().map(ExportableMover::from).collect();
    for mover in &movers {
        writer.serialize(AnalyticsRecord {
            section: "mover",
            month: Some(&mover.month),
            series: None,
            value: Some(mover.change_percent),
            title: None,
            detail: None,
        })?;
    }

    let insights: Vec<ExportableInsight> = view.insights.iter().map(ExportableInsight::from).collect();
    for insight in &insights {
        writer.serialize(AnalyticsRecord {
            section: "insight",
            month: None,
            series: Some(&insight.insight_type),
            value: None,
            title: Some(&insight.title),
            detail: Some(&insight.detail),
        })?;
    }

    writer.flush()?;

    tracing::debug!(
        "Wrote {} series rows, {} movers, {} insights to {:?}",
        series.len(),
        movers.len(),
        insights.len(),
        path
    );

    Ok(())
}
