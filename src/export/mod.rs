//! Export module for CSV and JSON export functionality
//!
//! Flattens an analytics view (explorer series, movers, insights) into
//! records and writes them as CSV or as a pretty-printed JSON report.

pub mod csv_export;
pub mod json_export;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::insights::Insight;
use crate::trends::{ExplorerSeries, Mover};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One value of the explorer chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableSeriesRow {
    pub month: String,
    /// "total" or a resource type key
    pub series: String,
    pub value: f64,
}

impl ExportableSeriesRow {
    /// Flatten a chart series into month-major rows
    pub fn from_series(series: &ExplorerSeries) -> Vec<Self> {
        match series {
            ExplorerSeries::Total { points } => points
                .iter()
                .map(|p| Self {
                    month: p.month.clone(),
                    series: "total".to_string(),
                    value: p.value,
                })
                .collect(),
            ExplorerSeries::ByResource { rows, .. } => rows
                .iter()
                .flat_map(|row| {
                    row.values.iter().map(move |(resource, value)| Self {
                        month: row.month.clone(),
                        series: resource.clone(),
                        value: *value,
                    })
                })
                .collect(),
        }
    }
}

/// Exportable mover record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableMover {
    pub month: String,
    pub change_percent: f64,
}

impl From<&Mover> for ExportableMover {
    fn from(mover: &Mover) -> Self {
        Self {
            month: mover.label.clone(),
            change_percent: mover.change_percent,
        }
    }
}

/// Exportable insight record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableInsight {
    #[serde(rename = "type")]
    pub insight_type: String,
    pub title: String,
    pub detail: String,
}

impl From<&Insight> for ExportableInsight {
    fn from(insight: &Insight) -> Self {
        Self {
            insight_type: insight.insight_type.label().to_string(),
            title: insight.title.clone(),
            detail: insight.detail.clone(),
        }
    }
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}
