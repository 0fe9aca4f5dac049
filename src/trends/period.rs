//! Calendar period calculations
//!
//! Month keys, range presets and the average-per-day figure.

use chrono::{Datelike, NaiveDate};

use super::AverageDaily;
use crate::models::numeric::finite_or_zero;
use crate::models::{AnalyticsPeriod, Metric, RangePreset};

/// Get the month identifier (YYYY-MM) for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Short `MM.YY` label used in insight titles
///
/// Keys that are not `YYYY-MM` are returned unchanged.
pub fn format_month(month: &str) -> String {
    let short = month.split_once('-').and_then(|(year, mm)| {
        let yy = year.get(year.len().checked_sub(2)?..)?;
        (!mm.is_empty()).then(|| format!("{}.{}", mm, yy))
    });
    short.unwrap_or_else(|| month.to_string())
}

/// Split a zero-based month index into a year and a 1-based month
fn split_month_index(index: i64) -> (i64, u32) {
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

fn month_index(year: i32, month: i32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Fold an out-of-range month into the neighbouring years
///
/// `(2024, 0)` becomes `(2023, 12)`, `(2024, 13)` becomes `(2025, 1)`.
/// `None` when the resulting year does not fit an `i32`.
pub fn normalize_month(year: i32, month: i32) -> Option<(i32, u32)> {
    let (year, month) = split_month_index(month_index(year, month));
    Some((i32::try_from(year).ok()?, month))
}

/// Key of the month `offset` months away from `date`'s month
pub fn shifted_month_key(date: NaiveDate, offset: i32) -> String {
    let (year, month) = split_month_index(month_index(date.year(), date.month() as i32) + i64::from(offset));
    format!("{:04}-{:02}", year, month)
}

/// Get the first day of a (possibly out-of-range) month
pub fn month_start(year: i32, month: i32) -> Option<NaiveDate> {
    let (year, month) = normalize_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Get the last day of a (possibly out-of-range) month
pub fn month_end(year: i32, month: i32) -> Option<NaiveDate> {
    let (next_year, next_month) = split_month_index(month_index(year, month) + 1);
    NaiveDate::from_ymd_opt(i32::try_from(next_year).ok()?, next_month, 1)?.pred_opt()
}

impl AnalyticsPeriod {
    /// Period covering `preset.months()` calendar months ending with `today`'s month
    pub fn from_preset(preset: RangePreset, today: NaiveDate) -> Self {
        let (start_year, start_month) =
            normalize_month(today.year(), today.month() as i32 - (preset.months() - 1))
                .unwrap_or((today.year(), today.month()));
        Self {
            start_year,
            start_month: start_month as i32,
            end_year: today.year(),
            end_month: today.month() as i32,
        }
    }

    /// First day of the start month
    pub fn start_date(&self) -> Option<NaiveDate> {
        month_start(self.start_year, self.start_month)
    }

    /// Last day of the end month
    pub fn end_date(&self) -> Option<NaiveDate> {
        month_end(self.end_year, self.end_month)
    }

    /// Inclusive number of calendar days in the period, never below 1
    pub fn day_count(&self) -> i64 {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => ((end - start).num_days() + 1).max(1),
            _ => 1,
        }
    }
}

/// Average per calendar day of the period for the selected metric
///
/// The server's own daily amount average is trusted when present; the
/// consumption average is always derived.
pub fn average_per_day(
    period: &AnalyticsPeriod,
    total_amount: f64,
    total_consumption: f64,
    metric: Metric,
    server_average_amount: Option<f64>,
) -> AverageDaily {
    let day_count = period.day_count();
    let days = day_count as f64;

    let value = match metric {
        Metric::Amount => server_average_amount
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| finite_or_zero(total_amount) / days),
        Metric::Consumption => finite_or_zero(total_consumption) / days,
    };

    AverageDaily {
        value: finite_or_zero(value),
        unit_label: metric.unit_label().to_string(),
        day_count,
    }
}
