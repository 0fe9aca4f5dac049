//! Insight detection logic
//!
//! Rule-based checks over the monthly series and the recent readings list.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::types::{Insight, InsightThresholds, InsightType};
use crate::models::numeric::finite_or_zero;
use crate::models::{MonthlyPoint, Reading};
use crate::trends::cumulative::order_by_month;
use crate::trends::period::format_month;

/// Detect insights for the dashboard feed
///
/// Order is fixed: spikes in month order, at most one anomaly, then silent
/// meters by ascending meter id. Truncation to `max_insights` happens after
/// concatenation, so spikes crowd out later entries.
pub fn detect_insights(
    monthly: &[MonthlyPoint],
    readings: &[Reading],
    today: NaiveDate,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let ordered = order_by_month(monthly);
    insights.extend(detect_spikes(&ordered, thresholds));
    insights.extend(detect_anomaly(&ordered, thresholds));
    insights.extend(detect_silent_meters(readings, today, thresholds));

    let detected = insights.len();
    insights.truncate(thresholds.max_insights);

    tracing::debug!(
        "Detected {} insights, keeping {}",
        detected,
        insights.len()
    );

    insights
}

/// Spike: amount grew by more than `spike_ratio` over the previous month
///
/// Expects `ordered` sorted by month. A zero previous amount never spikes.
fn detect_spikes(ordered: &[MonthlyPoint], thresholds: &InsightThresholds) -> Vec<Insight> {
    ordered
        .windows(2)
        .filter_map(|pair| {
            let previous = finite_or_zero(pair[0].total_amount);
            let current = finite_or_zero(pair[1].total_amount);
            if previous == 0.0 {
                return None;
            }

            let ratio = (current - previous) / previous;
            if ratio <= thresholds.spike_ratio {
                return None;
            }

            Some(Insight::new(
                InsightType::Spike,
                format!(
                    "{}: +{:.1}% к предыдущему месяцу",
                    format_month(&pair[1].month),
                    ratio * 100.0
                ),
                format!("Сумма {:.2} ₽ против {:.2} ₽", current, previous),
            ))
        })
        .collect()
}

/// Anomaly: the peak month exceeds `anomaly_multiplier` times the mean
fn detect_anomaly(ordered: &[MonthlyPoint], thresholds: &InsightThresholds) -> Option<Insight> {
    let first = ordered.first()?;

    let total: f64 = ordered.iter().map(|m| finite_or_zero(m.total_amount)).sum();
    let average = total / ordered.len() as f64;

    // Earliest month wins ties
    let peak = ordered.iter().fold(first, |acc, cur| {
        if finite_or_zero(cur.total_amount) > finite_or_zero(acc.total_amount) {
            cur
        } else {
            acc
        }
    });
    let peak_amount = finite_or_zero(peak.total_amount);

    if peak_amount <= average * thresholds.anomaly_multiplier {
        return None;
    }

    Some(Insight::new(
        InsightType::Anomaly,
        format!("{} выше среднего", format_month(&peak.month)),
        format!(
            "Среднее {:.2} ₽, всплеск до {:.2} ₽",
            average, peak_amount
        ),
    ))
}

/// Silence: a meter's latest reading is older than `stale_after_days`
///
/// The first reading seen for a meter is taken as its latest. The readings
/// endpoint lists newest first, and the list is not re-scanned for a later
/// date.
fn detect_silent_meters(
    readings: &[Reading],
    today: NaiveDate,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let mut latest_by_meter: BTreeMap<i64, &Reading> = BTreeMap::new();
    for reading in readings {
        latest_by_meter.entry(reading.meter_id).or_insert(reading);
    }

    latest_by_meter
        .into_iter()
        .filter_map(|(meter_id, reading)| {
            let Some(date) = reading.date() else {
                tracing::warn!(
                    "Skipping meter {}: unparsable reading date {:?}",
                    meter_id,
                    reading.reading_date
                );
                return None;
            };

            let days = (today - date).num_days();
            if days <= thresholds.stale_after_days {
                return None;
            }

            Some(Insight::new(
                InsightType::Silence,
                format!("Нет данных по счётчику {}", meter_id),
                format!(
                    "Последняя запись {}, прошло {} дней",
                    reading.reading_date, days
                ),
            ))
        })
        .collect()
}
