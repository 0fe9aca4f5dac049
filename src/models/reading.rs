//! Meter reading type
//!
//! Readings only feed the recency checks; totals always come from the server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::numeric::{lenient_f64, lenient_i64, lenient_opt_f64};

/// A single meter reading as listed by the readings endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    /// The list endpoint names this field `meter`
    #[serde(alias = "meter", deserialize_with = "lenient_i64")]
    pub meter_id: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
    /// Date in YYYY-MM-DD format
    pub reading_date: String,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub amount_value: Option<f64>,
}

impl Reading {
    pub fn new(id: i64, meter_id: i64, value: f64, reading_date: impl Into<String>) -> Self {
        Self {
            id,
            meter_id,
            value,
            reading_date: reading_date.into(),
            amount_value: None,
        }
    }

    /// Parsed reading date, `None` when the string is not YYYY-MM-DD
    pub fn date(&self) -> Option<NaiveDate> {
        let date_part = self.reading_date.get(..10)?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}
