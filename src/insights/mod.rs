//! Insight detection module
//!
//! Rule-based observations for the dashboard feed:
//! - Spike: amount up more than 18% on the previous month
//! - Anomaly: peak month above 1.35x the period mean
//! - Silence: meter without readings for more than 45 days

pub mod detector;
pub mod types;

pub use detector::detect_insights;
pub use types::{Insight, InsightThresholds, InsightType};
