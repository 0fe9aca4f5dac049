//! Insight types and detection thresholds

use serde::{Deserialize, Serialize};

/// Kinds of insight shown on the dashboard feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightType {
    /// Month-over-month amount jump above the spike ratio
    #[serde(rename = "Спайк")]
    Spike,
    /// Peak month well above the period mean
    #[serde(rename = "Аномалия")]
    Anomaly,
    /// Meter without a recent reading
    #[serde(rename = "Тишина")]
    Silence,
}

impl InsightType {
    /// Badge text for the insight card
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spike => "Спайк",
            Self::Anomaly => "Аномалия",
            Self::Silence => "Тишина",
        }
    }
}

/// A single detected insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub detail: String,
}

impl Insight {
    pub fn new(insight_type: InsightType, title: String, detail: String) -> Self {
        Self {
            insight_type,
            title,
            detail,
        }
    }
}

/// Thresholds for insight detection
#[derive(Debug, Clone, PartialEq)]
pub struct InsightThresholds {
    /// Relative month-over-month growth that counts as a spike (default: 0.18)
    pub spike_ratio: f64,
    /// Peak-to-mean multiplier for the anomaly rule (default: 1.35)
    pub anomaly_multiplier: f64,
    /// Days without readings before a meter is reported silent (default: 45)
    pub stale_after_days: i64,
    /// Maximum number of insights returned (default: 6)
    pub max_insights: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            spike_ratio: 0.18,
            anomaly_multiplier: 1.35,
            stale_after_days: 45,
            max_insights: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_type_labels() {
        assert_eq!(InsightType::Spike.label(), "Спайк");
        assert_eq!(InsightType::Anomaly.label(), "Аномалия");
        assert_eq!(InsightType::Silence.label(), "Тишина");
    }

    #[test]
    fn test_insight_serialization() {
        let insight = Insight::new(
            InsightType::Silence,
            "Нет данных по счётчику 4".to_string(),
            "Последняя запись 2025-01-31, прошло 60 дней".to_string(),
        );
        let json = serde_json::to_string(&insight).unwrap();
        assert!(json.contains("\"type\":\"Тишина\""));
        assert!(json.contains("\"title\":\"Нет данных по счётчику 4\""));

        let back: Insight = serde_json::from_str(&json).unwrap();
        assert_eq!(back, insight);
    }

    #[test]
    fn test_default_thresholds() {
        let t = InsightThresholds::default();
        assert_eq!(t.spike_ratio, 0.18);
        assert_eq!(t.anomaly_multiplier, 1.35);
        assert_eq!(t.stale_after_days, 45);
        assert_eq!(t.max_insights, 6);
    }
}
