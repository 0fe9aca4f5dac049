//! Caller-selected parameters
//!
//! Metric, grouping, range presets and the two persisted configuration
//! objects (goals and favorite widgets). The engine reads these by value and
//! never keeps them between calls.

use serde::{Deserialize, Serialize};

/// Which figure a view is built from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Charged amount in rubles
    #[default]
    Amount,
    /// Consumed volume in the meter's units
    Consumption,
}

impl Metric {
    /// Pick the field matching this metric
    pub fn select(&self, amount: f64, consumption: f64) -> f64 {
        match self {
            Metric::Amount => amount,
            Metric::Consumption => consumption,
        }
    }

    /// Unit shown next to per-day averages
    pub fn unit_label(&self) -> &'static str {
        match self {
            Metric::Amount => "₽",
            Metric::Consumption => "ед.",
        }
    }
}

/// How the explorer chart slices the series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// One line for the period total
    #[default]
    Total,
    /// One stacked bar per resource type
    Resource,
}

/// Date range presets offered by the analytics page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Quarter,
    Half,
    #[default]
    Year,
    Two,
}

impl RangePreset {
    /// Number of calendar months covered, current month included
    pub fn months(&self) -> i32 {
        match self {
            RangePreset::Quarter => 3,
            RangePreset::Half => 6,
            RangePreset::Year => 12,
            RangePreset::Two => 24,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::Quarter => "3 месяца",
            RangePreset::Half => "6 месяцев",
            RangePreset::Year => "Год",
            RangePreset::Two => "2 года",
        }
    }
}

/// Utility resources a meter can measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Electricity,
    ColdWater,
    HotWater,
    Gas,
    Heating,
}

impl ResourceType {
    /// Wire key used by the backend
    pub fn key(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::ColdWater => "cold_water",
            Self::HotWater => "hot_water",
            Self::Gas => "gas",
            Self::Heating => "heating",
        }
    }

    /// Display name for legends and cards
    pub fn label(&self) -> &'static str {
        match self {
            Self::Electricity => "Электричество",
            Self::ColdWater => "Холодная вода",
            Self::HotWater => "Горячая вода",
            Self::Gas => "Газ",
            Self::Heating => "Отопление",
        }
    }

    pub fn all() -> Vec<ResourceType> {
        vec![
            Self::Electricity,
            Self::ColdWater,
            Self::HotWater,
            Self::Gas,
            Self::Heating,
        ]
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|r| r.key() == s)
    }
}

/// Display name for a resource key; unknown keys are shown as-is
pub fn resource_label(key: &str) -> String {
    ResourceType::from_key(key)
        .map(|r| r.label().to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Per-property consumption goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub threshold: f64,
    #[serde(default)]
    pub metric: Metric,
}

impl GoalConfig {
    pub fn new(threshold: f64, metric: Metric) -> Self {
        Self { threshold, metric }
    }
}

/// A pinned analytics widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteChartConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<i64>,
    /// Empty string means "all resources"
    #[serde(default, alias = "resourceType")]
    pub resource_type: String,
    #[serde(default, alias = "rangePreset")]
    pub range_preset: RangePreset,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub grouping: Grouping,
}

impl FavoriteChartConfig {
    /// Subtitle resource label for the widget card
    pub fn resource_label(&self) -> String {
        if self.resource_type.is_empty() {
            "все ресурсы".to_string()
        } else {
            resource_label(&self.resource_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_select_and_labels() {
        assert_eq!(Metric::Amount.select(10.0, 2.0), 10.0);
        assert_eq!(Metric::Consumption.select(10.0, 2.0), 2.0);
        assert_eq!(Metric::Amount.unit_label(), "₽");
        assert_eq!(Metric::Consumption.unit_label(), "ед.");
    }

    #[test]
    fn test_command_line_values() {
        use clap::ValueEnum;

        assert_eq!(Metric::from_str("consumption", false), Ok(Metric::Consumption));
        assert_eq!(Metric::from_str("AMOUNT", true), Ok(Metric::Amount));
        assert!(Metric::from_str("volume", true).is_err());
        assert_eq!(Grouping::from_str("resource", false), Ok(Grouping::Resource));
        assert!(Grouping::from_str("", false).is_err());
        assert_eq!(RangePreset::from_str("half", false), Ok(RangePreset::Half));
        assert!(RangePreset::from_str("decade", false).is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Metric::default(), Metric::Amount);
        assert_eq!(Grouping::default(), Grouping::Total);
        assert_eq!(RangePreset::default(), RangePreset::Year);
    }

    #[test]
    fn test_range_preset_months() {
        use clap::ValueEnum;

        let months: Vec<i32> = RangePreset::value_variants().iter().map(|p| p.months()).collect();
        assert_eq!(months, vec![3, 6, 12, 24]);
        assert_eq!(RangePreset::Half.label(), "6 месяцев");
    }

    #[test]
    fn test_resource_labels() {
        assert_eq!(resource_label("cold_water"), "Холодная вода");
        assert_eq!(resource_label("solar"), "solar");
        assert_eq!(ResourceType::from_key("gas"), Some(ResourceType::Gas));
    }

    #[test]
    fn test_favorite_accepts_web_client_keys() {
        let favorite: FavoriteChartConfig = serde_json::from_str(
            r#"{"id": "1718000000000", "name": "Свет", "properties": [1, 2],
                "resourceType": "electricity", "rangePreset": "half",
                "metric": "consumption", "grouping": "resource"}"#,
        )
        .unwrap();

        assert_eq!(favorite.resource_type, "electricity");
        assert_eq!(favorite.range_preset, RangePreset::Half);
        assert_eq!(favorite.metric, Metric::Consumption);
        assert_eq!(favorite.grouping, Grouping::Resource);
        assert_eq!(favorite.resource_label(), "Электричество");
    }

    #[test]
    fn test_favorite_defaults_for_older_entries() {
        // Dashboard-era favorites carried no metric or grouping
        let favorite: FavoriteChartConfig = serde_json::from_str(
            r#"{"id": "1", "name": "Виджет 1", "properties": [3], "resourceType": "", "rangePreset": "two"}"#,
        )
        .unwrap();

        assert_eq!(favorite.metric, Metric::Amount);
        assert_eq!(favorite.grouping, Grouping::Total);
        assert_eq!(favorite.resource_label(), "все ресурсы");
    }

    #[test]
    fn test_goal_config_serialization() {
        let goal = GoalConfig::new(3000.0, Metric::Amount);
        let json = serde_json::to_string(&goal).unwrap();
        assert_eq!(json, r#"{"threshold":3000.0,"metric":"amount"}"#);
    }
}
