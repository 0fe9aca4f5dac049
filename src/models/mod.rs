//! Data models module
//!
//! Contains all data structures used throughout the application:
//! - Analytics payload types (monthly series, resource breakdown, summaries)
//! - Meter readings
//! - Caller-selected parameters and persisted configurations

pub mod config;
pub mod numeric;
pub mod reading;
pub mod series;

pub use config::{
    resource_label, FavoriteChartConfig, GoalConfig, Grouping, Metric, RangePreset, ResourceType,
};
pub use reading::Reading;
pub use series::{
    AnalyticsPeriod, AnalyticsResponse, AnalyticsSummary, ComparisonRow, MonthlyPoint,
    ResourceMonthlyPoint, ResourceSummary,
};
