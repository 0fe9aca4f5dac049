//! View assembly and configuration commands
//!
//! Each function bundles everything one render pass needs. The view
//! builders are pure; the favorite and goal commands go through an
//! injected `KeyValueStore`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::export::{
    csv_export, generate_export_filename, json_export, ExportFormat,
};
use crate::goals::{evaluate_goal, GoalStatus};
use crate::insights::{detect_insights, Insight, InsightThresholds};
use crate::models::{
    resource_label, AnalyticsPeriod, AnalyticsResponse, ComparisonRow, FavoriteChartConfig,
    GoalConfig, Grouping, Metric, Reading,
};
use crate::store::favorites::DASHBOARD_FAVORITES;
use crate::store::{FavoriteDraft, FavoritesRepository, GoalsRepository, KeyValueStore};
use crate::trends::cumulative::with_cumulative;
use crate::trends::movers::top_movers;
use crate::trends::period::{average_per_day, month_key, shifted_month_key};
use crate::trends::{
    build_explorer_series, month_over_month, peak_month, AverageDaily, CumulativePoint,
    ExplorerSeries, MonthOverMonth, Mover,
};
use crate::CommandError;

// ============================================================================
// Response Types
// ============================================================================

/// Caller-selected chart parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsParams {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub grouping: Grouping,
    #[serde(default)]
    pub cumulative: bool,
}

/// Per-resource total card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCard {
    pub resource_type: String,
    pub label: String,
    /// Selected metric total
    pub value: f64,
    /// "₽" for amounts, the meter unit (possibly empty) for consumption
    pub unit: String,
}

/// Everything the analytics page renders for one parameter selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub period: AnalyticsPeriod,
    pub params: AnalyticsParams,
    pub total_amount: f64,
    pub total_consumption: f64,
    pub average_daily: AverageDaily,
    pub forecast_amount: f64,
    pub explorer: ExplorerSeries,
    pub cumulative: Vec<CumulativePoint>,
    pub movers: Vec<Mover>,
    pub resources: Vec<ResourceCard>,
    pub comparison: Vec<ComparisonRow>,
    pub peak_month: Option<String>,
    pub insights: Vec<Insight>,
}

/// A pinned widget with its chart data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritePreview {
    pub favorite: FavoriteChartConfig,
    pub resource_label: String,
    pub range_label: String,
    pub series: ExplorerSeries,
}

/// Everything the dashboard renders for the selected property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub forecast_amount: f64,
    pub month_over_month: MonthOverMonth,
    pub insights: Vec<Insight>,
    pub goal: Option<GoalConfig>,
    pub goal_status: Option<GoalStatus>,
    pub favorites: Vec<FavoriteChartConfig>,
}

// ============================================================================
// View Builders
// ============================================================================

/// Assemble the analytics page
pub fn build_analytics_view(
    payload: &AnalyticsResponse,
    params: AnalyticsParams,
    readings: &[Reading],
    today: NaiveDate,
    thresholds: &InsightThresholds,
) -> AnalyticsView {
    let summary = &payload.summary;

    let average_daily = average_per_day(
        &payload.period,
        summary.total_amount,
        summary.total_consumption,
        params.metric,
        summary.average_daily_amount,
    );

    let resources = payload
        .resources()
        .iter()
        .map(|r| ResourceCard {
            resource_type: r.resource_type.clone(),
            label: resource_label(&r.resource_type),
            value: params.metric.select(r.total_amount, r.total_consumption),
            unit: match params.metric {
                Metric::Amount => Metric::Amount.unit_label().to_string(),
                Metric::Consumption => r.unit.clone().unwrap_or_default(),
            },
        })
        .collect();

    let peak = summary
        .peak_month
        .clone()
        .filter(|m| !m.is_empty())
        .or_else(|| peak_month(&payload.monthly));

    let view = AnalyticsView {
        period: payload.period,
        params,
        total_amount: summary.total_amount,
        total_consumption: summary.total_consumption,
        average_daily,
        forecast_amount: payload.forecast_amount,
        explorer: build_explorer_series(payload, params.grouping, params.metric, params.cumulative),
        cumulative: with_cumulative(&payload.monthly),
        movers: top_movers(&payload.monthly, params.metric),
        resources,
        comparison: payload.comparison.clone(),
        peak_month: peak,
        insights: detect_insights(&payload.monthly, readings, today, thresholds),
    };

    tracing::debug!(
        "Built analytics view: {} months, {} movers, {} insights",
        payload.monthly.len(),
        view.movers.len(),
        view.insights.len()
    );

    view
}

/// Chart data for a pinned widget, always non-cumulative
pub fn favorite_preview(payload: &AnalyticsResponse, favorite: &FavoriteChartConfig) -> FavoritePreview {
    FavoritePreview {
        resource_label: favorite.resource_label(),
        range_label: favorite.range_preset.label().to_string(),
        series: build_explorer_series(payload, favorite.grouping, favorite.metric, false),
        favorite: favorite.clone(),
    }
}

/// Assemble the dashboard
///
/// `payload` is `None` while charges have not loaded; the goal status is
/// absent in that case and month figures read as zero.
pub fn build_dashboard_view(
    payload: Option<&AnalyticsResponse>,
    readings: &[Reading],
    goal: Option<&GoalConfig>,
    favorites: &[FavoriteChartConfig],
    today: NaiveDate,
    thresholds: &InsightThresholds,
) -> DashboardView {
    let current = month_key(today);
    let previous = shifted_month_key(today, -1);

    let monthly = payload.map(|p| p.monthly.as_slice());
    let series = monthly.unwrap_or(&[]);

    DashboardView {
        forecast_amount: payload.map(|p| p.forecast_amount).unwrap_or(0.0),
        month_over_month: month_over_month(series, &current, &previous),
        insights: detect_insights(series, readings, today, thresholds),
        goal: goal.copied(),
        goal_status: evaluate_goal(goal, monthly, &current),
        favorites: favorites.iter().take(DASHBOARD_FAVORITES).cloned().collect(),
    }
}

// ============================================================================
// Favorite Commands
// ============================================================================

/// List saved favorites
pub fn list_favorites(store: &dyn KeyValueStore) -> Result<Vec<FavoriteChartConfig>, CommandError> {
    Ok(FavoritesRepository::new(store).load()?)
}

/// Save the current chart settings as a favorite
pub fn save_favorite(
    store: &dyn KeyValueStore,
    draft: FavoriteDraft,
) -> Result<FavoriteChartConfig, CommandError> {
    if draft.properties.is_empty() {
        return Err(CommandError::InvalidArgument(
            "select at least one property before saving a favorite".to_string(),
        ));
    }

    let favorite = FavoritesRepository::new(store).add(draft)?;
    tracing::info!("Pinned favorite '{}'", favorite.name);
    Ok(favorite)
}

/// Remove a favorite by id
pub fn remove_favorite(store: &dyn KeyValueStore, id: &str) -> Result<(), CommandError> {
    if !FavoritesRepository::new(store).remove(id)? {
        return Err(CommandError::NotFound(format!("favorite {}", id)));
    }
    Ok(())
}

// ============================================================================
// Goal Commands
// ============================================================================

/// Goal configured for a property
pub fn get_goal(store: &dyn KeyValueStore, property_id: i64) -> Result<Option<GoalConfig>, CommandError> {
    Ok(GoalsRepository::new(store).goal_for(property_id)?)
}

/// Create or replace a property's goal
pub fn update_goal(
    store: &dyn KeyValueStore,
    property_id: i64,
    threshold: f64,
    metric: Metric,
) -> Result<GoalConfig, CommandError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(CommandError::InvalidArgument(format!(
            "goal threshold must be a non-negative number, got {}",
            threshold
        )));
    }

    let goal = GoalConfig::new(threshold, metric);
    GoalsRepository::new(store).set_goal(property_id, goal)?;
    tracing::info!("Goal for property {} set to {} ({:?})", property_id, threshold, metric);
    Ok(goal)
}

/// Drop a property's goal
pub fn clear_goal(store: &dyn KeyValueStore, property_id: i64) -> Result<(), CommandError> {
    if !GoalsRepository::new(store).clear_goal(property_id)? {
        return Err(CommandError::NotFound(format!("goal for property {}", property_id)));
    }
    Ok(())
}

// ============================================================================
// Export Commands
// ============================================================================

/// Write an analytics view to `dir` and return the created file
pub fn export_analytics(
    view: &AnalyticsView,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, CommandError> {
    std::fs::create_dir_all(dir).map_err(crate::export::ExportError::from)?;

    let filename = generate_export_filename("energoboard_analytics", format.extension());
    let export_path = dir.join(&filename);

    match format {
        ExportFormat::Csv => csv_export::write_analytics_csv(view, &export_path)?,
        ExportFormat::Json => json_export::write_analytics_json(view, &export_path)?,
    }

    tracing::info!("Exported analytics to {:?}", export_path);
    Ok(export_path)
}

// ============================================================================
// Tests
// ============================================================================
