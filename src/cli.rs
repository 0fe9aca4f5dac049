//! Command-line front end
//!
//! Reads saved payloads from disk, prints assembled views as JSON and
//! manages the persisted favorites and goals.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::commands::{
    build_analytics_view, build_dashboard_view, clear_goal, export_analytics, favorite_preview,
    get_goal, list_favorites, remove_favorite, save_favorite, update_goal, AnalyticsParams,
    AnalyticsView, DashboardView, FavoritePreview,
};
use crate::export::{get_export_directory, ExportFormat};
use crate::insights::InsightThresholds;
use crate::models::{AnalyticsResponse, Grouping, Metric, RangePreset, Reading};
use crate::store::{default_store_path, FavoriteDraft, SqliteStore};
use crate::CommandError;

/// Utility consumption analytics
#[derive(Parser, Debug)]
#[command(name = "energoboard")]
#[command(about = "Derive charts, movers, insights and goal status from analytics payloads")]
#[command(version)]
pub struct Cli {
    /// Log debug output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Key-value store file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the analytics view for a saved payload
    Analyze(AnalyzeCommand),
    /// Manage pinned analytics widgets
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Manage per-property goals
    #[command(subcommand)]
    Goal(GoalCommand),
}

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Analytics payload JSON as returned by the backend
    #[arg(long)]
    payload: PathBuf,

    /// Readings JSON array, most recent first
    #[arg(long)]
    readings: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Metric::Amount)]
    metric: Metric,

    #[arg(long, value_enum, default_value_t = Grouping::Total)]
    grouping: Grouping,

    /// Show running totals instead of monthly values
    #[arg(long)]
    cumulative: bool,

    /// Reference date (YYYY-MM-DD), defaults to the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Also build the dashboard for this property
    #[arg(long)]
    property: Option<i64>,

    /// Write the view to a file as well
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Export directory (defaults to Downloads)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    /// Print saved favorites
    List,
    /// Save a widget configuration
    Add {
        #[arg(long, default_value = "")]
        name: String,
        /// Property ids (repeatable)
        #[arg(long = "property", required = true)]
        properties: Vec<i64>,
        /// Resource type key, empty for all resources
        #[arg(long, default_value = "")]
        resource: String,
        #[arg(long, value_enum, default_value_t = RangePreset::Year)]
        range: RangePreset,
        #[arg(long, value_enum, default_value_t = Metric::Amount)]
        metric: Metric,
        #[arg(long, value_enum, default_value_t = Grouping::Total)]
        grouping: Grouping,
    },
    /// Remove a widget by id
    Remove { id: String },
    /// Render a widget's chart from a saved payload
    Preview {
        id: String,
        #[arg(long)]
        payload: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Create or replace a property's goal
    Set {
        #[arg(long)]
        property: i64,
        #[arg(long)]
        threshold: f64,
        #[arg(long, value_enum, default_value_t = Metric::Amount)]
        metric: Metric,
    },
    /// Remove a property's goal
    Clear {
        #[arg(long)]
        property: i64,
    },
    /// Print a property's goal
    Show {
        #[arg(long)]
        property: i64,
    },
}

/// Analyze output when a property dashboard is requested too
#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    analytics: &'a AnalyticsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard: Option<DashboardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_path: Option<String>,
}

pub fn run() -> Result<(), CommandError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store_path = cli.store.clone().unwrap_or_else(default_store_path);

    match cli.command {
        Commands::Analyze(command) => command.run(&store_path),
        Commands::Favorites(command) => command.run(&store_path),
        Commands::Goal(command) => command.run(&store_path),
    }
}

/// Install the log subscriber; `--verbose` lowers the level to debug
pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

impl AnalyzeCommand {
    pub fn run(&self, store_path: &Path) -> Result<(), CommandError> {
        let payload: AnalyticsResponse = read_json(&self.payload)?;
        let readings: Vec<Reading> = match &self.readings {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };
        let today = self.today.unwrap_or_else(|| chrono::Local::now().date_naive());
        let thresholds = InsightThresholds::default();

        info!(
            "Analyzing {} months and {} readings as of {}",
            payload.monthly.len(),
            readings.len(),
            today
        );

        let params = AnalyticsParams {
            metric: self.metric,
            grouping: self.grouping,
            cumulative: self.cumulative,
        };
        let view = build_analytics_view(&payload, params, &readings, today, &thresholds);

        let dashboard = match self.property {
            Some(property_id) => {
                let store = open_store(store_path)?;
                let goal = get_goal(&store, property_id)?;
                let favorites = list_favorites(&store)?;
                Some(build_dashboard_view(
                    Some(&payload),
                    &readings,
                    goal.as_ref(),
                    &favorites,
                    today,
                    &thresholds,
                ))
            }
            None => None,
        };

        let export_path = match self.export {
            Some(format) => {
                let dir = self.out.clone().unwrap_or_else(get_export_directory);
                let path = export_analytics(&view, format, &dir)?;
                Some(path.display().to_string())
            }
            None => None,
        };

        print_json(&AnalyzeOutput {
            analytics: &view,
            dashboard,
            export_path,
        })
    }
}

impl FavoritesCommand {
    pub fn run(&self, store_path: &Path) -> Result<(), CommandError> {
        let store = open_store(store_path)?;

        match self {
            FavoritesCommand::List => print_json(&list_favorites(&store)?),
            FavoritesCommand::Add {
                name,
                properties,
                resource,
                range,
                metric,
                grouping,
            } => {
                let draft = FavoriteDraft {
                    name: name.clone(),
                    properties: properties.clone(),
                    resource_type: resource.clone(),
                    range_preset: *range,
                    metric: *metric,
                    grouping: *grouping,
                };
                print_json(&save_favorite(&store, draft)?)
            }
            FavoritesCommand::Remove { id } => {
                remove_favorite(&store, id)?;
                info!("Removed favorite {}", id);
                Ok(())
            }
            FavoritesCommand::Preview { id, payload } => {
                let favorites = list_favorites(&store)?;
                let favorite = favorites
                    .iter()
                    .find(|f| &f.id == id)
                    .ok_or_else(|| CommandError::NotFound(format!("favorite {}", id)))?;
                let payload: AnalyticsResponse = read_json(payload)?;
                let preview: FavoritePreview = favorite_preview(&payload, favorite);
                print_json(&preview)
            }
        }
    }
}

impl GoalCommand {
    pub fn run(&self, store_path: &Path) -> Result<(), CommandError> {
        let store = open_store(store_path)?;

        match self {
            GoalCommand::Set {
                property,
                threshold,
                metric,
            } => print_json(&update_goal(&store, *property, *threshold, *metric)?),
            GoalCommand::Clear { property } => {
                clear_goal(&store, *property)?;
                info!("Cleared goal for property {}", property);
                Ok(())
            }
            GoalCommand::Show { property } => match get_goal(&store, *property)? {
                Some(goal) => print_json(&goal),
                None => {
                    warn!("No goal configured for property {}", property);
                    Ok(())
                }
            },
        }
    }
}

/// Open the store, creating its directory on first use
fn open_store(path: &Path) -> Result<SqliteStore, CommandError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CommandError::Internal(format!("Failed to create store directory: {}", e))
            })?;
        }
    }

    info!("Store path: {:?}", path);
    Ok(SqliteStore::open(path.to_path_buf())?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CommandError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CommandError::InvalidArgument(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CommandError::InvalidArgument(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::Internal(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
