//! EnergoBoard analytics engine
//!
//! Turns the backend's monthly consumption payloads into the derived views
//! the dashboard renders. It handles:
//! - Cumulative and per-resource chart series
//! - Month-over-month movers and per-day averages
//! - Rule-based insights (spikes, anomalies, silent meters)
//! - Goal evaluation
//! - Favorites and goals persistence behind a key-value store
//! - CSV/JSON export and a command-line front end

pub mod cli;
pub mod commands;
pub mod export;
pub mod goals;
pub mod insights;
pub mod models;
pub mod store;
pub mod trends;

/// Error type for commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Presentation layers receive errors as plain messages
impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
