// Error types shared across the engine.
//
// Data-shape anomalies never surface as `Err` from the engine's query
// functions; they are reported inside successful results. These types cover
// the loading boundary and token parsing.

use serde::Serialize;
use thiserror::Error;

/// Failures while turning a user-supplied token into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown dataset variant: {0} (expected `nopunts` or `tovpunt`)")]
    UnknownVariant(String),

    #[error("unknown scoring mode: {0} (expected `9cat` or `8cat`)")]
    UnknownScoringMode(String),

    #[error("unsupported season: {0}")]
    UnknownSeason(String),
}

/// Failures from a dataset source.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no dataset for season {season} variant {variant}")]
    NotFound { season: String, variant: String },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Problems reported alongside an (empty) recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RecommendError {
    #[error("dataset unavailable: {message}")]
    DatasetUnavailable { message: String },

    #[error("dataset is missing value columns: {}", .columns.join(", "))]
    MissingValueColumn { columns: Vec<String> },
}
