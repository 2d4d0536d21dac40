//! Error types shared by the loader, aggregator, scale builder and chart pipeline.

use crate::scale::ScaleError;

/// Failure to obtain or parse the raw sales rows for a chart.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("row on line {line} is missing required field '{field}'")]
    MissingField { line: u64, field: &'static str },
}

/// An order date that could not be normalized to a calendar year.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed date '{input}': {reason}")]
pub struct MalformedDateError {
    pub input: String,
    pub reason: String,
}

impl MalformedDateError {
    pub fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error for a single chart pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    MalformedDate(#[from] MalformedDateError),

    #[error("scale error: {0}")]
    Scale(#[from] ScaleError),

    #[error("a load is already in progress for this chart")]
    ConcurrentLoad,

    #[error("chart has no data; load it first")]
    NotLoaded,

    #[error("render failed: {0}")]
    Render(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
