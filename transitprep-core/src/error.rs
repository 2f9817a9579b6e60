use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unparseable time value: {0:?}")]
    UnparseableTime(String),
    #[error("Invalid time period {0:?}, expected HH:MM-HH:MM")]
    InvalidPeriod(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("{stage}: unknown {kind} id {id:?}")]
    MissingReference {
        stage: &'static str,
        kind: &'static str,
        id: String,
    },
    #[error("Scenario references configuration {expected:?}, got {actual:?}")]
    ConfigurationMismatch { expected: String, actual: String },
    #[error("{0}: station set is empty")]
    EmptyStations(&'static str),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("{service} returned status {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "Matrix chunk (sources from {source_block}, destinations from {destination_block}) failed: {cause}"
    )]
    MatrixChunk {
        source_block: usize,
        destination_block: usize,
        #[source]
        cause: Box<Error>,
    },
    #[error("{operation} timed out after {deadline:?}")]
    Timeout {
        operation: &'static str,
        deadline: Duration,
    },
    #[error("Background task failed: {0}")]
    Task(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure belongs to the gateway-timeout class
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::MatrixChunk { cause, .. } => cause.is_timeout(),
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
