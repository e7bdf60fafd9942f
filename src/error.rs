//! Error types for detector monitoring operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Malformed event on line {line}: {message}")]
    MalformedEvent { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Calibration error: {0}")]
    Calibration(String),

    #[error("Output sink already finished")]
    SinkClosed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
