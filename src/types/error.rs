//! Error type for configuration and storage failures
//!
//! Ticks never fail; everything here surfaces at construction or I/O time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pattern {pattern} has non-positive cycle duration {duration}")]
    InvalidCycleDuration { pattern: usize, duration: f64 },

    #[error("pattern set is empty")]
    EmptyPatternSet,

    #[error("sensitivity {0} outside [0, 1]")]
    InvalidSensitivity(f64),

    #[error("volume {0} outside [0, 1]")]
    InvalidVolume(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("unknown tab '{0}'")]
    UnknownTab(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
