//! Published scalar readings (EMF, magnetometer)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::GaugeBand;

/// One EMF tick as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct EmfFrame {
    pub timestamp: DateTime<Utc>,
    /// Smoothed reading, always within [0, 300]
    pub value: f64,
    pub band: GaugeBand,
    /// Active pattern index
    pub pattern: usize,
    pub pattern_name: &'static str,
    /// Position within the active pattern's cycle (seconds)
    pub elapsed: f64,
    pub running: bool,
}

impl EmfFrame {
    pub fn new(value: f64, pattern: usize, pattern_name: &'static str, elapsed: f64, running: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            value,
            band: GaugeBand::from_value(value),
            pattern,
            pattern_name,
            elapsed,
            running,
        }
    }
}

/// Magnetometer reading with derived flame intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnetometerReading {
    /// Unbounded scalar
    pub value: f64,
    /// min(|value| / 100, 1)
    pub intensity: f64,
}

impl MagnetometerReading {
    pub fn zero() -> Self {
        Self { value: 0.0, intensity: 0.0 }
    }

    /// Derive intensity from a raw value
    pub fn from_value(value: f64) -> Self {
        let intensity = (value.abs() / 100.0).min(1.0);
        Self { value, intensity }
    }
}

/// One magnetometer tick as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct MagnetometerFrame {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub reading: MagnetometerReading,
    pub running: bool,
}

impl MagnetometerFrame {
    pub fn new(reading: MagnetometerReading, running: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            reading,
            running,
        }
    }
}
