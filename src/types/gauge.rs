//! Gauge helpers for the rendering side
//!
//! Band thresholds and needle geometry of the EMF dial, flame offset of the
//! candle. Pure functions of the published reading.

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::EMF_MAX;

/// Color band of the EMF dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeBand {
    /// below 80 mG
    Green,
    /// 80-160 mG
    Yellow,
    /// 160-240 mG
    Orange,
    /// 240 mG and up
    Red,
}

impl GaugeBand {
    pub fn from_value(value: f64) -> Self {
        if value < 80.0 {
            GaugeBand::Green
        } else if value < 160.0 {
            GaugeBand::Yellow
        } else if value < 240.0 {
            GaugeBand::Orange
        } else {
            GaugeBand::Red
        }
    }

    /// Terminal color for this band
    pub fn color(&self) -> Color {
        match self {
            GaugeBand::Green => Color::Green,
            GaugeBand::Yellow => Color::Yellow,
            GaugeBand::Orange => Color::TrueColor { r: 255, g: 140, b: 0 },
            GaugeBand::Red => Color::Red,
        }
    }
}

impl std::fmt::Display for GaugeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GaugeBand::Green => "GREEN",
            GaugeBand::Yellow => "YELLOW",
            GaugeBand::Orange => "ORANGE",
            GaugeBand::Red => "RED",
        };
        write!(f, "{}", name)
    }
}

/// Needle rotation in degrees: 0 mG = -90 (left), 300 mG = +90 (right)
pub fn needle_angle(value: f64) -> f64 {
    (value / EMF_MAX) * 180.0 - 90.0
}

/// Vertical flame offset for a candle intensity
pub fn candle_offset(intensity: f64) -> f64 {
    intensity * 5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(GaugeBand::from_value(0.0), GaugeBand::Green);
        assert_eq!(GaugeBand::from_value(79.9), GaugeBand::Green);
        assert_eq!(GaugeBand::from_value(80.0), GaugeBand::Yellow);
        assert_eq!(GaugeBand::from_value(160.0), GaugeBand::Orange);
        assert_eq!(GaugeBand::from_value(240.0), GaugeBand::Red);
        assert_eq!(GaugeBand::from_value(300.0), GaugeBand::Red);
    }

    #[test]
    fn test_needle_extremes() {
        assert_eq!(needle_angle(0.0), -90.0);
        assert_eq!(needle_angle(150.0), 0.0);
        assert_eq!(needle_angle(300.0), 90.0);
    }
}
