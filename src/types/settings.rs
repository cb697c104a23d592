//! Persisted user settings record

use serde::{Deserialize, Serialize};

use crate::types::EngineError;
use crate::{DEFAULT_SENSITIVITY, DEFAULT_VOLUME};

/// Flat settings record, stored as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub has_completed_onboarding: bool,
    pub has_unlocked_premium: bool,
    pub sound_enabled: bool,
    /// Radar sensitivity, [0, 1]
    pub radar_sensitivity: f64,
    /// Playback volume, [0, 1]
    pub volume: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            has_unlocked_premium: false,
            sound_enabled: true,
            radar_sensitivity: DEFAULT_SENSITIVITY,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl UserSettings {
    pub fn set_sensitivity(&mut self, value: f64) -> Result<(), EngineError> {
        self.radar_sensitivity = check_unit(value).ok_or(EngineError::InvalidSensitivity(value))?;
        Ok(())
    }

    pub fn set_volume(&mut self, value: f64) -> Result<(), EngineError> {
        self.volume = check_unit(value).ok_or(EngineError::InvalidVolume(value))?;
        Ok(())
    }

    /// Reset out-of-range fields to their defaults, returning the names reset
    pub fn repair(&mut self) -> Vec<&'static str> {
        let mut reset = Vec::new();
        if check_unit(self.radar_sensitivity).is_none() {
            self.radar_sensitivity = DEFAULT_SENSITIVITY;
            reset.push("radar_sensitivity");
        }
        if check_unit(self.volume).is_none() {
            self.volume = DEFAULT_VOLUME;
            reset.push("volume");
        }
        reset
    }
}

/// Some(v) if v is a finite value in [0, 1]
pub fn check_unit(v: f64) -> Option<f64> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Some(v)
    } else {
        None
    }
}
