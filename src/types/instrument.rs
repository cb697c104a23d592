//! Instrument, tab and audio-mode identities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::EngineError;

/// The three pseudo-instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Scalar field-strength gauge, 0-300 mG
    Emf,
    /// Polar plot of transient dots
    Radar,
    /// Candle flame driven by a noisy scalar
    Magnetometer,
}

impl InstrumentKind {
    pub const ALL: [InstrumentKind; 3] = [
        InstrumentKind::Emf,
        InstrumentKind::Radar,
        InstrumentKind::Magnetometer,
    ];

    /// Lowercase name used in URLs and console commands
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentKind::Emf => "emf",
            InstrumentKind::Radar => "radar",
            InstrumentKind::Magnetometer => "magnetometer",
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            InstrumentKind::Emf => "\x1b[33m",          // Yellow
            InstrumentKind::Radar => "\x1b[32m",        // Green
            InstrumentKind::Magnetometer => "\x1b[35m", // Magenta
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for instrument
    pub fn emoji(&self) -> &'static str {
        match self {
            InstrumentKind::Emf => "📈",
            InstrumentKind::Radar => "📡",
            InstrumentKind::Magnetometer => "🕯",
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstrumentKind::Emf => "EMF",
            InstrumentKind::Radar => "RADAR",
            InstrumentKind::Magnetometer => "MAGNETOMETER",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for InstrumentKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emf" => Ok(InstrumentKind::Emf),
            "radar" => Ok(InstrumentKind::Radar),
            "magnetometer" | "mag" | "candle" => Ok(InstrumentKind::Magnetometer),
            other => Err(EngineError::UnknownInstrument(other.to_string())),
        }
    }
}

/// Main screen tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    Radar,
    Emf,
    SpiritBox,
    Settings,
}

impl Tab {
    /// Instrument shown on this tab, if any
    pub fn instrument(&self) -> Option<InstrumentKind> {
        match self {
            Tab::Radar => Some(InstrumentKind::Radar),
            Tab::Emf => Some(InstrumentKind::Emf),
            Tab::SpiritBox => Some(InstrumentKind::Magnetometer),
            Tab::Settings => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Radar => "Radar",
            Tab::Emf => "EMF",
            Tab::SpiritBox => "Spirit Box",
            Tab::Settings => "Settings",
        }
    }

    /// Audio to play on entering this tab
    ///
    /// Radar audio is user-triggered, so the radar tab starts silent.
    pub fn audio_mode(&self, sound_enabled: bool) -> AudioMode {
        if !sound_enabled {
            return AudioMode::None;
        }
        match self {
            Tab::Emf => AudioMode::Emf,
            Tab::SpiritBox => AudioMode::Spirit,
            Tab::Radar | Tab::Settings => AudioMode::None,
        }
    }

    /// Audio for a user-requested cue on this tab
    pub fn cue_audio(&self, sound_enabled: bool) -> AudioMode {
        match self {
            Tab::Radar if sound_enabled => AudioMode::Radar,
            _ => AudioMode::None,
        }
    }
}

impl FromStr for Tab {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radar" => Ok(Tab::Radar),
            "emf" => Ok(Tab::Emf),
            "spirit-box" | "spirit" | "spiritbox" => Ok(Tab::SpiritBox),
            "settings" => Ok(Tab::Settings),
            other => Err(EngineError::UnknownTab(other.to_string())),
        }
    }
}

/// What the audio collaborator should be playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// One-shot sweep cue, only on request from the radar tab
    Radar,
    Emf,
    Spirit,
    None,
}

/// What a stopped engine does with its published value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBehavior {
    /// Keep the last published value (frozen needle)
    #[default]
    Hold,
    /// Drop the published value back to zero
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_parse_aliases() {
        assert_eq!("EMF".parse::<InstrumentKind>().unwrap(), InstrumentKind::Emf);
        assert_eq!("candle".parse::<InstrumentKind>().unwrap(), InstrumentKind::Magnetometer);
        assert!("ouija".parse::<InstrumentKind>().is_err());
    }

    #[test]
    fn test_tab_instruments() {
        assert_eq!(Tab::SpiritBox.instrument(), Some(InstrumentKind::Magnetometer));
        assert_eq!(Tab::Settings.instrument(), None);
        assert_eq!("spirit-box".parse::<Tab>().unwrap(), Tab::SpiritBox);
    }

    #[test]
    fn test_tab_audio_modes() {
        assert_eq!(Tab::Radar.audio_mode(true), AudioMode::None);
        assert_eq!(Tab::Emf.audio_mode(true), AudioMode::Emf);
        assert_eq!(Tab::SpiritBox.audio_mode(true), AudioMode::Spirit);
        assert_eq!(Tab::Settings.audio_mode(true), AudioMode::None);
        assert_eq!(Tab::Emf.audio_mode(false), AudioMode::None);
    }

    #[test]
    fn test_cue_audio_only_on_radar() {
        assert_eq!(Tab::Radar.cue_audio(true), AudioMode::Radar);
        assert_eq!(Tab::Radar.cue_audio(false), AudioMode::None);
        assert_eq!(Tab::Emf.cue_audio(true), AudioMode::None);
    }
}
