//! Engine configuration, loaded from JSON
//!
//! Every field has a default so a partial file (or none at all) works.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::radar_patterns::{CLASSIC_PATTERN_COUNT, RADAR_PATTERNS};
use crate::types::{EngineError, StopBehavior};

/// Which radar engine drives the dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadarVariant {
    /// Hand-authored pattern tables
    #[default]
    Choreographed,
    /// Sensitivity-driven random spawner
    Scatter,
}

/// Radar pattern repertoire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSet {
    #[default]
    Full,
    Classic,
}

impl PatternSet {
    pub fn count(&self) -> usize {
        match self {
            PatternSet::Full => RADAR_PATTERNS.len(),
            PatternSet::Classic => CLASSIC_PATTERN_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmfConfig {
    pub stop_behavior: StopBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetometerConfig {
    pub stop_behavior: StopBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub variant: RadarVariant,
    pub pattern_set: PatternSet,
    /// Scale dot intensity by sensitivity
    pub apply_sensitivity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub emf: EmfConfig,
    pub radar: RadarConfig,
    pub magnetometer: MagnetometerConfig,
    /// Makes every engine RNG reproducible
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.radar.pattern_set.count() == 0 {
            return Err(EngineError::EmptyPatternSet);
        }
        if self.radar.pattern_set.count() > RADAR_PATTERNS.len() {
            return Err(EngineError::InvalidConfig("radar pattern set larger than table"));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.radar.pattern_set.count(), 10);
        assert_eq!(config.emf.stop_behavior, StopBehavior::Hold);
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_json(
            r#"{"emf":{"stop_behavior":"reset"},"radar":{"pattern_set":"classic"},"seed":42}"#,
        )
        .unwrap();
        assert_eq!(config.emf.stop_behavior, StopBehavior::Reset);
        assert_eq!(config.magnetometer.stop_behavior, StopBehavior::Hold);
        assert_eq!(config.radar.pattern_set.count(), 5);
        assert_eq!(config.radar.variant, RadarVariant::Choreographed);
        assert!(!config.radar.apply_sensitivity);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_scatter_variant() {
        let config = EngineConfig::from_json(r#"{"radar":{"variant":"scatter"}}"#).unwrap();
        assert_eq!(config.radar.variant, RadarVariant::Scatter);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"radar":{"variant":"spiral"}}"#),
            Err(EngineError::Json(_))
        ));
    }
}
