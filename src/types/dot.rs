//! Radar dots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point on the normalized radar plane, center at (0.5, 0.5)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const CENTER: Point = Point { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Opaque dot identifier
///
/// Stable for one actor over one cycle, so a renderer can animate
/// continuity between ticks even though the set is rebuilt every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotId(pub u64);

impl DotId {
    /// Identity of an actor within a given cycle of a pattern
    pub fn for_actor(cycle: u64, pattern: usize, actor: usize) -> Self {
        Self((cycle << 16) | ((pattern as u64 & 0xff) << 8) | (actor as u64 & 0xff))
    }
}

/// A single radar blip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostDot {
    pub id: DotId,
    pub position: Point,
    /// Opacity in [0, 1]
    pub intensity: f64,
    /// Seconds since spawn (scatter radar only, 0 for choreographed dots)
    #[serde(default)]
    pub age: f64,
}

/// One radar tick as seen by the renderer
#[derive(Debug, Clone, Serialize)]
pub struct RadarFrame {
    pub timestamp: DateTime<Utc>,
    /// Complete live dot set for this instant
    pub dots: Vec<GhostDot>,
    /// Active pattern index (None for the scatter variant)
    pub pattern: Option<usize>,
    pub pattern_name: Option<&'static str>,
    pub elapsed: f64,
    /// True during the warm-up window
    pub scanning: bool,
    pub active: bool,
}

impl RadarFrame {
    pub fn new(
        dots: Vec<GhostDot>,
        pattern: Option<usize>,
        pattern_name: Option<&'static str>,
        elapsed: f64,
        scanning: bool,
        active: bool,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            dots,
            pattern,
            pattern_name,
            elapsed,
            scanning,
            active,
        }
    }

    /// Empty frame for a stopped radar
    pub fn idle() -> Self {
        Self::new(Vec::new(), None, None, 0.0, false, false)
    }
}
