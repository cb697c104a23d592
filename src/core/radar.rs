//! Radar engine: choreographed ghost dots on a 45 s cycle
//!
//! Per tick (0.1 s):
//! - advance the clock; on wrap draw a different pattern and clear snaps
//! - inside the 6 s warm-up publish an empty set (the sweep is "scanning")
//! - otherwise rebuild the full dot set from the active pattern's actors
//!
//! The scatter variant bypasses the tables and delegates to `ScatterField`.

use rand::rngs::StdRng;
use tracing::info;

use crate::core::clock::{seeded_rng, PatternClock};
use crate::core::config::{RadarConfig, RadarVariant};
use crate::core::geometry::get_position;
use crate::core::radar_patterns::{Placement, RadarPattern, SnapState, MAX_ACTORS, RADAR_PATTERNS};
use crate::core::scatter::ScatterField;
use crate::types::{check_unit, DotId, EngineError, GhostDot, RadarFrame};
use crate::{DEFAULT_SENSITIVITY, RADAR_CYCLE_SECS, RADAR_TICK_SECS, RADAR_WARMUP_SECS};

/// Radar dot engine
#[derive(Debug)]
pub struct RadarEngine {
    clock: PatternClock,
    snaps: [SnapState; MAX_ACTORS],
    scatter: ScatterField,
    dots: Vec<GhostDot>,
    active: bool,
    sensitivity: f64,
    config: RadarConfig,
    rng: StdRng,
}

impl RadarEngine {
    pub fn new(config: RadarConfig) -> Result<Self, EngineError> {
        Self::with_rng(config, seeded_rng(None, 1))
    }

    pub fn with_rng(config: RadarConfig, rng: StdRng) -> Result<Self, EngineError> {
        Ok(Self {
            clock: PatternClock::uniform(config.pattern_set.count(), RADAR_CYCLE_SECS, RADAR_TICK_SECS)?,
            snaps: [SnapState::default(); MAX_ACTORS],
            scatter: ScatterField::new(),
            dots: Vec::new(),
            active: false,
            sensitivity: DEFAULT_SENSITIVITY,
            config,
            rng,
        })
    }

    /// Begin scanning from the top of a freshly drawn pattern
    pub fn start(&mut self) {
        self.clock.start(&mut self.rng);
        self.snaps = [SnapState::default(); MAX_ACTORS];
        self.scatter.clear();
        self.dots.clear();
        self.active = true;
        match self.config.variant {
            RadarVariant::Choreographed => {
                info!(pattern = self.pattern().name, "radar started")
            }
            RadarVariant::Scatter => info!("radar started (scatter)"),
        }
    }

    /// Stop scanning and clear every dot
    pub fn stop(&mut self) {
        if self.active {
            info!("radar stopped");
        }
        self.active = false;
        self.dots.clear();
        self.scatter.clear();
    }

    pub fn tick(&mut self) -> RadarFrame {
        if !self.active {
            return self.frame();
        }
        match self.config.variant {
            RadarVariant::Choreographed => self.step_choreographed(),
            RadarVariant::Scatter => {
                self.scatter.step(self.sensitivity, &mut self.rng);
                self.dots = self.scatter.dots().to_vec();
            }
        }
        self.frame()
    }

    fn step_choreographed(&mut self) {
        if self.clock.advance(&mut self.rng).is_some() {
            self.snaps = [SnapState::default(); MAX_ACTORS];
        }
        let t = self.clock.elapsed();
        if t < RADAR_WARMUP_SECS {
            self.dots.clear();
            return;
        }
        let pattern = self.clock.active();
        let placements = RADAR_PATTERNS[pattern].evaluate(t, &mut self.snaps, &mut self.rng);
        let cycle = self.clock.cycle();
        self.dots = placements
            .into_iter()
            .map(|p| self.dot(cycle, pattern, p))
            .collect();
    }

    fn dot(&self, cycle: u64, pattern: usize, p: Placement) -> GhostDot {
        let intensity = if self.config.apply_sensitivity {
            (p.intensity * self.sensitivity).clamp(0.0, 1.0)
        } else {
            p.intensity
        };
        GhostDot {
            id: DotId::for_actor(cycle, pattern, p.actor),
            position: get_position(p.angle, p.radius),
            intensity,
            age: 0.0,
        }
    }

    pub fn set_sensitivity(&mut self, value: f64) -> Result<(), EngineError> {
        self.sensitivity = check_unit(value).ok_or(EngineError::InvalidSensitivity(value))?;
        Ok(())
    }

    /// Force a pattern from the start of its cycle
    pub fn select_pattern(&mut self, pattern: usize) -> Result<(), EngineError> {
        self.clock.select(pattern)?;
        self.snaps = [SnapState::default(); MAX_ACTORS];
        Ok(())
    }

    pub fn frame(&self) -> RadarFrame {
        if !self.active {
            return RadarFrame::idle();
        }
        match self.config.variant {
            RadarVariant::Choreographed => RadarFrame::new(
                self.dots.clone(),
                Some(self.clock.active()),
                Some(self.pattern().name),
                self.clock.elapsed(),
                self.clock.elapsed() < RADAR_WARMUP_SECS,
                true,
            ),
            RadarVariant::Scatter => RadarFrame::new(self.dots.clone(), None, None, 0.0, false, true),
        }
    }

    pub fn dots(&self) -> &[GhostDot] {
        &self.dots
    }

    pub fn pattern(&self) -> &'static RadarPattern {
        &RADAR_PATTERNS[self.clock.active()]
    }

    pub fn pattern_id(&self) -> usize {
        self.clock.active()
    }

    pub fn pattern_count(&self) -> usize {
        self.clock.pattern_count()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

// =============================================================================
// TESTS
// =============================================================================
