//! EMF engine: pattern clock -> noisy target -> smoothed reading
//!
//! Per tick (0.05 s):
//! - advance the clock, reselecting the pattern on wrap
//! - evaluate (base, noise) from the active pattern
//! - jitter uniformly within ±noise, clamp to [0, 300]
//! - move the published value 20% of the way toward it

use rand::rngs::StdRng;
use tracing::info;

use crate::core::clock::{seeded_rng, PatternClock};
use crate::core::emf_patterns::{emf_durations, uniform, ChaosState, EmfPattern, EmfTarget, EMF_PATTERNS};
use crate::types::{EmfFrame, EngineError, StopBehavior};
use crate::{EMF_MAX, EMF_MIN, EMF_SMOOTHING, EMF_TICK_SECS};

/// EMF gauge engine
#[derive(Debug)]
pub struct EmfEngine {
    clock: PatternClock,
    chaos: ChaosState,
    /// Published, smoothed value
    value: f64,
    running: bool,
    stop_behavior: StopBehavior,
    rng: StdRng,
}

impl EmfEngine {
    /// Create engine with an entropy-seeded RNG
    pub fn new(stop_behavior: StopBehavior) -> Result<Self, EngineError> {
        Self::with_rng(stop_behavior, seeded_rng(None, 0))
    }

    /// Create engine with a given RNG (reproducible runs)
    pub fn with_rng(stop_behavior: StopBehavior, rng: StdRng) -> Result<Self, EngineError> {
        Ok(Self {
            clock: PatternClock::new(emf_durations(), EMF_TICK_SECS)?,
            chaos: ChaosState::default(),
            value: 0.0,
            running: false,
            stop_behavior,
            rng,
        })
    }

    /// Reset the cycle and draw a starting pattern
    ///
    /// The published value is kept so a restart does not snap the needle.
    pub fn start(&mut self) {
        self.clock.start(&mut self.rng);
        self.chaos.reset();
        self.running = true;
        info!(pattern = self.pattern().name, "EMF engine started");
    }

    /// Halt ticking; the value is held or zeroed per stop behavior
    pub fn stop(&mut self) {
        if self.running {
            info!("EMF engine stopped");
        }
        self.running = false;
        if self.stop_behavior == StopBehavior::Reset {
            self.value = 0.0;
            self.chaos.reset();
        }
    }

    /// Advance one tick and return the published frame
    ///
    /// A stopped engine returns its current frame unchanged.
    pub fn tick(&mut self) -> EmfFrame {
        if !self.running {
            return self.frame();
        }
        if self.clock.advance(&mut self.rng).is_some() {
            self.chaos.reset();
        }
        let pattern = &EMF_PATTERNS[self.clock.active()];
        let target = pattern.evaluate(self.clock.elapsed(), &mut self.chaos, &mut self.rng);
        self.apply(target);
        self.frame()
    }

    /// Jitter, clamp and smooth toward a pattern target
    pub fn apply(&mut self, target: EmfTarget) {
        let jitter = uniform(&mut self.rng, -target.noise, target.noise);
        let noisy = (target.base + jitter).clamp(EMF_MIN, EMF_MAX);
        self.value += (noisy - self.value) * EMF_SMOOTHING;
    }

    /// Force a pattern from the start of its cycle
    pub fn select_pattern(&mut self, pattern: usize) -> Result<(), EngineError> {
        self.clock.select(pattern)?;
        self.chaos.reset();
        Ok(())
    }

    pub fn frame(&self) -> EmfFrame {
        EmfFrame::new(
            self.value,
            self.clock.active(),
            self.pattern().name,
            self.clock.elapsed(),
            self.running,
        )
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn pattern(&self) -> &'static EmfPattern {
        &EMF_PATTERNS[self.clock.active()]
    }

    pub fn pattern_id(&self) -> usize {
        self.clock.active()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn engine(seed: u64) -> EmfEngine {
        EmfEngine::with_rng(StopBehavior::Hold, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_start_resets_clock() {
        let mut e = engine(1);
        e.start();
        assert!(e.is_running());
        assert_eq!(e.elapsed(), 0.0);
        assert!(e.pattern_id() < 6);
    }

    #[test]
    fn test_tick_advances_elapsed() {
        let mut e = engine(2);
        e.start();
        e.select_pattern(0).unwrap();
        for _ in 0..10 {
            e.tick();
        }
        assert!((e.elapsed() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_smoothing_fraction() {
        let mut e = engine(3);
        e.apply(EmfTarget { base: 100.0, noise: 0.0 });
        assert!((e.value() - 20.0).abs() < 1e-12);
        e.apply(EmfTarget { base: 100.0, noise: 0.0 });
        assert!((e.value() - 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_clamped_before_smoothing() {
        let mut e = engine(4);
        for _ in 0..200 {
            e.apply(EmfTarget { base: 1000.0, noise: 0.0 });
        }
        assert!(e.value() <= EMF_MAX);
        assert!((e.value() - EMF_MAX).abs() < 1e-6);
        for _ in 0..200 {
            e.apply(EmfTarget { base: -50.0, noise: 0.0 });
        }
        assert!(e.value() >= EMF_MIN);
    }

    #[test]
    fn test_value_in_range_across_seeds() {
        for seed in 0..8 {
            let mut e = engine(seed);
            e.start();
            // Just over two classic cycles
            for _ in 0..5000 {
                let f = e.tick();
                assert!((EMF_MIN..=EMF_MAX).contains(&f.value), "seed {} value {}", seed, f.value);
            }
        }
    }

    #[test]
    fn test_stop_hold_freezes_value() {
        let mut e = engine(5);
        e.start();
        for _ in 0..100 {
            e.tick();
        }
        let v = e.value();
        e.stop();
        e.stop();
        assert!(!e.is_running());
        assert_eq!(e.tick().value, v);
    }

    #[test]
    fn test_stop_reset_zeroes_value() {
        let mut e = EmfEngine::with_rng(StopBehavior::Reset, StdRng::seed_from_u64(6)).unwrap();
        e.start();
        for _ in 0..100 {
            e.tick();
        }
        e.stop();
        assert_eq!(e.value(), 0.0);
    }

    #[test]
    fn test_wrap_switches_pattern() {
        let mut e = engine(7);
        e.start();
        e.select_pattern(4).unwrap(); // 35 s cycle
        let ticks = (35.0 / crate::EMF_TICK_SECS) as usize + 5;
        let mut switched = false;
        for _ in 0..ticks {
            e.tick();
            if e.pattern_id() != 4 {
                switched = true;
                break;
            }
        }
        assert!(switched);
    }

    #[test]
    fn test_wrap_lands_on_exact_tick() {
        let mut e = engine(8);
        e.start();
        e.select_pattern(0).unwrap(); // 120 s cycle = 2400 ticks
        for _ in 0..2399 {
            e.tick();
            assert_eq!(e.pattern_id(), 0);
        }
        assert!((e.elapsed() - 119.95).abs() < 1e-9);
        e.tick();
        assert_ne!(e.pattern_id(), 0);
        assert_eq!(e.elapsed(), 0.0);
    }

    #[test]
    fn test_wrap_clears_chaos_hold() {
        let mut e = engine(9);
        e.start();
        e.select_pattern(0).unwrap();
        for _ in 0..1200 {
            e.tick(); // into the trail phase
        }
        assert_ne!(e.chaos, ChaosState::default());
        for _ in 1200..2400 {
            e.tick();
        }
        assert_ne!(e.pattern_id(), 0);
        assert_eq!(e.chaos, ChaosState::default());
    }
}
