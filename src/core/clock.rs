//! Pattern clock: elapsed time within a cycle plus the active pattern
//!
//! Cycle rules:
//! - `start` zeroes elapsed and draws any pattern
//! - `advance` adds one tick; on reaching the active pattern's tick count the
//!   clock wraps to 0 and draws a pattern different from the one that just ended

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::EngineError;

/// A pattern switch caused by a cycle wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrap {
    pub from: usize,
    pub to: usize,
}

/// Per-engine clock state
///
/// Time is counted in whole ticks; elapsed seconds are derived from the
/// count so phase boundaries land on exact tick edges.
#[derive(Debug, Clone)]
pub struct PatternClock {
    /// Ticks since the current cycle began
    steps: u64,
    tick: f64,
    active: usize,
    durations: Vec<f64>,
    /// Ticks per cycle, one entry per pattern
    cycle_steps: Vec<u64>,
    /// Completed cycles since start
    cycle: u64,
}

impl PatternClock {
    /// Clock over patterns with individual durations, advanced `tick` seconds at a time
    ///
    /// Fails on an empty set or a non-positive/non-finite duration or tick.
    pub fn new(durations: Vec<f64>, tick: f64) -> Result<Self, EngineError> {
        if durations.is_empty() {
            return Err(EngineError::EmptyPatternSet);
        }
        if !(tick.is_finite() && tick > 0.0) {
            return Err(EngineError::InvalidConfig("tick interval must be positive"));
        }
        for (pattern, &duration) in durations.iter().enumerate() {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(EngineError::InvalidCycleDuration { pattern, duration });
            }
        }
        let cycle_steps = durations
            .iter()
            .map(|d| ((d / tick) - 1e-9).ceil().max(1.0) as u64)
            .collect();
        Ok(Self {
            steps: 0,
            tick,
            active: 0,
            durations,
            cycle_steps,
            cycle: 0,
        })
    }

    /// Clock over `count` patterns sharing one duration
    pub fn uniform(count: usize, duration: f64, tick: f64) -> Result<Self, EngineError> {
        Self::new(vec![duration; count], tick)
    }

    /// Reset elapsed and draw a starting pattern
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.steps = 0;
        self.cycle = 0;
        self.active = rng.gen_range(0..self.durations.len());
    }

    /// Advance one tick, wrapping and reselecting at cycle end
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Wrap> {
        self.steps += 1;
        if self.steps < self.cycle_steps[self.active] {
            return None;
        }

        let from = self.active;
        self.steps = 0;
        self.active = pick_next(from, self.durations.len(), rng);
        self.cycle += 1;
        debug!(from, to = self.active, cycle = self.cycle, "pattern cycle wrapped");
        Some(Wrap { from, to: self.active })
    }

    /// Jump straight to a pattern at the start of its cycle
    pub fn select(&mut self, pattern: usize) -> Result<(), EngineError> {
        if pattern >= self.durations.len() {
            return Err(EngineError::InvalidConfig("pattern index out of range"));
        }
        self.active = pattern;
        self.steps = 0;
        Ok(())
    }

    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.tick
    }

    /// Ticks since the current cycle began
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn pattern_count(&self) -> usize {
        self.durations.len()
    }

    /// Duration of the active pattern
    pub fn cycle_duration(&self) -> f64 {
        self.durations[self.active]
    }
}

/// Draw a pattern index different from `current`
///
/// Uniform over the other `count - 1` indices, so a single draw always
/// succeeds. A one-element set just returns its only member.
pub fn pick_next<R: Rng + ?Sized>(current: usize, count: usize, rng: &mut R) -> usize {
    if count <= 1 {
        return 0;
    }
    let k = rng.gen_range(0..count - 1);
    if k >= current {
        k + 1
    } else {
        k
    }
}

/// RNG for one engine
///
/// With a seed, each `stream` gets its own reproducible sequence;
/// without one, the RNG is seeded from OS entropy.
pub fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_set() {
        assert!(matches!(PatternClock::new(vec![], 0.1), Err(EngineError::EmptyPatternSet)));
    }

    #[test]
    fn test_rejects_bad_duration() {
        let err = PatternClock::new(vec![10.0, 0.0], 0.1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCycleDuration { pattern: 1, .. }));
        assert!(PatternClock::new(vec![-1.0], 0.1).is_err());
        assert!(PatternClock::new(vec![f64::NAN], 0.1).is_err());
        assert!(PatternClock::new(vec![1.0], 0.0).is_err());
    }

    #[test]
    fn test_pick_next_never_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 2..12 {
            for current in 0..count {
                for _ in 0..50 {
                    let next = pick_next(current, count, &mut rng);
                    assert_ne!(next, current);
                    assert!(next < count);
                }
            }
        }
    }

    #[test]
    fn test_pick_next_single_pattern() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_next(0, 1, &mut rng), 0);
    }

    #[test]
    fn test_wrap_resets_elapsed_and_switches() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut clock = PatternClock::uniform(5, 1.0, 0.1).unwrap();
        clock.start(&mut rng);
        let before = clock.active();

        let mut wrap = None;
        for _ in 0..20 {
            if let Some(w) = clock.advance(&mut rng) {
                wrap = Some(w);
                break;
            }
        }
        let wrap = wrap.expect("clock should wrap within a second");
        assert_eq!(wrap.from, before);
        assert_ne!(wrap.to, before);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.cycle(), 1);
    }

    #[test]
    fn test_elapsed_stays_below_duration() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut clock = PatternClock::new(vec![1.0, 2.5, 0.7], 0.05).unwrap();
        clock.start(&mut rng);
        for _ in 0..1000 {
            clock.advance(&mut rng);
            assert!(clock.elapsed() >= 0.0);
            assert!(clock.elapsed() < clock.cycle_duration());
        }
    }

    #[test]
    fn test_wraps_on_exact_tick_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut clock = PatternClock::new(vec![120.0, 45.0], 0.05).unwrap();
        clock.select(0).unwrap();
        for _ in 0..2399 {
            assert!(clock.advance(&mut rng).is_none());
        }
        assert!((clock.elapsed() - 119.95).abs() < 1e-9);
        assert_eq!(clock.advance(&mut rng), Some(Wrap { from: 0, to: 1 }));
        assert_eq!(clock.steps(), 0);
    }

    #[test]
    fn test_elapsed_has_no_drift() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut clock = PatternClock::uniform(2, 45.0, 0.1).unwrap();
        clock.select(0).unwrap();
        for _ in 0..60 {
            clock.advance(&mut rng);
        }
        assert!(clock.elapsed() >= 6.0);
    }
}
