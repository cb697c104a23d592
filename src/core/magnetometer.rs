//! Magnetometer engine driving the candle flame
//!
//! value = uniform(-100, 100) + 20 * sin(2 * now), intensity = min(|value| / 100, 1).
//! `now` is wall-clock seconds, so the slow drift is shared across restarts.

use chrono::Utc;
use rand::rngs::StdRng;
use tracing::info;

use crate::core::clock::seeded_rng;
use crate::core::emf_patterns::uniform;
use crate::types::{MagnetometerFrame, MagnetometerReading, StopBehavior};
use crate::{MAGNETOMETER_DRIFT, MAGNETOMETER_NOISE};

#[derive(Debug)]
pub struct MagnetometerEngine {
    reading: MagnetometerReading,
    running: bool,
    stop_behavior: StopBehavior,
    rng: StdRng,
}

impl MagnetometerEngine {
    pub fn new(stop_behavior: StopBehavior) -> Self {
        Self::with_rng(stop_behavior, seeded_rng(None, 2))
    }

    pub fn with_rng(stop_behavior: StopBehavior, rng: StdRng) -> Self {
        Self {
            reading: MagnetometerReading::zero(),
            running: false,
            stop_behavior,
            rng,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        info!("magnetometer started");
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("magnetometer stopped");
        }
        self.running = false;
        if self.stop_behavior == StopBehavior::Reset {
            self.reading = MagnetometerReading::zero();
        }
    }

    /// Sample against the wall clock
    pub fn tick(&mut self) -> MagnetometerFrame {
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        self.tick_at(now)
    }

    /// Sample at an explicit time in seconds
    pub fn tick_at(&mut self, now: f64) -> MagnetometerFrame {
        if self.running {
            self.reading = self.sample_at(now);
        }
        self.frame()
    }

    pub fn sample_at(&mut self, now: f64) -> MagnetometerReading {
        let noise = uniform(&mut self.rng, -MAGNETOMETER_NOISE, MAGNETOMETER_NOISE);
        MagnetometerReading::from_value(noise + (now * 2.0).sin() * MAGNETOMETER_DRIFT)
    }

    pub fn frame(&self) -> MagnetometerFrame {
        MagnetometerFrame::new(self.reading, self.running)
    }

    pub fn reading(&self) -> MagnetometerReading {
        self.reading
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn engine(stop: StopBehavior) -> MagnetometerEngine {
        MagnetometerEngine::with_rng(stop, StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_value_bounds() {
        let mut e = engine(StopBehavior::Hold);
        e.start();
        for i in 0..2000 {
            let f = e.tick_at(i as f64 * 0.05);
            let v = f.reading.value;
            assert!(v.abs() <= MAGNETOMETER_NOISE + MAGNETOMETER_DRIFT);
            assert!((0.0..=1.0).contains(&f.reading.intensity));
            assert!((f.reading.intensity - (v.abs() / 100.0).min(1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stopped_engine_holds() {
        let mut e = engine(StopBehavior::Hold);
        e.start();
        let held = e.tick_at(1.0).reading;
        e.stop();
        assert_eq!(e.tick_at(2.0).reading, held);
    }

    #[test]
    fn test_reset_zeroes_flame() {
        let mut e = engine(StopBehavior::Reset);
        e.start();
        e.tick_at(1.0);
        e.stop();
        assert_eq!(e.reading(), MagnetometerReading::zero());
    }

    #[test]
    fn test_intensity_saturates() {
        assert_eq!(MagnetometerReading::from_value(-150.0).intensity, 1.0);
        assert_eq!(MagnetometerReading::from_value(50.0).intensity, 0.5);
    }
}
