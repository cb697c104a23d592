//! Scatter radar: the sensitivity-driven random spawner
//!
//! Dots are aged individually rather than choreographed: each tick drops
//! dots at or past 3 s, ages the rest, then maybe spawns one new dot with
//! probability `sensitivity * 0.3`.

use rand::Rng;
use std::f64::consts::PI;

use crate::core::emf_patterns::uniform;
use crate::types::{DotId, GhostDot, Point};
use crate::{RADAR_TICK_SECS, SCATTER_MAX_AGE_SECS, SCATTER_SPAWN_SCALE};

#[derive(Debug, Default)]
pub struct ScatterField {
    dots: Vec<GhostDot>,
    next_id: u64,
}

impl ScatterField {
    pub fn new() -> Self {
        Self::default()
    }

    /// One 0.1 s step
    pub fn step<R: Rng + ?Sized>(&mut self, sensitivity: f64, rng: &mut R) {
        self.dots.retain(|d| d.age < SCATTER_MAX_AGE_SECS);
        for dot in &mut self.dots {
            dot.age += RADAR_TICK_SECS;
        }

        let spawn_chance = sensitivity * SCATTER_SPAWN_SCALE;
        if rng.gen::<f64>() < spawn_chance {
            let angle = uniform(rng, 0.0, 2.0 * PI);
            let distance = uniform(rng, 0.2, 0.9);
            let dot = GhostDot {
                id: DotId(self.next_id),
                position: Point::new(
                    0.5 + angle.cos() * distance * 0.4,
                    0.5 + angle.sin() * distance * 0.4,
                ),
                intensity: uniform(rng, 0.3, 1.0),
                age: 0.0,
            };
            self.next_id = self.next_id.wrapping_add(1);
            self.dots.push(dot);
        }
    }

    pub fn dots(&self) -> &[GhostDot] {
        &self.dots
    }

    pub fn clear(&mut self) {
        self.dots.clear();
    }
}
