//! Radar choreographies
//!
//! A pattern is a set of actors; an actor is a list of time-windowed
//! segments. Within its window a segment places the actor at
//! (angle°, radius%) and fades it in/out at the window edges. Outside all
//! of its windows an actor contributes nothing.
//!
//! Angle and radius each follow a path (hold, linear, orbit) with optional
//! sine waves on absolute elapsed time layered on top. A segment may also
//! carry a snap: a random offset re-rolled on a fixed cadence.

use rand::Rng;

use crate::core::emf_patterns::uniform;

/// Most actors any pattern uses
pub const MAX_ACTORS: usize = 6;

/// Base motion of one coordinate within a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Path {
    Hold(f64),
    /// from -> to across the segment window
    Lerp { from: f64, to: f64 },
    /// from + rate * (elapsed - start), rate in units per second
    Orbit { from: f64, rate: f64 },
}

/// amplitude * sin(elapsed * rate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub amplitude: f64,
    pub rate: f64,
}

/// A path plus layered waves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub path: Path,
    pub waves: &'static [Wave],
}

impl Channel {
    fn value(&self, t: f64, start: f64, end: f64) -> f64 {
        let local = t - start;
        let base = match self.path {
            Path::Hold(v) => v,
            Path::Lerp { from, to } => {
                let progress = (local / (end - start)).clamp(0.0, 1.0);
                from + (to - from) * progress
            }
            Path::Orbit { from, rate } => from + rate * local,
        };
        self.waves
            .iter()
            .fold(base, |acc, w| acc + (t * w.rate).sin() * w.amplitude)
    }

    const fn with_waves(self, waves: &'static [Wave]) -> Self {
        Channel { path: self.path, waves }
    }
}

/// Random jump re-rolled every `every` seconds, uniform within ±angle/±radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub every: f64,
    pub angle: f64,
    pub radius: f64,
}

/// One time window of an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub angle: Channel,
    pub radius: Channel,
    pub fade_in: f64,
    pub fade_out: f64,
    pub intensity: f64,
    pub snap: Option<Snap>,
}

impl Segment {
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }

    /// Linear ramps at entry and exit, 1 in between
    pub fn alpha(&self, t: f64) -> f64 {
        let mut a: f64 = 1.0;
        if self.fade_in > 0.0 {
            a = a.min((t - self.start) / self.fade_in);
        }
        if self.fade_out > 0.0 {
            a = a.min((self.end - t) / self.fade_out);
        }
        a.clamp(0.0, 1.0)
    }

    const fn fade(self, fade_in: f64, fade_out: f64) -> Self {
        Segment { fade_in, fade_out, ..self }
    }

    const fn snap(self, every: f64, angle: f64, radius: f64) -> Self {
        Segment { snap: Some(Snap { every, angle, radius }), ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub segments: &'static [Segment],
}

impl Actor {
    pub fn segment_at(&self, t: f64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPattern {
    pub name: &'static str,
    pub actors: &'static [Actor],
}

/// Polar placement of one live actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub actor: usize,
    pub angle: f64,
    /// Percent of plot radius, clamped to [0, 100]
    pub radius: f64,
    /// Fade alpha, [0, 1]
    pub intensity: f64,
}

/// Current snap offsets of one actor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapState {
    epoch: Option<u64>,
    angle: f64,
    radius: f64,
}

impl SnapState {
    fn offsets<R: Rng + ?Sized>(&mut self, t: f64, snap: &Snap, rng: &mut R) -> (f64, f64) {
        let epoch = (t / snap.every).floor().max(0.0) as u64;
        if self.epoch != Some(epoch) {
            self.epoch = Some(epoch);
            self.angle = uniform(rng, -snap.angle, snap.angle);
            self.radius = uniform(rng, -snap.radius, snap.radius);
        }
        (self.angle, self.radius)
    }
}

impl RadarPattern {
    /// Every live actor's placement at elapsed `t`
    ///
    /// `snaps` holds one slot per actor; actors without a slot ignore snaps.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        t: f64,
        snaps: &mut [SnapState],
        rng: &mut R,
    ) -> Vec<Placement> {
        let mut out = Vec::with_capacity(self.actors.len());
        for (idx, actor) in self.actors.iter().enumerate() {
            let Some(seg) = actor.segment_at(t) else {
                continue;
            };
            let mut angle = seg.angle.value(t, seg.start, seg.end);
            let mut radius = seg.radius.value(t, seg.start, seg.end);
            if let (Some(snap), Some(state)) = (seg.snap.as_ref(), snaps.get_mut(idx)) {
                let (da, dr) = state.offsets(t, snap, rng);
                angle += da;
                radius += dr;
            }
            out.push(Placement {
                actor: idx,
                angle,
                radius: radius.clamp(0.0, 100.0),
                intensity: (seg.intensity * seg.alpha(t)).clamp(0.0, 1.0),
            });
        }
        out
    }
}

// =============================================================================
// TABLES
// =============================================================================

const fn hold(v: f64) -> Channel {
    Channel { path: Path::Hold(v), waves: &[] }
}

const fn lerp(from: f64, to: f64) -> Channel {
    Channel { path: Path::Lerp { from, to }, waves: &[] }
}

const fn orbit(from: f64, rate: f64) -> Channel {
    Channel { path: Path::Orbit { from, rate }, waves: &[] }
}

const fn seg(start: f64, end: f64, angle: Channel, radius: Channel) -> Segment {
    Segment {
        start,
        end,
        angle,
        radius,
        fade_in: 0.0,
        fade_out: 0.0,
        intensity: 1.0,
        snap: None,
    }
}

const fn wave(amplitude: f64, rate: f64) -> Wave {
    Wave { amplitude, rate }
}

const F: f64 = crate::RADAR_FADE_SECS;

const SWAY: &[Wave] = &[wave(12.0, 1.3)];
const STUTTER: &[Wave] = &[wave(10.0, 7.3), wave(6.0, 13.1)];
const BREATH: &[Wave] = &[wave(15.0, 1.2)];
const WISP_ANGLE: &[Wave] = &[wave(25.0, 0.7), wave(8.0, 2.3)];
const WISP_RADIUS: &[Wave] = &[wave(20.0, 0.4)];
const STAGGER_ANGLE: &[Wave] = &[wave(20.0, 1.7), wave(9.0, 3.1)];
const STAGGER_RADIUS: &[Wave] = &[wave(12.0, 2.3)];

/// Two contacts circling, the second closing on the first
const PURSUIT: RadarPattern = RadarPattern {
    name: "Pursuit",
    actors: &[
        Actor {
            segments: &[
                seg(6.0, 20.0, orbit(30.0, 12.0), hold(70.0)).fade(F, 0.0),
                seg(20.0, 32.0, lerp(198.0, 260.0), lerp(70.0, 40.0)),
                seg(32.0, 44.0, orbit(260.0, 20.0), lerp(40.0, 90.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(9.0, 20.0, orbit(340.0, 14.0), hold(78.0)).fade(F, 0.0),
                seg(20.0, 32.0, lerp(494.0, 600.0), lerp(78.0, 48.0)),
                seg(32.0, 44.0, orbit(600.0, 20.0), lerp(48.0, 95.0)).fade(0.0, F),
            ],
        },
    ],
};

/// Three contacts in formation: appear, rotate, collapse inward
const TRIANGLE: RadarPattern = RadarPattern {
    name: "Triangle",
    actors: &[
        Actor {
            segments: &[
                seg(6.0, 20.0, hold(0.0), hold(60.0)).fade(F, 0.0),
                seg(20.0, 35.0, orbit(0.0, 8.0), hold(60.0)),
                seg(35.0, 43.0, hold(120.0), lerp(60.0, 10.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(8.0, 20.0, hold(120.0), hold(60.0)).fade(F, 0.0),
                seg(20.0, 35.0, orbit(120.0, 8.0), hold(60.0)),
                seg(35.0, 43.0, hold(240.0), lerp(60.0, 10.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(10.0, 20.0, hold(240.0), hold(60.0)).fade(F, 0.0),
                seg(20.0, 35.0, orbit(240.0, 8.0), hold(60.0)),
                seg(35.0, 43.0, hold(360.0), lerp(60.0, 10.0)).fade(0.0, F),
            ],
        },
    ],
};

/// A contact crossing straight through the center, then a swaying straggler
const TRANSIT: RadarPattern = RadarPattern {
    name: "Transit",
    actors: &[
        Actor {
            segments: &[
                seg(8.0, 20.0, hold(300.0), lerp(100.0, 0.0)).fade(F, 0.0),
                seg(20.0, 32.0, hold(120.0), lerp(0.0, 100.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[seg(26.0, 42.0, hold(210.0).with_waves(SWAY), lerp(95.0, 15.0)).fade(F, F)],
        },
    ],
};

/// A jumpy contact, brief echo bursts, then a stuttering spin
const GLITCH_SIGNAL: RadarPattern = RadarPattern {
    name: "Glitch Signal",
    actors: &[
        Actor {
            segments: &[seg(6.0, 40.0, hold(135.0), hold(55.0)).fade(F, F).snap(0.7, 40.0, 25.0)],
        },
        Actor {
            segments: &[
                seg(12.0, 13.5, hold(300.0), hold(80.0)).snap(0.3, 15.0, 10.0),
                seg(21.0, 22.0, hold(20.0), hold(35.0)).snap(0.3, 15.0, 10.0),
                seg(30.0, 31.5, hold(240.0), hold(70.0)).snap(0.3, 15.0, 10.0),
            ],
        },
        Actor {
            segments: &[seg(33.0, 43.0, orbit(60.0, -45.0), hold(30.0).with_waves(STUTTER)).fade(1.0, F)],
        },
    ],
};

/// Two mirrored contacts orbiting together, then spiralling in
const TWINS: RadarPattern = RadarPattern {
    name: "Twins",
    actors: &[
        Actor {
            segments: &[
                seg(6.0, 30.0, orbit(0.0, 15.0), hold(50.0).with_waves(BREATH)).fade(F, 0.0),
                seg(30.0, 42.0, orbit(360.0, 30.0), lerp(50.0, 20.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(6.0, 30.0, orbit(180.0, 15.0), hold(50.0).with_waves(BREATH)).fade(F, 0.0),
                seg(30.0, 42.0, orbit(540.0, 30.0), lerp(50.0, 20.0)).fade(0.0, F),
            ],
        },
    ],
};

/// Six flickering contacts on a lattice, twice
const MATRIX_FAILURE: RadarPattern = RadarPattern {
    name: "Matrix Failure",
    actors: &[
        Actor {
            segments: &[
                seg(6.0, 16.0, hold(0.0), hold(40.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(26.0, 34.0, hold(30.0), hold(80.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
        Actor {
            segments: &[
                seg(7.5, 17.5, hold(60.0), hold(80.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(27.0, 35.0, hold(90.0), hold(40.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
        Actor {
            segments: &[
                seg(9.0, 19.0, hold(120.0), hold(40.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(28.0, 36.0, hold(150.0), hold(80.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
        Actor {
            segments: &[
                seg(10.5, 20.5, hold(180.0), hold(80.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(29.0, 37.0, hold(210.0), hold(40.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
        Actor {
            segments: &[
                seg(12.0, 22.0, hold(240.0), hold(40.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(30.0, 38.0, hold(270.0), hold(80.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
        Actor {
            segments: &[
                seg(13.5, 23.5, hold(300.0), hold(80.0)).fade(0.5, 0.5).snap(1.0, 10.0, 8.0),
                seg(31.0, 39.0, hold(330.0), hold(40.0)).fade(0.3, 0.3).snap(0.5, 20.0, 12.0),
            ],
        },
    ],
};

/// One slow contact meandering around mid-range
const WANDERING_WISP: RadarPattern = RadarPattern {
    name: "Wandering Wisp",
    actors: &[Actor {
        segments: &[seg(6.0, 43.0, orbit(200.0, 6.0).with_waves(WISP_ANGLE), hold(55.0).with_waves(WISP_RADIUS)).fade(F, F)],
    }],
};

/// Five contacts closing in from the edge, circling, then scattering
const THE_SIEGE: RadarPattern = RadarPattern {
    name: "The Siege",
    actors: &[
        Actor {
            segments: &[
                seg(8.0, 30.0, hold(0.0), lerp(95.0, 45.0)).fade(F, 0.0),
                seg(30.0, 40.0, orbit(0.0, 10.0), hold(45.0)),
                seg(40.0, 44.0, hold(100.0), lerp(45.0, 100.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(9.0, 30.0, hold(72.0), lerp(95.0, 45.0)).fade(F, 0.0),
                seg(30.0, 40.0, orbit(72.0, 10.0), hold(45.0)),
                seg(40.0, 44.0, hold(172.0), lerp(45.0, 100.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(10.0, 30.0, hold(144.0), lerp(95.0, 45.0)).fade(F, 0.0),
                seg(30.0, 40.0, orbit(144.0, 10.0), hold(45.0)),
                seg(40.0, 44.0, hold(244.0), lerp(45.0, 100.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(11.0, 30.0, hold(216.0), lerp(95.0, 45.0)).fade(F, 0.0),
                seg(30.0, 40.0, orbit(216.0, 10.0), hold(45.0)),
                seg(40.0, 44.0, hold(316.0), lerp(45.0, 100.0)).fade(0.0, F),
            ],
        },
        Actor {
            segments: &[
                seg(12.0, 30.0, hold(288.0), lerp(95.0, 45.0)).fade(F, 0.0),
                seg(30.0, 40.0, orbit(288.0, 10.0), hold(45.0)),
                seg(40.0, 44.0, hold(388.0), lerp(45.0, 100.0)).fade(0.0, F),
            ],
        },
    ],
};

/// One contact staggering outward along a three-quarter turn
const DRUNKEN_PATH: RadarPattern = RadarPattern {
    name: "Drunken Path",
    actors: &[Actor {
        segments: &[seg(6.0, 42.0, lerp(0.0, 270.0).with_waves(STAGGER_ANGLE), lerp(20.0, 85.0).with_waves(STAGGER_RADIUS)).fade(F, F)],
    }],
};

/// One contact blinking in and out at unrelated spots
const THE_BLINK: RadarPattern = RadarPattern {
    name: "The Blink",
    actors: &[Actor {
        segments: &[
            seg(8.0, 10.0, hold(45.0), hold(70.0)).fade(0.3, 0.3),
            seg(13.0, 15.0, hold(200.0), hold(40.0)).fade(0.3, 0.3),
            seg(18.0, 19.0, hold(300.0), hold(85.0)).fade(0.3, 0.3),
            seg(24.0, 27.0, hold(120.0), hold(60.0)).fade(0.3, 0.3),
            seg(31.0, 32.0, hold(10.0), hold(30.0)).fade(0.3, 0.3),
            seg(36.0, 40.0, hold(250.0), hold(75.0)).fade(0.3, 0.3),
        ],
    }],
};

/// All radar patterns, indexed by pattern id; the first five form the classic set
pub static RADAR_PATTERNS: [RadarPattern; 10] = [
    PURSUIT,
    TRIANGLE,
    TRANSIT,
    GLITCH_SIGNAL,
    TWINS,
    MATRIX_FAILURE,
    WANDERING_WISP,
    THE_SIEGE,
    DRUNKEN_PATH,
    THE_BLINK,
];

/// Size of the classic pattern set
pub const CLASSIC_PATTERN_COUNT: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::get_position;
    use crate::{RADAR_CYCLE_SECS, RADAR_WARMUP_SECS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn eval(pattern: usize, t: f64) -> Vec<Placement> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut snaps = [SnapState::default(); MAX_ACTORS];
        RADAR_PATTERNS[pattern].evaluate(t, &mut snaps, &mut rng)
    }

    #[test]
    fn test_actor_counts() {
        for p in RADAR_PATTERNS.iter() {
            assert!(!p.actors.is_empty() && p.actors.len() <= MAX_ACTORS, "{}", p.name);
        }
    }

    #[test]
    fn test_segments_ordered_and_inside_cycle() {
        for p in RADAR_PATTERNS.iter() {
            for actor in p.actors {
                let mut last_end = RADAR_WARMUP_SECS;
                for s in actor.segments {
                    assert!(s.start >= last_end, "{}: overlapping segments", p.name);
                    assert!(s.end > s.start, "{}: empty segment", p.name);
                    assert!(s.end <= RADAR_CYCLE_SECS, "{}: segment past cycle", p.name);
                    last_end = s.end;
                }
            }
        }
    }

    #[test]
    fn test_placements_stay_on_plot() {
        let mut rng = StdRng::seed_from_u64(17);
        for p in RADAR_PATTERNS.iter() {
            let mut snaps = [SnapState::default(); MAX_ACTORS];
            let mut t = 0.0;
            while t < RADAR_CYCLE_SECS {
                for pl in p.evaluate(t, &mut snaps, &mut rng) {
                    assert!((0.0..=100.0).contains(&pl.radius), "{} at {}", p.name, t);
                    assert!((0.0..=1.0).contains(&pl.intensity), "{} at {}", p.name, t);
                    let pos = get_position(pl.angle, pl.radius);
                    assert!((0.0..=1.0).contains(&pos.x) && (0.0..=1.0).contains(&pos.y));
                }
                t += 0.1;
            }
        }
    }

    #[test]
    fn test_triangle_formation() {
        let dots = eval(1, 15.0);
        assert_eq!(dots.len(), 3);
        let angles: Vec<f64> = dots.iter().map(|d| d.angle).collect();
        assert_eq!(angles, vec![0.0, 120.0, 240.0]);
        assert!(dots.iter().all(|d| d.radius == 60.0 && d.intensity == 1.0));
    }

    #[test]
    fn test_triangle_staggered_entry() {
        assert_eq!(eval(1, 7.0).len(), 1);
        assert_eq!(eval(1, 9.0).len(), 2);
        assert_eq!(eval(1, 11.0).len(), 3);
    }

    #[test]
    fn test_fade_in_ramps_linearly() {
        // Triangle actor 0 fades in over 6.0..8.0
        let dots = eval(1, 7.0);
        assert!((dots[0].intensity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fade_out_ramps_linearly() {
        // Triangle collapse ends at 43 with a 2 s fade-out
        let dots = eval(1, 42.0);
        assert_eq!(dots.len(), 3);
        assert!(dots.iter().all(|d| (d.intensity - 0.5).abs() < 1e-9));
    }

    #[test]
    fn test_transit_crosses_center() {
        let dots = eval(2, 19.99);
        assert_eq!(dots.len(), 1);
        assert!(dots[0].radius < 0.2);
        let dots = eval(2, 26.0);
        assert_eq!(dots.len(), 2);
        assert_eq!(dots[0].angle, 120.0);
        assert!((dots[0].radius - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_advances_angle() {
        // Twins: 15 deg/s from 6.0
        let dots = eval(4, 10.0);
        assert!((dots[0].angle - 60.0).abs() < 1e-9);
        assert!((dots[1].angle - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_blink_windows() {
        assert_eq!(eval(9, 9.0).len(), 1);
        assert_eq!(eval(9, 11.0).len(), 0);
        assert_eq!(eval(9, 18.5).len(), 1);
        assert_eq!(eval(9, 44.0).len(), 0);
    }

    #[test]
    fn test_snap_offsets_hold_within_epoch() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut snaps = [SnapState::default(); MAX_ACTORS];
        let p = &RADAR_PATTERNS[3];
        // Glitch actor 0 snaps every 0.7 s: 8.45 and 8.65 share an epoch
        let a = p.evaluate(8.45, &mut snaps, &mut rng)[0];
        let b = p.evaluate(8.65, &mut snaps, &mut rng)[0];
        assert_eq!(a.angle, b.angle);
        assert_eq!(a.radius, b.radius);
        assert!((a.angle - 135.0).abs() <= 40.0);
    }

    #[test]
    fn test_unsnapped_patterns_deterministic() {
        // Patterns without snaps are pure functions of elapsed time
        for idx in [0, 1, 2, 4, 6, 7, 8, 9] {
            let mut t = 6.0;
            while t < RADAR_CYCLE_SECS {
                assert_eq!(eval(idx, t), eval(idx, t));
                t += 1.3;
            }
        }
    }
}
