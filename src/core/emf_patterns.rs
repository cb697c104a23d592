//! EMF pattern tables
//!
//! Each pattern is a contiguous list of phases covering [0, duration).
//! A phase pairs a target generator with a noise half-width. Linear
//! generators interpolate across their own phase window; sines run on
//! absolute elapsed time so a phase joins its neighbours mid-wave.
//!
//! | # | Name            | Duration |
//! |---|-----------------|----------|
//! | 0 | Classic Haunt   | 120 s    |
//! | 1 | Heartbeat       | 40 s     |
//! | 2 | Malfunction     | 40 s     |
//! | 3 | Slow Burn       | 45 s     |
//! | 4 | Passing Through | 35 s     |
//! | 5 | High Noise      | 45 s     |

use rand::Rng;

/// One (until, value) entry of a step target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub until: f64,
    pub value: f64,
}

/// A spike inside a repeating pulse, offsets relative to the period start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    pub at: f64,
    pub width: f64,
    pub level: f64,
}

/// Base-value generator of a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Constant(f64),
    /// from -> to across the phase window
    Linear { from: f64, to: f64 },
    /// center + sin(elapsed * rate) * amplitude
    Sine { center: f64, amplitude: f64, rate: f64 },
    /// First step whose `until` is above elapsed; last value past the end
    Steps(&'static [Step]),
    /// Base level with beats repeating every `period`
    Pulse { base: f64, period: f64, beats: &'static [Beat] },
    /// `high` for the first `duty` fraction of each period, else `low`
    Square { low: f64, high: f64, period: f64, duty: f64 },
    /// Random level in [min, max], redrawn after a random hold in [hold_min, hold_max]
    Chaos { min: f64, max: f64, hold_min: f64, hold_max: f64 },
}

/// Noise half-width generator of a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Noise {
    Fixed(f64),
    /// from -> to across the phase window
    Ramp { from: f64, to: f64 },
    /// Fresh uniform draw in [min, max] every tick
    Random { min: f64, max: f64 },
}

/// A named time window of a pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub name: &'static str,
    pub start: f64,
    pub end: f64,
    pub target: Target,
    pub noise: Noise,
}

/// A hand-authored EMF choreography
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmfPattern {
    pub name: &'static str,
    pub duration: f64,
    pub phases: &'static [Phase],
}

/// Pattern output before jitter, clamp and smoothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmfTarget {
    pub base: f64,
    /// Half-width of the uniform jitter, never negative
    pub noise: f64,
}

/// Held level of a chaos phase
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChaosState {
    target: f64,
    hold: f64,
    drawn_at: Option<f64>,
}

impl ChaosState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn level<R: Rng + ?Sized>(
        &mut self,
        t: f64,
        min: f64,
        max: f64,
        hold_min: f64,
        hold_max: f64,
        rng: &mut R,
    ) -> f64 {
        let due = match self.drawn_at {
            None => true,
            Some(at) => t < at || t - at >= self.hold,
        };
        if due {
            self.target = uniform(rng, min, max);
            self.hold = uniform(rng, hold_min, hold_max);
            self.drawn_at = Some(t);
        }
        self.target
    }
}

/// Uniform draw in [lo, hi], tolerant of lo == hi
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

impl Phase {
    /// 0 at phase start, 1 at phase end
    fn progress(&self, t: f64) -> f64 {
        ((t - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    fn base<R: Rng + ?Sized>(&self, t: f64, chaos: &mut ChaosState, rng: &mut R) -> f64 {
        match self.target {
            Target::Constant(v) => v,
            Target::Linear { from, to } => from + (to - from) * self.progress(t),
            Target::Sine { center, amplitude, rate } => center + (t * rate).sin() * amplitude,
            Target::Steps(steps) => steps
                .iter()
                .find(|s| t < s.until)
                .or_else(|| steps.last())
                .map(|s| s.value)
                .unwrap_or(0.0),
            Target::Pulse { base, period, beats } => {
                let local = (t - self.start).rem_euclid(period);
                beats
                    .iter()
                    .find(|b| local >= b.at && local < b.at + b.width)
                    .map(|b| b.level)
                    .unwrap_or(base)
            }
            Target::Square { low, high, period, duty } => {
                let local = (t - self.start).rem_euclid(period) / period;
                if local < duty {
                    high
                } else {
                    low
                }
            }
            Target::Chaos { min, max, hold_min, hold_max } => {
                chaos.level(t, min, max, hold_min, hold_max, rng)
            }
        }
    }

    fn noise<R: Rng + ?Sized>(&self, t: f64, rng: &mut R) -> f64 {
        let n = match self.noise {
            Noise::Fixed(n) => n,
            Noise::Ramp { from, to } => from + (to - from) * self.progress(t),
            Noise::Random { min, max } => uniform(rng, min, max),
        };
        n.max(0.0)
    }
}

impl EmfPattern {
    /// Phase covering elapsed `t`; the last phase covers anything beyond
    pub fn phase_at(&self, t: f64) -> Option<&Phase> {
        self.phases.iter().find(|p| t < p.end).or_else(|| self.phases.last())
    }

    /// Target base and noise half-width at elapsed `t`
    pub fn evaluate<R: Rng + ?Sized>(&self, t: f64, chaos: &mut ChaosState, rng: &mut R) -> EmfTarget {
        match self.phase_at(t) {
            Some(phase) => EmfTarget {
                base: phase.base(t, chaos, rng),
                noise: phase.noise(t, rng),
            },
            None => EmfTarget { base: 0.0, noise: 0.0 },
        }
    }
}

// =============================================================================
// TABLES
// =============================================================================

const fn phase(name: &'static str, start: f64, end: f64, target: Target, noise: Noise) -> Phase {
    Phase { name, start, end, target, noise }
}

const fn step(until: f64, value: f64) -> Step {
    Step { until, value }
}

const fn beat(at: f64, width: f64, level: f64) -> Beat {
    Beat { at, width, level }
}

const fn lin(from: f64, to: f64) -> Target {
    Target::Linear { from, to }
}

const fn sine(center: f64, amplitude: f64, rate: f64) -> Target {
    Target::Sine { center, amplitude, rate }
}

const fn ramp(from: f64, to: f64) -> Noise {
    Noise::Ramp { from, to }
}

use self::Noise::Fixed;
use self::Target::Constant;

const THRASH_STEPS: &[Step] = &[step(31.5, 250.0), step(33.5, 280.0), step(35.0, 220.0)];
const REBOUND_STEPS: &[Step] = &[step(37.0, 110.0), step(40.0, 160.0), step(45.0, 80.0)];
const SLAM_STEPS: &[Step] = &[step(31.0, 300.0), step(32.0, 0.0), step(33.0, 300.0), step(34.0, 0.0)];

// lub-dub
const RESTING_BEATS: &[Beat] = &[beat(0.0, 0.2, 140.0), beat(0.35, 0.2, 100.0)];
const RACING_BEATS: &[Beat] = &[beat(0.0, 0.15, 210.0), beat(0.25, 0.15, 160.0)];

const CLASSIC_HAUNT: EmfPattern = EmfPattern {
    name: "Classic Haunt",
    duration: 120.0,
    phases: &[
        // False calm
        phase("rise", 0.0, 7.0, lin(0.0, 20.0), Fixed(2.0)),
        phase("drift", 7.0, 25.0, sine(37.5, 7.5, 0.5), Fixed(3.0)),
        phase("settle", 25.0, 28.0, lin(35.0, 15.0), Fixed(1.0)),
        // Aggressive surge
        phase("spike", 28.0, 30.0, Constant(290.0), Fixed(20.0)),
        phase(
            "thrash",
            30.0,
            35.0,
            Target::Steps(THRASH_STEPS),
            Fixed(15.0),
        ),
        phase(
            "rebound",
            35.0,
            45.0,
            Target::Steps(REBOUND_STEPS),
            ramp(15.0, 5.0),
        ),
        // Unstable trail
        phase(
            "trail",
            45.0,
            90.0,
            Target::Chaos { min: 50.0, max: 180.0, hold_min: 2.0, hold_max: 3.0 },
            Noise::Random { min: 5.0, max: 8.0 },
        ),
        // Second wave
        phase("echo", 90.0, 100.0, lin(80.0, 190.0), ramp(5.0, 10.0)),
        phase("echo hold", 100.0, 110.0, sine(185.0, 5.0, 2.0), Fixed(10.0)),
        // Finale
        phase("fade", 110.0, 120.0, lin(185.0, 50.0), Fixed(2.0)),
    ],
};

const HEARTBEAT: EmfPattern = EmfPattern {
    name: "Heartbeat",
    duration: 40.0,
    phases: &[
        phase("wake", 0.0, 4.0, lin(0.0, 30.0), Fixed(2.0)),
        phase(
            "resting pulse",
            4.0,
            20.0,
            Target::Pulse {
                base: 35.0,
                period: 1.5,
                beats: RESTING_BEATS,
            },
            Fixed(5.0),
        ),
        phase(
            "racing pulse",
            20.0,
            32.0,
            Target::Pulse {
                base: 50.0,
                period: 0.9,
                beats: RACING_BEATS,
            },
            Fixed(8.0),
        ),
        phase("flatline", 32.0, 36.0, Constant(45.0), Fixed(1.0)),
        phase("fade", 36.0, 40.0, lin(45.0, 5.0), Fixed(2.0)),
    ],
};

const MALFUNCTION: EmfPattern = EmfPattern {
    name: "Malfunction",
    duration: 40.0,
    phases: &[
        phase("idle", 0.0, 5.0, Constant(15.0), Fixed(3.0)),
        phase(
            "flicker",
            5.0,
            15.0,
            Target::Square { low: 20.0, high: 240.0, period: 1.2, duty: 0.3 },
            Fixed(10.0),
        ),
        phase("dead", 15.0, 18.0, Constant(0.0), Fixed(0.0)),
        phase(
            "short circuit",
            18.0,
            30.0,
            Target::Chaos { min: 0.0, max: 300.0, hold_min: 0.5, hold_max: 1.0 },
            Noise::Random { min: 10.0, max: 25.0 },
        ),
        phase(
            "slam",
            30.0,
            34.0,
            Target::Steps(SLAM_STEPS),
            Fixed(5.0),
        ),
        phase("reboot", 34.0, 40.0, lin(120.0, 10.0), Fixed(4.0)),
    ],
};

const SLOW_BURN: EmfPattern = EmfPattern {
    name: "Slow Burn",
    duration: 45.0,
    phases: &[
        phase("build", 0.0, 30.0, lin(10.0, 220.0), ramp(2.0, 12.0)),
        phase("smoulder", 30.0, 38.0, sine(230.0, 15.0, 1.5), Fixed(12.0)),
        phase("cool", 38.0, 45.0, lin(230.0, 20.0), ramp(12.0, 2.0)),
    ],
};

const PASSING_THROUGH: EmfPattern = EmfPattern {
    name: "Passing Through",
    duration: 35.0,
    phases: &[
        phase("quiet", 0.0, 8.0, Constant(12.0), Fixed(2.0)),
        phase("approach", 8.0, 15.0, lin(12.0, 240.0), ramp(2.0, 15.0)),
        phase("closest", 15.0, 20.0, sine(260.0, 20.0, 3.0), Fixed(15.0)),
        phase("recede", 20.0, 27.0, lin(250.0, 12.0), ramp(15.0, 2.0)),
        phase("gone", 27.0, 35.0, Constant(12.0), Fixed(2.0)),
    ],
};

const HIGH_NOISE: EmfPattern = EmfPattern {
    name: "High Noise",
    duration: 45.0,
    phases: &[
        phase("static", 0.0, 10.0, sine(100.0, 30.0, 0.8), Fixed(25.0)),
        phase(
            "storm",
            10.0,
            25.0,
            Target::Chaos { min: 60.0, max: 220.0, hold_min: 1.0, hold_max: 2.0 },
            Noise::Random { min: 20.0, max: 35.0 },
        ),
        phase("roar", 25.0, 35.0, Constant(150.0), Fixed(40.0)),
        phase("subside", 35.0, 45.0, lin(150.0, 40.0), ramp(40.0, 10.0)),
    ],
};

/// All EMF patterns, indexed by pattern id
pub static EMF_PATTERNS: [EmfPattern; 6] = [
    CLASSIC_HAUNT,
    HEARTBEAT,
    MALFUNCTION,
    SLOW_BURN,
    PASSING_THROUGH,
    HIGH_NOISE,
];

/// Cycle durations in pattern-id order
pub fn emf_durations() -> Vec<f64> {
    EMF_PATTERNS.iter().map(|p| p.duration).collect()
}
