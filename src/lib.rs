//! Specter: procedural pattern engines for ghost-detector instrument displays
//!
//! Three instruments, one shape of design:
//! EMF gauge (scalar 0-300), radar (set of fading dots), candle magnetometer
//! (scalar + flame intensity). Each is driven by a fixed-rate tick.

pub mod core;
pub mod types;

// =============================================================================
// TICK RATES [C]
// =============================================================================

/// EMF tick interval (seconds) - 20 Hz
pub const EMF_TICK_SECS: f64 = 0.05;

/// Radar tick interval (seconds) - 10 Hz
pub const RADAR_TICK_SECS: f64 = 0.1;

/// Magnetometer tick interval (seconds) - 20 Hz
pub const MAGNETOMETER_TICK_SECS: f64 = 0.05;

// =============================================================================
// EMF [C]
// =============================================================================

/// Lowest publishable EMF reading (mG)
pub const EMF_MIN: f64 = 0.0;

/// Highest publishable EMF reading (mG)
pub const EMF_MAX: f64 = 300.0;

/// Fraction of the gap to the noisy target closed per tick
pub const EMF_SMOOTHING: f64 = 0.2;

// =============================================================================
// RADAR [C]
// =============================================================================

/// Radar pattern cycle length (seconds), same for every pattern
pub const RADAR_CYCLE_SECS: f64 = 45.0;

/// No dots are published before this point of a cycle (seconds)
pub const RADAR_WARMUP_SECS: f64 = 6.0;

/// Default fade-in/out length at actor entry/exit (seconds)
pub const RADAR_FADE_SECS: f64 = 2.0;

/// Legacy scatter radar: dots older than this are dropped (seconds)
pub const SCATTER_MAX_AGE_SECS: f64 = 3.0;

/// Legacy scatter radar: spawn chance = sensitivity * this
pub const SCATTER_SPAWN_SCALE: f64 = 0.3;

// =============================================================================
// MAGNETOMETER [C]
// =============================================================================

/// Half-width of the uniform noise component
pub const MAGNETOMETER_NOISE: f64 = 100.0;

/// Amplitude of the wall-clock drift component
pub const MAGNETOMETER_DRIFT: f64 = 20.0;

// =============================================================================
// SETTINGS DEFAULTS
// =============================================================================

pub const DEFAULT_SENSITIVITY: f64 = 0.5;
pub const DEFAULT_VOLUME: f64 = 0.5;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
