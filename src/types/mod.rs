//! Core types for Specter

mod instrument;
mod error;
mod gauge;
mod reading;
mod dot;
mod frame;
mod settings;

pub use instrument::{InstrumentKind, Tab, AudioMode, StopBehavior};
pub use error::EngineError;
pub use gauge::{GaugeBand, needle_angle, candle_offset};
pub use reading::{EmfFrame, MagnetometerReading, MagnetometerFrame};
pub use dot::{Point, DotId, GhostDot, RadarFrame};
pub use frame::Frame;
pub use settings::{UserSettings, check_unit};
