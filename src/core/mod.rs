//! Core modules for Specter

pub mod clock;
pub mod geometry;
pub mod emf_patterns;
pub mod emf;
pub mod radar_patterns;
pub mod radar;
pub mod scatter;
pub mod magnetometer;
pub mod config;
pub mod settings_store;
pub mod scheduler;
pub mod session;
pub mod console;
pub mod api;

pub use clock::{PatternClock, Wrap, pick_next, seeded_rng};
pub use geometry::get_position;
pub use emf_patterns::{EmfPattern, EmfTarget, EMF_PATTERNS};
pub use emf::EmfEngine;
pub use radar_patterns::{RadarPattern, Placement, RADAR_PATTERNS, CLASSIC_PATTERN_COUNT};
pub use radar::RadarEngine;
pub use scatter::ScatterField;
pub use magnetometer::MagnetometerEngine;
pub use config::{EngineConfig, EmfConfig, RadarConfig, MagnetometerConfig, RadarVariant, PatternSet};
pub use settings_store::SettingsStore;
pub use scheduler::{Driver, Instrument};
pub use session::{Session, InstrumentStatus};
pub use console::{parse_command, Command, ParseError, HELP};
pub use api::{create_router, run_server};
