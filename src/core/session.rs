//! Session: the three instrument drivers plus settings and tab state
//!
//! Exactly one instrument runs at a time once a tab is chosen. Switching
//! tab stops the others and reports the audio the app should play.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::clock::seeded_rng;
use crate::core::config::EngineConfig;
use crate::core::scheduler::Driver;
use crate::core::settings_store::SettingsStore;
use crate::core::{EmfEngine, MagnetometerEngine, RadarEngine};
use crate::types::{
    AudioMode, EmfFrame, EngineError, Frame, InstrumentKind, MagnetometerFrame, RadarFrame, Tab,
    UserSettings,
};

/// Per-instrument status line
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentStatus {
    pub instrument: InstrumentKind,
    pub running: bool,
    pub ticks: u64,
}

pub struct Session {
    emf: Driver<EmfEngine>,
    radar: Driver<RadarEngine>,
    magnetometer: Driver<MagnetometerEngine>,
    settings: UserSettings,
    store: Option<SettingsStore>,
    tab: Option<Tab>,
}

impl Session {
    pub fn new(config: &EngineConfig, mut settings: UserSettings) -> Result<Self, EngineError> {
        config.validate()?;
        let emf = EmfEngine::with_rng(config.emf.stop_behavior, seeded_rng(config.seed, 0))?;
        let mut radar = RadarEngine::with_rng(config.radar, seeded_rng(config.seed, 1))?;
        let magnetometer =
            MagnetometerEngine::with_rng(config.magnetometer.stop_behavior, seeded_rng(config.seed, 2));

        for field in settings.repair() {
            warn!(field, "settings value out of range, using default");
        }
        radar.set_sensitivity(settings.radar_sensitivity)?;

        Ok(Self {
            emf: Driver::new(emf),
            radar: Driver::new(radar),
            magnetometer: Driver::new(magnetometer),
            settings,
            store: None,
            tab: None,
        })
    }

    /// Session backed by a settings file
    pub fn with_store(config: &EngineConfig, store: SettingsStore) -> Result<Self, EngineError> {
        let mut session = Self::new(config, store.load())?;
        session.store = Some(store);
        Ok(session)
    }

    pub async fn start(&mut self, kind: InstrumentKind) {
        match kind {
            InstrumentKind::Emf => self.emf.start().await,
            InstrumentKind::Radar => self.radar.start().await,
            InstrumentKind::Magnetometer => self.magnetometer.start().await,
        }
    }

    pub async fn stop(&mut self, kind: InstrumentKind) {
        match kind {
            InstrumentKind::Emf => self.emf.stop().await,
            InstrumentKind::Radar => self.radar.stop().await,
            InstrumentKind::Magnetometer => self.magnetometer.stop().await,
        }
    }

    pub async fn stop_all(&mut self) {
        for kind in InstrumentKind::ALL {
            self.stop(kind).await;
        }
    }

    /// Show a tab: start its instrument, stop the rest
    pub async fn switch_tab(&mut self, tab: Tab) -> AudioMode {
        let wanted = tab.instrument();
        for kind in InstrumentKind::ALL {
            if Some(kind) != wanted && self.is_running(kind) {
                self.stop(kind).await;
            }
        }
        if let Some(kind) = wanted {
            self.start(kind).await;
        }
        self.tab = Some(tab);
        let audio = tab.audio_mode(self.settings.sound_enabled);
        info!(tab = tab.title(), ?audio, "tab switched");
        audio
    }

    /// Audio for a sweep cue requested on the current tab
    pub fn trigger_radar_audio(&self) -> AudioMode {
        let audio = match self.tab {
            Some(tab) => tab.cue_audio(self.settings.sound_enabled),
            None => AudioMode::None,
        };
        debug!(?audio, "sweep cue requested");
        audio
    }

    /// Update radar sensitivity and persist it
    pub async fn set_sensitivity(&mut self, value: f64) -> Result<(), EngineError> {
        self.settings.set_sensitivity(value)?;
        self.radar.engine().lock().await.set_sensitivity(value)?;
        self.persist()
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Result<(), EngineError> {
        self.settings.sound_enabled = enabled;
        self.persist()
    }

    pub fn set_volume(&mut self, value: f64) -> Result<(), EngineError> {
        self.settings.set_volume(value)?;
        self.persist()
    }

    pub fn complete_onboarding(&mut self) -> Result<(), EngineError> {
        self.settings.has_completed_onboarding = true;
        self.persist()
    }

    pub fn unlock_premium(&mut self) -> Result<(), EngineError> {
        self.settings.has_unlocked_premium = true;
        self.persist()
    }

    fn persist(&self) -> Result<(), EngineError> {
        match &self.store {
            Some(store) => store.save(&self.settings),
            None => Ok(()),
        }
    }

    /// Whether the paywall should be shown
    pub fn premium_locked(&self) -> bool {
        !self.settings.has_unlocked_premium
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn tab(&self) -> Option<Tab> {
        self.tab
    }

    pub fn is_running(&self, kind: InstrumentKind) -> bool {
        match kind {
            InstrumentKind::Emf => self.emf.is_running(),
            InstrumentKind::Radar => self.radar.is_running(),
            InstrumentKind::Magnetometer => self.magnetometer.is_running(),
        }
    }

    pub fn ticks(&self, kind: InstrumentKind) -> u64 {
        match kind {
            InstrumentKind::Emf => self.emf.ticks(),
            InstrumentKind::Radar => self.radar.ticks(),
            InstrumentKind::Magnetometer => self.magnetometer.ticks(),
        }
    }

    /// Latest published frame for an instrument
    pub fn frame(&self, kind: InstrumentKind) -> Frame {
        match kind {
            InstrumentKind::Emf => self.emf.current().into(),
            InstrumentKind::Radar => self.radar.current().into(),
            InstrumentKind::Magnetometer => self.magnetometer.current().into(),
        }
    }

    pub fn status(&self) -> Vec<InstrumentStatus> {
        InstrumentKind::ALL
            .iter()
            .map(|&kind| InstrumentStatus {
                instrument: kind,
                running: self.is_running(kind),
                ticks: self.ticks(kind),
            })
            .collect()
    }

    pub fn emf_feed(&self) -> watch::Receiver<EmfFrame> {
        self.emf.subscribe()
    }

    pub fn radar_feed(&self) -> watch::Receiver<RadarFrame> {
        self.radar.subscribe()
    }

    pub fn magnetometer_feed(&self) -> watch::Receiver<MagnetometerFrame> {
        self.magnetometer.subscribe()
    }
}

// =============================================================================
// TESTS
// =============================================================================
