//! Fixed-interval drivers for the instrument engines
//!
//! One tokio task per running instrument. Each tick locks the engine,
//! advances it, and publishes a snapshot on a watch channel so readers
//! never observe a half-updated frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::warn;

use crate::core::{EmfEngine, MagnetometerEngine, RadarEngine};
use crate::types::{EmfFrame, Frame, InstrumentKind, MagnetometerFrame, RadarFrame};
use crate::{EMF_TICK_SECS, MAGNETOMETER_TICK_SECS, RADAR_TICK_SECS};

/// An engine the driver can tick on a fixed period
pub trait Instrument: Send + 'static {
    type Frame: Clone + Into<Frame> + Send + Sync + 'static;

    const KIND: InstrumentKind;
    const PERIOD: Duration;

    fn start(&mut self);
    fn stop(&mut self);
    fn tick(&mut self) -> Self::Frame;
    fn frame(&self) -> Self::Frame;
}

impl Instrument for EmfEngine {
    type Frame = EmfFrame;

    const KIND: InstrumentKind = InstrumentKind::Emf;
    const PERIOD: Duration = Duration::from_millis((EMF_TICK_SECS * 1000.0) as u64);

    fn start(&mut self) {
        EmfEngine::start(self)
    }
    fn stop(&mut self) {
        EmfEngine::stop(self)
    }
    fn tick(&mut self) -> EmfFrame {
        EmfEngine::tick(self)
    }
    fn frame(&self) -> EmfFrame {
        EmfEngine::frame(self)
    }
}

impl Instrument for RadarEngine {
    type Frame = RadarFrame;

    const KIND: InstrumentKind = InstrumentKind::Radar;
    const PERIOD: Duration = Duration::from_millis((RADAR_TICK_SECS * 1000.0) as u64);

    fn start(&mut self) {
        RadarEngine::start(self)
    }
    fn stop(&mut self) {
        RadarEngine::stop(self)
    }
    fn tick(&mut self) -> RadarFrame {
        RadarEngine::tick(self)
    }
    fn frame(&self) -> RadarFrame {
        RadarEngine::frame(self)
    }
}

impl Instrument for MagnetometerEngine {
    type Frame = MagnetometerFrame;

    const KIND: InstrumentKind = InstrumentKind::Magnetometer;
    const PERIOD: Duration = Duration::from_millis((MAGNETOMETER_TICK_SECS * 1000.0) as u64);

    fn start(&mut self) {
        MagnetometerEngine::start(self)
    }
    fn stop(&mut self) {
        MagnetometerEngine::stop(self)
    }
    fn tick(&mut self) -> MagnetometerFrame {
        MagnetometerEngine::tick(self)
    }
    fn frame(&self) -> MagnetometerFrame {
        MagnetometerEngine::frame(self)
    }
}

/// Runs one instrument on its own timer task
pub struct Driver<I: Instrument> {
    engine: Arc<Mutex<I>>,
    tx: watch::Sender<I::Frame>,
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl<I: Instrument> Driver<I> {
    pub fn new(engine: I) -> Self {
        let (tx, _) = watch::channel(engine.frame());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            tx,
            task: None,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start (or restart) the engine and its timer
    ///
    /// Any previous timer is cancelled first so there is never more than
    /// one task ticking the same engine. The first tick lands one period
    /// after start.
    pub async fn start(&mut self) {
        self.cancel().await;
        {
            let mut engine = self.engine.lock().await;
            engine.start();
            self.ticks.store(0, Ordering::SeqCst);
            self.tx.send_replace(engine.frame());
        }

        let engine = Arc::clone(&self.engine);
        let tx = self.tx.clone();
        let ticks = Arc::clone(&self.ticks);
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + I::PERIOD, I::PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // Count and publish under the lock so start/stop frames always land last
                let mut engine = engine.lock().await;
                let frame = engine.tick();
                ticks.fetch_add(1, Ordering::SeqCst);
                tx.send_replace(frame);
            }
        }));
    }

    /// Cancel the timer and apply the engine's stop policy
    ///
    /// Safe to call when already stopped.
    pub async fn stop(&mut self) {
        self.cancel().await;
        let mut engine = self.engine.lock().await;
        engine.stop();
        self.tx.send_replace(engine.frame());
    }

    /// Abort the timer task and wait until it has exited
    async fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(instrument = %I::KIND, error = %e, "timer task failed");
                }
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<I::Frame> {
        self.tx.subscribe()
    }

    /// Latest published frame
    pub fn current(&self) -> I::Frame {
        self.tx.borrow().clone()
    }

    /// Ticks since the last start
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn kind(&self) -> InstrumentKind {
        I::KIND
    }

    /// Shared handle for out-of-band engine access (sensitivity, tests)
    pub fn engine(&self) -> &Arc<Mutex<I>> {
        &self.engine
    }
}

impl<I: Instrument> Drop for Driver<I> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
