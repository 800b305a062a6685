use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::engine::protocol::NarrationEvent;

pub const DEFAULT_VOICE_SPEED: u32 = 150;
pub const MIN_VOICE_SPEED: u32 = 100;
pub const MAX_VOICE_SPEED: u32 = 300;

const FEMALE_MARKER: &str = "female";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    #[error("Text-to-speech not available")]
    Unavailable,
    #[error("speech engine could not start: {0}")]
    Init(String),
    #[error("Failed to read text aloud: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
}

/// One synthesizer instance. `stop` may be called from any thread while
/// another thread is blocked in `speak_to_end`.
pub trait SpeechEngine: Send + Sync {
    fn voices(&self) -> Result<Vec<VoiceInfo>, NarrationError>;
    fn set_voice(&self, voice: &VoiceInfo) -> Result<(), NarrationError>;
    fn set_rate(&self, words_per_minute: u32) -> Result<(), NarrationError>;
    /// Blocks until the text has been spoken or `stop` is called.
    fn speak_to_end(&self, text: &str) -> Result<(), NarrationError>;
    fn stop(&self) -> Result<(), NarrationError>;
}

pub trait SpeechBackend: Send + Sync {
    fn is_available(&self) -> bool;
    fn create_engine(&self) -> Result<Arc<dyn SpeechEngine>, NarrationError>;
}

/// Used when the binary is built without a speech backend.
pub struct UnavailableSpeech;

impl SpeechBackend for UnavailableSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn create_engine(&self) -> Result<Arc<dyn SpeechEngine>, NarrationError> {
        Err(NarrationError::Unavailable)
    }
}

/// Prefers the first voice whose name carries the female marker.
pub fn pick_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    voices
        .iter()
        .find(|voice| voice.name.to_lowercase().contains(FEMALE_MARKER))
}

struct ActiveNarration {
    id: u64,
    engine: Arc<dyn SpeechEngine>,
    worker: JoinHandle<()>,
}

#[derive(Default)]
struct NarrationSlot {
    active: Option<ActiveNarration>,
    /// Workers that were told to stop but may still be winding down.
    retiring: Vec<JoinHandle<()>>,
}

fn lock(slot: &Mutex<NarrationSlot>) -> MutexGuard<'_, NarrationSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the one narration that may be playing.
///
/// The engine reference lives in a single mutex-guarded slot shared with the
/// worker, which clears the slot on completion only if it still owns it.
pub struct NarrationController {
    backend: Arc<dyn SpeechBackend>,
    available: bool,
    unavailable_reported: bool,
    rate: Arc<AtomicU32>,
    next_id: u64,
    slot: Arc<Mutex<NarrationSlot>>,
    events_tx: Sender<NarrationEvent>,
    events_rx: Receiver<NarrationEvent>,
}

impl NarrationController {
    /// Probes the backend once; the answer is kept for the controller's lifetime.
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        let available = backend.is_available();
        if !available {
            log::warn!("text-to-speech is not available on this system");
        }

        let (events_tx, events_rx) = mpsc::channel();
        Self {
            backend,
            available,
            unavailable_reported: false,
            rate: Arc::new(AtomicU32::new(DEFAULT_VOICE_SPEED)),
            next_id: 0,
            slot: Arc::new(Mutex::new(NarrationSlot::default())),
            events_tx,
            events_rx,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_active(&self) -> bool {
        lock(&self.slot).active.is_some()
    }

    /// Takes effect on the next `speak`; a live engine is adjusted best-effort.
    pub fn set_rate(&self, words_per_minute: u32) {
        let rate = words_per_minute.clamp(MIN_VOICE_SPEED, MAX_VOICE_SPEED);
        self.rate.store(rate, Ordering::Relaxed);

        if let Some(active) = lock(&self.slot).active.as_ref() {
            if let Err(e) = active.engine.set_rate(rate) {
                log::debug!("live rate change ignored: {e}");
            }
        }
    }

    /// Starts reading `text` aloud, after the previous narration has fully stopped.
    ///
    /// When speech is unavailable the first call reports it and later calls
    /// do nothing.
    pub fn speak(&mut self, text: &str) -> Result<(), NarrationError> {
        if !self.available {
            if self.unavailable_reported {
                return Ok(());
            }
            self.unavailable_reported = true;
            return Err(NarrationError::Unavailable);
        }

        self.retire();

        let engine = self.backend.create_engine()?;
        self.next_id += 1;
        let id = self.next_id;

        let worker_engine = Arc::clone(&engine);
        let slot = Arc::clone(&self.slot);
        let events = self.events_tx.clone();
        let rate = Arc::clone(&self.rate);
        let text = text.to_string();

        // Holding the lock across spawn keeps the worker from finishing
        // before it has been registered.
        let mut guard = lock(&self.slot);
        let worker = thread::spawn(move || narrate(id, worker_engine, &text, &rate, &slot, &events));
        guard.active = Some(ActiveNarration { id, engine, worker });
        log::info!("narration #{id} started");

        Ok(())
    }

    /// Stops the current narration, if any.
    pub fn stop(&self) {
        let mut slot = lock(&self.slot);
        if let Some(active) = slot.active.take() {
            if let Err(e) = active.engine.stop() {
                log::warn!("speech engine refused to stop: {e}");
            }
            slot.retiring.push(active.worker);
            log::info!("narration #{} stopped", active.id);
        }
    }

    pub fn poll_events(&self) -> Vec<NarrationEvent> {
        self.events_rx.try_iter().collect()
    }

    /// Stops the current narration and waits for every stopped worker to exit.
    fn retire(&mut self) {
        self.stop();

        let workers = std::mem::take(&mut lock(&self.slot).retiring);
        for worker in workers {
            if worker.join().is_err() {
                log::warn!("narration worker panicked");
            }
        }
    }
}

impl Drop for NarrationController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn narrate(
    id: u64,
    engine: Arc<dyn SpeechEngine>,
    text: &str,
    rate: &AtomicU32,
    slot: &Mutex<NarrationSlot>,
    events: &Sender<NarrationEvent>,
) {
    configure(engine.as_ref(), rate.load(Ordering::Relaxed));

    // A newer narration may have taken over while voices were being set up.
    if !owns(slot, id) {
        log::debug!("narration #{id} stopped before it began speaking");
        return;
    }
    let result = engine.speak_to_end(text);

    let owned = {
        let mut guard = lock(slot);
        match guard.active.as_ref() {
            Some(active) if active.id == id => {
                guard.active = None;
                true
            }
            _ => false,
        }
    };

    match result {
        Ok(()) if owned => {
            log::info!("narration #{id} finished");
            let _ = events.send(NarrationEvent::Finished);
        }
        Ok(()) => {}
        Err(e) => {
            log::warn!("narration #{id} failed: {e}");
            let _ = engine.stop();
            if owned {
                let _ = events.send(NarrationEvent::Failed(e));
            }
        }
    }
}

fn owns(slot: &Mutex<NarrationSlot>, id: u64) -> bool {
    lock(slot).active.as_ref().is_some_and(|active| active.id == id)
}

fn configure(engine: &dyn SpeechEngine, rate: u32) {
    match engine.voices() {
        Ok(voices) => {
            if let Some(voice) = pick_voice(&voices) {
                if let Err(e) = engine.set_voice(voice) {
                    log::debug!("keeping default voice: {e}");
                }
            }
        }
        Err(e) => log::debug!("voice list unavailable: {e}"),
    }

    if let Err(e) = engine.set_rate(rate) {
        log::debug!("speech rate not applied: {e}");
    }
}
