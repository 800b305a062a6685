use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tts::Tts;

use crate::engine::narration::{
    NarrationError, SpeechBackend, SpeechEngine, VoiceInfo, DEFAULT_VOICE_SPEED,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long the service may take to report that an utterance has begun.
const START_GRACE: Duration = Duration::from_secs(2);

/// Rough length of `text` read at `words_per_minute`, for backends that cannot
/// report whether they are still speaking.
fn spoken_duration(text: &str, words_per_minute: u32) -> Duration {
    let words = text.split_whitespace().count() as u64;
    Duration::from_millis(words * 60_000 / u64::from(words_per_minute.max(1)))
}

/// The platform speech service, probed once at startup.
pub struct SystemSpeech {
    available: bool,
}

impl SystemSpeech {
    pub fn probe() -> Self {
        let available = match Tts::default() {
            Ok(mut tts) => {
                let _ = tts.stop();
                true
            }
            Err(e) => {
                log::warn!("speech service probe failed: {e}");
                false
            }
        };
        Self { available }
    }
}

impl SpeechBackend for SystemSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_engine(&self) -> Result<Arc<dyn SpeechEngine>, NarrationError> {
        let tts = Tts::default().map_err(|e| NarrationError::Init(e.to_string()))?;
        Ok(Arc::new(TtsEngine {
            tts: Mutex::new(tts),
            stopped: AtomicBool::new(false),
            words_per_minute: AtomicU32::new(DEFAULT_VOICE_SPEED),
        }))
    }
}

struct TtsEngine {
    tts: Mutex<Tts>,
    stopped: AtomicBool,
    words_per_minute: AtomicU32,
}

impl TtsEngine {
    fn tts(&self) -> MutexGuard<'_, Tts> {
        self.tts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn playback(e: tts::Error) -> NarrationError {
    NarrationError::Playback(e.to_string())
}

impl SpeechEngine for TtsEngine {
    fn voices(&self) -> Result<Vec<VoiceInfo>, NarrationError> {
        let voices = self.tts().voices().map_err(playback)?;
        Ok(voices
            .into_iter()
            .map(|voice| VoiceInfo {
                id: voice.id(),
                name: voice.name(),
            })
            .collect())
    }

    fn set_voice(&self, voice: &VoiceInfo) -> Result<(), NarrationError> {
        let mut tts = self.tts();
        let voices = tts.voices().map_err(playback)?;
        match voices.iter().find(|v| v.id() == voice.id) {
            Some(found) => tts.set_voice(found).map_err(playback),
            None => Err(NarrationError::Playback(format!("voice {} vanished", voice.name))),
        }
    }

    /// Maps words per minute onto the backend's own rate scale, where
    /// `normal_rate` corresponds to the default speed.
    fn set_rate(&self, words_per_minute: u32) -> Result<(), NarrationError> {
        let mut tts = self.tts();
        let scaled = tts.normal_rate() * words_per_minute as f32 / DEFAULT_VOICE_SPEED as f32;
        let rate = scaled.clamp(tts.min_rate(), tts.max_rate());
        tts.set_rate(rate).map_err(playback)?;
        self.words_per_minute.store(words_per_minute, Ordering::Relaxed);
        Ok(())
    }

    /// The stop flag is only read and written under the `tts` lock, so a stop
    /// either prevents `speak` or silences what it started.
    fn speak_to_end(&self, text: &str) -> Result<(), NarrationError> {
        let can_poll = {
            let mut tts = self.tts();
            if self.stopped.load(Ordering::Acquire) {
                return Ok(());
            }
            tts.speak(text, true).map_err(playback)?;
            tts.supported_features().is_speaking
        };

        let started = Instant::now();
        let estimate = spoken_duration(text, self.words_per_minute.load(Ordering::Relaxed));
        let mut heard = false;

        loop {
            thread::sleep(POLL_INTERVAL);

            let mut tts = self.tts();
            if self.stopped.load(Ordering::Acquire) {
                tts.stop().map_err(playback)?;
                return Ok(());
            }

            if !can_poll {
                if started.elapsed() >= estimate {
                    return Ok(());
                }
                continue;
            }

            if tts.is_speaking().map_err(playback)? {
                heard = true;
            } else if heard || started.elapsed() >= START_GRACE {
                return Ok(());
            }
        }
    }

    fn stop(&self) -> Result<(), NarrationError> {
        let mut tts = self.tts();
        self.stopped.store(true, Ordering::Release);
        tts.stop().map(|_| ()).map_err(playback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_follows_the_reading_speed() {
        let text = "It is a truth universally acknowledged, that a single man";

        assert_eq!(spoken_duration(text, 150), Duration::from_millis(4_000));
        assert_eq!(spoken_duration(text, 300), Duration::from_millis(2_000));
        assert_eq!(spoken_duration("", 150), Duration::ZERO);
    }
}
