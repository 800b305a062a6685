pub mod audio;
pub mod export;
pub mod narration;
pub mod presentation;
pub mod protocol;
pub mod reveal;
pub mod story_template;
pub mod theme_renderer;

#[cfg(feature = "music")]
mod music_rodio;
#[cfg(feature = "narration")]
mod speech_tts;

use std::sync::Arc;

use crate::engine::audio::MusicBackend;
use crate::engine::narration::SpeechBackend;

/// Speech backend for this build; reports itself unavailable without the
/// `narration` feature.
pub fn system_speech() -> Arc<dyn SpeechBackend> {
    #[cfg(feature = "narration")]
    {
        Arc::new(speech_tts::SystemSpeech::probe())
    }
    #[cfg(not(feature = "narration"))]
    {
        Arc::new(narration::UnavailableSpeech)
    }
}

/// Music output for this build; silent without the `music` feature or an
/// audio device.
pub fn system_music() -> Box<dyn MusicBackend> {
    #[cfg(feature = "music")]
    {
        let music: Box<dyn MusicBackend> = match music_rodio::RodioMusic::open() {
            Ok(music) => Box::new(music),
            Err(_) => Box::new(audio::SilentMusic),
        };
        music
    }
    #[cfg(not(feature = "music"))]
    {
        Box::new(audio::SilentMusic)
    }
}
