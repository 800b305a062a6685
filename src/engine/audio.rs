use std::path::{Path, PathBuf};

use crate::model::theme::{ThemeCatalog, ThemeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("Select a theme before playing music")]
    NoTheme,
    #[error("Could not play music: {} is missing", .0.display())]
    MissingTrack(PathBuf),
    #[error("Could not play music from {}: {reason}", .path.display())]
    Unplayable { path: PathBuf, reason: String },
    #[error("No audio output device is available")]
    OutputUnavailable,
    #[error("Background music is disabled in Settings")]
    Disabled,
}

/// Audio output that can loop a single track.
pub trait MusicBackend {
    /// Replaces whatever is playing with `track`, looped forever.
    fn play_looping(&mut self, track: &Path) -> Result<(), AudioError>;
    fn stop(&mut self);
}

/// Stand-in when no audio output could be opened.
pub struct SilentMusic;

impl MusicBackend for SilentMusic {
    fn play_looping(&mut self, _track: &Path) -> Result<(), AudioError> {
        Err(AudioError::OutputUnavailable)
    }

    fn stop(&mut self) {}
}

/// Background music for the selected theme. At most one track plays.
pub struct AudioController {
    backend: Box<dyn MusicBackend>,
    catalog: ThemeCatalog,
    theme: Option<ThemeId>,
    playing: Option<ThemeId>,
}

impl AudioController {
    pub fn new(backend: Box<dyn MusicBackend>, catalog: ThemeCatalog) -> Self {
        Self {
            backend,
            catalog,
            theme: None,
            playing: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn current_track(&self) -> Option<ThemeId> {
        self.playing
    }

    /// Flips music on or off and returns the new state. On failure music is off.
    pub fn toggle(&mut self) -> Result<bool, AudioError> {
        if let Some(theme) = self.playing.take() {
            self.backend.stop();
            log::info!("music stopped ({theme})");
            return Ok(false);
        }

        self.backend.stop();
        let theme = self.theme.ok_or(AudioError::NoTheme)?;
        let track = self.catalog.music(theme);
        if !track.is_file() {
            log::warn!("music track missing: {}", track.display());
            return Err(AudioError::MissingTrack(track));
        }

        self.backend.play_looping(&track)?;
        self.playing = Some(theme);
        log::info!("music playing ({theme}): {}", track.display());
        Ok(true)
    }

    /// Records the selected theme. While music is on, the track is restarted
    /// with the new theme by switching off and back on.
    pub fn set_theme(&mut self, theme: ThemeId) -> Result<(), AudioError> {
        self.theme = Some(theme);

        if self.is_playing() {
            self.toggle()?;
            self.toggle()?;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.is_playing() {
            let _ = self.toggle();
        }
    }

    /// Stops the music and forgets the theme; switching on then needs a new one.
    pub fn clear_theme(&mut self) {
        self.stop();
        self.theme = None;
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.backend.stop();
    }
}
