use crate::model::theme::ThemeId;

/// Snapshot of what is audible right now. Built from the audio and
/// narration controllers, which own the real state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub music_on: bool,
    pub current_theme_track: Option<ThemeId>,
    pub narration_active: bool,
}
