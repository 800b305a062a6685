use std::path::Path;
use std::sync::Arc;

use crate::engine::audio::{AudioController, AudioError, MusicBackend};
use crate::engine::export::export_story;
use crate::engine::narration::{NarrationController, SpeechBackend};
use crate::engine::protocol::NarrationEvent;
use crate::engine::reveal::{DisplaySurface, Pacing, RevealController, RevealState};
use crate::engine::story_template::StoryTemplateEngine;
use crate::engine::theme_renderer::{RenderedBackground, ThemeRenderer};
use crate::error::AppError;
use crate::model::playback::PlaybackState;
use crate::model::story::{StoryForm, StoryText};
use crate::model::theme::{ThemeCatalog, ThemeId};

/// The story text as currently shown on screen.
#[derive(Debug, Default)]
pub struct StoryDisplay {
    text: String,
}

impl StoryDisplay {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl DisplaySurface for StoryDisplay {
    fn clear(&mut self) {
        self.text.clear();
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// Everything behind the "Create Story" tab: the current story, its reveal,
/// narration, music and the themed background. Lives on the UI thread.
pub struct Presentation {
    templates: StoryTemplateEngine,
    reveal: RevealController,
    narration: NarrationController,
    audio: AudioController,
    renderer: ThemeRenderer,
    catalog: ThemeCatalog,
    display: StoryDisplay,
    story: Option<StoryText>,
    theme: Option<ThemeId>,
    viewport: (u32, u32),
    failed_background: Option<ThemeId>,
    notices: Vec<AppError>,
}

impl Presentation {
    pub fn new(
        catalog: ThemeCatalog,
        speech: Arc<dyn SpeechBackend>,
        music: Box<dyn MusicBackend>,
        pacing: Pacing,
    ) -> Self {
        Self {
            templates: StoryTemplateEngine,
            reveal: RevealController::new(pacing),
            narration: NarrationController::new(speech),
            audio: AudioController::new(music, catalog.clone()),
            renderer: ThemeRenderer::new(catalog.clone()),
            catalog,
            display: StoryDisplay::default(),
            story: None,
            theme: None,
            viewport: (0, 0),
            failed_background: None,
            notices: Vec::new(),
        }
    }

    /// Builds a story from the form and starts revealing it. Any reveal or
    /// narration of the previous story is stopped first.
    pub fn generate(&mut self, form: &StoryForm) -> Result<(), AppError> {
        let request = form.to_request()?;

        self.narration.stop();
        let story = self.templates.generate(&request);
        self.reveal.start(story.clone(), &mut self.display);
        self.story = Some(story);
        Ok(())
    }

    /// Applies worker output on the UI thread and returns failures that
    /// should be shown to the user.
    pub fn pump(&mut self) -> Vec<AppError> {
        self.reveal.pump(&mut self.display);

        for event in self.narration.poll_events() {
            if let NarrationEvent::Failed(e) = event {
                self.notices.push(e.into());
            }
        }

        std::mem::take(&mut self.notices)
    }

    pub fn read_aloud(&mut self) -> Result<(), AppError> {
        let story = self
            .story
            .as_ref()
            .filter(|story| !story.is_blank())
            .ok_or(AppError::NoStory)?;
        self.narration.speak(story.as_str())?;
        Ok(())
    }

    pub fn narration_available(&self) -> bool {
        self.narration.is_available()
    }

    pub fn stop_reading(&mut self) {
        self.narration.stop();
    }

    pub fn set_voice_speed(&mut self, words_per_minute: u32) {
        self.narration.set_rate(words_per_minute);
    }

    /// Switching off always works; switching on requires music to be enabled.
    pub fn toggle_music(&mut self, enabled: bool) -> Result<bool, AppError> {
        if !enabled && !self.audio.is_playing() {
            return Err(AudioError::Disabled.into());
        }
        Ok(self.audio.toggle()?)
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.audio.stop();
        }
    }

    /// Applies a theme picked by the user. Names without assets get the plain
    /// background and leave the music alone.
    pub fn select_theme(&mut self, name: &str) -> Result<(), AppError> {
        let Some(theme) = ThemeId::from_name(name) else {
            log::info!("theme {name:?} has no assets, using the plain background");
            self.theme = None;
            self.renderer.clear();
            return Ok(());
        };

        self.theme = Some(theme);
        self.failed_background = None;
        self.refresh_background();
        self.audio.set_theme(theme)?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.viewport {
            return;
        }
        self.viewport = (width, height);
        self.refresh_background();
    }

    fn refresh_background(&mut self) {
        let Some(theme) = self.theme else {
            return;
        };
        let (width, height) = self.viewport;
        if width == 0 || height == 0 || self.failed_background == Some(theme) {
            return;
        }

        if let Err(e) = self.renderer.render(theme, width, height) {
            // Retried when the theme is picked again, not on every resize.
            self.failed_background = Some(theme);
            self.notices.push(e.into());
        }
    }

    /// Back to a blank slate: no story, no theme, no music, plain background.
    pub fn clear(&mut self) {
        self.reveal.cancel();
        self.narration.stop();
        self.display.clear();
        self.story = None;

        self.audio.clear_theme();
        self.renderer.clear();
        self.theme = None;
        self.failed_background = None;
    }

    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        export_story(self.story.as_ref(), path)?;
        Ok(())
    }

    pub fn has_story(&self) -> bool {
        self.story.is_some()
    }

    pub fn display_text(&self) -> &str {
        self.display.as_str()
    }

    pub fn background(&self) -> Option<&RenderedBackground> {
        self.renderer.current()
    }

    pub fn accent(&self) -> Option<[u8; 3]> {
        self.theme.map(|theme| self.catalog.accent(theme))
    }

    pub fn theme(&self) -> Option<ThemeId> {
        self.theme
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal.state()
    }

    /// True while something is changing on screen or being spoken.
    pub fn is_busy(&self) -> bool {
        self.reveal.is_revealing() || self.narration.is_active()
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            music_on: self.audio.is_playing(),
            current_theme_track: self.audio.current_track(),
            narration_active: self.narration.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::audio::SilentMusic;
    use crate::engine::narration::{NarrationError, UnavailableSpeech};
    use crate::engine::narration::{SpeechEngine, VoiceInfo};
    use crate::model::character::CharacterFields;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Speech that keeps talking until told to stop.
    #[derive(Default)]
    struct SpeechLog {
        created: AtomicUsize,
        stopped: Mutex<Vec<usize>>,
    }

    struct EndlessSpeech(Arc<SpeechLog>);

    struct EndlessEngine {
        id: usize,
        log: Arc<SpeechLog>,
        stopped: AtomicBool,
    }

    impl SpeechBackend for EndlessSpeech {
        fn is_available(&self) -> bool {
            true
        }

        fn create_engine(&self) -> Result<Arc<dyn SpeechEngine>, NarrationError> {
            let id = self.0.created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Arc::new(EndlessEngine {
                id,
                log: Arc::clone(&self.0),
                stopped: AtomicBool::new(false),
            }))
        }
    }

    impl SpeechEngine for EndlessEngine {
        fn voices(&self) -> Result<Vec<VoiceInfo>, NarrationError> {
            Ok(Vec::new())
        }

        fn set_voice(&self, _voice: &VoiceInfo) -> Result<(), NarrationError> {
            Ok(())
        }

        fn set_rate(&self, _words_per_minute: u32) -> Result<(), NarrationError> {
            Ok(())
        }

        fn speak_to_end(&self, _text: &str) -> Result<(), NarrationError> {
            let deadline = Instant::now() + Duration::from_secs(5);
            while !self.stopped.load(Ordering::SeqCst) && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(2));
            }
            Ok(())
        }

        fn stop(&self) -> Result<(), NarrationError> {
            if !self.stopped.swap(true, Ordering::SeqCst) {
                self.log.stopped.lock().unwrap().push(self.id);
            }
            Ok(())
        }
    }

    /// Music output that only remembers what is currently looping.
    struct LoopingTracks(Rc<RefCell<Vec<PathBuf>>>);

    impl MusicBackend for LoopingTracks {
        fn play_looping(&mut self, track: &Path) -> Result<(), AudioError> {
            self.0.borrow_mut().push(track.to_path_buf());
            Ok(())
        }

        fn stop(&mut self) {
            self.0.borrow_mut().clear();
        }
    }

    fn presentation(root: &Path) -> Presentation {
        Presentation::new(
            ThemeCatalog::new(root),
            Arc::new(UnavailableSpeech),
            Box::new(SilentMusic),
            Pacing::instant(),
        )
    }

    fn form(heroine: &str, theme: &str) -> StoryForm {
        StoryForm {
            heroine: CharacterFields {
                name: heroine.into(),
                personality: "Spirited".into(),
                status: "Heiress".into(),
            },
            hero: CharacterFields {
                name: "Knightley".into(),
                personality: "Gentle".into(),
                status: "Gentleman".into(),
            },
            theme: theme.into(),
            setting: "Hartfield".into(),
        }
    }

    fn finish_reveal(presentation: &mut Presentation) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while presentation.is_busy() {
            assert!(Instant::now() < deadline, "reveal never finished");
            presentation.pump();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn incomplete_form_does_not_generate() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        let err = presentation.generate(&form("", "Romance")).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Please provide the Heroine's name.");
        assert!(!presentation.has_story());
        assert_eq!(presentation.display_text(), "");
    }

    #[test]
    fn generated_story_is_revealed_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        presentation.generate(&form("Emma", "Comedy")).unwrap();
        finish_reveal(&mut presentation);

        let text = presentation.display_text();
        assert!(text.contains("Miss Emma"));
        assert!(text.contains("Hartfield"));
        assert_eq!(text.matches("\n\n").count(), 3);
    }

    #[test]
    fn new_story_replaces_the_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        presentation.generate(&form("Emma", "Drama")).unwrap();
        presentation.generate(&form("Anne", "Drama")).unwrap();
        finish_reveal(&mut presentation);

        assert!(presentation.display_text().contains("Anne"));
        assert!(!presentation.display_text().contains("Emma"));
    }

    #[test]
    fn reading_needs_a_story_and_a_voice() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        assert!(matches!(presentation.read_aloud(), Err(AppError::NoStory)));

        presentation.generate(&form("Emma", "Romance")).unwrap();
        assert!(matches!(
            presentation.read_aloud(),
            Err(AppError::Narration(NarrationError::Unavailable))
        ));
        assert!(presentation.read_aloud().is_ok());
        assert!(!presentation.playback_state().narration_active);
    }

    #[test]
    fn disabled_music_cannot_be_switched_on() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        assert!(matches!(
            presentation.toggle_music(false),
            Err(AppError::Audio(AudioError::Disabled))
        ));
        assert!(matches!(
            presentation.toggle_music(true),
            Err(AppError::Audio(AudioError::NoTheme))
        ));
        assert_eq!(presentation.playback_state(), PlaybackState::default());
    }

    #[test]
    fn known_theme_renders_the_background_at_window_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = ThemeCatalog::new(dir.path()).background(ThemeId::Romance);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(32, 18, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let mut presentation = presentation(dir.path());
        presentation.resize(800, 600);
        presentation.select_theme("romance").unwrap();

        let background = presentation.background().unwrap();
        assert_eq!((background.width(), background.height()), (800, 600));
        assert_eq!(presentation.accent(), Some([0xff, 0xf0, 0xf5]));

        presentation.resize(1024, 512);
        assert_eq!(presentation.background().unwrap().width(), 1024);
    }

    #[test]
    fn missing_background_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());
        presentation.resize(800, 600);

        presentation.select_theme("Mystery").unwrap();
        let notices = presentation.pump();
        assert!(matches!(notices.as_slice(), [AppError::Render(_)]));

        presentation.resize(900, 700);
        presentation.resize(1000, 700);
        assert!(presentation.pump().is_empty());
    }

    #[test]
    fn unknown_theme_uses_the_plain_background() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        presentation.select_theme("Gothic").unwrap();

        assert_eq!(presentation.theme(), None);
        assert!(presentation.background().is_none());
        assert_eq!(presentation.accent(), None);
    }

    #[test]
    fn new_story_silences_the_current_reading() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(SpeechLog::default());
        let mut presentation = Presentation::new(
            ThemeCatalog::new(dir.path()),
            Arc::new(EndlessSpeech(Arc::clone(&log))),
            Box::new(SilentMusic),
            Pacing::instant(),
        );

        presentation.generate(&form("Emma", "Romance")).unwrap();
        presentation.read_aloud().unwrap();
        assert!(presentation.playback_state().narration_active);

        presentation.generate(&form("Anne", "Romance")).unwrap();

        assert!(!presentation.playback_state().narration_active);
        assert_eq!(*log.stopped.lock().unwrap(), vec![1]);
        assert_eq!(log.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_drops_the_theme_and_its_music() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ThemeCatalog::new(dir.path());
        let track = catalog.music(ThemeId::Romance);
        fs::create_dir_all(track.parent().unwrap()).unwrap();
        fs::write(&track, b"loop").unwrap();
        let background = catalog.background(ThemeId::Romance);
        fs::create_dir_all(background.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(16, 9, Rgba([9, 9, 9, 255])).save(&background).unwrap();

        let looping = Rc::new(RefCell::new(Vec::new()));
        let mut presentation = Presentation::new(
            catalog,
            Arc::new(UnavailableSpeech),
            Box::new(LoopingTracks(Rc::clone(&looping))),
            Pacing::instant(),
        );
        presentation.resize(64, 48);
        presentation.select_theme("Romance").unwrap();
        assert!(presentation.toggle_music(true).unwrap());

        presentation.clear();

        assert_eq!(presentation.playback_state(), PlaybackState::default());
        assert!(looping.borrow().is_empty());
        assert_eq!(presentation.theme(), None);
        assert_eq!(presentation.accent(), None);
        assert!(presentation.background().is_none());
        assert!(matches!(
            presentation.toggle_music(true),
            Err(AppError::Audio(AudioError::NoTheme))
        ));
        assert!(looping.borrow().is_empty());
    }

    #[test]
    fn clear_without_a_story_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());

        presentation.clear();

        assert!(!presentation.has_story());
        assert_eq!(presentation.playback_state(), PlaybackState::default());
    }

    #[test]
    fn clear_forgets_the_story() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = presentation(dir.path());
        presentation.generate(&form("Catherine", "Mystery")).unwrap();

        presentation.clear();
        presentation.pump();

        assert!(!presentation.has_story());
        assert_eq!(presentation.display_text(), "");
        assert!(!presentation.is_busy());
    }
}
