use eframe::egui;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::export::ExportError;
use crate::engine::presentation::Presentation;
use crate::engine::reveal::Pacing;
use crate::error::AppError;
use crate::model::story::StoryForm;
use crate::model::story_elements::StoryElements;
use crate::model::theme::ThemeCatalog;
use crate::ui::background::BackgroundLayer;
use crate::ui::notice::Notice;
use crate::ui::settings::{AppPalette, AppSettings};
use crate::ui::{help_panel, settings_io, settings_panel, story_panel};

/* =========================
   Tabs
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    CreateStory,
    Settings,
    Help,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::CreateStory, Tab::Settings, Tab::Help];

    fn label(self) -> &'static str {
        match self {
            Tab::CreateStory => "Create Story",
            Tab::Settings => "Settings",
            Tab::Help => "Help",
        }
    }
}

/* =========================
   App
   ========================= */

pub struct StoryStudioApp {
    pub(crate) elements: StoryElements,
    pub(crate) presentation: Presentation,
    pub(crate) form: StoryForm,
    pub(crate) settings: AppSettings,
    settings_path: PathBuf,

    tab: Tab,
    notices: VecDeque<Notice>,
    background: BackgroundLayer,
    applied_palette: Option<AppPalette>,
}

impl StoryStudioApp {
    pub fn new(elements: StoryElements, catalog: ThemeCatalog, settings_path: PathBuf) -> Self {
        let settings = settings_io::load_settings(&settings_path);
        log::info!("loaded settings: {settings:?}");

        let mut presentation = Presentation::new(
            catalog,
            crate::engine::system_speech(),
            crate::engine::system_music(),
            Pacing::default(),
        );
        presentation.set_voice_speed(settings.voice_speed);

        Self {
            elements,
            presentation,
            form: StoryForm::default(),
            settings,
            settings_path,
            tab: Tab::default(),
            notices: VecDeque::new(),
            background: BackgroundLayer::default(),
            applied_palette: None,
        }
    }

    pub(crate) fn notify(&mut self, error: AppError) {
        log::warn!("{}: {error}", error.title());
        self.notices.push_back(error.into());
    }

    fn report(&mut self, result: Result<(), AppError>) {
        if let Err(e) = result {
            self.notify(e);
        }
    }

    /* ---------- Actions ---------- */

    pub(crate) fn generate_story(&mut self) {
        let result = self.presentation.generate(&self.form);
        self.report(result);
    }

    pub(crate) fn read_aloud(&mut self) {
        let result = self.presentation.read_aloud();
        self.report(result);
    }

    pub(crate) fn stop_reading(&mut self) {
        self.presentation.stop_reading();
    }

    pub(crate) fn export_story(&mut self) {
        if !self.presentation.has_story() {
            self.notify(ExportError::EmptyStory.into());
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .set_title("Export Story")
            .set_file_name("austen_story.txt")
            .add_filter("Text document", &["txt"])
            .save_file()
        else {
            return;
        };

        let result = self.presentation.export(&path);
        self.report(result);
    }

    pub(crate) fn toggle_music(&mut self) {
        match self.presentation.toggle_music(self.settings.music_enabled) {
            Ok(playing) => log::debug!("music toggled, playing: {playing}"),
            Err(e) => self.notify(e),
        }
    }

    pub(crate) fn select_theme(&mut self) {
        let theme = self.form.theme.clone();
        let result = self.presentation.select_theme(&theme);
        self.report(result);
    }

    pub(crate) fn clear_all(&mut self) {
        self.presentation.clear();
        self.form.clear();
    }

    pub(crate) fn save_settings(&mut self) {
        let result = settings_io::save_settings(&self.settings_path, &self.settings);
        self.notices.push_back(Notice::settings_saved(result));
    }

    /* ---------- Frame helpers ---------- */

    fn apply_palette(&mut self, ctx: &egui::Context) {
        if self.applied_palette != Some(self.settings.app_theme) {
            ctx.set_visuals(self.settings.app_theme.visuals());
            self.applied_palette = Some(self.settings.app_theme);
        }
    }

    fn track_window_size(&mut self, ctx: &egui::Context) {
        let rect = ctx.content_rect();
        let ppp = ctx.pixels_per_point();
        let width = (rect.width() * ppp).round() as u32;
        let height = (rect.height() * ppp).round() as u32;
        self.presentation.resize(width, height);
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title)
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notices.pop_front();
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for StoryStudioApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        self.apply_palette(ctx);

        for notice in self.presentation.pump() {
            self.notify(notice);
        }

        self.track_window_size(ctx);
        self.background.paint(ctx, self.presentation.background());

        /* TABS */
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
            });
        });

        /* CONTENT */
        egui::CentralPanel::default()
            .frame(egui::Frame::new().inner_margin(egui::Margin::same(16)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                    Tab::CreateStory => story_panel::draw_story_panel(ui, self),
                    Tab::Settings => settings_panel::draw_settings_panel(ui, self),
                    Tab::Help => help_panel::draw_help_panel(ui, &self.elements),
                });
            });

        self.show_notice(ctx);

        if self.presentation.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
