use eframe::egui;

use super::app::StoryStudioApp;
use crate::engine::reveal::RevealState;
use crate::model::character::CharacterRole;
use crate::model::theme::ThemeId;

pub fn draw_story_panel(ui: &mut egui::Ui, app: &mut StoryStudioApp) {
    ui.vertical_centered(|ui| {
        ui.heading("The Austen Experience");
        ui.label("Create your own Jane Austen-inspired story");
    });
    ui.add_space(12.0);

    form_frame(ui).show(ui, |ui| {
        for role in CharacterRole::ALL {
            draw_character(ui, app, role);
            ui.add_space(6.0);
        }

        ui.separator();
        draw_story_options(ui, app);
    });

    ui.add_space(12.0);
    draw_controls(ui, app);
    draw_status(ui, app);
    ui.add_space(12.0);
    draw_story(ui, app);
}

/* =========================
   Story form
   ========================= */

fn draw_character(ui: &mut egui::Ui, app: &mut StoryStudioApp, role: CharacterRole) {
    let statuses = app.elements.statuses(role);
    let personalities = &app.elements.traits.personalities;
    let fields = app.form.character_mut(role);

    ui.strong(role.label());
    egui::Grid::new(("character", role.label()))
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Name:");
            ui.add(egui::TextEdit::singleline(&mut fields.name).desired_width(220.0));
            ui.end_row();

            ui.label("Personality:");
            choice(ui, (role.label(), "personality"), &mut fields.personality, personalities);
            ui.end_row();

            ui.label("Social Status:");
            choice(ui, (role.label(), "status"), &mut fields.status, statuses);
            ui.end_row();
        });
}

fn draw_story_options(ui: &mut egui::Ui, app: &mut StoryStudioApp) {
    let themes: Vec<&str> = ThemeId::ALL.iter().map(|theme| theme.name()).collect();
    let mut theme_changed = false;

    egui::Grid::new("story_options")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Theme:");
            theme_changed = choice(ui, "theme", &mut app.form.theme, &themes);
            ui.end_row();

            ui.label("Setting:");
            choice(ui, "setting", &mut app.form.setting, &app.elements.locations);
            ui.end_row();
        });

    if theme_changed {
        app.select_theme();
    }
}

/// Drop-down over `options`. Returns whether the user picked something new.
fn choice<S: AsRef<str>>(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    value: &mut String,
    options: &[S],
) -> bool {
    let mut changed = false;
    let selected = if value.is_empty() {
        "Select…".to_owned()
    } else {
        value.clone()
    };

    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .width(220.0)
        .show_ui(ui, |ui| {
            for option in options {
                let option = option.as_ref();
                if ui.selectable_label(*value == option, option).clicked() && *value != option {
                    *value = option.to_owned();
                    changed = true;
                }
            }
        });

    changed
}

/* =========================
   Controls
   ========================= */

fn draw_controls(ui: &mut egui::Ui, app: &mut StoryStudioApp) {
    let playback = app.presentation.playback_state();

    ui.horizontal_wrapped(|ui| {
        if ui.button("Generate Story").clicked() {
            app.generate_story();
        }
        if ui.button("Read Aloud").clicked() {
            app.read_aloud();
        }
        if ui
            .add_enabled(playback.narration_active, egui::Button::new("Stop Reading"))
            .clicked()
        {
            app.stop_reading();
        }
        if ui.button("Export").clicked() {
            app.export_story();
        }

        let music_label = if playback.music_on { "Music Off" } else { "Toggle Music" };
        if ui.button(music_label).clicked() {
            app.toggle_music();
        }
        if ui.button("Clear").clicked() {
            app.clear_all();
        }
    });
}

fn draw_status(ui: &mut egui::Ui, app: &StoryStudioApp) {
    let playback = app.presentation.playback_state();
    let mut status = Vec::new();

    match app.presentation.reveal_state() {
        RevealState::Revealing => status.push("Writing…".to_owned()),
        RevealState::Cancelled => status.push("Story interrupted".to_owned()),
        RevealState::Idle | RevealState::Completed => {}
    }
    if playback.narration_active {
        status.push("Reading aloud…".to_owned());
    }
    if let Some(track) = playback.current_theme_track {
        status.push(format!("♪ {track}"));
    }

    if !status.is_empty() {
        ui.weak(status.join("   "));
    }
}

/* =========================
   Story text
   ========================= */

fn draw_story(ui: &mut egui::Ui, app: &mut StoryStudioApp) {
    let fill = match app.presentation.accent() {
        Some([r, g, b]) => egui::Color32::from_rgb(r, g, b),
        None => ui.visuals().extreme_bg_color,
    };
    let font = app.settings.story_font();

    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), 240.0));

            let text = app.presentation.display_text();
            let color = if app.presentation.accent().is_some() {
                egui::Color32::from_rgb(0x33, 0x2a, 0x22)
            } else {
                ui.visuals().text_color()
            };
            ui.add(egui::Label::new(egui::RichText::new(text).font(font).color(color)).wrap());
        });
}

fn form_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().panel_fill)
        .inner_margin(egui::Margin::same(12))
}
