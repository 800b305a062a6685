use eframe::egui;

use super::app::StoryStudioApp;
use crate::engine::narration::{MAX_VOICE_SPEED, MIN_VOICE_SPEED};
use crate::ui::settings::{AppPalette, FONT_SIZES};

pub fn draw_settings_panel(ui: &mut egui::Ui, app: &mut StoryStudioApp) {
    ui.heading("Settings");
    ui.add_space(8.0);

    egui::Frame::group(ui.style())
        .fill(ui.visuals().panel_fill)
        .show(ui, |ui| {
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([16.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Font Size:");
                    egui::ComboBox::from_id_salt("font_size")
                        .selected_text(app.settings.font_size.to_string())
                        .show_ui(ui, |ui| {
                            for size in FONT_SIZES {
                                ui.selectable_value(&mut app.settings.font_size, size, size.to_string());
                            }
                        });
                    ui.end_row();

                    ui.label("Application Theme:");
                    egui::ComboBox::from_id_salt("app_theme")
                        .selected_text(app.settings.app_theme.label())
                        .show_ui(ui, |ui| {
                            for palette in AppPalette::ALL {
                                ui.selectable_value(&mut app.settings.app_theme, palette, palette.label());
                            }
                        });
                    ui.end_row();

                    ui.label("Voice Speed:");
                    let speed = ui.add(
                        egui::Slider::new(&mut app.settings.voice_speed, MIN_VOICE_SPEED..=MAX_VOICE_SPEED)
                            .suffix(" wpm"),
                    );
                    if speed.changed() {
                        app.presentation.set_voice_speed(app.settings.voice_speed);
                    }
                    ui.end_row();

                    if !app.presentation.narration_available() {
                        ui.label("");
                        ui.weak("Text-to-speech is not available on this system.");
                        ui.end_row();
                    }

                    ui.label("Music:");
                    if ui.checkbox(&mut app.settings.music_enabled, "Enable Music").changed() {
                        app.presentation.set_music_enabled(app.settings.music_enabled);
                    }
                    ui.end_row();
                });
        });

    ui.add_space(8.0);
    if ui.button("Save Settings").clicked() {
        app.save_settings();
    }
}
