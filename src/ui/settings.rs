use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::engine::narration::{DEFAULT_VOICE_SPEED, MAX_VOICE_SPEED, MIN_VOICE_SPEED};

pub const FONT_SIZES: [u32; 5] = [10, 12, 14, 16, 18];

/// Application-wide colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppPalette {
    #[default]
    Clearlooks,
    Equilux,
    Adapta,
    Arc,
}

impl AppPalette {
    pub const ALL: [AppPalette; 4] = [
        AppPalette::Clearlooks,
        AppPalette::Equilux,
        AppPalette::Adapta,
        AppPalette::Arc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AppPalette::Clearlooks => "clearlooks",
            AppPalette::Equilux => "equilux",
            AppPalette::Adapta => "adapta",
            AppPalette::Arc => "arc",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            AppPalette::Clearlooks => egui::Visuals::light(),
            AppPalette::Equilux => egui::Visuals::dark(),
            AppPalette::Adapta => {
                let mut visuals = egui::Visuals::dark();
                visuals.panel_fill = Color32::from_rgb(0x22, 0x2d, 0x32);
                visuals.window_fill = Color32::from_rgb(0x26, 0x32, 0x38);
                visuals.selection.bg_fill = Color32::from_rgb(0x00, 0xbc, 0xd4);
                visuals.hyperlink_color = Color32::from_rgb(0xff, 0x7f, 0x50);
                visuals.widgets.hovered.bg_fill = Color32::from_rgb(0x00, 0x96, 0x88);
                visuals
            }
            AppPalette::Arc => {
                let mut visuals = egui::Visuals::light();
                visuals.panel_fill = Color32::from_rgb(0xf5, 0xf6, 0xf7);
                visuals.window_fill = Color32::from_rgb(0xfb, 0xfb, 0xfc);
                visuals.selection.bg_fill = Color32::from_rgb(0x52, 0x94, 0xe2);
                visuals
            }
        }
    }
}

/// Preferences persisted between sessions. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub font_size: u32,
    pub app_theme: AppPalette,
    pub voice_speed: u32,
    pub music_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            font_size: 12,
            app_theme: AppPalette::Clearlooks,
            voice_speed: DEFAULT_VOICE_SPEED,
            music_enabled: true,
        }
    }
}

impl AppSettings {
    /// Pulls hand-edited values back into range.
    pub fn sanitized(mut self) -> Self {
        if !FONT_SIZES.contains(&self.font_size) {
            self.font_size = FONT_SIZES
                .into_iter()
                .min_by_key(|size| size.abs_diff(self.font_size))
                .unwrap_or(12);
        }
        self.voice_speed = self.voice_speed.clamp(MIN_VOICE_SPEED, MAX_VOICE_SPEED);
        self
    }

    pub fn story_font(&self) -> egui::FontId {
        egui::FontId::proportional(self.font_size as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"font_size": 16}"#).unwrap();

        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.app_theme, AppPalette::Clearlooks);
        assert_eq!(settings.voice_speed, 150);
        assert!(settings.music_enabled);
    }

    #[test]
    fn palette_names_are_lowercase() {
        let json = serde_json::to_string(&AppSettings {
            app_theme: AppPalette::Equilux,
            ..Default::default()
        })
        .unwrap();

        assert!(json.contains(r#""app_theme":"equilux""#));
    }

    #[test]
    fn out_of_range_values_are_pulled_back() {
        let settings = AppSettings {
            font_size: 13,
            voice_speed: 900,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.font_size, 12);
        assert_eq!(settings.voice_speed, 300);
    }
}
