use eframe::egui;

use crate::engine::theme_renderer::RenderedBackground;
use crate::model::theme::ThemeId;

/// GPU copy of the rendered theme background, re-uploaded only when the
/// rendered image changes.
#[derive(Default)]
pub struct BackgroundLayer {
    texture: Option<egui::TextureHandle>,
    uploaded: Option<(ThemeId, u32, u32)>,
}

impl BackgroundLayer {
    pub fn paint(&mut self, ctx: &egui::Context, rendered: Option<&RenderedBackground>) {
        let Some(rendered) = rendered else {
            self.texture = None;
            self.uploaded = None;
            return;
        };

        let key = (rendered.theme, rendered.width(), rendered.height());
        if self.uploaded != Some(key) || self.texture.is_none() {
            let size = [rendered.width() as usize, rendered.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, rendered.image.as_raw());
            self.texture = Some(ctx.load_texture(
                format!("background_{}", rendered.theme.key()),
                image,
                egui::TextureOptions::LINEAR,
            ));
            self.uploaded = Some(key);
        }

        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ctx.layer_painter(egui::LayerId::background()).image(
                texture.id(),
                ctx.content_rect(),
                uv,
                egui::Color32::WHITE,
            );
        }
    }
}
