use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::model::theme::{ThemeCatalog, ThemeId};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Could not load background {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Background {} has no pixels", .0.display())]
    EmptyImage(PathBuf),
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: u32, height: u32 },
}

/// Scale-to-cover placement of an image inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverLayout {
    pub width: u32,
    pub height: u32,
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Pixels cut from the left / top of the scaled image.
    pub crop_x: u32,
    pub crop_y: u32,
}

impl CoverLayout {
    /// Wider viewport than image: fit the width and let the height overflow.
    /// Otherwise fit the height and let the width overflow. Both dimensions
    /// must be non-zero.
    pub fn compute(image_width: u32, image_height: u32, width: u32, height: u32) -> Self {
        let image_ratio = f64::from(image_width) / f64::from(image_height);
        let view_ratio = f64::from(width) / f64::from(height);

        let (scaled_width, scaled_height) = if view_ratio > image_ratio {
            (width, ((f64::from(width) / image_ratio) as u32).max(height))
        } else {
            (((f64::from(height) * image_ratio) as u32).max(width), height)
        };

        Self {
            width,
            height,
            scaled_width,
            scaled_height,
            crop_x: (scaled_width - width) / 2,
            crop_y: (scaled_height - height) / 2,
        }
    }

    pub fn crop_right(&self) -> u32 {
        self.scaled_width - self.width - self.crop_x
    }

    pub fn crop_bottom(&self) -> u32 {
        self.scaled_height - self.height - self.crop_y
    }
}

/// A theme background fitted to one viewport size.
#[derive(Debug, Clone)]
pub struct RenderedBackground {
    pub theme: ThemeId,
    pub layout: CoverLayout,
    pub image: RgbaImage,
}

impl RenderedBackground {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn fits(&self, theme: ThemeId, width: u32, height: u32) -> bool {
        self.theme == theme && self.layout.width == width && self.layout.height == height
    }
}

/// Keeps the window background in step with the theme and the window size.
pub struct ThemeRenderer {
    catalog: ThemeCatalog,
    sources: HashMap<ThemeId, DynamicImage>,
    current: Option<RenderedBackground>,
}

impl ThemeRenderer {
    pub fn new(catalog: ThemeCatalog) -> Self {
        Self {
            catalog,
            sources: HashMap::new(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&RenderedBackground> {
        self.current.as_ref()
    }

    /// Drops the background, leaving the plain default look.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Renders `theme` for the viewport, replacing the previous background.
    /// On failure the previous background stays in place.
    pub fn render(
        &mut self,
        theme: ThemeId,
        width: u32,
        height: u32,
    ) -> Result<&RenderedBackground, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }

        match self.current.take() {
            Some(current) if current.fits(theme, width, height) => Ok(&*self.current.insert(current)),
            previous => {
                self.current = previous;
                let rendered = self.draw(theme, width, height)?;
                let layout = rendered.layout;
                log::debug!(
                    "background {theme} rendered at {width}x{height}: scaled {}x{}, cropped {}+{} x {}+{}",
                    layout.scaled_width,
                    layout.scaled_height,
                    layout.crop_x,
                    layout.crop_right(),
                    layout.crop_y,
                    layout.crop_bottom()
                );
                Ok(&*self.current.insert(rendered))
            }
        }
    }

    fn draw(&mut self, theme: ThemeId, width: u32, height: u32) -> Result<RenderedBackground, RenderError> {
        let source = self.source(theme)?;
        let layout = CoverLayout::compute(source.width(), source.height(), width, height);

        let image = source
            .resize_exact(layout.scaled_width, layout.scaled_height, FilterType::Lanczos3)
            .crop_imm(layout.crop_x, layout.crop_y, width, height)
            .to_rgba8();

        Ok(RenderedBackground {
            theme,
            layout,
            image,
        })
    }

    fn source(&mut self, theme: ThemeId) -> Result<&DynamicImage, RenderError> {
        match self.sources.entry(theme) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.catalog.background(theme);
                let image = image::open(&path).map_err(|source| {
                    log::warn!("background for {theme} failed to load: {source}");
                    RenderError::ImageLoad {
                        path: path.clone(),
                        source,
                    }
                })?;
                if image.width() == 0 || image.height() == 0 {
                    return Err(RenderError::EmptyImage(path));
                }
                Ok(entry.insert(image))
            }
        }
    }
}
