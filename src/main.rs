mod engine;
mod error;
mod model;
mod ui;

use anyhow::{anyhow, Context};
use eframe::egui;
use std::path::Path;

use crate::model::story_elements::StoryElements;
use crate::model::theme::ThemeCatalog;

const DATA_DIR: &str = "data";
const ASSETS_DIR: &str = "assets";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let elements = StoryElements::load(Path::new(DATA_DIR))
        .context("failed to load story elements")?;
    let catalog = ThemeCatalog::new(ASSETS_DIR);
    log::info!("theme assets under {}", catalog.root().display());
    let settings_path = ui::settings_io::settings_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(engine::export::DOCUMENT_TITLE)
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        engine::export::DOCUMENT_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ui::app::StoryStudioApp::new(elements, catalog, settings_path)))
        }),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}
