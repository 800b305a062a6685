use crate::engine::audio::AudioError;
use crate::engine::export::ExportError;
use crate::engine::narration::NarrationError;
use crate::engine::theme_renderer::RenderError;
use crate::model::story::ValidationError;
use crate::ui::settings_io::PersistenceError;

/// Every failure the user can be told about. None of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Narration(#[from] NarrationError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("No story to read")]
    NoStory,
}

impl AppError {
    /// Heading of the notice window.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Missing Information",
            AppError::NoStory => "Notice",
            AppError::Export(ExportError::EmptyStory) => "Warning",
            _ => "Error",
        }
    }
}
