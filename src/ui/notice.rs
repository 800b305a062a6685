use crate::error::AppError;
use crate::ui::settings_io::PersistenceError;

/// A message shown in the centred notice window until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }

    /// Confirms a settings save, or explains why it failed.
    pub fn settings_saved(result: Result<(), PersistenceError>) -> Self {
        match result {
            Ok(()) => Notice::info("Success", "Settings saved successfully!"),
            Err(e) => AppError::from(e).into(),
        }
    }
}

impl From<AppError> for Notice {
    fn from(error: AppError) -> Self {
        Self {
            title: error.title(),
            message: error.to_string(),
        }
    }
}
