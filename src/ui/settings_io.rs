use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ui::settings::AppSettings;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to write settings to {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("austen_story_studio");
    path.push("settings.json");
    path
}

/// Reads saved settings. Anything missing or unreadable gives the defaults.
pub fn load_settings(path: &Path) -> AppSettings {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return AppSettings::default(),
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            return AppSettings::default();
        }
    };

    match serde_json::from_str::<AppSettings>(&text) {
        Ok(settings) => settings.sanitized(),
        Err(e) => {
            log::warn!("ignoring malformed {}: {e}", path.display());
            AppSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(settings)?;
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    fs::write(path, json).map_err(io_err)?;

    log::info!("settings saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::settings::AppPalette;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            font_size: 18,
            app_theme: AppPalette::Arc,
            voice_speed: 220,
            music_enabled: false,
        };

        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn absent_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings(&dir.path().join("none.json")), AppSettings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ font_size: ").unwrap();

        assert_eq!(load_settings(&path), AppSettings::default());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = save_settings(&blocker.join("settings.json"), &AppSettings::default()).unwrap_err();

        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
