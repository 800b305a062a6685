use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::character::CharacterRole;

pub const CHARACTERS_FILE: &str = "characters.json";
pub const SETTINGS_FILE: &str = "settings.json";
pub const PLOTS_FILE: &str = "plots.json";

/// The story-element files are required; the app refuses to start without them.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read story catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed story catalog {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("story catalog {} has an empty `{field}` list", .path.display())]
    Empty { path: PathBuf, field: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterTraits {
    pub personalities: Vec<String>,
    pub female_status: Vec<String>,
    pub male_status: Vec<String>,
}

impl CharacterTraits {
    pub fn statuses(&self, role: CharacterRole) -> &[String] {
        match role {
            CharacterRole::Heroine => &self.female_status,
            CharacterRole::Hero => &self.male_status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocationList {
    locations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlotList {
    plot_elements: Vec<String>,
}

/// Fixed vocabulary offered by the character and setting pickers.
#[derive(Debug, Clone)]
pub struct StoryElements {
    pub traits: CharacterTraits,
    pub locations: Vec<String>,
    pub plot_elements: Vec<String>,
}

impl StoryElements {
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let characters = dir.join(CHARACTERS_FILE);
        let traits: CharacterTraits = read_json(&characters)?;
        non_empty(&characters, "personalities", &traits.personalities)?;
        for role in CharacterRole::ALL {
            non_empty(&characters, role.status_key(), traits.statuses(role))?;
        }

        let settings = dir.join(SETTINGS_FILE);
        let LocationList { locations } = read_json(&settings)?;
        non_empty(&settings, "locations", &locations)?;

        let PlotList { plot_elements } = read_json(&dir.join(PLOTS_FILE))?;

        log::info!(
            "loaded story elements from {}: {} personalities, {} locations, {} plot elements",
            dir.display(),
            traits.personalities.len(),
            locations.len(),
            plot_elements.len()
        );

        Ok(Self {
            traits,
            locations,
            plot_elements,
        })
    }

    pub fn statuses(&self, role: CharacterRole) -> &[String] {
        self.traits.statuses(role)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(path: &Path, field: &'static str, values: &[String]) -> Result<(), CatalogError> {
    if values.is_empty() {
        return Err(CatalogError::Empty {
            path: path.to_path_buf(),
            field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_catalogs(dir: &Path, characters: &str) {
        fs::write(dir.join(CHARACTERS_FILE), characters).unwrap();
        fs::write(dir.join(SETTINGS_FILE), r#"{"locations": ["Bath", "Pemberley"]}"#).unwrap();
        fs::write(dir.join(PLOTS_FILE), r#"{"plot_elements": ["A letter"]}"#).unwrap();
    }

    #[test]
    fn loads_all_three_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        write_catalogs(
            dir.path(),
            r#"{"personalities": ["Witty"], "female_status": ["Lady"], "male_status": ["Baronet"]}"#,
        );

        let elements = StoryElements::load(dir.path()).unwrap();

        assert_eq!(elements.traits.personalities, vec!["Witty"]);
        assert_eq!(elements.statuses(CharacterRole::Heroine), ["Lady"]);
        assert_eq!(elements.statuses(CharacterRole::Hero), ["Baronet"]);
        assert_eq!(elements.locations, vec!["Bath", "Pemberley"]);
        assert_eq!(elements.plot_elements, vec!["A letter"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = StoryElements::load(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        write_catalogs(dir.path(), "{ not json");

        let err = StoryElements::load(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
        assert!(err.to_string().contains(CHARACTERS_FILE));
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_catalogs(
            dir.path(),
            r#"{"personalities": [], "female_status": ["Lady"], "male_status": ["Earl"]}"#,
        );

        let err = StoryElements::load(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Empty { field: "personalities", .. }));
    }

    #[test]
    fn shipped_catalogs_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        assert!(StoryElements::load(&dir).is_ok());
    }
}
