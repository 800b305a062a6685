use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Story themes. Each one owns exactly one background and one music track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeId {
    Romance,
    Drama,
    Mystery,
    Comedy,
    Tragedy,
}

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Romance,
        ThemeId::Drama,
        ThemeId::Mystery,
        ThemeId::Comedy,
        ThemeId::Tragedy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeId::Romance => "Romance",
            ThemeId::Drama => "Drama",
            ThemeId::Mystery => "Mystery",
            ThemeId::Comedy => "Comedy",
            ThemeId::Tragedy => "Tragedy",
        }
    }

    /// Normalized lookup key, also the stem of the asset file names.
    pub fn key(self) -> &'static str {
        match self {
            ThemeId::Romance => "romance",
            ThemeId::Drama => "drama",
            ThemeId::Mystery => "mystery",
            ThemeId::Comedy => "comedy",
            ThemeId::Tragedy => "tragedy",
        }
    }

    /// Resolves a user-facing theme name. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = normalize_theme_key(name);
        Self::ALL.into_iter().find(|theme| theme.key() == key)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-cases and joins words with `_`, so "Dark Romance" -> "dark_romance".
pub fn normalize_theme_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Where each theme's background image and music live on disk.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    root: PathBuf,
}

impl ThemeCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn background(&self, theme: ThemeId) -> PathBuf {
        self.root
            .join("images")
            .join(format!("{}_bg.png", theme.key()))
    }

    pub fn music(&self, theme: ThemeId) -> PathBuf {
        self.root.join("music").join(format!("{}.mp3", theme.key()))
    }

    pub fn accent(&self, theme: ThemeId) -> [u8; 3] {
        match theme {
            ThemeId::Romance => [0xff, 0xf0, 0xf5],
            ThemeId::Drama => [0xfc, 0xe4, 0xec],
            ThemeId::Mystery => [0xe0, 0xe0, 0xe0],
            ThemeId::Comedy => [0xe6, 0xf0, 0xff],
            ThemeId::Tragedy => [0xfd, 0xf6, 0xe3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_regardless_of_case_and_padding() {
        assert_eq!(ThemeId::from_name("Romance"), Some(ThemeId::Romance));
        assert_eq!(ThemeId::from_name("  tRaGeDy "), Some(ThemeId::Tragedy));
        assert_eq!(ThemeId::from_name("Unknown"), None);
        assert_eq!(ThemeId::from_name(""), None);
    }

    #[test]
    fn keys_join_words_with_underscores() {
        assert_eq!(normalize_theme_key("Dark Romance"), "dark_romance");
    }

    #[test]
    fn every_theme_maps_to_its_own_assets() {
        let catalog = ThemeCatalog::new("assets");

        let backgrounds: Vec<_> = ThemeId::ALL.iter().map(|t| catalog.background(*t)).collect();
        for (i, a) in backgrounds.iter().enumerate() {
            for b in &backgrounds[i + 1..] {
                assert_ne!(a, b);
            }
        }

        assert_eq!(
            catalog.background(ThemeId::Mystery),
            Path::new("assets/images/mystery_bg.png")
        );
        assert_eq!(catalog.music(ThemeId::Mystery), Path::new("assets/music/mystery.mp3"));
        assert_eq!(catalog.accent(ThemeId::Mystery), [0xe0, 0xe0, 0xe0]);
    }
}
