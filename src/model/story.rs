use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::character::{required, CharacterFields, CharacterRecord, CharacterRole};

/// A required input was left blank; generation does not proceed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please provide the {field}.")]
pub struct ValidationError {
    pub field: String,
}

/// Fully populated input for the template engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub heroine: CharacterRecord,
    pub hero: CharacterRecord,
    pub theme: String,
    pub setting: String,
}

/// Everything the "Create Story" tab lets the user type or pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryForm {
    pub heroine: CharacterFields,
    pub hero: CharacterFields,
    pub theme: String,
    pub setting: String,
}

impl StoryForm {
    pub fn character_mut(&mut self, role: CharacterRole) -> &mut CharacterFields {
        match role {
            CharacterRole::Heroine => &mut self.heroine,
            CharacterRole::Hero => &mut self.hero,
        }
    }

    pub fn to_request(&self) -> Result<StoryRequest, ValidationError> {
        let heroine = CharacterRecord::for_role(CharacterRole::Heroine, &self.heroine)?;
        let hero = CharacterRecord::for_role(CharacterRole::Hero, &self.hero)?;
        let theme = required(&self.theme, || "Theme".to_string())?;
        let setting = required(&self.setting, || "Setting".to_string())?;

        Ok(StoryRequest {
            heroine,
            hero,
            theme,
            setting,
        })
    }

    pub fn clear(&mut self) {
        self.heroine.clear();
        self.hero.clear();
        self.theme.clear();
        self.setting.clear();
    }
}

/// Generated story. Immutable and cheap to hand to worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryText(Arc<str>);

impl StoryText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for StoryText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> StoryForm {
        StoryForm {
            heroine: CharacterFields {
                name: "Elizabeth".into(),
                personality: "Witty".into(),
                status: "Gentlewoman".into(),
            },
            hero: CharacterFields {
                name: "Darcy".into(),
                personality: "Proud".into(),
                status: "Gentleman".into(),
            },
            theme: "Romance".into(),
            setting: "Pemberley".into(),
        }
    }

    #[test]
    fn complete_form_becomes_a_request() {
        let request = filled_form().to_request().unwrap();

        assert_eq!(request.heroine.name, "Elizabeth");
        assert_eq!(request.hero.status, "Gentleman");
        assert_eq!(request.theme, "Romance");
        assert_eq!(request.setting, "Pemberley");
    }

    #[test]
    fn heroine_fields_are_checked_before_hero_fields() {
        let mut form = filled_form();
        form.heroine.name.clear();
        form.hero.name.clear();

        let err = form.to_request().unwrap_err();
        assert_eq!(err.field, "Heroine's name");
    }

    #[test]
    fn blank_setting_is_rejected() {
        let mut form = filled_form();
        form.setting = "   ".into();

        assert_eq!(form.to_request().unwrap_err().field, "Setting");
    }

    #[test]
    fn clear_empties_every_field() {
        let mut form = filled_form();
        form.clear();

        assert_eq!(form, StoryForm::default());
    }
}
