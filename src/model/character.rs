use serde::{Deserialize, Serialize};

use crate::model::story::ValidationError;

/// The two leads of every story. The role decides which status list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterRole {
    Heroine,
    Hero,
}

impl CharacterRole {
    pub const ALL: [CharacterRole; 2] = [CharacterRole::Heroine, CharacterRole::Hero];

    pub fn label(self) -> &'static str {
        match self {
            CharacterRole::Heroine => "Heroine",
            CharacterRole::Hero => "Hero",
        }
    }

    /// Key of this role's status list in `characters.json`.
    pub fn status_key(self) -> &'static str {
        match self {
            CharacterRole::Heroine => "female_status",
            CharacterRole::Hero => "male_status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub personality: String,
    pub status: String,
}

/// Raw, editable input for one character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFields {
    pub name: String,
    pub personality: String,
    pub status: String,
}

impl CharacterFields {
    pub fn clear(&mut self) {
        self.name.clear();
        self.personality.clear();
        self.status.clear();
    }
}

impl CharacterRecord {
    /// Builds the record for `role`, reporting the first empty field.
    pub fn for_role(role: CharacterRole, fields: &CharacterFields) -> Result<Self, ValidationError> {
        let name = required(&fields.name, || format!("{}'s name", role.label()))?;
        let personality = required(&fields.personality, || {
            format!("{}'s personality", role.label())
        })?;
        let status = required(&fields.status, || format!("{}'s social status", role.label()))?;

        Ok(Self {
            name,
            personality,
            status,
        })
    }
}

pub(crate) fn required(
    value: &str,
    field: impl FnOnce() -> String,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError { field: field() });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, personality: &str, status: &str) -> CharacterFields {
        CharacterFields {
            name: name.into(),
            personality: personality.into(),
            status: status.into(),
        }
    }

    #[test]
    fn builds_a_trimmed_record() {
        let record =
            CharacterRecord::for_role(CharacterRole::Hero, &fields(" Darcy ", "Proud", "Gentleman"))
                .unwrap();

        assert_eq!(record.name, "Darcy");
        assert_eq!(record.personality, "Proud");
        assert_eq!(record.status, "Gentleman");
    }

    #[test]
    fn names_the_missing_field_with_the_role() {
        let err = CharacterRecord::for_role(CharacterRole::Heroine, &fields("Emma", "  ", "Lady"))
            .unwrap_err();

        assert_eq!(err.field, "Heroine's personality");
        assert_eq!(err.to_string(), "Please provide the Heroine's personality.");
    }

    #[test]
    fn status_lists_differ_per_role() {
        assert_eq!(CharacterRole::Heroine.status_key(), "female_status");
        assert_eq!(CharacterRole::Hero.status_key(), "male_status");
    }
}
