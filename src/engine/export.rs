use std::fs;
use std::path::{Path, PathBuf};

use crate::model::story::StoryText;

pub const DOCUMENT_TITLE: &str = "The Austen Experience";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No story to export")]
    EmptyStory,
    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes the story as a plain text document: title, blank line, body.
pub fn export_story(story: Option<&StoryText>, path: &Path) -> Result<(), ExportError> {
    let story = story
        .filter(|story| !story.is_blank())
        .ok_or(ExportError::EmptyStory)?;

    let document = format!("{DOCUMENT_TITLE}\n\n{}\n", story.as_str().trim_end());
    fs::write(path, document).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("story exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_title_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");

        export_story(Some(&StoryText::new("Once upon a time.\n\nThe end.")), &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "The Austen Experience\n\nOnce upon a time.\n\nThe end.\n"
        );
    }

    #[test]
    fn missing_or_blank_story_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");

        assert!(matches!(export_story(None, &path), Err(ExportError::EmptyStory)));
        assert!(matches!(
            export_story(Some(&StoryText::new("  \n")), &path),
            Err(ExportError::EmptyStory)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("story.txt");

        let err = export_story(Some(&StoryText::new("text")), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
