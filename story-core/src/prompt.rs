//! Building the requests sent to the text generator.

use thiserror::Error;

use crate::catalog::{Genre, Style};
use crate::story::CHAPTER_SEPARATOR;

/// Text pre-filled in the prompt field.
pub const DEFAULT_PROMPT: &str = "Once upon a time...";

/// A rejected submission. Nothing is sent and nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("Please enter a story prompt!")]
    BlankPrompt,

    #[error("Enter some details for the new chapter!")]
    BlankChapterPrompt,

    #[error("Generate a story first before adding chapters.")]
    NoStoryYet,
}

/// Compose the request for a new story.
///
/// The user prompt is embedded verbatim after the genre and style.
pub fn compose_story_prompt(user_prompt: &str, genre: Genre, style: Style) -> String {
    format!("Write a {genre} story in {style} style: {user_prompt}")
}

/// Join the existing story and the chapter request.
///
/// The result is meant to go through [`compose_story_prompt`] with the
/// current genre and style.
pub fn compose_chapter_prompt(existing_story: &str, chapter_prompt: &str) -> String {
    let mut prompt =
        String::with_capacity(existing_story.len() + CHAPTER_SEPARATOR.len() + chapter_prompt.len());
    prompt.push_str(existing_story);
    prompt.push_str(CHAPTER_SEPARATOR);
    prompt.push_str(chapter_prompt);
    prompt
}

/// Reject prompts that are empty or whitespace only.
pub fn validate_prompt(user_prompt: &str) -> Result<(), ValidationWarning> {
    if user_prompt.trim().is_empty() {
        return Err(ValidationWarning::BlankPrompt);
    }
    Ok(())
}

/// Chapters need an existing story and a non-blank request.
pub fn validate_chapter(existing_story: &str, chapter_prompt: &str) -> Result<(), ValidationWarning> {
    if existing_story.is_empty() {
        return Err(ValidationWarning::NoStoryYet);
    }
    if chapter_prompt.trim().is_empty() {
        return Err(ValidationWarning::BlankChapterPrompt);
    }
    Ok(())
}
