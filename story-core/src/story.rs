//! The accumulated story buffer.

use serde::{Deserialize, Serialize};

/// Inserted between the existing story and an appended chapter.
pub const CHAPTER_SEPARATOR: &str = "\n\n";

/// An in-memory, session-scoped story.
///
/// Generation replaces it, chapters append to it, and the editor overwrites it
/// verbatim. None of these operations can fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    text: String,
}

impl Story {
    /// Create an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a story holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Append `text`, separated from existing content by one blank line.
    pub fn append(&mut self, text: &str) {
        if !self.text.is_empty() {
            self.text.push_str(CHAPTER_SEPARATOR);
        }
        self.text.push_str(text);
    }

    /// Replace the whole buffer. No validation is applied.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The current buffer.
    pub fn read(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines as the exports see them (split on `\n`, an empty story is one empty line).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl AsRef<str> for Story {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
