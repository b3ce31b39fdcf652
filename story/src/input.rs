//! Editable text buffers for the TUI.
//!
//! `TextInput` is a single-line field with its own history (prompt, chapter
//! and command line). `StoryEditor` is the multi-line buffer used to rewrite
//! the story by hand. Cursor positions are character indices, not bytes.

use std::collections::VecDeque;

const HISTORY_LIMIT: usize = 100;

/// Byte offset of the `index`-th character, or the end of the string.
fn byte_index(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map(|(i, _)| i).unwrap_or(s.len())
}

/// Single-line input with history.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
    history: VecDeque<String>,
    history_index: Option<usize>,
    saved_input: Option<String>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An input pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.set(text);
        input
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and move the cursor to the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn type_char(&mut self, c: char) {
        let at = byte_index(&self.buffer, self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
        }
    }

    pub fn delete(&mut self) {
        self.remove_at_cursor();
    }

    fn remove_at_cursor(&mut self) {
        if let Some((at, ch)) = self.buffer.char_indices().nth(self.cursor) {
            self.buffer.replace_range(at..at + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    /// Remember the current content as the newest history entry.
    ///
    /// Blank content and repeats of the newest entry are not recorded.
    pub fn commit_to_history(&mut self) {
        if !self.buffer.trim().is_empty() && self.history.front() != Some(&self.buffer) {
            self.history.push_front(self.buffer.clone());
            self.history.truncate(HISTORY_LIMIT);
        }
        self.history_index = None;
        self.saved_input = None;
    }

    /// Step back to an older entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if self.history_index.is_none() {
            self.saved_input = Some(self.buffer.clone());
        }

        let index = match self.history_index {
            None => 0,
            Some(i) => (i + 1).min(self.history.len() - 1),
        };
        if let Some(entry) = self.history.get(index).cloned() {
            self.set(entry);
            self.history_index = Some(index);
        }
    }

    /// Step forward to a newer entry, ending at the text being typed.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                let saved = self.saved_input.take().unwrap_or_default();
                self.set(saved);
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.history.get(i - 1).cloned() {
                    self.set(entry);
                    self.history_index = Some(i - 1);
                }
            }
        }
    }
}

/// Multi-line editor for rewriting the story.
#[derive(Debug, Clone, Default)]
pub struct StoryEditor {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl StoryEditor {
    /// Open on `text`, cursor at the end.
    pub fn new(text: &str) -> Self {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let row = lines.len() - 1;
        let col = lines[row].chars().count();
        Self { lines, row, col }
    }

    /// The edited text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, column), in characters.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn type_char(&mut self, c: char) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    /// Split the current line at the cursor.
    pub fn newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    /// Delete before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    /// Delete at the cursor, joining with the next line at end of line.
    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_editing() {
        let mut input = TextInput::with_text("café");
        input.backspace();
        assert_eq!(input.text(), "caf");
        input.cursor_home();
        input.type_char('ñ');
        assert_eq!(input.text(), "ñcaf");
        input.delete();
        assert_eq!(input.text(), "ñaf");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_history_browsing_restores_draft() {
        let mut input = TextInput::new();
        input.set("first");
        input.commit_to_history();
        input.set("second");
        input.commit_to_history();
        input.set("draft");

        input.history_prev();
        assert_eq!(input.text(), "second");
        input.history_prev();
        assert_eq!(input.text(), "first");
        input.history_prev();
        assert_eq!(input.text(), "first");

        input.history_next();
        assert_eq!(input.text(), "second");
        input.history_next();
        assert_eq!(input.text(), "draft");
    }

    #[test]
    fn test_history_skips_blank_and_repeats() {
        let mut input = TextInput::with_text("same");
        input.commit_to_history();
        input.commit_to_history();
        input.set("   ");
        input.commit_to_history();

        input.history_prev();
        input.history_prev();
        assert_eq!(input.text(), "same");
    }

    #[test]
    fn test_editor_round_trips_text() {
        let text = "Line one\n\nLine three";
        assert_eq!(StoryEditor::new(text).text(), text);
        assert_eq!(StoryEditor::new("").text(), "");
    }

    #[test]
    fn test_editor_newline_and_join() {
        let mut editor = StoryEditor::new("HelloWorld");
        for _ in 0..5 {
            editor.left();
        }
        editor.newline();
        assert_eq!(editor.text(), "Hello\nWorld");
        assert_eq!(editor.cursor(), (1, 0));

        editor.backspace();
        assert_eq!(editor.text(), "HelloWorld");
        assert_eq!(editor.cursor(), (0, 5));
    }

    #[test]
    fn test_editor_vertical_movement_clamps_column() {
        let mut editor = StoryEditor::new("a long first line\nshort");
        editor.up();
        editor.end();
        editor.down();
        assert_eq!(editor.cursor(), (1, 5));
        editor.delete();
        assert_eq!(editor.text(), "a long first line\nshort");
    }
}
