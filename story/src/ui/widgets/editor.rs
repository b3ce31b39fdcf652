//! Multi-line story editor widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::input::StoryEditor;
use crate::ui::theme::StoryTheme;

/// Renders a [`StoryEditor`], keeping the cursor row in view
pub struct EditorWidget<'a> {
    editor: &'a StoryEditor,
    theme: &'a StoryTheme,
}

impl<'a> EditorWidget<'a> {
    pub fn new(editor: &'a StoryEditor, theme: &'a StoryTheme) -> Self {
        Self { editor, theme }
    }
}

impl Widget for EditorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                " Edit Story [Ctrl+S save, Esc discard] ",
                self.theme.title_style(true),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let (row, col) = self.editor.cursor();
        let height = inner.height as usize;
        let top = (row + 1).saturating_sub(height);

        let cursor_style = Style::default()
            .fg(self.theme.input_text)
            .add_modifier(Modifier::UNDERLINED | Modifier::BOLD);

        let lines: Vec<Line> = self
            .editor
            .lines()
            .iter()
            .enumerate()
            .skip(top)
            .take(height)
            .map(|(i, text)| {
                if i != row {
                    return Line::from(Span::raw(text.as_str()));
                }
                let before: String = text.chars().take(col).collect();
                let at = text
                    .chars()
                    .nth(col)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| " ".to_string());
                let after: String = text.chars().skip(col + 1).collect();
                Line::from(vec![
                    Span::raw(before),
                    Span::styled(at, cursor_style),
                    Span::raw(after),
                ])
            })
            .collect();

        // Long lines are cut rather than wrapped so rows map one-to-one
        Paragraph::new(lines).render(inner, buf);
    }
}
