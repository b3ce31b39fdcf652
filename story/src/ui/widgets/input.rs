//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::StoryTheme;

/// Single-line input field widget
pub struct InputWidget<'a> {
    title: &'a str,
    content: &'a str,
    cursor_position: usize,
    theme: &'a StoryTheme,
    placeholder: &'a str,
    is_focused: bool,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(title: &'a str, content: &'a str, theme: &'a StoryTheme) -> Self {
        Self {
            title,
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "",
            is_focused: false,
            is_active: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.is_focused = focused;
        self
    }

    /// Whether the field is being typed into (shows the cursor)
    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                self.theme.title_style(self.is_focused),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_focused || self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let prefix = Span::styled("> ", self.theme.input_style());

        let line = if self.content.is_empty() && !self.is_active {
            Line::from(vec![
                prefix,
                Span::styled(self.placeholder, self.theme.hint_style()),
            ])
        } else if !self.is_active {
            Line::from(vec![prefix, Span::raw(self.content)])
        } else {
            // Use character-based slicing for unicode safety
            let before_cursor: String = self.content.chars().take(self.cursor_position).collect();
            let at_cursor = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after_cursor: String = self.content.chars().skip(self.cursor_position + 1).collect();

            Line::from(vec![
                prefix,
                Span::raw(before_cursor),
                Span::styled(
                    at_cursor,
                    Style::default()
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                        .fg(self.theme.input_text),
                ),
                Span::raw(after_cursor),
            ])
        };

        let paragraph = Paragraph::new(line);
        paragraph.render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_placeholder_when_empty() {
        let theme = StoryTheme::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new("Chapter", "", &theme)
            .placeholder("What happens next?")
            .render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("Chapter"));
        assert!(row_text(&buf, 1).contains("> What happens next?"));
    }

    #[test]
    fn test_content_replaces_placeholder() {
        let theme = StoryTheme::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new("Prompt", "A dragon", &theme)
            .placeholder("unused")
            .active(true)
            .cursor_position(2)
            .render(area, &mut buf);

        let row = row_text(&buf, 1);
        assert!(row.contains("> A dragon"));
        assert!(!row.contains("unused"));
    }
}
