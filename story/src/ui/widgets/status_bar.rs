//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use story_core::Severity;

use crate::app::InputMode;
use crate::ui::theme::StoryTheme;

/// Status bar showing the input mode and the latest outcome
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StoryTheme,
    message: Option<(&'a str, Severity)>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StoryTheme) -> Self {
        Self {
            input_mode,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<(&'a str, Severity)>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Input mode indicator (vim-style)
        let (input_mode_text, input_mode_style) = match self.input_mode {
            InputMode::Normal => (
                "NORMAL",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            InputMode::Insert => (
                "INSERT",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            InputMode::Command => (
                "COMMAND",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            InputMode::Edit => (
                "EDIT",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let mut spans = vec![Span::styled(
            format!("-- {input_mode_text} --"),
            input_mode_style,
        )];

        if let Some((msg, severity)) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, self.theme.severity_style(severity)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a StoryTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a StoryTheme) -> Self {
        Self { input_mode, theme }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hotkeys = match self.input_mode {
            InputMode::Normal => vec![
                ("g:generate", true),
                ("c:chapter", true),
                ("i:insert", true),
                ("e:edit", true),
                ("s:save", true),
                ("x:txt", true),
                ("p:pdf", true),
                ("Tab:focus", false),
                ("::command", false),
                ("?:help", false),
            ],
            InputMode::Insert => vec![
                ("Esc:normal", true),
                ("Enter:generate", true),
                ("↑↓:history", false),
            ],
            InputMode::Edit => vec![
                ("Ctrl+S:save", true),
                ("Esc:discard", true),
                ("Enter:newline", false),
            ],
            InputMode::Command => vec![
                ("Esc:cancel", true),
                ("Enter:execute", true),
            ],
        };

        let spans: Vec<Span> = hotkeys
            .iter()
            .flat_map(|(text, primary)| {
                let style = if *primary {
                    Style::default()
                } else {
                    self.theme.hint_style()
                };
                vec![Span::styled(*text, style), Span::raw("  ")]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// The `:` command line shown in place of the hotkey bar
pub struct CommandLineWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a StoryTheme,
}

impl<'a> CommandLineWidget<'a> {
    pub fn new(content: &'a str, cursor_position: usize, theme: &'a StoryTheme) -> Self {
        Self {
            content,
            cursor_position,
            theme,
        }
    }
}

impl Widget for CommandLineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let before: String = self.content.chars().take(self.cursor_position).collect();
        let at = self
            .content
            .chars()
            .nth(self.cursor_position)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = self.content.chars().skip(self.cursor_position + 1).collect();

        let line = Line::from(vec![
            Span::styled(":", self.theme.input_style()),
            Span::raw(before),
            Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(after),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_status_shows_mode_and_message() {
        let theme = StoryTheme::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(InputMode::Edit, &theme)
            .message(Some(("Story updated", Severity::Success)))
            .render(area, &mut buf);

        let text = line_text(&buf);
        assert!(text.starts_with("-- EDIT -- | Story updated"));
    }

    #[test]
    fn test_command_line_echoes_input() {
        let theme = StoryTheme::default();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        CommandLineWidget::new("export pdf", 10, &theme).render(area, &mut buf);
        assert!(line_text(&buf).starts_with(":export pdf"));
    }
}
