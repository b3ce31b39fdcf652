//! Story display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use story_core::Story;

use crate::ui::theme::StoryTheme;

/// Widget for displaying the story
pub struct StoryWidget<'a> {
    story: &'a Story,
    scroll: usize,
    theme: &'a StoryTheme,
    focused: bool,
    generating: bool,
}

impl<'a> StoryWidget<'a> {
    pub fn new(story: &'a Story, theme: &'a StoryTheme) -> Self {
        Self {
            story,
            scroll: 0,
            theme,
            focused: false,
            generating: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn generating(mut self, generating: bool) -> Self {
        self.generating = generating;
        self
    }
}

/// Rows a line takes when wrapped at `width` columns.
fn wrapped_height(line: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    line.chars().count().div_ceil(width).max(1)
}

impl Widget for StoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let words = self.story.word_count();
        let title = match (self.generating, self.focused) {
            (true, _) => " Story - Generating... ".to_string(),
            (false, true) => format!(" Story ({words} words) [j/k scroll, e edit] "),
            (false, false) => format!(" Story ({words} words) "),
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.story.is_empty() {
            let hint = Line::from(Span::styled(
                "Your story will appear here. Press 'g' to generate one.",
                self.theme.hint_style(),
            ));
            Paragraph::new(hint)
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        }

        let style = self.theme.story_style();
        let lines: Vec<Line> = self
            .story
            .lines()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect();

        // Leave a column for the scrollbar
        let text_width = inner.width.saturating_sub(1) as usize;
        let total_lines: usize = self
            .story
            .lines()
            .map(|line| wrapped_height(line, text_width))
            .sum();
        let visible_height = inner.height as usize;
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        let text_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(text_area, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            // Hint at bottom if more content below
            if scroll < max_scroll {
                let hint = format!(" ↓{} more ", max_scroll - scroll);
                let hint_y = inner.y + inner.height.saturating_sub(1);
                let hint_style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM);
                for (i, ch) in hint.chars().enumerate() {
                    let x = inner.x + (i as u16);
                    if x < inner.x + inner.width.saturating_sub(2) {
                        buf[(x, hint_y)].set_char(ch).set_style(hint_style);
                    }
                }
            }
        }
    }
}
