//! List selector for the genre and style catalogs

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::StoryTheme;

/// A bordered list with one highlighted entry
pub struct SelectorWidget<'a> {
    title: &'a str,
    options: Vec<&'static str>,
    selected: usize,
    theme: &'a StoryTheme,
    focused: bool,
}

impl<'a> SelectorWidget<'a> {
    pub fn new(
        title: &'a str,
        options: impl IntoIterator<Item = &'static str>,
        theme: &'a StoryTheme,
    ) -> Self {
        Self {
            title,
            options: options.into_iter().collect(),
            selected: 0,
            theme,
            focused: false,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SelectorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            format!(" {} [j/k] ", self.title)
        } else {
            format!(" {} ", self.title)
        };

        let block = Block::default()
            .title(Span::styled(title, self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!("> {name}"),
                        self.theme.selected_style(self.focused),
                    ))
                } else {
                    Line::from(Span::raw(format!("  {name}")))
                }
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
