//! Render orchestration for the story writer TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use story_core::{Genre, Style as WritingStyle};

use crate::app::{App, InputMode};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    CommandLineWidget, EditorWidget, HotkeyBarWidget, InputWidget, SelectorWidget,
    StatusBarWidget, StoryWidget,
};

/// Which field has focus, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedField {
    #[default]
    Genre,
    Style,
    Prompt,
    Chapter,
    Story,
}

impl FocusedField {
    pub fn next(self) -> Self {
        match self {
            FocusedField::Genre => FocusedField::Style,
            FocusedField::Style => FocusedField::Prompt,
            FocusedField::Prompt => FocusedField::Chapter,
            FocusedField::Chapter => FocusedField::Story,
            FocusedField::Story => FocusedField::Genre,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedField::Genre => FocusedField::Story,
            FocusedField::Style => FocusedField::Genre,
            FocusedField::Prompt => FocusedField::Style,
            FocusedField::Chapter => FocusedField::Prompt,
            FocusedField::Story => FocusedField::Chapter,
        }
    }
}

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(
        area,
        Genre::all().len() as u16,
        WritingStyle::all().len() as u16,
    );

    render_header(frame, app, layout.header_area);

    // Selectors
    let genre_widget = SelectorWidget::new("Genre", Genre::all().iter().map(|g| g.name()), &app.theme)
        .selected(app.session.genre().index())
        .focused(app.focused == FocusedField::Genre);
    frame.render_widget(genre_widget, layout.genre_area);

    let style_widget = SelectorWidget::new(
        "Writing Style",
        WritingStyle::all().iter().map(|s| s.name()),
        &app.theme,
    )
    .selected(app.session.style().index())
    .focused(app.focused == FocusedField::Style);
    frame.render_widget(style_widget, layout.style_area);

    render_info(frame, app, layout.info_area);

    // Inputs
    let inserting = app.input_mode == InputMode::Insert;
    let prompt_widget = InputWidget::new("Story Prompt", app.prompt.text(), &app.theme)
        .cursor_position(app.prompt.cursor())
        .placeholder("Enter your story prompt")
        .focused(app.focused == FocusedField::Prompt)
        .active(inserting && app.focused == FocusedField::Prompt);
    frame.render_widget(prompt_widget, layout.prompt_area);

    let chapter_widget = InputWidget::new("Next Chapter", app.chapter.text(), &app.theme)
        .cursor_position(app.chapter.cursor())
        .placeholder("Describe what happens next")
        .focused(app.focused == FocusedField::Chapter)
        .active(inserting && app.focused == FocusedField::Chapter);
    frame.render_widget(chapter_widget, layout.chapter_area);

    // Story panel or the editor replacing it
    match app.editor() {
        Some(editor) => {
            frame.render_widget(EditorWidget::new(editor, &app.theme), layout.story_area);
        }
        None => {
            let story_widget = StoryWidget::new(app.session.story(), &app.theme)
                .scroll(app.story_scroll)
                .focused(app.focused == FocusedField::Story)
                .generating(app.generating);
            frame.render_widget(story_widget, layout.story_area);
        }
    }

    let status_widget = StatusBarWidget::new(app.input_mode, &app.theme).message(app.status());
    frame.render_widget(status_widget, layout.status_bar);

    if app.input_mode == InputMode::Command {
        let command = app.command();
        let command_widget = CommandLineWidget::new(command.text(), command.cursor(), &app.theme);
        frame.render_widget(command_widget, layout.hotkey_bar);
    } else {
        frame.render_widget(HotkeyBarWidget::new(app.input_mode, &app.theme), layout.hotkey_bar);
    }

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title and subtitle
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(" AI Story Writer", app.theme.header_style())),
        Line::from(Span::styled(
            " Create and expand your stories effortlessly!",
            app.theme.subheader_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Render the session summary under the selectors
fn render_info(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let label = Style::default().add_modifier(Modifier::DIM);

    let lines = vec![
        Line::from(vec![
            Span::styled("Model: ", label),
            Span::raw(session.generator().model().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Words: ", label),
            Span::raw(session.story().word_count().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Saves to: ", label),
            Span::raw(session.export_dir().display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("PDF lines: ", label),
            Span::raw(session.config().pdf_layout.overflow.to_string()),
        ]),
    ];

    let block = Block::default()
        .title(" Session ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 32, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);

    let help_text = vec![
        Line::from(Span::styled(
            " AI Story Writer - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Input Modes:", heading)),
        Line::from("  i       Type into the focused prompt field"),
        Line::from("  e       Edit the story text"),
        Line::from("  :       Enter COMMAND mode"),
        Line::from("  Esc     Return to NORMAL mode"),
        Line::from(""),
        Line::from(Span::styled("Navigation (NORMAL mode):", heading)),
        Line::from("  Tab/S-Tab      Cycle field focus"),
        Line::from("  j/k or ↑/↓     Change genre/style, scroll story"),
        Line::from("  PgUp/PgDn      Scroll story by page"),
        Line::from("  G              Jump to end of story"),
        Line::from(""),
        Line::from(Span::styled("Actions:", heading)),
        Line::from("  g       Generate story from the prompt"),
        Line::from("  c       Generate the next chapter"),
        Line::from("  s       Save story (story.txt)"),
        Line::from("  x / p   Download as text / PDF"),
        Line::from("  q       Quit"),
        Line::from(""),
        Line::from(Span::styled("Commands:", heading)),
        Line::from("  :w  :wq  :q         Save / save and quit / quit"),
        Line::from("  :export [txt|pdf]   Download the story"),
        Line::from("  :genre <name>       Pick a genre"),
        Line::from("  :style <name>       Pick a writing style"),
        Line::from("  :clear              Empty the story"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with;
    use ratatui::{backend::TestBackend, Terminal};
    use story_core::MockGenerator;

    fn screen(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_focus_cycle_is_closed() {
        let mut field = FocusedField::default();
        for _ in 0..5 {
            assert_eq!(field.next().prev(), field);
            field = field.next();
        }
        assert_eq!(field, FocusedField::Genre);
    }

    #[test]
    fn test_main_screen() {
        let mut app = app_with(MockGenerator::default());
        app.session.edit("It was a dark and stormy night.");

        let screen = screen(&app);
        assert!(screen.contains("AI Story Writer"));
        assert!(screen.contains("Create and expand your stories effortlessly!"));
        assert!(screen.contains("Science Fiction"));
        assert!(screen.contains("Minimalistic"));
        assert!(screen.contains("Once upon a time..."));
        assert!(screen.contains("It was a dark and stormy night."));
        assert!(screen.contains("-- NORMAL --"));
        assert!(screen.contains("Model: mock"));
    }

    #[test]
    fn test_help_and_command_line() {
        let mut app = app_with(MockGenerator::default());
        app.toggle_help();
        assert!(screen(&app).contains("AI Story Writer - Help"));

        app.close_overlay();
        app.enter_command_mode();
        app.command_mut().set("genre horror");
        assert!(screen(&app).contains(":genre horror"));
    }
}
