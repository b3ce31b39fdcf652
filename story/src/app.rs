//! Main application state and logic

use std::collections::VecDeque;

use story_core::{
    ExportFormat, Genre, Outcome, Severity, Style, StoryEvent, StorySession, TextGenerator,
    DEFAULT_PROMPT,
};
use tracing::debug;

use crate::input::{StoryEditor, TextInput};
use crate::ui::theme::StoryTheme;
use crate::ui::{FocusedField, Overlay};

/// The session type driven by the TUI.
pub type Session = StorySession<Box<dyn TextGenerator>>;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing into the prompt or chapter field
    Insert,
    /// Command mode - entering : commands
    Command,
    /// Rewriting the story in the multi-line editor
    Edit,
}

/// Main application state
pub struct App {
    pub session: Session,

    // UI state
    pub theme: StoryTheme,
    pub focused: FocusedField,
    overlay: Option<Overlay>,

    // Story display
    pub story_scroll: usize,

    // Input state
    pub input_mode: InputMode,
    pub prompt: TextInput,
    pub chapter: TextInput,
    command: TextInput,
    editor: Option<StoryEditor>,

    // Events waiting to be handled by the session
    pending: VecDeque<StoryEvent>,

    // Status
    status: Option<(String, Severity)>,
    pub generating: bool,
    pub should_quit: bool,
    pub quit_after_save: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            theme: StoryTheme::default(),
            focused: FocusedField::default(),
            overlay: None,
            story_scroll: 0,
            input_mode: InputMode::Normal,
            prompt: TextInput::with_text(DEFAULT_PROMPT),
            chapter: TextInput::new(),
            command: TextInput::new(),
            editor: None,
            pending: VecDeque::new(),
            status: None,
            generating: false,
            should_quit: false,
            quit_after_save: false,
        };
        app.set_status("Press 'i' to write a prompt, 'g' to generate, '?' for help");
        app
    }

    // =========================================================================
    // Session events
    // =========================================================================

    /// Queue an event for the session.
    pub fn queue(&mut self, event: StoryEvent) {
        self.pending.push_back(event);
    }

    /// Next queued event, if any.
    pub fn take_pending(&mut self) -> Option<StoryEvent> {
        self.pending.pop_front()
    }

    /// Whether handling `event` calls the text generator.
    pub fn is_generation(event: &StoryEvent) -> bool {
        matches!(
            event,
            StoryEvent::GenerateStory { .. } | StoryEvent::GenerateChapter { .. }
        )
    }

    /// Show the in-flight indicator before a generation call.
    pub fn begin_generation(&mut self) {
        self.generating = true;
        self.set_status("Generating...");
    }

    /// Hand one event to the session and show the outcome.
    pub async fn dispatch(&mut self, event: StoryEvent) -> Outcome {
        let outcome = self.session.handle(event).await;
        self.generating = false;
        self.apply_outcome(&outcome);
        outcome
    }

    /// Update the view after an outcome.
    pub fn apply_outcome(&mut self, outcome: &Outcome) {
        debug!(severity = ?outcome.severity(), "Applying outcome");
        self.set_status_with(outcome.message(), outcome.severity());

        match outcome {
            Outcome::StoryGenerated { .. } => {
                self.story_scroll = 0;
            }
            Outcome::ChapterGenerated { .. } => {
                self.chapter.clear();
                self.scroll_to_bottom();
            }
            Outcome::StoryEdited => {
                self.story_scroll = self.story_scroll.min(self.estimate_max_scroll());
            }
            Outcome::Saved { .. } => {
                if self.quit_after_save {
                    self.should_quit = true;
                }
            }
            Outcome::ExportFailed { .. } => {
                // Keep the user here to read the error
                self.quit_after_save = false;
            }
            _ => {}
        }
    }

    /// Queue story generation from the prompt field.
    pub fn generate_story(&mut self) {
        self.prompt.commit_to_history();
        self.queue(StoryEvent::GenerateStory {
            prompt: self.prompt.text().to_string(),
        });
    }

    /// Queue chapter generation from the chapter field.
    pub fn generate_chapter(&mut self) {
        self.chapter.commit_to_history();
        self.queue(StoryEvent::GenerateChapter {
            prompt: self.chapter.text().to_string(),
        });
    }

    /// Move the focused list selection by one entry.
    pub fn select_next(&mut self) {
        match self.focused {
            FocusedField::Genre => self.queue(StoryEvent::SelectGenre(self.session.genre().next())),
            FocusedField::Style => self.queue(StoryEvent::SelectStyle(self.session.style().next())),
            FocusedField::Story => self.scroll_down(1),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.focused {
            FocusedField::Genre => self.queue(StoryEvent::SelectGenre(self.session.genre().prev())),
            FocusedField::Style => self.queue(StoryEvent::SelectStyle(self.session.style().prev())),
            FocusedField::Story => self.scroll_up(1),
            _ => {}
        }
    }

    // =========================================================================
    // Insert mode
    // =========================================================================

    /// Enter insert mode on the focused field, or the prompt if a list is focused.
    pub fn enter_insert_mode(&mut self) {
        match self.focused {
            FocusedField::Prompt | FocusedField::Chapter => {}
            FocusedField::Story => {
                self.open_editor();
                return;
            }
            FocusedField::Genre | FocusedField::Style => {
                self.focused = FocusedField::Prompt;
            }
        }
        self.input_mode = InputMode::Insert;
    }

    /// The text field being typed into.
    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FocusedField::Prompt => Some(&mut self.prompt),
            FocusedField::Chapter => Some(&mut self.chapter),
            _ => None,
        }
    }

    /// Submit the focused field.
    pub fn submit_input(&mut self) {
        match self.focused {
            FocusedField::Prompt => self.generate_story(),
            FocusedField::Chapter => self.generate_chapter(),
            _ => {}
        }
        self.input_mode = InputMode::Normal;
    }

    // =========================================================================
    // Story editor
    // =========================================================================

    pub fn open_editor(&mut self) {
        self.editor = Some(StoryEditor::new(self.session.story().read()));
        self.input_mode = InputMode::Edit;
        self.set_status("Editing story: Ctrl+S to save changes, Esc to discard");
    }

    /// Replace the story with the editor's text.
    pub fn commit_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            self.queue(StoryEvent::EditStory {
                text: editor.text(),
            });
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn discard_editor(&mut self) {
        self.editor = None;
        self.input_mode = InputMode::Normal;
        self.set_status_with("Edit discarded", Severity::Warning);
    }

    pub fn editor(&self) -> Option<&StoryEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut StoryEditor> {
        self.editor.as_mut()
    }

    // =========================================================================
    // Command mode
    // =========================================================================

    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.clear();
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.clear();
    }

    pub fn command(&self) -> &TextInput {
        &self.command
    }

    pub fn command_mut(&mut self) -> &mut TextInput {
        &mut self.command
    }

    /// Run the typed command and return to normal mode.
    pub fn execute_command(&mut self) {
        let command = self.command.text().to_string();
        self.enter_normal_mode();
        self.process_command(&command);
    }

    /// Process a colon command (without the leading ':').
    pub fn process_command(&mut self, command: &str) {
        let command = command.trim().trim_start_matches(':');
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "" => {}
            "q" | "quit" | "exit" => {
                self.should_quit = true;
            }
            "w" | "save" => {
                self.queue(StoryEvent::SaveStory);
            }
            "wq" => {
                self.quit_after_save = true;
                self.queue(StoryEvent::SaveStory);
            }
            "export" | "download" => {
                let format = if arg.is_empty() {
                    Ok(ExportFormat::All)
                } else {
                    arg.parse::<ExportFormat>()
                };
                match format {
                    Ok(format) => {
                        for event in StoryEvent::exports(format) {
                            self.queue(event);
                        }
                    }
                    Err(e) => self.set_status_with(e.to_string(), Severity::Warning),
                }
            }
            "genre" => match arg.parse::<Genre>() {
                Ok(genre) => self.queue(StoryEvent::SelectGenre(genre)),
                Err(e) => self.set_status_with(e.to_string(), Severity::Warning),
            },
            "style" => match arg.parse::<Style>() {
                Ok(style) => self.queue(StoryEvent::SelectStyle(style)),
                Err(e) => self.set_status_with(e.to_string(), Severity::Warning),
            },
            "clear" => {
                self.queue(StoryEvent::EditStory {
                    text: String::new(),
                });
            }
            "help" | "h" => {
                self.toggle_help();
            }
            _ => {
                self.set_status_with(format!("Unknown command: {name}"), Severity::Warning);
            }
        }
    }

    // =========================================================================
    // Story scrolling
    // =========================================================================

    /// Scroll to the bottom; the widget caps the value to the real maximum.
    pub fn scroll_to_bottom(&mut self) {
        self.story_scroll = usize::MAX / 2;
    }

    /// Estimate max scroll assuming ~60 columns and ~15 visible lines
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 15;

        let estimated_lines: usize = self
            .session
            .story()
            .lines()
            .map(|line| line.chars().count() / ESTIMATED_WIDTH + 1)
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.story_scroll > max_scroll {
            self.story_scroll = max_scroll;
        }
        self.story_scroll = self.story_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        self.story_scroll = self.story_scroll.saturating_add(lines).min(max_scroll + 100);
    }

    // =========================================================================
    // Focus, overlays and status
    // =========================================================================

    pub fn cycle_focus(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn cycle_focus_reverse(&mut self) {
        self.focused = self.focused.prev();
    }

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Set an informational status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.set_status_with(message, Severity::Info);
    }

    pub fn set_status_with(&mut self, message: impl Into<String>, severity: Severity) {
        self.status = Some((message.into(), severity));
    }

    pub fn status(&self) -> Option<(&str, Severity)> {
        self.status.as_ref().map(|(m, s)| (m.as_str(), *s))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use story_core::{MockGenerator, SessionConfig, ValidationWarning};

    pub(crate) fn app_with(mock: MockGenerator) -> App {
        let generator: Box<dyn TextGenerator> = Box::new(mock);
        App::new(StorySession::new(generator, SessionConfig::default()))
    }

    async fn drain(app: &mut App) {
        while let Some(event) = app.take_pending() {
            app.dispatch(event).await;
        }
    }

    #[test]
    fn test_prompt_starts_with_default() {
        let app = app_with(MockGenerator::default());
        assert_eq!(app.prompt.text(), "Once upon a time...");
        assert_eq!(app.focused, FocusedField::Genre);
    }

    #[tokio::test]
    async fn test_generate_then_chapter() {
        let mock = MockGenerator::with_texts(["Opening.", "Next."]);
        let mut app = app_with(mock.clone());

        app.generate_story();
        drain(&mut app).await;
        app.chapter.set("Then what?");
        app.generate_chapter();
        drain(&mut app).await;

        assert_eq!(app.session.story().read(), "Opening.\n\nNext.");
        assert_eq!(app.chapter.text(), "");
        assert_eq!(app.status().map(|(_, s)| s), Some(Severity::Success));
        assert_eq!(
            mock.prompts()[0],
            "Write a Fantasy story in Classic style: Once upon a time..."
        );
    }

    #[tokio::test]
    async fn test_blank_prompt_shows_warning() {
        let mock = MockGenerator::default();
        let mut app = app_with(mock.clone());
        app.prompt.set("  ");
        app.generate_story();
        let event = app.take_pending().unwrap();
        let outcome = app.dispatch(event).await;

        assert_eq!(outcome, Outcome::Warning(ValidationWarning::BlankPrompt));
        assert_eq!(
            app.status(),
            Some(("Please enter a story prompt!", Severity::Warning))
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_selection_dispatches() {
        let mut app = app_with(MockGenerator::default());
        app.select_next();
        drain(&mut app).await;
        assert_eq!(app.session.genre(), Genre::ScienceFiction);

        app.cycle_focus();
        app.select_prev();
        drain(&mut app).await;
        assert_eq!(app.session.style(), Style::Minimalistic);
    }

    #[tokio::test]
    async fn test_editor_commit_and_discard() {
        let mut app = app_with(MockGenerator::default());
        app.open_editor();
        assert_eq!(app.input_mode, InputMode::Edit);
        for c in "Hand made.".chars() {
            app.editor_mut().unwrap().type_char(c);
        }
        app.commit_editor();
        drain(&mut app).await;
        assert_eq!(app.session.story().read(), "Hand made.");

        app.open_editor();
        app.editor_mut().unwrap().type_char('!');
        app.discard_editor();
        drain(&mut app).await;
        assert_eq!(app.session.story().read(), "Hand made.");
        assert!(app.editor().is_none());
    }

    #[tokio::test]
    async fn test_commands() {
        let mut app = app_with(MockGenerator::default());

        app.process_command("genre horror");
        app.process_command("style poetic");
        drain(&mut app).await;
        assert_eq!(app.session.genre(), Genre::Horror);
        assert_eq!(app.session.style(), Style::Poetic);

        app.process_command("genre western");
        assert!(app.take_pending().is_none());
        assert_eq!(app.status().map(|(_, s)| s), Some(Severity::Warning));

        app.process_command("export docx");
        assert!(app.take_pending().is_none());

        app.process_command("export");
        assert_eq!(app.take_pending(), Some(StoryEvent::ExportText));
        assert_eq!(app.take_pending(), Some(StoryEvent::ExportPdf));

        app.process_command("help");
        assert!(matches!(app.overlay(), Some(Overlay::Help)));

        app.process_command("q");
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_write_quit_waits_for_save() {
        let temp = tempfile::TempDir::new().unwrap();
        let generator: Box<dyn TextGenerator> = Box::new(MockGenerator::default());
        let config = SessionConfig::default().with_export_dir(temp.path());
        let mut app = App::new(StorySession::new(generator, config));

        app.process_command("wq");
        assert!(!app.should_quit);
        drain(&mut app).await;
        assert!(app.should_quit);
        assert_eq!(app.status(), Some(("Story saved successfully!", Severity::Success)));
        assert!(temp.path().join("story.txt").exists());
    }

    #[tokio::test]
    async fn test_clear_command_empties_story() {
        let mut app = app_with(MockGenerator::default());
        app.session.edit("something");
        app.process_command("clear");
        drain(&mut app).await;
        assert!(app.session.story().is_empty());
    }
}
