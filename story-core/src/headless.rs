//! Line protocol for driving a session without a TUI.
//!
//! Designed for scripts and automated testing:
//! - Plain lines generate a new story from that prompt
//! - Lines starting with `#` are commands (`#chapter`, `#save`, `#quit`, ...)
//!
//! Parsing lives here so it can be tested without any terminal I/O.

use thiserror::Error;

use crate::catalog::{CatalogError, Genre, Style};
use crate::export::{ExportFormat, UnknownFormat};

/// Terminates the story text read by `#edit`.
pub const EDIT_TERMINATOR: &str = ".";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// Generate a new story from this prompt.
    Generate(String),
    /// Append a chapter written from this prompt.
    Chapter(String),
    Genre(Genre),
    Style(Style),
    /// Replace the story with the lines that follow, up to a lone `.`.
    Edit,
    Save,
    Export(ExportFormat),
    Show,
    Status,
    Genres,
    Styles,
    Help,
    Quit,
}

/// A line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '#{0}'. Type #help for help.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Format(#[from] UnknownFormat),
}

impl HeadlessCommand {
    /// Parse one line.
    ///
    /// Anything not starting with `#` is a prompt and is kept verbatim apart
    /// from the line terminator, blank lines included.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some(command) = line.trim_start().strip_prefix('#') else {
            return Ok(HeadlessCommand::Generate(line.to_string()));
        };
        let command = command.trim();

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        let parsed = match name.to_lowercase().as_str() {
            "chapter" if arg.is_empty() => return Err(CommandError::Usage("#chapter <details>")),
            "chapter" => HeadlessCommand::Chapter(arg.to_string()),
            "genre" if arg.is_empty() => return Err(CommandError::Usage("#genre <name>")),
            "genre" => HeadlessCommand::Genre(arg.parse()?),
            "style" if arg.is_empty() => return Err(CommandError::Usage("#style <name>")),
            "style" => HeadlessCommand::Style(arg.parse()?),
            "edit" => HeadlessCommand::Edit,
            "save" => HeadlessCommand::Save,
            "export" if arg.is_empty() => HeadlessCommand::Export(ExportFormat::All),
            "export" => HeadlessCommand::Export(arg.parse()?),
            "show" => HeadlessCommand::Show,
            "status" => HeadlessCommand::Status,
            "genres" => HeadlessCommand::Genres,
            "styles" => HeadlessCommand::Styles,
            "help" => HeadlessCommand::Help,
            "quit" | "exit" => HeadlessCommand::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(parsed)
    }
}

/// Help text for the line protocol.
pub fn help_lines() -> &'static [&'static str] {
    &[
        "  <text>             - Generate a new story from this prompt",
        "  #chapter <details> - Add a chapter to the story",
        "  #genre <name>      - Select the genre",
        "  #style <name>      - Select the writing style",
        "  #edit              - Replace the story (end with a line holding only '.')",
        "  #save              - Save the story to story.txt",
        "  #export [txt|pdf|all] - Download the story",
        "  #show              - Print the current story",
        "  #status            - Show genre, style and story size",
        "  #genres / #styles  - List the choices",
        "  #help              - Show this help",
        "  #quit              - Exit",
    ]
}
