//! StorySession - the event-driven API for writing a story.
//!
//! A session owns the story buffer, the current genre and style selection,
//! and the text generator. Every user action becomes a [`StoryEvent`] handed
//! to [`StorySession::handle`], which returns an [`Outcome`] describing what
//! changed and what to tell the user.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{Genre, Style};
use crate::export::{Artifact, ExportError, ExportFormat};
use crate::generator::{GenerationError, GenerationErrorKind, TextGenerator};
use crate::pdf::PdfLayout;
use crate::prompt::{
    compose_chapter_prompt, compose_story_prompt, validate_chapter, validate_prompt,
    ValidationWarning,
};
use crate::story::Story;

/// Default limit on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from the generation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error(transparent)]
    Validation(#[from] ValidationWarning),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Settings that shape a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Initial genre selection.
    pub genre: Genre,

    /// Initial style selection.
    pub style: Style,

    /// Where saves and exports are written.
    pub export_dir: PathBuf,

    /// Limit on a single generation call.
    pub timeout: Duration,

    /// Page layout for the PDF export.
    pub pdf_layout: PdfLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            genre: Genre::default(),
            style: Style::default(),
            export_dir: PathBuf::from("."),
            timeout: DEFAULT_GENERATION_TIMEOUT,
            pdf_layout: PdfLayout::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = genre;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pdf_layout(mut self, layout: PdfLayout) -> Self {
        self.pdf_layout = layout;
        self
    }
}

/// One user action.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryEvent {
    SelectGenre(Genre),
    SelectStyle(Style),
    GenerateStory { prompt: String },
    GenerateChapter { prompt: String },
    EditStory { text: String },
    SaveStory,
    ExportText,
    ExportPdf,
}

impl StoryEvent {
    /// Export events for `format`, text first.
    pub fn exports(format: ExportFormat) -> Vec<StoryEvent> {
        match format {
            ExportFormat::Text => vec![StoryEvent::ExportText],
            ExportFormat::Pdf => vec![StoryEvent::ExportPdf],
            ExportFormat::All => vec![StoryEvent::ExportText, StoryEvent::ExportPdf],
        }
    }
}

/// How an outcome should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// The result of handling one [`StoryEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    GenreSelected(Genre),
    StyleSelected(Style),
    /// The story was replaced with `text`.
    StoryGenerated { text: String },
    /// `text` was appended as a new chapter.
    ChapterGenerated { text: String },
    StoryEdited,
    Saved { path: PathBuf },
    Exported {
        file_name: &'static str,
        mime: &'static str,
        path: PathBuf,
    },
    Warning(ValidationWarning),
    GenerationFailed(GenerationError),
    ExportFailed { message: String },
}

impl Outcome {
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::GenreSelected(_) | Outcome::StyleSelected(_) => Severity::Info,
            Outcome::StoryGenerated { .. }
            | Outcome::ChapterGenerated { .. }
            | Outcome::StoryEdited
            | Outcome::Saved { .. }
            | Outcome::Exported { .. } => Severity::Success,
            Outcome::Warning(_) => Severity::Warning,
            Outcome::GenerationFailed(_) | Outcome::ExportFailed { .. } => Severity::Error,
        }
    }

    /// User-facing status text.
    pub fn message(&self) -> String {
        match self {
            Outcome::GenreSelected(genre) => format!("Genre: {genre}"),
            Outcome::StyleSelected(style) => format!("Writing style: {style}"),
            Outcome::StoryGenerated { text } => {
                format!("Story generated ({} words)", word_count(text))
            }
            Outcome::ChapterGenerated { text } => {
                format!("Chapter added ({} words)", word_count(text))
            }
            Outcome::StoryEdited => "Story updated".to_string(),
            Outcome::Saved { .. } => "Story saved successfully!".to_string(),
            Outcome::Exported {
                file_name, path, ..
            } => format!("Downloaded {file_name} to {}", path.display()),
            Outcome::Warning(warning) => warning.to_string(),
            Outcome::GenerationFailed(error) => format!("Error generating story: {error}"),
            Outcome::ExportFailed { message } => message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A story-writing session.
///
/// Created empty; lives until dropped. Generic over the generator so tests can
/// drive it with [`crate::testing::MockGenerator`].
pub struct StorySession<G> {
    id: Uuid,
    story: Story,
    genre: Genre,
    style: Style,
    config: SessionConfig,
    generator: G,
}

impl<G: TextGenerator> StorySession<G> {
    pub fn new(generator: G, config: SessionConfig) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, model = generator.model(), "Starting story session");
        Self {
            id,
            story: Story::new(),
            genre: config.genre,
            style: config.style,
            config,
            generator,
        }
    }

    /// Handle one event.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn handle(&mut self, event: StoryEvent) -> Outcome {
        match event {
            StoryEvent::SelectGenre(genre) => {
                self.set_genre(genre);
                Outcome::GenreSelected(genre)
            }
            StoryEvent::SelectStyle(style) => {
                self.set_style(style);
                Outcome::StyleSelected(style)
            }
            StoryEvent::GenerateStory { prompt } => match self.generate_story(&prompt).await {
                Ok(text) => Outcome::StoryGenerated { text },
                Err(e) => e.into(),
            },
            StoryEvent::GenerateChapter { prompt } => {
                match self.generate_chapter(&prompt).await {
                    Ok(text) => Outcome::ChapterGenerated { text },
                    Err(e) => e.into(),
                }
            }
            StoryEvent::EditStory { text } => {
                self.edit(text);
                Outcome::StoryEdited
            }
            StoryEvent::SaveStory => match self.save().await {
                Ok(path) => Outcome::Saved { path },
                Err(e) => Outcome::ExportFailed {
                    message: e.to_string(),
                },
            },
            StoryEvent::ExportText => self.export_outcome(self.text_artifact()).await,
            StoryEvent::ExportPdf => self.export_outcome(self.pdf_artifact()).await,
        }
    }

    /// Generate a new story, replacing the current one.
    pub async fn generate_story(&mut self, prompt: &str) -> Result<String, StoryError> {
        validate_prompt(prompt)?;
        let request = compose_story_prompt(prompt, self.genre, self.style);
        let text = self.call_generator(&request).await?;
        self.story.replace(text.clone());
        info!(words = word_count(&text), "Story generated");
        Ok(text)
    }

    /// Generate a chapter continuing the current story and append it.
    pub async fn generate_chapter(&mut self, prompt: &str) -> Result<String, StoryError> {
        validate_chapter(self.story.read(), prompt)?;
        let continuation = compose_chapter_prompt(self.story.read(), prompt);
        let request = compose_story_prompt(&continuation, self.genre, self.style);
        let text = self.call_generator(&request).await?;
        self.story.append(&text);
        info!(words = word_count(&text), "Chapter appended");
        Ok(text)
    }

    async fn call_generator(&self, request: &str) -> Result<String, GenerationError> {
        debug!(
            prompt_len = request.len(),
            genre = %self.genre,
            style = %self.style,
            "Calling text generator"
        );

        let result = tokio::time::timeout(self.config.timeout, self.generator.generate(request))
            .await
            .unwrap_or_else(|_| {
                Err(GenerationError::new(
                    GenerationErrorKind::Timeout,
                    format!("no response within {}s", self.config.timeout.as_secs()),
                ))
            })
            .and_then(|text| {
                if text.is_empty() {
                    Err(GenerationError::new(
                        GenerationErrorKind::MalformedResponse,
                        "the model returned no text",
                    ))
                } else {
                    Ok(text)
                }
            });

        match &result {
            Ok(text) => debug!(response_len = text.len(), "Generation succeeded"),
            Err(e) => warn!(kind = ?e.kind, "Generation failed: {}", e.message),
        }
        result
    }

    /// Replace the story with `text` verbatim.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.story.replace(text);
        debug!(len = self.story.read().len(), "Story edited");
    }

    /// Write the story to `story.txt` in the export directory.
    pub async fn save(&self) -> Result<PathBuf, ExportError> {
        let path = self.text_artifact().write_to(self.export_dir()).await?;
        info!(path = %path.display(), "Story saved");
        Ok(path)
    }

    /// Write the text export. Same file as [`Self::save`].
    pub async fn export_text(&self) -> Result<PathBuf, ExportError> {
        self.write_artifact(&self.text_artifact()).await
    }

    pub async fn export_pdf(&self) -> Result<PathBuf, ExportError> {
        self.write_artifact(&self.pdf_artifact()).await
    }

    /// Snapshot the story as `story.txt`.
    pub fn text_artifact(&self) -> Artifact {
        Artifact::text(self.story.read())
    }

    /// Snapshot the story as `story.pdf`.
    pub fn pdf_artifact(&self) -> Artifact {
        Artifact::pdf(self.story.read(), &self.config.pdf_layout)
    }

    async fn write_artifact(&self, artifact: &Artifact) -> Result<PathBuf, ExportError> {
        let path = artifact.write_to(self.export_dir()).await?;
        info!(
            file = artifact.file_name,
            bytes = artifact.bytes.len(),
            "Exported story"
        );
        Ok(path)
    }

    async fn export_outcome(&self, artifact: Artifact) -> Outcome {
        match self.write_artifact(&artifact).await {
            Ok(path) => Outcome::Exported {
                file_name: artifact.file_name,
                mime: artifact.mime,
                path,
            },
            Err(e) => {
                warn!("Export failed: {e}");
                Outcome::ExportFailed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.genre = genre;
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn export_dir(&self) -> &Path {
        &self.config.export_dir
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl From<StoryError> for Outcome {
    fn from(e: StoryError) -> Self {
        match e {
            StoryError::Validation(w) => Outcome::Warning(w),
            StoryError::Generation(g) => Outcome::GenerationFailed(g),
        }
    }
}
