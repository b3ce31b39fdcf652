//! AI story writer engine.
//!
//! This crate provides:
//! - The story buffer and the prompts built from it
//! - A text-generation seam with a Gemini-backed implementation
//! - Plain-text and paginated PDF export
//! - An event-driven session tying them together
//!
//! # Quick Start
//!
//! ```ignore
//! use story_core::{AppConfig, StoryEvent, StorySession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load(None)?;
//!     let generator = config.build_generator(&config.resolve_api_key()?)?;
//!     let mut session = StorySession::new(generator, config.session_config());
//!
//!     let outcome = session
//!         .handle(StoryEvent::GenerateStory { prompt: "A lighthouse at the end of time".into() })
//!         .await;
//!     println!("{}", outcome.message());
//!
//!     session.handle(StoryEvent::ExportPdf).await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod generator;
pub mod headless;
pub mod pdf;
pub mod prompt;
pub mod session;
pub mod story;
pub mod testing;

// Primary public API
pub use catalog::{CatalogError, Genre, Style};
pub use config::{AppConfig, ConfigError};
pub use export::{Artifact, ExportError, ExportFormat};
pub use gemini::API_KEY_VAR;
pub use generator::{GeminiGenerator, GenerationError, GenerationErrorKind, TextGenerator};
pub use headless::{CommandError, HeadlessCommand};
pub use pdf::{LineOverflow, PdfLayout};
pub use prompt::{ValidationWarning, DEFAULT_PROMPT};
pub use session::{Outcome, SessionConfig, Severity, StoryError, StoryEvent, StorySession};
pub use story::Story;
pub use testing::{MockGenerator, MockReply};
