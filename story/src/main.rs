//! AI story writer TUI application.
//!
//! A vim-style terminal interface for writing stories with a hosted
//! text-generation model: pick a genre and a writing style, generate a story,
//! extend it chapter by chapter, edit it, then save or export it.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! cargo run -p story -- --headless --genre mystery --style minimalistic
//! ```

mod app;
mod events;
mod headless;
mod input;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use story_core::{AppConfig, Genre, LineOverflow, StorySession, Style, TextGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, Session};
use events::{handle_event, EventResult};
use ui::render::render;

/// Command line options. Values given here override the configuration files.
#[derive(Debug, Parser)]
#[command(name = "story-writer", version, about = "Write and extend stories with an AI model")]
struct Cli {
    /// Run the line-oriented interface instead of the TUI
    #[arg(long)]
    headless: bool,

    /// Configuration file to use instead of ./story_writer.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Starting genre (e.g. "fantasy", "science-fiction")
    #[arg(long)]
    genre: Option<Genre>,

    /// Starting writing style (e.g. "classic", "poetic")
    #[arg(long)]
    style: Option<Style>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Directory that receives story.txt and story.pdf
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// How PDF lines wider than the page are handled: clip or wrap
    #[arg(long, value_name = "MODE")]
    pdf_overflow: Option<LineOverflow>,

    /// Log file for TUI mode
    #[arg(long, value_name = "PATH", default_value = "story-writer.log")]
    log_file: PathBuf,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(genre) = self.genre {
            config.default_genre = genre;
        }
        if let Some(style) = self.style {
            config.default_style = style;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = dir.clone();
        }
        if let Some(overflow) = self.pdf_overflow {
            config.pdf.overflow = overflow;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli)?;

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    info!(?config, "Configuration loaded");

    // The credential is checked before anything is drawn
    let api_key = config.resolve_api_key().with_context(|| {
        format!(
            "Set {} in the environment or a .env file, or api_key in {}",
            story_core::API_KEY_VAR,
            story_core::config::SECRETS_FILE
        )
    })?;
    let generator: Box<dyn TextGenerator> = Box::new(
        config
            .build_generator(&api_key)
            .context("Failed to create the Gemini client")?,
    );
    let session: Session = StorySession::new(generator, config.session_config());
    info!(session = %session.id(), "Session started");

    if cli.headless {
        return headless::run_headless(session)
            .await
            .context("Headless session failed");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result.context("Terminal error")
}

/// Logs go to stderr in headless mode and to a file under the TUI.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = open_log_file(&cli.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Hand queued events to the session
        while let Some(event) = app.take_pending() {
            if App::is_generation(&event) {
                // Show the indicator before blocking on the call
                app.begin_generation();
                terminal.draw(|f| render(f, &app))?;
            }
            app.dispatch(event).await;
        }

        if app.should_quit {
            return Ok(());
        }

        // Render
        terminal.draw(|f| render(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }
    }
}
