//! Application configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `story_writer.toml` in the working directory, or an explicit file
//! 3. `.secrets.toml` in the working directory
//! 4. `STORY_WRITER__*` environment variables (e.g. `STORY_WRITER__PDF__OVERFLOW=wrap`)
//!
//! The API key is resolved separately: the `Gen_API` environment variable wins
//! over any `api_key` found in the layered sources.

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{Genre, Style};
use crate::generator::GeminiGenerator;
use crate::pdf::{LineOverflow, PdfLayout};
use crate::session::SessionConfig;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "story_writer.toml";
/// Name of the optional secrets file.
pub const SECRETS_FILE: &str = ".secrets.toml";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STORY_WRITER";

const DEFAULT_CONFIG: &str = r#"
model = "gemini-2.0-flash"
timeout_secs = 120
export_dir = "."
default_genre = "Fantasy"
default_style = "Classic"

[pdf]
overflow = "clip"
"#;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error(
        "No API key found. Set the {var} environment variable or api_key in {SECRETS_FILE}",
        var = gemini::API_KEY_VAR
    )]
    MissingApiKey,

    #[error("API key is not valid: {0}")]
    InvalidApiKey(String),

    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,
}

/// PDF export settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub overflow: LineOverflow,
}

/// Settings loaded from the layered sources.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: u64,
    pub export_dir: PathBuf,
    pub default_genre: Genre,
    pub default_style: Style,
    #[serde(default)]
    pub pdf: PdfConfig,
    api_key: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("export_dir", &self.export_dir)
            .field("default_genre", &self.default_genre)
            .field("default_style", &self.default_style)
            .field("pdf", &self.pdf)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AppConfig {
    /// Load from the working directory. An explicit `path` replaces
    /// `story_writer.toml` and must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), path)
    }

    /// Load with `dir` standing in for the working directory.
    pub fn load_from(dir: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        builder = match path {
            Some(path) => builder.add_source(File::from(path.to_path_buf()).format(FileFormat::Toml)),
            None => builder.add_source(
                File::from(dir.join(CONFIG_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        let config = builder
            .add_source(
                File::from(dir.join(SECRETS_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        if config.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(config)
    }

    /// Resolve the credential: `Gen_API` first, then the configured `api_key`.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let from_env = std::env::var(gemini::API_KEY_VAR).ok();
        resolve_api_key(from_env, self.api_key.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pdf_layout(&self) -> PdfLayout {
        PdfLayout::default().with_overflow(self.pdf.overflow)
    }

    /// Session settings derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_genre(self.default_genre)
            .with_style(self.default_style)
            .with_export_dir(&self.export_dir)
            .with_timeout(self.timeout())
            .with_pdf_layout(self.pdf_layout())
    }

    /// Build the Gemini-backed generator for `api_key`.
    pub fn build_generator(&self, api_key: &str) -> Result<GeminiGenerator, ConfigError> {
        let client = gemini::Gemini::with_timeout(api_key, self.timeout())
            .map_err(|e| ConfigError::InvalidApiKey(e.to_string()))?
            .with_model(&self.model);

        let mut generator = GeminiGenerator::new(client);
        if let Some(temperature) = self.temperature {
            generator = generator.with_temperature(temperature);
        }
        if let Some(max) = self.max_output_tokens {
            generator = generator.with_max_output_tokens(max);
        }
        Ok(generator)
    }
}

fn resolve_api_key(from_env: Option<String>, configured: Option<&str>) -> Result<String, ConfigError> {
    let key = from_env
        .filter(|k| !k.trim().is_empty())
        .or_else(|| configured.filter(|k| !k.trim().is_empty()).map(str::to_string))
        .ok_or(ConfigError::MissingApiKey)?;

    gemini::validate_api_key(&key).map_err(|e| ConfigError::InvalidApiKey(e.to_string()))?;
    Ok(key)
}
