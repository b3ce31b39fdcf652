//! The text-generation seam.
//!
//! Sessions only see [`TextGenerator`]; [`GeminiGenerator`] is the production
//! implementation and [`crate::testing::MockGenerator`] the scripted one.

use async_trait::async_trait;
use gemini::{Gemini, Request};
use std::fmt;
use thiserror::Error;

/// Broad category of a failed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Missing, rejected or malformed credential.
    Credential,
    Network,
    Timeout,
    /// Rate limit or quota exhausted.
    Quota,
    /// The provider refused the prompt.
    Blocked,
    MalformedResponse,
    /// Any other provider-side failure.
    Provider,
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GenerationErrorKind::Credential => "credential error",
            GenerationErrorKind::Network => "network error",
            GenerationErrorKind::Timeout => "timed out",
            GenerationErrorKind::Quota => "quota exceeded",
            GenerationErrorKind::Blocked => "prompt blocked",
            GenerationErrorKind::MalformedResponse => "malformed response",
            GenerationErrorKind::Provider => "provider error",
        };
        f.write_str(label)
    }
}

/// A failed generation call: what kind of failure, and the provider's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<gemini::Error> for GenerationError {
    fn from(e: gemini::Error) -> Self {
        let kind = match &e {
            gemini::Error::NoApiKey | gemini::Error::Config(_) => GenerationErrorKind::Credential,
            gemini::Error::Network(_) => GenerationErrorKind::Network,
            gemini::Error::Timeout => GenerationErrorKind::Timeout,
            gemini::Error::Api { status, .. } => match status {
                401 | 403 => GenerationErrorKind::Credential,
                429 => GenerationErrorKind::Quota,
                _ => GenerationErrorKind::Provider,
            },
            gemini::Error::Parse(_) | gemini::Error::EmptyResponse => {
                GenerationErrorKind::MalformedResponse
            }
            gemini::Error::Blocked(_) => GenerationErrorKind::Blocked,
        };
        Self::new(kind, e.to_string())
    }
}

/// Turns a composed prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Name of the model behind this generator.
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// [`TextGenerator`] backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Gemini,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiGenerator {
    pub fn new(client: Gemini) -> Self {
        Self {
            client,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    fn build_request(&self, prompt: &str) -> Request {
        let mut request = Request::user(prompt);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max) = self.max_output_tokens {
            request = request.with_max_output_tokens(max);
        }
        request
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self.client.generate_content(self.build_request(prompt)).await?;
        let text = response.text();
        if text.is_empty() {
            return Err(gemini::Error::EmptyResponse.into());
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        self.client.model()
    }
}
