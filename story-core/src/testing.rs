//! Testing utilities.
//!
//! `MockGenerator` stands in for the hosted model: it returns scripted replies
//! in order and records every prompt it was sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::generator::{GenerationError, GenerationErrorKind, TextGenerator};

/// A scripted reply from the mock generator.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Failure(GenerationError),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    pub fn failure(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        MockReply::Failure(GenerationError::new(kind, message))
    }
}

/// A generator that returns scripted replies.
///
/// Clones share the reply queue and the prompt log, so a test can keep a
/// handle after moving the generator into a session.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockGenerator {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            ..Self::default()
        }
    }

    /// Replies with each of `texts` in turn.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(MockReply::text).collect())
    }

    /// Sleep for `delay` before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a reply to the end of the queue.
    pub fn queue(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Failure(error)) => Err(error),
            None => Err(GenerationError::new(
                GenerationErrorKind::Provider,
                "no more scripted replies",
            )),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_runs_dry() {
        let mock = MockGenerator::with_texts(["one", "two"]);
        assert_eq!(mock.generate("a").await.unwrap(), "one");
        assert_eq!(mock.generate("b").await.unwrap(), "two");

        let err = mock.generate("c").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Provider);
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockGenerator::default();
        let handle = mock.clone();
        handle.queue(MockReply::failure(GenerationErrorKind::Quota, "slow down"));

        let err = mock.generate("p").await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Quota);
        assert_eq!(handle.call_count(), 1);
    }
}
