//! End-to-end session tests driven by `MockGenerator`.
//!
//! These exercise the full event loop without any network access:
//! generate, extend, edit, save and export a story.

use std::time::Duration;

use story_core::pdf::PdfDocument;
use story_core::{
    Genre, GenerationErrorKind, LineOverflow, MockGenerator, MockReply, Outcome, PdfLayout,
    SessionConfig, Severity, StoryEvent, StorySession, Style, ValidationWarning,
};
use tempfile::TempDir;

fn session_in(dir: &TempDir, mock: &MockGenerator) -> StorySession<MockGenerator> {
    let config = SessionConfig::default().with_export_dir(dir.path());
    StorySession::new(mock.clone(), config)
}

// =============================================================================
// WRITING FLOW
// =============================================================================

#[tokio::test]
async fn test_full_writing_session() {
    let temp = TempDir::new().unwrap();
    let mock = MockGenerator::with_texts([
        "The lighthouse keeper found a map.",
        "The map led to a drowned city.",
    ]);
    let mut session = session_in(&temp, &mock);

    session.handle(StoryEvent::SelectGenre(Genre::Adventure)).await;
    session.handle(StoryEvent::SelectStyle(Style::Descriptive)).await;

    let outcome = session
        .handle(StoryEvent::GenerateStory {
            prompt: "A lighthouse keeper".into(),
        })
        .await;
    assert_eq!(outcome.severity(), Severity::Success);

    let outcome = session
        .handle(StoryEvent::GenerateChapter {
            prompt: "Follow the map".into(),
        })
        .await;
    assert!(matches!(outcome, Outcome::ChapterGenerated { .. }));

    assert_eq!(
        session.story().read(),
        "The lighthouse keeper found a map.\n\nThe map led to a drowned city."
    );

    let prompts = mock.prompts();
    assert_eq!(
        prompts[0],
        "Write a Adventure story in Descriptive style: A lighthouse keeper"
    );
    assert_eq!(
        prompts[1],
        "Write a Adventure story in Descriptive style: The lighthouse keeper found a map.\n\nFollow the map"
    );

    session
        .handle(StoryEvent::EditStory {
            text: "Rewritten by hand.".into(),
        })
        .await;

    for event in StoryEvent::exports(story_core::ExportFormat::All) {
        assert_eq!(session.handle(event).await.severity(), Severity::Success);
    }

    let text = std::fs::read_to_string(temp.path().join("story.txt")).unwrap();
    assert_eq!(text, "Rewritten by hand.");
    let pdf = std::fs::read(temp.path().join("story.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.windows(18).any(|w| w == b"Rewritten by hand."));
}

#[tokio::test]
async fn test_retry_after_failure() {
    let temp = TempDir::new().unwrap();
    let mock = MockGenerator::new(vec![
        MockReply::failure(GenerationErrorKind::Network, "dns lookup failed"),
        MockReply::text("Second time lucky."),
    ]);
    let mut session = session_in(&temp, &mock);

    let event = StoryEvent::GenerateStory {
        prompt: "Luck".into(),
    };
    let first = session.handle(event.clone()).await;
    assert!(first.message().starts_with("Error generating story:"));
    assert!(session.story().is_empty());

    let second = session.handle(event).await;
    assert_eq!(
        second,
        Outcome::StoryGenerated {
            text: "Second time lucky.".into()
        }
    );
    assert_eq!(session.story().read(), "Second time lucky.");
}

#[tokio::test]
async fn test_whitespace_prompts_never_reach_generator() {
    let temp = TempDir::new().unwrap();
    let mock = MockGenerator::with_texts(["A story."]);
    let mut session = session_in(&temp, &mock);

    let outcome = session
        .handle(StoryEvent::GenerateStory {
            prompt: " \t ".into(),
        })
        .await;
    assert_eq!(outcome, Outcome::Warning(ValidationWarning::BlankPrompt));

    let outcome = session
        .handle(StoryEvent::GenerateChapter {
            prompt: "more".into(),
        })
        .await;
    assert_eq!(outcome, Outcome::Warning(ValidationWarning::NoStoryYet));

    session
        .handle(StoryEvent::GenerateStory {
            prompt: "go".into(),
        })
        .await;
    let outcome = session
        .handle(StoryEvent::GenerateChapter {
            prompt: "\n".into(),
        })
        .await;
    assert_eq!(
        outcome,
        Outcome::Warning(ValidationWarning::BlankChapterPrompt)
    );
    assert_eq!(outcome.message(), "Enter some details for the new chapter!");

    assert_eq!(mock.call_count(), 1);
    assert_eq!(session.story().read(), "A story.");
}

#[tokio::test(start_paused = true)]
async fn test_slow_chapter_times_out_without_append() {
    let temp = TempDir::new().unwrap();
    let mock = MockGenerator::with_texts(["Opening.", "Never seen."]);
    let config = SessionConfig::default()
        .with_export_dir(temp.path())
        .with_timeout(Duration::from_secs(10));
    let mut session = StorySession::new(mock.clone(), config);

    session.generate_story("start").await.unwrap();

    let slow = mock.clone().with_delay(Duration::from_secs(60));
    let mut slow_session = StorySession::new(
        slow,
        SessionConfig::default().with_timeout(Duration::from_secs(10)),
    );
    slow_session.edit(session.story().read());

    let outcome = slow_session
        .handle(StoryEvent::GenerateChapter {
            prompt: "continue".into(),
        })
        .await;
    match outcome {
        Outcome::GenerationFailed(e) => assert_eq!(e.kind, GenerationErrorKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(slow_session.story().read(), "Opening.");
}

// =============================================================================
// PDF EXPORT
// =============================================================================

#[tokio::test]
async fn test_pdf_cells_follow_story_lines() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(&temp, &MockGenerator::default());
    let story = (1..=12)
        .map(|i| format!("Line number {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    session.edit(story.clone());

    let doc = PdfDocument::layout_story(session.story().read(), &session.config().pdf_layout);
    assert_eq!(doc.page_count(), 1);
    let texts: Vec<&str> = doc.cells().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, story.split('\n').collect::<Vec<_>>());

    let artifact = session.pdf_artifact();
    let bytes = artifact.bytes;
    let mut last = 0;
    for line in story.split('\n') {
        let needle = format!("({line}) Tj");
        let pos = bytes
            .windows(needle.len())
            .position(|w| w == needle.as_bytes())
            .unwrap();
        assert!(pos > last);
        last = pos;
    }
}

#[tokio::test]
async fn test_wrap_layout_from_config() {
    let temp = TempDir::new().unwrap();
    let layout = PdfLayout::default().with_overflow(LineOverflow::Wrap);
    let config = SessionConfig::default()
        .with_export_dir(temp.path())
        .with_pdf_layout(layout);
    let mut session = StorySession::new(MockGenerator::default(), config);
    session.edit("word ".repeat(200));

    let doc = PdfDocument::layout_story(session.story().read(), &session.config().pdf_layout);
    assert!(doc.cells().count() > 1);

    let outcome = session.handle(StoryEvent::ExportPdf).await;
    assert_eq!(outcome.severity(), Severity::Success);
}

#[tokio::test]
async fn test_empty_story_exports() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(&temp, &MockGenerator::default());

    assert!(matches!(
        session.handle(StoryEvent::SaveStory).await,
        Outcome::Saved { .. }
    ));
    assert_eq!(
        std::fs::read(temp.path().join("story.txt")).unwrap(),
        Vec::<u8>::new()
    );

    session.handle(StoryEvent::ExportPdf).await;
    let pdf = std::fs::read(temp.path().join("story.pdf")).unwrap();
    assert!(pdf.windows(8).any(|w| w == b"/Count 1"));
    assert!(!pdf.windows(3).any(|w| w == b" Tj"));
}
