//! Headless mode for the story writer.
//!
//! A line-oriented interface for running a session without the TUI,
//! suitable for scripts and automated testing.

use std::io::{self, BufRead, Write};

use story_core::headless::{help_lines, EDIT_TERMINATOR};
use story_core::{
    Genre, HeadlessCommand, Outcome, StoryEvent, StorySession, Style, TextGenerator,
};

/// Run the session against stdin and stdout.
///
/// Protocol:
/// - Plain lines generate a new story from that prompt
/// - Lines starting with `#` are commands (`#chapter`, `#save`, `#quit`, ...)
/// - Output lines are tagged (`[STORY]`, `[ERROR]`, ...)
pub async fn run_headless<G: TextGenerator>(session: StorySession<G>) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_lines(session, stdin.lock(), stdout.lock()).await
}

/// Drive `session` from `input` until EOF or `#quit`.
pub async fn run_lines<G, R, W>(
    mut session: StorySession<G>,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    G: TextGenerator,
    R: BufRead,
    W: Write,
{
    writeln!(out, "=== AI Story Writer (headless) ===")?;
    writeln!(
        out,
        "Genre: {} | Style: {} | Model: {}",
        session.genre(),
        session.style(),
        session.generator().model()
    )?;
    writeln!(out, "Type a prompt to generate a story, or #help for commands.")?;
    writeln!(out)?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;

        let command = match HeadlessCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "[ERROR] {e}")?;
                out.flush()?;
                continue;
            }
        };

        match command {
            HeadlessCommand::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            HeadlessCommand::Generate(prompt) => {
                let outcome = session.handle(StoryEvent::GenerateStory { prompt }).await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Chapter(prompt) => {
                let outcome = session.handle(StoryEvent::GenerateChapter { prompt }).await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Genre(genre) => {
                let outcome = session.handle(StoryEvent::SelectGenre(genre)).await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Style(style) => {
                let outcome = session.handle(StoryEvent::SelectStyle(style)).await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Edit => {
                writeln!(out, "[EDIT] Enter the new story, then a line with only '{EDIT_TERMINATOR}'")?;
                out.flush()?;

                let mut text = Vec::new();
                for line in lines.by_ref() {
                    let line = line?;
                    if line.trim_end() == EDIT_TERMINATOR {
                        break;
                    }
                    text.push(line);
                }
                let outcome = session
                    .handle(StoryEvent::EditStory {
                        text: text.join("\n"),
                    })
                    .await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Save => {
                let outcome = session.handle(StoryEvent::SaveStory).await;
                print_outcome(&mut out, &outcome)?;
            }
            HeadlessCommand::Export(format) => {
                for event in StoryEvent::exports(format) {
                    let outcome = session.handle(event).await;
                    print_outcome(&mut out, &outcome)?;
                }
            }
            HeadlessCommand::Show => {
                writeln!(out, "[STORY]")?;
                if session.story().is_empty() {
                    writeln!(out, "(no story yet)")?;
                } else {
                    writeln!(out, "{}", session.story().read())?;
                }
                writeln!(out)?;
            }
            HeadlessCommand::Status => {
                writeln!(out, "[STATUS]")?;
                writeln!(out, "  Session: {}", session.id())?;
                writeln!(out, "  Genre: {}", session.genre())?;
                writeln!(out, "  Style: {}", session.style())?;
                writeln!(out, "  Words: {}", session.story().word_count())?;
                writeln!(out, "  Export dir: {}", session.export_dir().display())?;
            }
            HeadlessCommand::Genres => {
                let names: Vec<&str> = Genre::all().iter().map(|g| g.name()).collect();
                writeln!(out, "[GENRES] {}", names.join(", "))?;
            }
            HeadlessCommand::Styles => {
                let names: Vec<&str> = Style::all().iter().map(|s| s.name()).collect();
                writeln!(out, "[STYLES] {}", names.join(", "))?;
            }
            HeadlessCommand::Help => {
                writeln!(out, "[HELP]")?;
                for line in help_lines() {
                    writeln!(out, "{line}")?;
                }
            }
        }
        out.flush()?;
    }

    Ok(())
}

/// Print one outcome with its tag.
fn print_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::StoryGenerated { text } => {
            writeln!(out, "[STORY]")?;
            writeln!(out, "{text}")?;
            writeln!(out)?;
        }
        Outcome::ChapterGenerated { text } => {
            writeln!(out, "[CHAPTER]")?;
            writeln!(out, "{text}")?;
            writeln!(out)?;
        }
        Outcome::Saved { .. } => writeln!(out, "[SAVED] {}", outcome.message())?,
        Outcome::Exported { mime, .. } => {
            writeln!(out, "[EXPORTED] {} ({mime})", outcome.message())?
        }
        Outcome::Warning(_) => writeln!(out, "[WARNING] {}", outcome.message())?,
        Outcome::GenerationFailed(_) | Outcome::ExportFailed { .. } => {
            writeln!(out, "[ERROR] {}", outcome.message())?
        }
        Outcome::GenreSelected(_) | Outcome::StyleSelected(_) | Outcome::StoryEdited => {
            writeln!(out, "[STATUS] {}", outcome.message())?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_core::{GenerationErrorKind, MockGenerator, MockReply, SessionConfig};
    use tempfile::TempDir;

    async fn run(mock: &MockGenerator, dir: &TempDir, script: &str) -> String {
        let session = StorySession::new(
            mock.clone(),
            SessionConfig::default().with_export_dir(dir.path()),
        );
        let mut out = Vec::new();
        run_lines(session, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_generate_chapter_and_show() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::with_texts(["Opening.", "Next."]);
        let out = run(
            &mock,
            &temp,
            "#genre horror\nA haunted well\n#chapter Something climbs out\n#show\n",
        )
        .await;

        assert!(out.contains("[STATUS] Genre: Horror"));
        assert!(out.contains("[STORY]\nOpening.\n"));
        assert!(out.contains("[CHAPTER]\nNext.\n"));
        assert!(out.contains("[STORY]\nOpening.\n\nNext.\n"));
        assert_eq!(
            mock.prompts()[0],
            "Write a Horror story in Classic style: A haunted well"
        );
    }

    #[tokio::test]
    async fn test_edit_reads_until_terminator() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::default();
        let out = run(
            &mock,
            &temp,
            "#edit\nFirst line\n\nThird line\n.\n#save\n#quit\n#show\n",
        )
        .await;

        assert!(out.contains("[STATUS] Story updated"));
        assert!(out.contains("[SAVED] Story saved successfully!"));
        assert!(out.contains("Goodbye!"));
        assert!(!out.contains("[STORY]"));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("story.txt")).unwrap(),
            "First line\n\nThird line"
        );
    }

    #[tokio::test]
    async fn test_errors_and_warnings_are_tagged() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::new(vec![MockReply::failure(
            GenerationErrorKind::Quota,
            "quota exceeded",
        )]);
        let out = run(&mock, &temp, "#chapter more\n#genre western\nA prompt\n#bogus\n").await;

        assert!(out.contains("[WARNING] "));
        assert!(out.contains("[ERROR] Error generating story:"));
        assert!(out.contains("[ERROR] Unknown command '#bogus'"));
        assert_eq!(out.matches("[ERROR]").count(), 3);
    }

    #[tokio::test]
    async fn test_blank_line_warns_without_generating() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::with_texts(["unused"]);
        let out = run(&mock, &temp, "   \n\n").await;

        assert_eq!(out.matches("[WARNING] Please enter a story prompt!").count(), 2);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_whitespace_reaches_generator() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::with_texts(["A cat story."]);
        let out = run(&mock, &temp, "   a cat\t\n").await;

        assert!(out.contains("[STORY]\nA cat story.\n"));
        assert_eq!(
            mock.prompts()[0],
            "Write a Fantasy story in Classic style:    a cat\t"
        );
    }

    #[tokio::test]
    async fn test_export_all() {
        let temp = TempDir::new().unwrap();
        let mock = MockGenerator::with_texts(["A tale."]);
        let out = run(&mock, &temp, "Tell it\n#export\n").await;

        assert!(out.contains("[EXPORTED] Downloaded story.txt"));
        assert!(out.contains("(text/plain)"));
        assert!(out.contains("[EXPORTED] Downloaded story.pdf"));
        assert!(out.contains("(application/pdf)"));
        assert!(temp.path().join("story.pdf").exists());
    }
}
