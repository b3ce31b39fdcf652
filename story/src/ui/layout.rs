//! Layout calculations for the story writer TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the genre/style column
const SIDEBAR_WIDTH: u16 = 28;

/// Calculate the main layout areas
pub struct AppLayout {
    pub header_area: Rect,
    pub genre_area: Rect,
    pub style_area: Rect,
    pub info_area: Rect,
    pub prompt_area: Rect,
    pub chapter_area: Rect,
    pub story_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect, genre_count: u16, style_count: u16) -> Self {
        // Main vertical split
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title + subtitle
                Constraint::Min(8),    // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hotkey bar / command line
            ])
            .split(area);

        // Content area: selectors + writing area
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(main_chunks[1]);

        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(genre_count + 2),
                Constraint::Length(style_count + 2),
                Constraint::Min(3),
            ])
            .split(content_chunks[0]);

        let writing_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Prompt
                Constraint::Length(3), // Chapter
                Constraint::Min(5),    // Story
            ])
            .split(content_chunks[1]);

        Self {
            header_area: main_chunks[0],
            genre_area: sidebar_chunks[0],
            style_area: sidebar_chunks[1],
            info_area: sidebar_chunks[2],
            prompt_area: writing_chunks[0],
            chapter_area: writing_chunks[1],
            story_area: writing_chunks[2],
            status_bar: main_chunks[2],
            hotkey_bar: main_chunks[3],
        }
    }
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
