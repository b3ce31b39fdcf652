//! Color theme and styling for the story writer TUI

use ratatui::style::{Color, Modifier, Style};
use story_core::Severity;

/// Story writer color theme
#[derive(Debug, Clone)]
pub struct StoryTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Header
    pub title: Color,
    pub subtitle: Color,

    // Text colors
    pub story_text: Color,
    pub input_text: Color,
    pub hint_text: Color,
    pub selection: Color,

    // Status colors
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for StoryTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            title: Color::LightMagenta,
            subtitle: Color::Gray,

            story_text: Color::White,
            input_text: Color::Cyan,
            hint_text: Color::DarkGray,
            selection: Color::Yellow,

            info: Color::Gray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl StoryTheme {
    /// Get style for story text
    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    /// Get style for typed input
    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_text)
    }

    /// Get style for placeholders and hints
    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.hint_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for the selected list entry
    pub fn selected_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(self.selection);
        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }

    /// Get style for a status message
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::default().fg(self.info),
            Severity::Success => Style::default().fg(self.success),
            Severity::Warning => Style::default()
                .fg(self.warning)
                .add_modifier(Modifier::BOLD),
            Severity::Error => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Get style for the app header
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subheader_style(&self) -> Style {
        Style::default()
            .fg(self.subtitle)
            .add_modifier(Modifier::ITALIC)
    }
}
