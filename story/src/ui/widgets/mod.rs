//! TUI widgets for the story writer

pub mod editor;
pub mod input;
pub mod selector;
pub mod status_bar;
pub mod story;

pub use editor::EditorWidget;
pub use input::InputWidget;
pub use selector::SelectorWidget;
pub use status_bar::{CommandLineWidget, HotkeyBarWidget, StatusBarWidget};
pub use story::StoryWidget;
