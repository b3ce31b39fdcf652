//! The closed genre and writing-style sets offered to the writer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a genre or style name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown genre '{0}' (expected one of: {list})", list = names(&Genre::all()))]
    UnknownGenre(String),

    #[error("Unknown style '{0}' (expected one of: {list})", list = names(&Style::all()))]
    UnknownStyle(String),
}

/// Story genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Genre {
    #[default]
    Fantasy,
    ScienceFiction,
    Mystery,
    Horror,
    Romance,
    Adventure,
    Thriller,
    HistoricalFiction,
}

impl Genre {
    pub fn all() -> [Genre; 8] {
        [
            Genre::Fantasy,
            Genre::ScienceFiction,
            Genre::Mystery,
            Genre::Horror,
            Genre::Romance,
            Genre::Adventure,
            Genre::Thriller,
            Genre::HistoricalFiction,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Mystery => "Mystery",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::Adventure => "Adventure",
            Genre::Thriller => "Thriller",
            Genre::HistoricalFiction => "Historical Fiction",
        }
    }

    /// Lenient lookup: case, spaces, hyphens and underscores are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let key = normalize(s);
        if key == "scifi" {
            return Some(Genre::ScienceFiction);
        }
        Self::all().into_iter().find(|g| normalize(g.name()) == key)
    }

    /// Position in [`Genre::all`].
    pub fn index(&self) -> usize {
        Self::all().iter().position(|g| g == self).unwrap_or(0)
    }

    /// Next genre in display order, wrapping around.
    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    /// Previous genre in display order, wrapping around.
    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CatalogError::UnknownGenre(s.to_string()))
    }
}

impl TryFrom<String> for Genre {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genre> for &'static str {
    fn from(genre: Genre) -> Self {
        genre.name()
    }
}

/// Writing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Style {
    #[default]
    Classic,
    Modern,
    Poetic,
    Descriptive,
    Minimalistic,
}

impl Style {
    pub fn all() -> [Style; 5] {
        [
            Style::Classic,
            Style::Modern,
            Style::Poetic,
            Style::Descriptive,
            Style::Minimalistic,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Style::Classic => "Classic",
            Style::Modern => "Modern",
            Style::Poetic => "Poetic",
            Style::Descriptive => "Descriptive",
            Style::Minimalistic => "Minimalistic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = normalize(s);
        Self::all().into_iter().find(|st| normalize(st.name()) == key)
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CatalogError::UnknownStyle(s.to_string()))
    }
}

impl TryFrom<String> for Style {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Style> for &'static str {
    fn from(style: Style) -> Self {
        style.name()
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn names<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_first_entries() {
        assert_eq!(Genre::default(), Genre::all()[0]);
        assert_eq!(Style::default(), Style::all()[0]);
    }

    #[test]
    fn test_genre_parse_is_lenient() {
        assert_eq!(Genre::parse("science fiction"), Some(Genre::ScienceFiction));
        assert_eq!(Genre::parse("Science-Fiction"), Some(Genre::ScienceFiction));
        assert_eq!(Genre::parse("sci-fi"), Some(Genre::ScienceFiction));
        assert_eq!(Genre::parse("historical_fiction"), Some(Genre::HistoricalFiction));
        assert_eq!(Genre::parse("HORROR"), Some(Genre::Horror));
        assert_eq!(Genre::parse("western"), None);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!("poetic".parse::<Style>(), Ok(Style::Poetic));
        assert_eq!(
            "baroque".parse::<Style>(),
            Err(CatalogError::UnknownStyle("baroque".to_string()))
        );
    }

    #[test]
    fn test_unknown_genre_message_lists_choices() {
        let err = "western".parse::<Genre>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("western"));
        assert!(msg.contains("Science Fiction"));
        assert!(msg.contains("Historical Fiction"));
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Genre::HistoricalFiction.next(), Genre::Fantasy);
        assert_eq!(Genre::Fantasy.prev(), Genre::HistoricalFiction);
        assert_eq!(Style::Minimalistic.next(), Style::Classic);
        assert_eq!(Style::Classic.prev(), Style::Minimalistic);

        let mut genre = Genre::Fantasy;
        for _ in 0..Genre::all().len() {
            genre = genre.next();
        }
        assert_eq!(genre, Genre::Fantasy);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Genre::ScienceFiction).unwrap();
        assert_eq!(json, "\"Science Fiction\"");

        let genre: Genre = serde_json::from_str("\"thriller\"").unwrap();
        assert_eq!(genre, Genre::Thriller);

        assert!(serde_json::from_str::<Style>("\"gothic\"").is_err());
    }
}
