//! Story export to downloadable artifacts.
//!
//! Both exports are snapshots of the story at call time. Writing an artifact
//! overwrites any previous file of the same name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::fs;

use crate::pdf::{PdfDocument, PdfLayout};

/// File name of the plain-text export.
pub const TEXT_FILE_NAME: &str = "story.txt";
/// File name of the PDF export.
pub const PDF_FILE_NAME: &str = "story.pdf";

pub const TEXT_MIME: &str = "text/plain";
pub const PDF_MIME: &str = "application/pdf";

/// Errors from writing an export to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which exports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Text,
    Pdf,
    #[default]
    All,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => f.write_str("txt"),
            ExportFormat::Pdf => f.write_str("pdf"),
            ExportFormat::All => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown export format '{0}' (expected txt, pdf or all)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "pdf" => Ok(ExportFormat::Pdf),
            "all" | "both" => Ok(ExportFormat::All),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// The story as UTF-8 bytes, verbatim.
pub fn export_text(story: &str) -> Vec<u8> {
    story.as_bytes().to_vec()
}

/// The story rendered as a paginated PDF.
pub fn export_pdf(story: &str, layout: &PdfLayout) -> Vec<u8> {
    PdfDocument::layout_story(story, layout).to_bytes()
}

/// A named, typed export ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// `story.txt`, `text/plain`.
    pub fn text(story: &str) -> Self {
        Self {
            file_name: TEXT_FILE_NAME,
            mime: TEXT_MIME,
            bytes: export_text(story),
        }
    }

    /// `story.pdf`, `application/pdf`.
    pub fn pdf(story: &str, layout: &PdfLayout) -> Self {
        Self {
            file_name: PDF_FILE_NAME,
            mime: PDF_MIME,
            bytes: export_pdf(story, layout),
        }
    }

    /// Write to `dir/file_name`, creating `dir` if needed. Returns the written path.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| ExportError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let path = dir.join(self.file_name);
        fs::write(&path, &self.bytes)
            .await
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
