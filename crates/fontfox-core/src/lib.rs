//! fontfox-core - Core pipeline for installing fonts shipped in ZIP archives
//!
//! This library provides the extraction, selection, and installation stages
//! of fontfox together with the shared data model, the error taxonomy and
//! the `FontRegistrar` seam that platform crates implement.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod archive;
pub mod config;
pub mod install;
pub mod pipeline;
pub mod selection;

#[cfg(test)]
mod tests;

/// Core errors for archive, selection, and installation operations
#[derive(Error, Debug)]
pub enum FontError {
    #[error("File not found: {0}\n→ Suggestion: Check the archive path and ensure the file exists")]
    ArchiveNotFound(PathBuf),

    #[error("No archive specified: {0}\n→ Suggestion: Pass the archive with --zip <FILE>")]
    MissingArchive(String),

    #[error("Invalid archive: {0}\n→ Suggestion: Ensure the file is a valid ZIP container")]
    InvalidArchive(String),

    #[error("Extraction failed: {0}\n→ Suggestion: Check disk space and permissions of the temporary directory")]
    ExtractionFailure(String),

    #[error("Invalid selection: {0}\n→ Suggestion: Enter numbers or ranges like 1,3 or 2-4, 'all', or 'q'")]
    InvalidSelection(String),

    #[error("Selection list unavailable: {0}\n→ Suggestion: Run from an interactive terminal or use --cli")]
    SelectionUnavailable(String),

    #[error("Font file not found: {0}\n→ Suggestion: The extracted file disappeared before it could be installed")]
    FontNotFound(PathBuf),

    #[error("Font already installed: {0}\n→ Suggestion: Remove the existing file or set FONTFOX_OVERWRITE=true")]
    AlreadyInstalled(PathBuf),

    #[error("Font installation failed: {0}\n→ Suggestion: Try installing the font manually to see the platform error")]
    InstallFailure(String),

    #[error("IO error: {0}\n→ Suggestion: Check file permissions and disk space")]
    IoError(#[from] std::io::Error),
}

impl FontError {
    /// Process exit code used when this error ends a run
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// A font file found inside an archive, eligible for installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontCandidate {
    /// Absolute path of the extracted file
    pub path: PathBuf,
    /// Display filename
    pub name: String,
}

impl FontCandidate {
    /// Build a candidate whose display name is the file name of `path`
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Per-file result of the install step
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub candidate: FontCandidate,
    pub succeeded: bool,
    /// Failure message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallOutcome {
    pub fn success(candidate: FontCandidate) -> Self {
        Self {
            candidate,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(candidate: FontCandidate, error: &FontError) -> Self {
        Self {
            candidate,
            succeeded: false,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate of install outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallSummary {
    pub successful: usize,
    pub failed: usize,
}

impl InstallSummary {
    pub fn record(&mut self, outcome: &InstallOutcome) {
        if outcome.succeeded {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a InstallOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn attempted(&self) -> usize {
        self.successful + self.failed
    }
}

/// Platform font registration action, invoked once per selected font file.
///
/// Implementations must not abort a batch: every call is independent and a
/// failure is reported through the returned error only.
pub trait FontRegistrar: Send + Sync {
    /// Register the font file at `path` with the platform
    fn register(&self, path: &Path) -> FontResult<()>;

    /// Short human-readable name used in logs
    fn name(&self) -> &'static str;
}

/// Font file recognition
pub mod validation {
    use std::path::Path;

    /// Extensions (lowercase, without dot) accepted as fonts
    pub const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "dfont"];

    /// Check if file has a font extension (case-insensitive)
    pub fn is_font_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                FONT_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
