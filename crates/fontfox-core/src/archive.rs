//! Archive extraction
//!
//! Unpacks a ZIP container into a scratch directory and reports the extracted
//! files whose extension is on the font allow-list.

use crate::{validation, FontCandidate, FontError, FontResult};
use std::fs::{self, File};
use std::path::Path;
use walkdir::WalkDir;

/// Extract every entry of `archive_path` into `scratch_dir` and return the
/// font files found in the extracted tree, ordered by path.
///
/// `scratch_dir` is recreated empty before extraction. Fails with
/// `InvalidArchive` if the container cannot be parsed and with
/// `ExtractionFailure` on any error while writing entries.
pub fn extract(archive_path: &Path, scratch_dir: &Path) -> FontResult<Vec<FontCandidate>> {
    prepare_scratch_dir(scratch_dir)?;

    let file = File::open(archive_path).map_err(|e| {
        FontError::InvalidArchive(format!("cannot open {}: {}", archive_path.display(), e))
    })?;

    let mut zip = zip::ZipArchive::new(file).map_err(|e| {
        FontError::InvalidArchive(format!("{}: {}", archive_path.display(), e))
    })?;

    log::debug!(
        "Extracting {} entries from {} into {}",
        zip.len(),
        archive_path.display(),
        scratch_dir.display()
    );

    zip.extract(scratch_dir).map_err(|e| {
        FontError::ExtractionFailure(format!("{}: {}", archive_path.display(), e))
    })?;

    scan_fonts(scratch_dir)
}

/// Recursively collect font files below `root`
pub fn scan_fonts(root: &Path) -> FontResult<Vec<FontCandidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| FontError::ExtractionFailure(e.to_string()))?;
        if entry.file_type().is_file() && validation::is_font_file(entry.path()) {
            candidates.push(FontCandidate::from_path(entry.into_path()));
        }
    }

    log::debug!("Found {} font files under {}", candidates.len(), root.display());
    Ok(candidates)
}

fn prepare_scratch_dir(scratch_dir: &Path) -> FontResult<()> {
    if scratch_dir.exists() {
        fs::remove_dir_all(scratch_dir).map_err(|e| {
            FontError::ExtractionFailure(format!(
                "cannot clear {}: {}",
                scratch_dir.display(),
                e
            ))
        })?;
    }

    fs::create_dir_all(scratch_dir).map_err(|e| {
        FontError::ExtractionFailure(format!("cannot create {}: {}", scratch_dir.display(), e))
    })
}
