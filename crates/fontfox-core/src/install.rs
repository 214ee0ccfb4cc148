//! Installation step and the registrars that ship with the core
//!
//! `install` runs one registration per candidate and turns every error into
//! a failed `InstallOutcome`, so a bad file never stops the batch.

use crate::{FontCandidate, FontError, FontRegistrar, FontResult, InstallOutcome};
use std::fs;
use std::path::{Path, PathBuf};

/// Register a single candidate and record the outcome
pub fn install(registrar: &dyn FontRegistrar, candidate: &FontCandidate) -> InstallOutcome {
    let result = if candidate.path.is_file() {
        registrar.register(&candidate.path)
    } else {
        Err(FontError::FontNotFound(candidate.path.clone()))
    };

    match result {
        Ok(()) => {
            log::debug!("{}: registered {}", registrar.name(), candidate.name);
            InstallOutcome::success(candidate.clone())
        }
        Err(err) => {
            log::warn!("{}: failed to install {}: {}", registrar.name(), candidate.name, err);
            InstallOutcome::failure(candidate.clone(), &err)
        }
    }
}

/// Registrar that only reports what it would do
#[derive(Debug, Default)]
pub struct DryRunRegistrar;

impl FontRegistrar for DryRunRegistrar {
    fn register(&self, path: &Path) -> FontResult<()> {
        log::info!("DRY-RUN: would install font {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

/// Registrar that copies fonts into a user font directory
#[derive(Debug, Clone)]
pub struct CopyRegistrar {
    target_dir: PathBuf,
    overwrite: bool,
}

impl CopyRegistrar {
    pub fn new(target_dir: PathBuf) -> Self {
        Self {
            target_dir,
            overwrite: false,
        }
    }

    /// Replace fonts that already exist in the target directory
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl FontRegistrar for CopyRegistrar {
    fn register(&self, path: &Path) -> FontResult<()> {
        let file_name = path.file_name().ok_or_else(|| {
            FontError::InstallFailure(format!("{} has no file name", path.display()))
        })?;

        if !self.target_dir.exists() {
            fs::create_dir_all(&self.target_dir)?;
        }

        let target_path = self.target_dir.join(file_name);
        if target_path.exists() && !self.overwrite {
            return Err(FontError::AlreadyInstalled(target_path));
        }

        fs::copy(path, &target_path)?;
        log::debug!("Copied {} to {}", path.display(), target_path.display());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "copy"
    }
}
