//! Run orchestration: extract, select, install, summarise
//!
//! A `Pipeline` owns one scratch directory per `run` call. The directory is a
//! `tempfile::TempDir`, so it is removed on every exit path, including early
//! returns through `?`.

use crate::selection::{FontSelector, SelectionMode};
use crate::{
    archive, install, FontCandidate, FontError, FontRegistrar, FontResult, InstallOutcome,
    InstallSummary,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Selected fonts went through the installer (individual files may have failed)
    Completed,
    /// The archive held no font files, or could not be read
    NoCandidates,
    /// The operator selected nothing or quit
    NothingSelected,
}

/// Result of one `Pipeline::run`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub archive: PathBuf,
    pub status: RunStatus,
    pub mode: SelectionMode,
    /// Candidates discovered in the archive
    pub found: usize,
    pub summary: InstallSummary,
    pub outcomes: Vec<InstallOutcome>,
    /// Archive-level error that ended the run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_error: Option<String>,
    /// Scratch directory used by the run; gone once the report exists
    #[serde(skip)]
    pub scratch_dir: PathBuf,
}

impl RunReport {
    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::NoCandidates => 1,
            RunStatus::Completed | RunStatus::NothingSelected => 0,
        }
    }
}

/// Progress notifications emitted while a run executes
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    Extracting { archive: &'a Path },
    ArchiveError(&'a FontError),
    NoCandidates,
    CandidatesFound(usize),
    NothingSelected,
    Installing { count: usize },
    InstallingFont(&'a FontCandidate),
    Installed(&'a InstallOutcome),
    Finished(&'a InstallSummary),
}

/// Receiver for `PipelineEvent`s
pub trait RunObserver {
    fn on_event(&mut self, event: PipelineEvent<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {
    fn on_event(&mut self, _event: PipelineEvent<'_>) {}
}

/// Extract → select → install pipeline bound to one registrar
pub struct Pipeline<'r> {
    registrar: &'r dyn FontRegistrar,
    scratch_parent: PathBuf,
}

impl<'r> Pipeline<'r> {
    /// Scratch directories are created below `scratch_parent`
    pub fn new(registrar: &'r dyn FontRegistrar, scratch_parent: PathBuf) -> Self {
        Self {
            registrar,
            scratch_parent,
        }
    }

    /// Run the whole pipeline for `archive_path`.
    ///
    /// Archive read failures are reported through the observer and end the
    /// run with `RunStatus::NoCandidates`; per-file install failures only show
    /// up in the summary. Errors are returned for a missing archive, a
    /// scratch directory that cannot be created, and selector I/O failures.
    pub fn run(
        &self,
        archive_path: &Path,
        selector: &mut dyn FontSelector,
        observer: &mut dyn RunObserver,
    ) -> FontResult<RunReport> {
        if !archive_path.is_file() {
            return Err(FontError::ArchiveNotFound(archive_path.to_path_buf()));
        }

        let scratch = self.create_scratch_dir()?;
        let mut report = RunReport {
            archive: archive_path.to_path_buf(),
            status: RunStatus::NoCandidates,
            mode: selector.mode(),
            found: 0,
            summary: InstallSummary::default(),
            outcomes: Vec::new(),
            archive_error: None,
            scratch_dir: scratch.path().to_path_buf(),
        };

        observer.on_event(PipelineEvent::Extracting {
            archive: archive_path,
        });

        let extract_dir = scratch.path().join("extracted");
        let candidates = match archive::extract(archive_path, &extract_dir) {
            Ok(candidates) => candidates,
            Err(err) => {
                log::error!("Cannot read {}: {}", archive_path.display(), err);
                observer.on_event(PipelineEvent::ArchiveError(&err));
                report.archive_error = Some(err.to_string());
                Vec::new()
            }
        };

        report.found = candidates.len();
        if candidates.is_empty() {
            observer.on_event(PipelineEvent::NoCandidates);
            release(scratch);
            return Ok(report);
        }
        observer.on_event(PipelineEvent::CandidatesFound(candidates.len()));

        let selected = selector.select(&candidates)?;
        report.mode = selector.mode();
        log::debug!(
            "Selected {} of {} fonts ({})",
            selected.len(),
            candidates.len(),
            report.mode
        );

        if selected.is_empty() {
            report.status = RunStatus::NothingSelected;
            observer.on_event(PipelineEvent::NothingSelected);
            release(scratch);
            return Ok(report);
        }

        observer.on_event(PipelineEvent::Installing {
            count: selected.len(),
        });
        for candidate in &selected {
            observer.on_event(PipelineEvent::InstallingFont(candidate));
            let outcome = install::install(self.registrar, candidate);
            report.summary.record(&outcome);
            observer.on_event(PipelineEvent::Installed(&outcome));
            report.outcomes.push(outcome);
        }

        report.status = RunStatus::Completed;
        observer.on_event(PipelineEvent::Finished(&report.summary));
        release(scratch);

        Ok(report)
    }

    fn create_scratch_dir(&self) -> FontResult<TempDir> {
        fs::create_dir_all(&self.scratch_parent)?;
        let scratch = tempfile::Builder::new()
            .prefix("fontfox-")
            .tempdir_in(&self.scratch_parent)?;
        log::debug!("Scratch directory: {}", scratch.path().display());
        Ok(scratch)
    }
}

fn release(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(err) = scratch.close() {
        log::warn!("Failed to remove scratch directory {}: {}", path.display(), err);
    }
}
