//! End-to-end pipeline scenarios for fontfox-core

use crate::pipeline::{Pipeline, PipelineEvent, RunObserver, RunStatus, SilentObserver};
use crate::selection::{CliSelector, FontSelector, InstallAllSelector, SelectionMode};
use crate::{FontCandidate, FontError, FontRegistrar, FontResult};
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

#[derive(Default)]
struct RecordingRegistrar {
    registered: Mutex<Vec<PathBuf>>,
    fail_names: Vec<&'static str>,
}

impl RecordingRegistrar {
    fn failing(names: &[&'static str]) -> Self {
        Self {
            registered: Mutex::new(Vec::new()),
            fail_names: names.to_vec(),
        }
    }

    fn names(&self) -> Vec<String> {
        self.registered
            .lock()
            .expect("lock")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl FontRegistrar for RecordingRegistrar {
    fn register(&self, path: &Path) -> FontResult<()> {
        assert!(path.is_file(), "candidate must exist while installing");
        self.registered
            .lock()
            .expect("lock")
            .push(path.to_path_buf());

        let name = path.file_name().unwrap().to_string_lossy();
        if self.fail_names.iter().any(|n| *n == name) {
            return Err(FontError::InstallFailure(format!("{} rejected", name)));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Selector that must never be consulted
struct UnreachableSelector {
    calls: usize,
}

impl FontSelector for UnreachableSelector {
    fn mode(&self) -> SelectionMode {
        SelectionMode::InteractiveCli
    }

    fn select(&mut self, _candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        self.calls += 1;
        Ok(Vec::new())
    }
}

/// Selector whose input source fails
struct BrokenSelector;

impl FontSelector for BrokenSelector {
    fn mode(&self) -> SelectionMode {
        SelectionMode::PipedCli
    }

    fn select(&mut self, _candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        Err(FontError::IoError(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "stdin closed",
        )))
    }
}

#[derive(Default)]
struct EventLog(Vec<String>);

impl RunObserver for EventLog {
    fn on_event(&mut self, event: PipelineEvent<'_>) {
        let line = match event {
            PipelineEvent::Extracting { .. } => "extracting".to_string(),
            PipelineEvent::ArchiveError(_) => "archive-error".to_string(),
            PipelineEvent::NoCandidates => "no-candidates".to_string(),
            PipelineEvent::CandidatesFound(n) => format!("found {}", n),
            PipelineEvent::NothingSelected => "nothing-selected".to_string(),
            PipelineEvent::Installing { count } => format!("installing {}", count),
            PipelineEvent::InstallingFont(c) => format!("font {}", c.name),
            PipelineEvent::Installed(o) => format!("installed {} {}", o.candidate.name, o.succeeded),
            PipelineEvent::Finished(s) => format!("finished {}/{}", s.successful, s.failed),
        };
        self.0.push(line);
    }
}

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("tempdir"),
        }
    }

    fn archive(&self, entries: &[&str]) -> PathBuf {
        let path = self.root.path().join("fonts.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).expect("create zip"));
        for name in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(name.as_bytes()).expect("write entry");
        }
        writer.finish().expect("finish zip");
        path
    }

    fn scratch_parent(&self) -> PathBuf {
        self.root.path().join("scratch")
    }

    fn scratch_is_empty(&self) -> bool {
        match fs::read_dir(self.scratch_parent()) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }
}

#[test]
fn install_all_end_to_end() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf", "B.ttf", "notes.txt", "C.ttf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let mut events = EventLog::default();
    let report = pipeline
        .run(&archive, &mut InstallAllSelector, &mut events)
        .expect("run");

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.mode, SelectionMode::InstallAll);
    assert_eq!(report.found, 3);
    assert_eq!(report.summary.successful, 3);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(registrar.names(), vec!["A.ttf", "B.ttf", "C.ttf"]);

    assert_eq!(
        events.0,
        vec![
            "extracting",
            "found 3",
            "installing 3",
            "font A.ttf",
            "installed A.ttf true",
            "font B.ttf",
            "installed B.ttf true",
            "font C.ttf",
            "installed C.ttf true",
            "finished 3/0",
        ]
    );

    assert!(!report.scratch_dir.exists());
    assert!(fixture.scratch_is_empty());
}

#[test]
fn empty_archive_exits_without_selecting() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&[]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let mut selector = UnreachableSelector { calls: 0 };
    let mut events = EventLog::default();
    let report = pipeline.run(&archive, &mut selector, &mut events).expect("run");

    assert_eq!(report.status, RunStatus::NoCandidates);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(selector.calls, 0);
    assert!(registrar.names().is_empty());
    assert_eq!(events.0, vec!["extracting", "no-candidates"]);
    assert!(!report.scratch_dir.exists());
}

#[test]
fn non_zip_archive_reports_no_candidates() {
    let fixture = Fixture::new();
    let bogus = fixture.root.path().join("fonts.zip");
    fs::write(&bogus, b"plain text, not a zip").expect("write");

    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());
    let mut events = EventLog::default();
    let report = pipeline
        .run(&bogus, &mut UnreachableSelector { calls: 0 }, &mut events)
        .expect("archive errors stay inside the run");

    assert_eq!(report.status, RunStatus::NoCandidates);
    assert_eq!(report.exit_code(), 1);
    assert!(report.archive_error.is_some());
    assert_eq!(events.0, vec!["extracting", "archive-error", "no-candidates"]);
    assert!(fixture.scratch_is_empty());
}

#[test]
fn quit_selects_nothing_and_exits_cleanly() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf", "B.otf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let mut selector = CliSelector::interactive(Cursor::new("q\n"), Vec::new());
    let report = pipeline
        .run(&archive, &mut selector, &mut SilentObserver)
        .expect("run");

    assert_eq!(report.status, RunStatus::NothingSelected);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary.attempted(), 0);
    assert!(registrar.names().is_empty());
    assert!(fixture.scratch_is_empty());
}

#[test]
fn piped_selection_installs_chosen_fonts_in_listing_order() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf", "B.ttf", "C.ttf", "D.ttf", "E.ttf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let mut selector = CliSelector::piped(Cursor::new("4,1-2,1\n"), Vec::new());
    let report = pipeline
        .run(&archive, &mut selector, &mut SilentObserver)
        .expect("run");

    assert_eq!(report.mode, SelectionMode::PipedCli);
    assert_eq!(registrar.names(), vec!["A.ttf", "B.ttf", "D.ttf"]);
    assert_eq!(report.summary.successful, 3);
}

#[test]
fn piped_out_of_range_installs_everything() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf", "B.ttf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let mut selector = CliSelector::piped(Cursor::new("3\n"), Vec::new());
    let report = pipeline
        .run(&archive, &mut selector, &mut SilentObserver)
        .expect("run");

    assert_eq!(registrar.names(), vec!["A.ttf", "B.ttf"]);
    assert_eq!(report.summary.successful, 2);
}

#[test]
fn failed_install_does_not_stop_batch() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf", "B.ttf", "C.ttf"]);
    let registrar = RecordingRegistrar::failing(&["B.ttf"]);
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let report = pipeline
        .run(&archive, &mut InstallAllSelector, &mut SilentObserver)
        .expect("run");

    assert_eq!(registrar.names(), vec!["A.ttf", "B.ttf", "C.ttf"]);
    assert_eq!(report.summary.successful, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.exit_code(), 0);

    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| !o.succeeded)
        .map(|o| o.candidate.name.as_str())
        .collect();
    assert_eq!(failed, vec!["B.ttf"]);
}

#[test]
fn missing_archive_is_an_error_and_creates_no_scratch() {
    let fixture = Fixture::new();
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let err = pipeline
        .run(
            &fixture.root.path().join("missing.zip"),
            &mut InstallAllSelector,
            &mut SilentObserver,
        )
        .unwrap_err();

    assert!(matches!(err, FontError::ArchiveNotFound(_)));
    assert!(!fixture.scratch_parent().exists());
}

#[test]
fn selector_failure_still_removes_scratch() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let err = pipeline
        .run(&archive, &mut BrokenSelector, &mut SilentObserver)
        .unwrap_err();

    assert!(matches!(err, FontError::IoError(_)));
    assert!(registrar.names().is_empty());
    assert!(fixture.scratch_is_empty());
}

#[test]
fn report_serializes_for_json_output() {
    let fixture = Fixture::new();
    let archive = fixture.archive(&["A.ttf"]);
    let registrar = RecordingRegistrar::default();
    let pipeline = Pipeline::new(&registrar, fixture.scratch_parent());

    let report = pipeline
        .run(&archive, &mut InstallAllSelector, &mut SilentObserver)
        .expect("run");

    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["status"], "completed");
    assert_eq!(value["mode"], "install_all");
    assert_eq!(value["summary"]["successful"], 1);
    assert_eq!(value["outcomes"][0]["candidate"]["name"], "A.ttf");
    assert!(value.get("scratch_dir").is_none());
}
