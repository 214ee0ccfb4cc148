use clap::CommandFactory;
use clap_complete::{generate, Shell};
use fontfox_core::config::{expand_home, FontfoxConfig};
use fontfox_core::install::{CopyRegistrar, DryRunRegistrar};
use fontfox_core::pipeline::{Pipeline, PipelineEvent, RunObserver, RunReport, RunStatus};
use fontfox_core::selection::{
    CliSelector, FontSelector, GuiSelector, InstallAllSelector, SelectionMode,
};
use fontfox_core::{FontError, FontRegistrar, FontResult};
use serde_json::to_string_pretty;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::args::Cli;
use crate::presenter::{self, MultiSelectPresenter};

/// Output controls for CLI commands
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub quiet: bool,
    pub verbose: bool,
}

impl OutputOptions {
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    pub fn should_print_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}

/// Execution controls shared by install runs
#[derive(Debug, Clone, Copy)]
pub struct OperationOptions {
    pub dry_run: bool,
    pub output: OutputOptions,
}

impl OperationOptions {
    pub fn new(dry_run: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            dry_run,
            output: OutputOptions { quiet, verbose },
        }
    }
}

pub(crate) fn log_status(opts: &OperationOptions, message: &str) {
    if opts.output.should_print() {
        println!("{}", message);
    }
}

pub(crate) fn log_verbose(opts: &OperationOptions, message: &str) {
    if opts.output.should_print_verbose() {
        eprintln!("{}", message);
    }
}

/// Pick the selection strategy from flags and whether stdin is a terminal
pub fn resolve_mode(cli: &Cli, stdin_is_terminal: bool) -> SelectionMode {
    if cli.auto || cli.install_all {
        return SelectionMode::InstallAll;
    }

    if cli.cli {
        return text_mode(stdin_is_terminal);
    }

    if cli.gui || stdin_is_terminal {
        SelectionMode::Gui
    } else {
        SelectionMode::PipedCli
    }
}

fn text_mode(stdin_is_terminal: bool) -> SelectionMode {
    if stdin_is_terminal {
        SelectionMode::InteractiveCli
    } else {
        SelectionMode::PipedCli
    }
}

/// Work out which archive to process.
///
/// Returns `Ok(None)` when the operator answered the prompt with a blank
/// line. `--auto` without `--zip`, or end of input at the prompt, is a
/// `MissingArchive` error.
pub fn resolve_archive_path<R: BufRead, W: Write>(
    zip: Option<&Path>,
    auto: bool,
    mode: SelectionMode,
    mut input: R,
    mut output: W,
) -> FontResult<Option<PathBuf>> {
    if let Some(path) = zip {
        return Ok(Some(expand_home(path)));
    }

    if auto {
        return Err(FontError::MissingArchive(
            "auto mode requires the --zip option".to_string(),
        ));
    }

    let answer = if mode == SelectionMode::Gui {
        match presenter::prompt_archive_path() {
            Ok(answer) => Some(answer.unwrap_or_default()),
            Err(err) => {
                log::warn!("Text prompt unavailable ({}); reading the path from stdin", err);
                None
            }
        }
    } else {
        None
    };

    let answer = match answer {
        Some(answer) => answer,
        None => {
            write!(output, "Enter the path to the ZIP file containing fonts: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(FontError::MissingArchive(
                    "no input available; pass the archive with --zip".to_string(),
                ));
            }
            line
        }
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    Ok(Some(expand_home(Path::new(answer))))
}

/// Create the registrar for this run
pub fn create_registrar(
    config: &FontfoxConfig,
    opts: &OperationOptions,
    copy: bool,
) -> Box<dyn FontRegistrar> {
    if opts.dry_run {
        return Box::new(DryRunRegistrar);
    }

    if copy {
        return Box::new(copy_registrar(config));
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(fontfox_platform_mac::FontBookRegistrar::new(
            config.platform.install_script.clone(),
        ))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Box::new(copy_registrar(config))
    }
}

fn copy_registrar(config: &FontfoxConfig) -> CopyRegistrar {
    CopyRegistrar::new(config.user_font_dir()).with_overwrite(config.behavior.overwrite_existing)
}

/// Create the selector for `mode`, reading from stdin.
///
/// Listings go to stdout, or to stderr when stdout carries JSON.
pub fn create_selector(mode: SelectionMode, json: bool) -> Box<dyn FontSelector> {
    let output: Box<dyn Write> = if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    match mode {
        SelectionMode::InstallAll => Box::new(InstallAllSelector),
        SelectionMode::InteractiveCli => {
            Box::new(CliSelector::interactive(io::stdin().lock(), output))
        }
        SelectionMode::PipedCli => Box::new(CliSelector::piped(io::stdin().lock(), output)),
        SelectionMode::Gui => Box::new(GuiSelector::new(
            MultiSelectPresenter,
            CliSelector::interactive(io::stdin().lock(), output),
        )),
    }
}

/// Observer that prints pipeline progress as status lines
pub struct StatusObserver {
    opts: OperationOptions,
}

impl StatusObserver {
    pub fn new(opts: OperationOptions) -> Self {
        Self { opts }
    }
}

impl RunObserver for StatusObserver {
    fn on_event(&mut self, event: PipelineEvent<'_>) {
        let opts = &self.opts;
        match event {
            PipelineEvent::Extracting { archive } => {
                let name = archive
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| archive.display().to_string());
                log_status(opts, &format!("Extracting {}...", name));
            }
            PipelineEvent::ArchiveError(err) => {
                eprintln!("❌ Error: {}", err);
            }
            PipelineEvent::NoCandidates => {
                eprintln!("No font files found in the ZIP file.");
            }
            PipelineEvent::CandidatesFound(count) => {
                log_status(opts, &format!("Found {} font files.", count));
            }
            PipelineEvent::NothingSelected => {
                log_status(opts, "No fonts selected for installation. Exiting.");
            }
            PipelineEvent::Installing { count } => {
                if opts.dry_run {
                    log_status(opts, &format!("DRY-RUN: would install {} fonts", count));
                } else {
                    log_status(opts, &format!("Installing {} fonts...", count));
                }
            }
            PipelineEvent::InstallingFont(candidate) => {
                log_status(opts, &format!("Installing: {}", candidate.name));
                log_verbose(opts, &format!("  from {}", candidate.path.display()));
            }
            PipelineEvent::Installed(outcome) => {
                if outcome.succeeded {
                    log_verbose(opts, &format!("✅ Installed {}", outcome.candidate.name));
                } else {
                    log_status(
                        opts,
                        &format!(
                            "❌ Failed to install {}: {}",
                            outcome.candidate.name,
                            outcome.error.as_deref().unwrap_or("unknown error")
                        ),
                    );
                }
            }
            PipelineEvent::Finished(summary) => {
                log_verbose(
                    opts,
                    &format!("Attempted {} installations", summary.attempted()),
                );
            }
        }
    }
}

/// Possible render outputs for the run report
#[derive(Debug, PartialEq)]
pub enum ReportRender {
    Lines(Vec<String>),
    Json(String),
}

/// Render the final report as summary lines or JSON
pub fn render_report(report: &RunReport, json: bool) -> Result<ReportRender, FontError> {
    if json {
        let json = to_string_pretty(report).map_err(|e| {
            FontError::InstallFailure(format!("Failed to serialize report to JSON: {}", e))
        })?;
        return Ok(ReportRender::Json(json));
    }

    let lines = match report.status {
        RunStatus::Completed => vec![
            "Installation complete!".to_string(),
            String::new(),
            format!("Successfully installed: {} fonts", report.summary.successful),
            format!("Failed to install: {} fonts", report.summary.failed),
        ],
        RunStatus::NoCandidates | RunStatus::NothingSelected => Vec::new(),
    };

    Ok(ReportRender::Lines(lines))
}

/// Generate shell completion script for the given shell
pub fn write_completions<W: Write>(shell: Shell, mut writer: W) -> Result<(), FontError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    generate(shell, &mut command, bin_name.as_str(), &mut writer);

    Ok(())
}

/// Handle one install run for `archive`
pub fn handle_install_command(
    registrar: &dyn FontRegistrar,
    config: &FontfoxConfig,
    archive: &Path,
    selector: &mut dyn FontSelector,
    observer: &mut dyn RunObserver,
) -> Result<RunReport, FontError> {
    log::debug!(
        "Installing from {} with {} registrar ({})",
        archive.display(),
        registrar.name(),
        selector.mode()
    );

    let pipeline = Pipeline::new(registrar, config.font_paths.temp_directory.clone());
    pipeline.run(archive, selector, observer)
}
