//! CLI interface for fontfox
//!
//! Parses flags, resolves the selection mode and archive path, then runs the
//! core extract → select → install pipeline and prints its report.

use clap::Parser;
use fontfox_core::config::FontfoxConfig;
use fontfox_core::FontError;
use std::io::{self, IsTerminal, Write};

mod args;
mod ops;
mod presenter;

pub use args::{exit_code_for_clap_error, Cli};
pub use ops::*;
pub use presenter::MultiSelectPresenter;

/// Main CLI handler; returns the process exit code
pub fn run_cli(cli: Cli, config: FontfoxConfig) -> Result<i32, FontError> {
    if let Some(shell) = cli.completions {
        write_completions(shell, io::stdout())?;
        return Ok(0);
    }

    let json = cli.json || config.logging.json_output;
    let opts = OperationOptions::new(
        cli.dry_run || config.behavior.dry_run_mode,
        cli.quiet || json,
        cli.verbose,
    );

    let mode = resolve_mode(&cli, io::stdin().is_terminal());
    log::debug!("Selection mode: {}", mode);

    let prompt_output: Box<dyn Write> = if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let archive = match resolve_archive_path(
        cli.zip.as_deref(),
        cli.auto,
        mode,
        io::stdin().lock(),
        prompt_output,
    )? {
        Some(path) => path,
        None => {
            log_status(&opts, "No ZIP file specified. Exiting.");
            return Ok(0);
        }
    };

    let registrar = create_registrar(&config, &opts, cli.copy);
    let mut selector = create_selector(mode, json);
    let mut observer = StatusObserver::new(opts);

    let report = handle_install_command(
        registrar.as_ref(),
        &config,
        &archive,
        selector.as_mut(),
        &mut observer,
    )?;

    match render_report(&report, json)? {
        ReportRender::Lines(lines) => {
            for line in lines {
                log_status(&opts, &line);
            }
        }
        ReportRender::Json(json) => {
            println!("{}", json);
        }
    }

    Ok(report.exit_code())
}

fn init_logging(config: &FontfoxConfig, cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// CLI entry point
pub fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = exit_code_for_clap_error(err.kind());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let config = match FontfoxConfig::from_env().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ Error: {:#}", err);
            std::process::exit(1);
        }
    };

    init_logging(&config, &cli);

    match run_cli(cli, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
