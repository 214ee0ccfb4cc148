use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

/// Font installer CLI tool
#[derive(Parser, Debug)]
#[command(name = "fontfox")]
#[command(
    about = "Extract fonts from a ZIP archive and install them",
    long_about = None
)]
#[command(version, disable_version_flag = true)]
#[command(after_help = "Examples:
  fontfox                          Run interactively
  fontfox --zip fonts.zip          Specify a ZIP file directly
  fontfox --cli                    Force the numbered text prompt
  fontfox --install-all -z f.zip   Install all fonts without selection
  fontfox --auto --zip fonts.zip   Non-interactive mode for automation")]
pub struct Cli {
    /// Archive to process
    #[arg(
        short = 'z',
        long = "zip",
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        help = "Path to the ZIP file containing fonts"
    )]
    pub zip: Option<PathBuf>,

    #[arg(short, long, help = "Force the multi-select list")]
    pub gui: bool,

    /// Takes precedence over `--gui`
    #[arg(short, long, help = "Force the numbered text prompt")]
    pub cli: bool,

    #[arg(short = 'a', long, help = "Install all fonts without prompting")]
    pub install_all: bool,

    #[arg(
        long,
        help = "Non-interactive mode for automation (requires --zip, installs all fonts)"
    )]
    pub auto: bool,

    #[arg(long, help = "Copy fonts into the user font directory")]
    pub copy: bool,

    /// Simulate actions without changing system state
    #[arg(long, help = "Print intended installs without performing them")]
    pub dry_run: bool,

    /// Reduce output to errors only
    #[arg(long, help = "Silence routine status output", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show additional status output
    #[arg(long, help = "Show verbose status messages", conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(long, help = "Output the run report as JSON")]
    pub json: bool,

    #[arg(
        long,
        value_enum,
        value_name = "SHELL",
        help = "Print a shell completion script and exit"
    )]
    pub completions: Option<Shell>,

    #[arg(
        short = 'v',
        long,
        action = ArgAction::Version,
        help = "Show program version number and exit"
    )]
    version: Option<bool>,
}

/// Map clap error kinds to exit codes (0 for help/version, 1 for other errors)
pub fn exit_code_for_clap_error(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
