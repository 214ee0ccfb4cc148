//! macOS platform implementation for fontfox
//!
//! Installs a font by opening it in Font Book and then running an AppleScript
//! that confirms the install dialog. Both steps are plain subprocesses; only
//! their exit status is inspected.

use fontfox_core::{FontError, FontRegistrar, FontResult};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Font Book registrar driven by `open` and `osascript`
#[derive(Debug, Clone)]
pub struct FontBookRegistrar {
    open_program: OsString,
    script_program: OsString,
    script_path: PathBuf,
}

impl FontBookRegistrar {
    /// Create a registrar that runs `script_path` after opening each font
    pub fn new(script_path: PathBuf) -> Self {
        Self {
            open_program: "open".into(),
            script_program: "osascript".into(),
            script_path,
        }
    }

    /// Replace the programs used for both steps
    pub fn with_programs(
        mut self,
        open_program: impl Into<OsString>,
        script_program: impl Into<OsString>,
    ) -> Self {
        self.open_program = open_program.into();
        self.script_program = script_program.into();
        self
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Run one step; `Ok(false)` when the program does not exist
    fn run_step(&self, program: &OsString, arg: &Path) -> FontResult<bool> {
        let status = match Command::new(program).arg(arg).status() {
            Ok(status) => status,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => {
                return Err(FontError::InstallFailure(format!(
                    "cannot run {}: {}",
                    program.to_string_lossy(),
                    err
                )))
            }
        };

        if !status.success() {
            return Err(FontError::InstallFailure(format!(
                "{} {} exited with {}",
                program.to_string_lossy(),
                arg.display(),
                status
            )));
        }

        Ok(true)
    }
}

impl Default for FontBookRegistrar {
    fn default() -> Self {
        Self::new(PathBuf::from("install-font.scpt"))
    }
}

impl FontRegistrar for FontBookRegistrar {
    fn register(&self, path: &Path) -> FontResult<()> {
        if !self.run_step(&self.open_program, path)? {
            log::warn!("Font Book is unavailable; would install font: {}", path.display());
            return Ok(());
        }
        log::debug!("Font opened in Font Book: {}", path.display());

        if !self.run_step(&self.script_program, &self.script_path)? {
            log::warn!(
                "osascript is unavailable; would confirm install of {}",
                path.display()
            );
            return Ok(());
        }
        log::debug!("Install script {} executed", self.script_path.display());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "font-book"
    }
}
