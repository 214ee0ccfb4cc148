//! Font selection strategies
//!
//! A `FontSelector` turns the extracted candidate list into the subsequence
//! the operator wants installed. Four strategies share the contract:
//! install-all, multi-select list (`gui`), interactive numbered prompt, and
//! single-line piped input.

use crate::{FontCandidate, FontError, FontResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, Write};

/// Strategy used to decide which candidates get installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Skip selection and install everything
    InstallAll,
    /// Multi-select list widget
    Gui,
    /// Numbered listing with a retrying prompt
    InteractiveCli,
    /// One line of non-interactive input, no retry
    PipedCli,
}

impl SelectionMode {
    pub fn description(self) -> &'static str {
        match self {
            SelectionMode::InstallAll => "install all",
            SelectionMode::Gui => "multi-select list",
            SelectionMode::InteractiveCli => "interactive prompt",
            SelectionMode::PipedCli => "piped input",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Parsed form of one line of selection input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    All,
    Quit,
    /// Unique 0-based indices, all within bounds
    Indices(BTreeSet<usize>),
}

/// Parse a selection line against `count` candidates.
///
/// Accepts `all`, `q`, or a comma-separated list of 1-based indices and
/// inclusive `start-end` ranges. A reversed range such as `3-1` selects
/// nothing. Any token that does not parse, or an index outside `1..=count`
/// named by a non-empty range, is an `InvalidSelection`.
pub fn parse_selection(input: &str, count: usize) -> FontResult<SelectionInput> {
    let line = input.trim().to_ascii_lowercase();

    match line.as_str() {
        "all" => return Ok(SelectionInput::All),
        "q" => return Ok(SelectionInput::Quit),
        _ => {}
    }

    let mut indices = BTreeSet::new();
    for token in line.split(',') {
        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (parse_index(start)?, parse_index(end)?),
            None => {
                let index = parse_index(token)?;
                (index, index)
            }
        };

        // a reversed range is empty
        if start > end {
            log::debug!("Range {}-{} selects nothing", start, end);
            continue;
        }
        if start == 0 || end > count {
            return Err(FontError::InvalidSelection(format!(
                "'{}' is outside 1-{}",
                token.trim(),
                count
            )));
        }

        indices.extend((start - 1)..end);
    }

    Ok(SelectionInput::Indices(indices))
}

fn parse_index(token: &str) -> FontResult<usize> {
    let token = token.trim();
    token
        .parse::<usize>()
        .map_err(|_| FontError::InvalidSelection(format!("'{}' is not a number", token)))
}

/// Pick the candidates named by `indices`, in candidate order
pub fn pick(candidates: &[FontCandidate], indices: &BTreeSet<usize>) -> Vec<FontCandidate> {
    candidates
        .iter()
        .enumerate()
        .filter(|(idx, _)| indices.contains(idx))
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

/// Selection contract shared by every strategy
pub trait FontSelector {
    /// Mode this selector ended up using
    fn mode(&self) -> SelectionMode;

    /// Return the subsequence of `candidates` to install; empty means nothing
    fn select(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>>;
}

/// Identity selector
#[derive(Debug, Default)]
pub struct InstallAllSelector;

impl FontSelector for InstallAllSelector {
    fn mode(&self) -> SelectionMode {
        SelectionMode::InstallAll
    }

    fn select(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        Ok(candidates.to_vec())
    }
}

/// Numbered-listing selector reading from a line source.
///
/// In interactive mode the numbered listing is printed, invalid input is
/// reported and the prompt repeats until the line parses or the operator
/// quits. In piped mode no listing is printed, exactly one line is read and
/// anything that does not parse selects every candidate.
pub struct CliSelector<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl<R: BufRead, W: Write> CliSelector<R, W> {
    pub fn interactive(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: true,
        }
    }

    pub fn piped(input: R, output: W) -> Self {
        Self {
            input,
            output,
            interactive: false,
        }
    }

    /// Consume the selector and hand back its output sink
    pub fn into_output(self) -> W {
        self.output
    }

    fn print_listing(&mut self, candidates: &[FontCandidate]) -> FontResult<()> {
        writeln!(self.output, "\nAvailable fonts:")?;
        for (idx, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "[{}] {}", idx + 1, candidate.name)?;
        }
        writeln!(
            self.output,
            "\nEnter the numbers of the fonts you want to install, separated by commas."
        )?;
        writeln!(self.output, "For example: 1,3,5 or 1-5 for a range.")?;
        writeln!(self.output, "Enter 'all' to install all fonts or 'q' to quit.")?;
        Ok(())
    }

    /// Read one line; `None` at end of input
    fn read_line(&mut self) -> FontResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn select_interactive(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        loop {
            write!(self.output, "\nYour selection: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                log::warn!("End of input at selection prompt; installing all fonts");
                writeln!(
                    self.output,
                    "\nRunning in non-interactive mode. Installing all fonts by default."
                )?;
                return Ok(candidates.to_vec());
            };

            match parse_selection(&line, candidates.len()) {
                Ok(selection) => return Ok(resolve(candidates, selection)),
                Err(err) => {
                    log::debug!("Rejected selection {:?}: {}", line.trim(), err);
                    writeln!(
                        self.output,
                        "Invalid selection. Please enter numbers, ranges, 'all', or 'q'."
                    )?;
                }
            }
        }
    }

    fn select_piped(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        let line = self.read_line()?.unwrap_or_default();

        match parse_selection(&line, candidates.len()) {
            Ok(selection) => Ok(resolve(candidates, selection)),
            Err(err) => {
                log::warn!("Piped selection {:?} rejected ({}); installing all fonts", line.trim(), err);
                writeln!(
                    self.output,
                    "Invalid selection in piped input. Installing all fonts by default."
                )?;
                Ok(candidates.to_vec())
            }
        }
    }
}

fn resolve(candidates: &[FontCandidate], selection: SelectionInput) -> Vec<FontCandidate> {
    match selection {
        SelectionInput::All => candidates.to_vec(),
        SelectionInput::Quit => Vec::new(),
        SelectionInput::Indices(indices) => pick(candidates, &indices),
    }
}

impl<R: BufRead, W: Write> FontSelector for CliSelector<R, W> {
    fn mode(&self) -> SelectionMode {
        if self.interactive {
            SelectionMode::InteractiveCli
        } else {
            SelectionMode::PipedCli
        }
    }

    fn select(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        if self.interactive {
            self.print_listing(candidates)?;
            self.select_interactive(candidates)
        } else {
            self.select_piped(candidates)
        }
    }
}

/// Presentation layer for the multi-select strategy
pub trait ListPresenter {
    /// Show `names` for multi-selection and block until the operator answers.
    ///
    /// Returns `Ok(None)` when the operator cancels, and
    /// `Err(FontError::SelectionUnavailable)` when the list cannot be shown.
    fn present(&mut self, title: &str, names: &[String]) -> FontResult<Option<Vec<usize>>>;
}

/// Multi-select list selector with an explicit fallback strategy
pub struct GuiSelector<P, F> {
    presenter: P,
    fallback: F,
    fell_back: bool,
}

impl<P: ListPresenter, F: FontSelector> GuiSelector<P, F> {
    pub fn new(presenter: P, fallback: F) -> Self {
        Self {
            presenter,
            fallback,
            fell_back: false,
        }
    }

    /// Whether the last selection was handed to the fallback strategy
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }
}

impl<P: ListPresenter, F: FontSelector> FontSelector for GuiSelector<P, F> {
    fn mode(&self) -> SelectionMode {
        if self.fell_back {
            self.fallback.mode()
        } else {
            SelectionMode::Gui
        }
    }

    fn select(&mut self, candidates: &[FontCandidate]) -> FontResult<Vec<FontCandidate>> {
        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();

        match self.presenter.present("Select fonts to install", &names) {
            Ok(Some(chosen)) => {
                let indices: BTreeSet<usize> =
                    chosen.into_iter().filter(|idx| *idx < candidates.len()).collect();
                Ok(pick(candidates, &indices))
            }
            Ok(None) => {
                log::debug!("Selection list cancelled");
                Ok(Vec::new())
            }
            Err(err) => {
                log::warn!(
                    "Switching selection mode: {} -> {} ({})",
                    SelectionMode::Gui,
                    self.fallback.mode(),
                    err
                );
                self.fell_back = true;
                self.fallback.select(candidates)
            }
        }
    }
}
