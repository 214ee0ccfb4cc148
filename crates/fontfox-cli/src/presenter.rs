//! Terminal widgets behind the multi-select selection mode

use fontfox_core::selection::ListPresenter;
use fontfox_core::{FontError, FontResult};
use inquire::{InquireError, MultiSelect, Text};
use std::fmt;
use std::io::{self, IsTerminal};

/// One row of the selection list; remembers its position so duplicate
/// file names from different folders stay distinguishable.
#[derive(Debug, Clone)]
struct ListEntry {
    index: usize,
    name: String,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Multi-select list rendered with `inquire`
#[derive(Debug, Default)]
pub struct MultiSelectPresenter;

impl ListPresenter for MultiSelectPresenter {
    fn present(&mut self, title: &str, names: &[String]) -> FontResult<Option<Vec<usize>>> {
        ensure_terminal()?;

        let entries: Vec<ListEntry> = names
            .iter()
            .enumerate()
            .map(|(index, name)| ListEntry {
                index,
                name: name.clone(),
            })
            .collect();

        let answer = MultiSelect::new(title, entries)
            .with_page_size(15)
            .with_help_message("↑↓ navigate  space select  enter install  esc cancel")
            .prompt_skippable();

        match answer {
            Ok(Some(chosen)) => Ok(Some(chosen.into_iter().map(|e| e.index).collect())),
            Ok(None) => Ok(None),
            Err(err) => cancelled_or_unavailable(err),
        }
    }
}

/// Ask for the archive path with a text input widget.
///
/// `Ok(None)` means the operator dismissed the prompt.
pub fn prompt_archive_path() -> FontResult<Option<String>> {
    ensure_terminal()?;

    let answer = Text::new("Path to the ZIP file containing fonts:")
        .with_help_message("esc to cancel")
        .prompt_skippable();

    match answer {
        Ok(answer) => Ok(answer),
        Err(err) => cancelled_or_unavailable(err),
    }
}

fn ensure_terminal() -> FontResult<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        Ok(())
    } else {
        Err(FontError::SelectionUnavailable(
            "no interactive terminal attached".to_string(),
        ))
    }
}

fn cancelled_or_unavailable<T>(err: InquireError) -> FontResult<Option<T>> {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => Ok(None),
        other => Err(FontError::SelectionUnavailable(other.to_string())),
    }
}
