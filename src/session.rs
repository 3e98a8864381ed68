//! Command parsing for the interactive `wizard` shell.

use thiserror::Error;

use crate::catalog::{self, CatalogEntry};
use crate::input::InputMode;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid mode '{0}' (expected movie or custom)")]
    InvalidMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(InputMode),
    ToggleMode,
    Title(String),
    Plot(String),
    Search(String),
    Pick(PickTarget),
    Analyze,
    Next,
    Back,
    Reset,
    Reveal,
    Dismiss,
    Download,
    Csv,
    Pdf,
    Show,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// 1-based position in the last listed suggestions.
    Index(usize),
    Title(String),
}

pub const HELP: &str = "\
Input:     mode movie|custom   toggle   title <text>   plot <text>
           search <query>      pick <n|title>          analyze
Navigate:  next   back   reset   show
Plot:      reveal
Download:  download (split controls)   csv   pdf
Other:     dismiss (clear error)   help   quit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let arg = |name: &'static str| -> Result<String, CommandError> {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let cmd = match word.to_lowercase().as_str() {
        "mode" => match arg("mode")?.to_lowercase().as_str() {
            "movie" => Command::Mode(InputMode::Movie),
            "custom" => Command::Mode(InputMode::Custom),
            other => return Err(CommandError::InvalidMode(other.to_string())),
        },
        "toggle" | "swap" => Command::ToggleMode,
        // Title and plot may be cleared with an empty argument
        "title" => Command::Title(rest.to_string()),
        "plot" => Command::Plot(rest.to_string()),
        "search" | "find" => Command::Search(arg("search")?),
        "pick" | "select" => {
            let target = arg("pick")?;
            match target.parse::<usize>() {
                Ok(n) => Command::Pick(PickTarget::Index(n)),
                Err(_) => Command::Pick(PickTarget::Title(target)),
            }
        }
        "analyze" | "go" => Command::Analyze,
        "next" | "n" => Command::Next,
        "back" | "b" => Command::Back,
        "reset" => Command::Reset,
        "reveal" => Command::Reveal,
        "dismiss" => Command::Dismiss,
        "download" => Command::Download,
        "csv" => Command::Csv,
        "pdf" => Command::Pdf,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(cmd)
}

/// Resolve a pick against the last listed suggestions. Featured titles are
/// only on screen while the title field is empty and nothing else is listed.
pub fn resolve_pick(
    target: &PickTarget,
    listed: &[&'static CatalogEntry],
    movie_title: &str,
) -> Option<&'static CatalogEntry> {
    match target {
        PickTarget::Index(n) => {
            let i = n.checked_sub(1)?;
            if listed.is_empty() && movie_title.trim().is_empty() {
                catalog::FEATURED.get(i)
            } else {
                listed.get(i).copied()
            }
        }
        PickTarget::Title(t) => catalog::find_title(t),
    }
}
