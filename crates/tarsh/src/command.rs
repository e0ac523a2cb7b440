//! Command parsing and dispatch.
//!
//! Input lines are split on whitespace into a [`Command`], which
//! [`execute`] runs against a [`VirtualShell`]. Every failure is rendered to
//! display text here, so callers only ever see a [`Reply`].

use crate::archive::Archive;
use crate::shell::{ShellError, VirtualShell};

/// Parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the current directory
    Ls,
    /// Change directory
    Cd(String),
    /// Report session uptime
    Uptime,
    /// Print the last lines of a file
    Tail(String),
    /// Print the distinct lines of a file
    Uniq(String),
    /// End the session
    Exit,
    /// A known command invoked without its required operand
    MissingOperand {
        /// Command name
        name: &'static str,
        /// What was missing (`path`, `file`)
        operand: &'static str,
    },
    /// Unrecognized command name
    Unknown(String),
}

impl Command {
    /// All command names the shell understands.
    #[cfg(test)]
    fn names() -> &'static [&'static str] {
        &["cd", "exit", "ls", "tail", "uniq", "uptime"]
    }

    /// Parse a line of input. Blank lines yield `None`.
    ///
    /// Arguments after the first are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        let arg = tokens.next().map(str::to_string);

        let missing =
            |name: &'static str, operand: &'static str| Self::MissingOperand { name, operand };
        Some(match name {
            "ls" => Self::Ls,
            "cd" => arg.map_or_else(|| missing("cd", "path"), Self::Cd),
            "uptime" => Self::Uptime,
            "tail" => arg.map_or_else(|| missing("tail", "file"), Self::Tail),
            "uniq" => arg.map_or_else(|| missing("uniq", "file"), Self::Uniq),
            "exit" => Self::Exit,
            _ => Self::Unknown(name.to_string()),
        })
    }
}

/// Outcome of executing one command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Text to display; the session continues
    Output(String),
    /// The session should end
    Exit,
}

impl Reply {
    /// The display text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Output(text) => Some(text),
            Self::Exit => None,
        }
    }
}

/// Execute a command against the shell.
///
/// [`Command::Exit`] does not touch the shell; the caller owns it and is
/// expected to call [`VirtualShell::terminate`] on [`Reply::Exit`].
pub fn execute<A: Archive>(shell: &mut VirtualShell<A>, command: Command) -> Reply {
    tracing::debug!(?command, "executing command");

    let text = match command {
        Command::Ls => shell.list_entries(),
        Command::Cd(target) => shell
            .change_directory(&target)
            .unwrap_or_else(|e| render_error("cd", &e)),
        Command::Uptime => shell.uptime(),
        Command::Tail(file) => shell
            .tail_file(&file)
            .unwrap_or_else(|e| render_error("tail", &e)),
        Command::Uniq(file) => shell
            .unique_lines(&file)
            .unwrap_or_else(|e| render_error("uniq", &e)),
        Command::Exit => return Reply::Exit,
        Command::MissingOperand { name, operand } => format!("{}: missing {}", name, operand),
        Command::Unknown(name) => format!("{}: command not found", name),
    };

    Reply::Output(text)
}

fn render_error(name: &str, err: &ShellError) -> String {
    match err {
        ShellError::PathNotFound(path) if name == "cd" => {
            format!("cd: {}: No such file or directory", path)
        }
        ShellError::PathNotFound(path) => format!("{}: {}: No such file", name, path),
        ShellError::IsADirectory(path) => format!("{}: {}: Is a directory", name, path),
        ShellError::Archive(e) => {
            tracing::warn!(command = name, error = %e, "archive read failed");
            format!("{}: {}", name, e)
        }
    }
}
