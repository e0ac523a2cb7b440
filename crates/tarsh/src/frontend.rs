//! Interactive line-oriented front-end.
//!
//! Reads commands from any [`BufRead`] and writes the transcript to any
//! [`Write`]: each command is echoed behind a `user$ ` prompt, followed by
//! its output.

use std::io::{self, BufRead, Write};

use crate::archive::Archive;
use crate::command::{self, Command};
use crate::shell::VirtualShell;

/// Text written when the session ends via `exit`.
pub const EXIT_MESSAGE: &str = "Exiting...";

/// How a front-end run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit`
    Exit,
    /// Input ran out
    Eof,
}

/// Drives a [`VirtualShell`] from a line source.
#[derive(Debug)]
pub struct Frontend<R, W> {
    input: R,
    output: W,
    user: Option<String>,
}

impl<R: BufRead, W: Write> Frontend<R, W> {
    /// Create a front-end over the given input and display.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            user: None,
        }
    }

    /// Show `user` in the prompt instead of the session user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Run the session until `exit` or end of input.
    ///
    /// The shell is terminated on both paths. If writing to the display
    /// fails, the shell is dropped, which also releases the archive.
    pub fn run<A: Archive>(&mut self, mut shell: VirtualShell<A>) -> io::Result<SessionEnd> {
        let user = self.user.clone().unwrap_or_else(|| shell.current_user());

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                tracing::debug!("end of input");
                close(shell);
                return Ok(SessionEnd::Eof);
            }

            // Undecodable bytes are replaced; the line is still dispatched
            let line = String::from_utf8_lossy(&buf);
            let raw = line.trim_end_matches(['\n', '\r']);
            let Some(cmd) = Command::parse(raw) else {
                continue;
            };

            writeln!(self.output, "{}$ {}", user, raw)?;
            let reply = command::execute(&mut shell, cmd);
            let Some(text) = reply.text() else {
                close(shell);
                writeln!(self.output, "{}", EXIT_MESSAGE)?;
                self.output.flush()?;
                return Ok(SessionEnd::Exit);
            };
            writeln!(self.output, "{}", text)?;
            self.output.flush()?;
            tracing::debug!(command = raw, "command executed");
        }
    }

    /// Consume the front-end, returning the display.
    pub fn into_output(self) -> W {
        self.output
    }
}

fn close<A: Archive>(shell: VirtualShell<A>) {
    if let Err(e) = shell.terminate() {
        tracing::warn!(error = %e, "failed to close archive");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::MemoryArchive;

    fn shell() -> VirtualShell<MemoryArchive> {
        VirtualShell::new(
            MemoryArchive::new()
                .file("a.txt", "1\n2\n")
                .file("d/b.txt", "b\n"),
        )
    }

    fn transcript(input: &str) -> (SessionEnd, String) {
        let mut fe = Frontend::new(Cursor::new(input.to_string()), Vec::new()).with_user("alice");
        let end = fe.run(shell()).unwrap();
        (end, String::from_utf8(fe.into_output()).unwrap())
    }

    #[test]
    fn test_prompt_and_output() {
        let (end, out) = transcript("ls\ncd d\nls\n");
        assert_eq!(end, SessionEnd::Eof);
        assert_eq!(
            out,
            "alice$ ls\na.txt\nd\nalice$ cd d\nChanged directory to d/\nalice$ ls\nb.txt\n"
        );
    }

    #[test]
    fn test_blank_lines_are_silent() {
        let (_, out) = transcript("\n   \nls\n\n");
        assert_eq!(out, "alice$ ls\na.txt\nd\n");
    }

    #[test]
    fn test_raw_line_is_echoed() {
        let (_, out) = transcript("  bogus  arg\r\n");
        assert_eq!(out, "alice$   bogus  arg\nbogus: command not found\n");
    }

    #[test]
    fn test_exit_stops_reading() {
        let (end, out) = transcript("tail a.txt\nexit\nls\n");
        assert_eq!(end, SessionEnd::Exit);
        assert_eq!(out, "alice$ tail a.txt\n1\n2\n\nalice$ exit\nExiting...\n");
    }

    #[test]
    fn test_invalid_utf8_line_is_recoverable() {
        let input = Cursor::new(b"ls\ncd \xff\xfe\nls\nexit\n".to_vec());
        let mut fe = Frontend::new(input, Vec::new()).with_user("alice");
        assert_eq!(fe.run(shell()).unwrap(), SessionEnd::Exit);

        let out = String::from_utf8(fe.into_output()).unwrap();
        assert_eq!(
            out,
            "alice$ ls\na.txt\nd\n\
             alice$ cd \u{fffd}\u{fffd}\n\
             cd: \u{fffd}\u{fffd}: No such file or directory\n\
             alice$ ls\na.txt\nd\n\
             alice$ exit\nExiting...\n"
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        let (end, out) = transcript("uptime");
        assert_eq!(end, SessionEnd::Eof);
        assert!(out.starts_with("alice$ uptime\nUptime: "));
    }
}
