//! The virtual shell session.
//!
//! A [`VirtualShell`] owns an archive and a cursor into it. Every operation is
//! answered from the archive index, so nothing is ever extracted to disk.
//!
//! # Example
//!
//! ```rust
//! use tarsh::{MemoryArchive, VirtualShell};
//!
//! let archive = MemoryArchive::new()
//!     .file("notes.txt", "a\nb\na\n")
//!     .file("src/main.rs", "fn main() {}\n");
//! let mut shell = VirtualShell::new(archive);
//!
//! assert_eq!(shell.list_entries(), "notes.txt\nsrc");
//! assert_eq!(shell.unique_lines("notes.txt").unwrap(), "a\nb\n");
//! shell.change_directory("src").unwrap();
//! assert_eq!(shell.current_dir(), "src/");
//! shell.terminate().unwrap();
//! ```

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use thiserror::Error;

use crate::archive::{Archive, ArchiveError};
use crate::{env, path};

/// Number of lines printed by [`VirtualShell::tail_file`].
pub const TAIL_LINES: usize = 6;

/// Errors returned by shell operations
#[derive(Debug, Error)]
pub enum ShellError {
    /// The path does not name anything in the archive
    #[error("no such file or directory: {0}")]
    PathNotFound(String),
    /// A file operation was given a directory
    #[error("is a directory: {0}")]
    IsADirectory(String),
    /// The archive failed while extracting a member
    #[error(transparent)]
    Archive(ArchiveError),
}

impl ShellError {
    /// Map an archive error for `path`, as the user typed it.
    fn from_archive(err: ArchiveError, path: &str) -> Self {
        match err {
            ArchiveError::NotFound(_) => Self::PathNotFound(path.to_string()),
            ArchiveError::IsADirectory(_) => Self::IsADirectory(path.to_string()),
            other => Self::Archive(other),
        }
    }
}

/// One shell session over an archive.
///
/// The archive is released when the shell is terminated or dropped.
#[derive(Debug)]
pub struct VirtualShell<A: Archive> {
    archive: A,
    cwd: String,
    started: Instant,
}

impl<A: Archive> VirtualShell<A> {
    /// Start a session at the archive root.
    pub fn new(archive: A) -> Self {
        tracing::debug!(entries = archive.entries().len(), "shell started");
        Self {
            archive,
            cwd: String::new(),
            started: Instant::now(),
        }
    }

    /// Current directory in cursor form (`""` for the root, else `dir/`).
    pub fn current_dir(&self) -> &str {
        &self.cwd
    }

    /// Names of the direct children of the current directory, sorted and
    /// newline-separated.
    ///
    /// An empty directory and a directory with no members below it both
    /// list as empty.
    pub fn list_entries(&self) -> String {
        tracing::debug!(cwd = %self.cwd, "listing entries");

        let mut children = BTreeSet::new();
        for entry in self.archive.entries() {
            let Some(rest) = entry.name.strip_prefix(self.cwd.as_str()) else {
                continue;
            };
            let rest = rest.trim_start_matches('/');
            let child = match rest.split_once('/') {
                Some((dir, _)) => dir,
                None => rest,
            };
            if !child.is_empty() {
                children.insert(child);
            }
        }

        children.into_iter().collect::<Vec<_>>().join("\n")
    }

    /// Change the current directory.
    ///
    /// `..` moves to the parent and is a no-op at the root. Any other target
    /// is joined onto the current directory and accepted only if some archive
    /// member lives below it.
    pub fn change_directory(&mut self, target: &str) -> Result<String, ShellError> {
        tracing::debug!(cwd = %self.cwd, to = target, "changing directory");

        if target == ".." {
            self.cwd = path::parent(&self.cwd);
        } else {
            let candidate = path::as_cursor(&path::join(&self.cwd, target));
            let exists = candidate.is_empty()
                || self
                    .archive
                    .entries()
                    .iter()
                    .any(|e| e.name.starts_with(&candidate));
            if !exists {
                return Err(ShellError::PathNotFound(target.to_string()));
            }
            self.cwd = candidate;
        }

        Ok(format!("Changed directory to {}", self.cwd))
    }

    /// Seconds since the session started.
    pub fn uptime(&self) -> String {
        let elapsed = self.started.elapsed();
        tracing::debug!(?elapsed, "uptime");
        format!("Uptime: {:.2} seconds", elapsed.as_secs_f64())
    }

    /// The last [`TAIL_LINES`] lines of a file, with their line endings.
    pub fn tail_file(&self, file: &str) -> Result<String, ShellError> {
        tracing::debug!(cwd = %self.cwd, file, "tail");

        let data = self.read_member(file)?;
        let text = String::from_utf8_lossy(&data);
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let start = lines.len().saturating_sub(TAIL_LINES);
        Ok(lines[start..].concat())
    }

    /// The lines of a file with repeats removed, keeping each line's first
    /// occurrence. Lines are compared byte for byte, endings included.
    pub fn unique_lines(&self, file: &str) -> Result<String, ShellError> {
        tracing::debug!(cwd = %self.cwd, file, "uniq");

        let data = self.read_member(file)?;
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(data.len());
        for line in data.split_inclusive(|&b| b == b'\n') {
            if seen.insert(line) {
                out.extend_from_slice(line);
            }
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Name of the user running the session.
    pub fn current_user(&self) -> String {
        env::current_user()
    }

    /// End the session and release the archive.
    pub fn terminate(self) -> Result<(), ArchiveError> {
        tracing::debug!(uptime = ?self.started.elapsed(), "shell terminating");
        self.archive.close()
    }

    fn read_member(&self, file: &str) -> Result<Vec<u8>, ShellError> {
        let full = path::join(&self.cwd, file);
        self.archive
            .read(&full)
            .map_err(|e| ShellError::from_archive(e, file))
    }
}
