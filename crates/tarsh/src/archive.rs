//! Archive readers backing the virtual filesystem.
//!
//! The shell only needs three things from an archive: the ordered list of
//! member names, the bytes of one member, and a way to release the handle.
//! [`TarArchive`] reads a tar file from disk; [`MemoryArchive`] holds members
//! in memory for tests and embedders.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive file could not be opened or its index could not be read
    #[error("cannot open archive {}: {source}", path.display())]
    Open {
        /// Path of the archive on the host filesystem
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// No member with this exact name exists
    #[error("member not found: {0}")]
    NotFound(String),
    /// The member exists but is a directory
    #[error("member is a directory: {0}")]
    IsADirectory(String),
    /// IO error while extracting a member
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One member of the archive index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member path inside the archive, without a trailing slash
    pub name: String,
    /// Whether the member is a directory marker
    pub is_dir: bool,
}

/// Read-only access to an archive's members.
pub trait Archive {
    /// Members in archive order. Duplicate names are kept.
    fn entries(&self) -> &[ArchiveEntry];

    /// Extract the content of the member named exactly `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, ArchiveError>;

    /// Release the archive handle.
    fn close(self) -> Result<(), ArchiveError>
    where
        Self: Sized;
}

/// Normalize a raw member path the way tar listings report it.
fn member_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end_matches('/').to_string()
}

/// Location of a member's data inside the tar file
#[derive(Debug, Clone, Copy)]
struct Member {
    is_dir: bool,
    offset: u64,
    size: u64,
}

/// A tar file on disk.
///
/// The header index is scanned once at open time; member data is read on
/// demand by seeking to the recorded offset. The file stays open until the
/// archive is closed or dropped.
#[derive(Debug)]
pub struct TarArchive {
    path: PathBuf,
    file: File,
    entries: Vec<ArchiveEntry>,
    members: HashMap<String, Member>,
}

impl TarArchive {
    /// Open a tar file and read its index.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let mut archive = tar::Archive::new(file);

        let mut entries = Vec::new();
        let mut members = HashMap::new();
        for entry in archive
            .entries_with_seek()
            .map_err(|e| open_error(path, e))?
        {
            let entry = entry.map_err(|e| open_error(path, e))?;
            let raw = entry.path_bytes();
            let name = member_name(&raw);
            if name.is_empty() {
                continue;
            }

            // Old-style archives mark directories only by a trailing slash
            let member = Member {
                is_dir: entry.header().entry_type().is_dir() || raw.ends_with(b"/"),
                offset: entry.raw_file_position(),
                size: entry.size(),
            };
            entries.push(ArchiveEntry {
                name: name.clone(),
                is_dir: member.is_dir,
            });
            // Later members shadow earlier ones with the same name
            members.insert(name, member);
        }

        tracing::info!(path = %path.display(), entries = entries.len(), "archive opened");

        Ok(Self {
            path: path.to_path_buf(),
            file: archive.into_inner(),
            entries,
            members,
        })
    }

    /// Path of the archive on the host filesystem.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_error(path: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    }
}

impl Archive for TarArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        let member = self
            .members
            .get(path)
            .ok_or_else(|| ArchiveError::NotFound(path.to_string()))?;
        if member.is_dir {
            return Err(ArchiveError::IsADirectory(path.to_string()));
        }

        let mut file = &self.file;
        file.seek(SeekFrom::Start(member.offset))?;
        let mut data = Vec::with_capacity(usize::try_from(member.size).unwrap_or(0));
        file.take(member.size).read_to_end(&mut data)?;
        Ok(data)
    }

    fn close(self) -> Result<(), ArchiveError> {
        tracing::info!(path = %self.path.display(), "archive closed");
        drop(self.file);
        Ok(())
    }
}

/// An archive held entirely in memory.
///
/// # Example
///
/// ```rust
/// use tarsh::{Archive, MemoryArchive};
///
/// let archive = MemoryArchive::new()
///     .dir("docs")
///     .file("docs/readme.txt", "hello\n");
/// assert_eq!(archive.read("docs/readme.txt").unwrap(), b"hello\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: Vec<ArchiveEntry>,
    files: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file member.
    pub fn file(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        let name = member_name(name.as_bytes());
        self.entries.push(ArchiveEntry {
            name: name.clone(),
            is_dir: false,
        });
        self.files.insert(name, data.into());
        self
    }

    /// Add a directory marker member.
    pub fn dir(mut self, name: &str) -> Self {
        let name = member_name(name.as_bytes());
        self.files.remove(&name);
        self.entries.push(ArchiveEntry { name, is_dir: true });
        self
    }
}

impl Archive for MemoryArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ArchiveError> {
        if let Some(data) = self.files.get(path) {
            return Ok(data.clone());
        }
        if self.entries.iter().any(|e| e.is_dir && e.name == path) {
            return Err(ArchiveError::IsADirectory(path.to_string()));
        }
        Err(ArchiveError::NotFound(path.to_string()))
    }

    fn close(self) -> Result<(), ArchiveError> {
        Ok(())
    }
}
