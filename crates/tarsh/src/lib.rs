//! tarsh: a toy shell over a tar archive
//!
//! tarsh treats the member list of a tar file as a read-only virtual
//! filesystem and answers a handful of shell commands against it (`ls`, `cd`,
//! `uptime`, `tail`, `uniq`, `exit`), one line at a time.

mod archive;
mod command;
pub mod env;
mod frontend;
pub mod path;
mod shell;

pub use archive::{Archive, ArchiveEntry, ArchiveError, MemoryArchive, TarArchive};
pub use command::{Command, Reply, execute};
pub use frontend::{EXIT_MESSAGE, Frontend, SessionEnd};
pub use shell::{ShellError, TAIL_LINES, VirtualShell};
