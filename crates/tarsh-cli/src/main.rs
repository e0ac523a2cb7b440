//! tarsh - interactive shell over a tar archive
//!
//! Usage:
//!   tarsh <ARCHIVE>                    Browse ARCHIVE, logging to app.log
//!   tarsh <ARCHIVE> --log-file <PATH>  Log somewhere else
//!
//! Commands are read from stdin one per line; output goes to stdout.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tarsh::{Frontend, TarArchive, VirtualShell};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// tarsh - browse a tar archive with a tiny shell
#[derive(Parser, Debug)]
#[command(name = "tarsh")]
#[command(about = "Shell emulator over the contents of a tar archive")]
struct Args {
    /// Tar archive to use as the virtual filesystem
    archive: PathBuf,

    /// File that receives the debug log
    #[arg(long, default_value = "app.log")]
    log_file: PathBuf,

    /// Name shown in the prompt instead of the current user
    #[arg(long)]
    user: Option<String>,
}

/// Open the archive and start a session over it.
fn open_shell(path: &Path) -> anyhow::Result<VirtualShell<TarArchive>> {
    let archive = TarArchive::open(path)
        .inspect_err(|e| tracing::error!("Failed to open archive: {}", e))
        .context("failed to initialize virtual filesystem")?;
    tracing::debug!(archive = %archive.path().display(), "starting session");
    Ok(VirtualShell::new(archive))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Log to a file so the transcript on stdout stays clean
    let log = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log)).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    let shell = open_shell(&args.archive)?;

    let mut frontend = Frontend::new(io::stdin().lock(), io::stdout().lock());
    if let Some(user) = args.user {
        frontend = frontend.with_user(user);
    }

    let end = frontend.run(shell)?;
    tracing::info!(?end, "session finished");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shell_missing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.tar");

        let err = open_shell(&missing).err().unwrap();
        assert_eq!(err.to_string(), "failed to initialize virtual filesystem");
        let source = err.chain().nth(1).unwrap().to_string();
        assert!(source.starts_with("cannot open archive"));
        assert!(source.contains("missing.tar"));
        assert!(err.root_cause().downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_open_shell_empty_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.tar");
        tar::Builder::new(File::create(&path).unwrap())
            .into_inner()
            .unwrap();

        let shell = open_shell(&path).unwrap();
        assert_eq!(shell.list_entries(), "");
        shell.terminate().unwrap();
    }
}
