//! Native logging init: file under the XDG state dir, or fallback to stderr.
//!
//! The browser build installs its own console subscriber (see `vsc-web`).

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,vsc_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::init_logging;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::Result;
    use std::fs;
    use std::io::{self, Write};
    use std::path::PathBuf;
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::fmt::MakeWriter;

    /// Writer that is either a file or stderr (used when file clone fails).
    enum FileOrStderr {
        File(fs::File),
        Stderr,
    }

    impl Write for FileOrStderr {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self {
                FileOrStderr::File(f) => f.write(buf),
                FileOrStderr::Stderr => io::stderr().lock().write(buf),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            match self {
                FileOrStderr::File(f) => f.flush(),
                FileOrStderr::Stderr => io::stderr().lock().flush(),
            }
        }
    }

    struct FileMakeWriter(fs::File);

    impl<'a> MakeWriter<'a> for FileMakeWriter {
        type Writer = FileOrStderr;

        fn make_writer(&'a self) -> Self::Writer {
            self.0
                .try_clone()
                .map(FileOrStderr::File)
                .unwrap_or(FileOrStderr::Stderr)
        }
    }

    /// Initialize structured logging to `~/.local/state/vsc/vsc.log`.
    /// Returns Err when the log file cannot be opened so the caller can fall back to stderr.
    pub fn init_logging() -> Result<()> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("vsc")?;
        let log_dir = xdg_dirs.get_state_home();

        fs::create_dir_all(&log_dir)?;
        let log_file_path: PathBuf = log_dir.join("vsc.log");

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)?;

        let writer = BoxMakeWriter::new(FileMakeWriter(file));

        tracing_subscriber::fmt()
            .with_env_filter(super::env_filter())
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;

        tracing::info!("vsc logging initialized at {}", log_file_path.display());
        Ok(())
    }
}

/// Initialize logging to stderr only. Use when `init_logging()` fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
