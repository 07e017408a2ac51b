//! Output destination handling.
//!
//! The destination is opened once, before connecting, and buffered for the
//! whole run. [`OutputSink::close`] flushes it and reports failures that would
//! otherwise be lost when the writer is dropped.

use crate::error::{Result, SqloutError};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path value that selects standard output.
pub const STDOUT_PATH: &str = "-";

/// Where formatted lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Resolves an optional `--output` value. No value, or `-`, means stdout.
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.as_os_str() != STDOUT_PATH && !path.as_os_str().is_empty() => {
                Self::File(path.to_path_buf())
            }
            _ => Self::Stdout,
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Buffered, owned output destination.
pub struct OutputSink {
    label: String,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl OutputSink {
    /// Opens the destination. Files are created or truncated.
    pub fn open(target: OutputTarget) -> Result<Self> {
        let inner: Box<dyn Write + Send> = match &target {
            OutputTarget::Stdout => Box::new(io::stdout()),
            OutputTarget::File(path) => {
                let file = File::create(path).map_err(|e| {
                    SqloutError::output_open(format!("{}: {e}", path.display()))
                })?;
                Box::new(file)
            }
        };

        debug!("Writing output to {}", target);
        Ok(Self {
            label: target.to_string(),
            writer: BufWriter::new(inner),
        })
    }

    /// Wraps an arbitrary writer, labelled for error messages.
    pub fn from_writer(label: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            label: label.into(),
            writer: BufWriter::new(Box::new(writer)),
        }
    }

    /// Returns a description of the destination.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Flushes all buffered output and releases the destination.
    pub fn close(self) -> Result<()> {
        let label = self.label;
        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| SqloutError::output_close(format!("{label}: {}", e.error())))?;
        inner
            .flush()
            .map_err(|e| SqloutError::output_close(format!("{label}: {e}")))?;
        debug!("Closed output {}", label);
        Ok(())
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
