//! Line-oriented output for statistic listeners.

use crate::error::StatsError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where an [`OutputHandler`] sends its lines.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    /// Standard output.
    Console,
    /// Append to a file, creating it if needed.
    FileAppend(PathBuf),
    /// Truncate the file on the first write, append afterwards.
    FileOverwrite(PathBuf),
    /// Keep lines in memory.
    Buffer,
}

/// Writes one message per line to its target.
#[derive(Debug, Clone)]
pub struct OutputHandler {
    target: OutputTarget,
    first_write: bool,
    lines: Vec<String>,
}

impl OutputHandler {
    /// Creates a handler for `target`.
    pub fn new(target: OutputTarget) -> Self {
        Self {
            target,
            first_write: true,
            lines: Vec::new(),
        }
    }

    /// Writes to standard output.
    pub fn console() -> Self {
        Self::new(OutputTarget::Console)
    }

    /// Appends to `path`.
    pub fn file_append(path: impl AsRef<Path>) -> Self {
        Self::new(OutputTarget::FileAppend(path.as_ref().to_path_buf()))
    }

    /// Overwrites `path` on the first write of this handler.
    pub fn file_overwrite(path: impl AsRef<Path>) -> Self {
        Self::new(OutputTarget::FileOverwrite(path.as_ref().to_path_buf()))
    }

    /// Keeps lines in memory, see [`Self::lines`].
    pub fn buffer() -> Self {
        Self::new(OutputTarget::Buffer)
    }

    /// The configured target.
    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Lines captured by a [`OutputTarget::Buffer`] handler.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Writes `message` followed by a newline.
    pub fn write(&mut self, message: &str) -> Result<(), StatsError> {
        match &self.target {
            OutputTarget::Console => println!("{}", message),
            OutputTarget::Buffer => self.lines.push(message.to_string()),
            OutputTarget::FileAppend(path) => append_line(path, message, false)?,
            OutputTarget::FileOverwrite(path) => {
                append_line(path, message, self.first_write)?;
            }
        }
        self.first_write = false;
        Ok(())
    }
}

fn append_line(path: &Path, message: &str, truncate: bool) -> Result<(), StatsError> {
    let io_err = |source| StatsError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        log::debug!("Truncating statistics file {}", path.display());
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    let mut file = options.open(path).map_err(io_err)?;
    writeln!(file, "{}", message).map_err(io_err)
}
