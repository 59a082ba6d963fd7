//! Local filesystem line source implementation

use crate::LineRead;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Exclusively owned sequential reader over a local file
///
/// The file handle is held from [`LineSource::open`] until [`LineSource::close`]
/// (or drop). Closing is idempotent; reads after closing report
/// [`LineRead::Exhausted`].
#[derive(Debug)]
pub struct LineSource {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    lines_read: u64,
}

impl LineSource {
    /// Open a local file for sequential line reads
    ///
    /// # Arguments
    /// * `path` - Path to the file
    /// * `buffer_size` - Capacity of the read buffer in bytes
    pub async fn open(path: impl Into<PathBuf>, buffer_size: usize) -> io::Result<Self> {
        let path = path.into();
        let file = File::open(&path).await?;

        tracing::debug!("Opened line source: {}", path.display());

        Ok(Self {
            path,
            lines: Some(BufReader::with_capacity(buffer_size, file).lines()),
            lines_read: 0,
        })
    }

    /// Read the next line
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped.
    pub async fn next_line(&mut self) -> LineRead {
        let Some(lines) = self.lines.as_mut() else {
            return LineRead::Exhausted;
        };

        match lines.next_line().await {
            Ok(Some(line)) => {
                self.lines_read += 1;
                LineRead::Line(line)
            }
            Ok(None) => LineRead::Exhausted,
            Err(e) => LineRead::Failed(e),
        }
    }

    /// Release the file handle
    ///
    /// Returns `true` if this call closed the file, `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.lines.take().is_some();
        if was_open {
            tracing::debug!(
                "Closed line source {} after {} lines",
                self.path.display(),
                self.lines_read
            );
        }
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.lines.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines handed out so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
