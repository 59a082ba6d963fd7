//! Line source for replaying local text files one line at a time
//!
//! A [`LineSource`] owns an open file for its whole lifetime and hands out
//! lines sequentially. Every read reports one of three outcomes, so that a
//! clean end of file is never confused with an I/O failure:
//!
//! - [`LineRead::Line`] - the next line, without its line terminator
//! - [`LineRead::Exhausted`] - no more lines (or the source was closed)
//! - [`LineRead::Failed`] - the underlying read returned an error
//!
//! # Example
//!
//! ```ignore
//! use datagen_file::{LineRead, LineSource, DEFAULT_BUFFER_SIZE};
//!
//! let mut source = LineSource::open("events.csv", DEFAULT_BUFFER_SIZE).await?;
//! loop {
//!     match source.next_line().await {
//!         LineRead::Line(line) => println!("{line}"),
//!         LineRead::Exhausted => break,
//!         LineRead::Failed(e) => return Err(e),
//!     }
//! }
//! source.close();
//! ```

mod local;

pub use local::LineSource;

/// Default buffer size for line reads (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Outcome of a single line read
#[derive(Debug)]
pub enum LineRead {
    /// A line was read
    Line(String),
    /// The source has no further lines
    Exhausted,
    /// The read failed
    Failed(std::io::Error),
}

impl LineRead {
    /// Returns the line if this read produced one
    pub fn into_line(self) -> Option<String> {
        match self {
            LineRead::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, LineRead::Exhausted)
    }
}
