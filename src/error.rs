//! Error types for the reclamation engine.
//!
//! "Not found" is never an error here: a path that is already gone is what the
//! caller wanted. Everything else is recorded and handed back next to whatever
//! count was achieved, so a failure never hides partial progress.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Distinct messages kept by an [`AggregateError`].
const MAX_RECORDED_MESSAGES: usize = 8;

/// Messages shown when an [`AggregateError`] is displayed.
const MAX_DISPLAYED_MESSAGES: usize = 3;

/// Failure raised while sizing or deleting a tree.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An entry could not be read or removed for lack of permission.
    /// The walk skipped it and kept going.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure on a single entry.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more paths of a batch failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl EngineError {
    /// Classify an I/O error raised for `path`.
    ///
    /// Returns `None` for `NotFound`, which callers treat as success.
    pub fn from_io(path: &Path, source: io::Error) -> Option<Self> {
        match source.kind() {
            io::ErrorKind::NotFound => None,
            io::ErrorKind::PermissionDenied => Some(EngineError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }),
            _ => Some(EngineError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Classify an error yielded by a `walkdir` iterator.
    pub fn from_walk(fallback: &Path, err: walkdir::Error) -> Option<Self> {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback.to_path_buf());
        let source = match err.into_io_error() {
            Some(source) => source,
            // Symlink loops only happen when following links, which we never do.
            None => io::Error::other("filesystem loop detected"),
        };
        Self::from_io(&path, source)
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, EngineError::PermissionDenied { .. })
    }
}

/// Bounded summary of failures across a batch.
///
/// Keeps the first few distinct messages and a count of every failure, so a
/// batch over thousands of paths cannot build an unbounded report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateError {
    messages: Vec<String>,
    failures: usize,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure. Duplicate messages only bump the failure count.
    pub fn push(&mut self, message: impl Into<String>) {
        self.failures += 1;
        let message = message.into();
        if self.messages.len() < MAX_RECORDED_MESSAGES && !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.failures == 0
    }

    /// Number of failures recorded, including duplicates and dropped messages.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Distinct messages kept, in the order they were first seen.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// `None` when nothing failed.
    pub fn into_error(self) -> Option<EngineError> {
        if self.is_empty() {
            None
        } else {
            Some(EngineError::Aggregate(self))
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.messages.len() == 1 && self.failures == 1 {
            return f.write_str(&self.messages[0]);
        }
        let shown = self.messages.len().min(MAX_DISPLAYED_MESSAGES);
        f.write_str(&self.messages[..shown].join("; "))?;
        let hidden = self.failures - shown;
        if hidden > 0 {
            write!(f, " (and {} more)", hidden)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}
