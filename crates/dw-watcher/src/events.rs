//! Event types for filesystem change notifications.
//!
//! This module provides [`FsEvent`], the record delivered on the watcher's
//! event channel, and [`Op`], the kind of change it describes.
//!
//! # Event Flow
//!
//! ```text
//! Filesystem change
//!        │
//!        ▼
//! notify (one non-recursive watch per directory)
//!        │
//!        ▼
//!   FsEvent translated by the backend
//!        │
//!        ▼
//!   Dispatch loop: registration bookkeeping, then filter
//!        │
//!        ▼
//!   Sent via channel to the consumer
//! ```

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// The kind of change an [`FsEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// A file or directory appeared, including moves into a watched directory.
    Create,
    /// File contents changed.
    Write,
    /// A file or directory was deleted.
    Remove,
    /// A file or directory was moved away or renamed.
    Rename,
    /// Metadata (permissions, timestamps, ownership) changed.
    Chmod,
}

impl Op {
    /// Returns the lowercase name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Remove => "remove",
            Self::Rename => "rename",
            Self::Chmod => "chmod",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filesystem change event with a UTF-8 path guarantee.
///
/// Events are immutable: the dispatch loop either forwards them unchanged or
/// drops them.
///
/// # Examples
///
/// ```
/// use dw_watcher::{FsEvent, Op};
///
/// let event = FsEvent::new("/tmp/w/a/b/notes.txt", Op::Write);
/// assert_eq!(event.path.as_str(), "/tmp/w/a/b/notes.txt");
/// assert_eq!(event.op, Op::Write);
/// assert_eq!(event.to_string(), "write /tmp/w/a/b/notes.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FsEvent {
    /// The path that changed.
    pub path: Utf8PathBuf,

    /// What happened to it.
    pub op: Op,
}

impl FsEvent {
    /// Creates a new event.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, op: Op) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }

    /// Returns the file extension, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use dw_watcher::{FsEvent, Op};
    ///
    /// let event = FsEvent::new("src/main.go", Op::Create);
    /// assert_eq!(event.extension(), Some("go"));
    ///
    /// let no_ext = FsEvent::new("Makefile", Op::Write);
    /// assert_eq!(no_ext.extension(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()
    }

    /// Returns the file name without the directory path.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

impl fmt::Display for FsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.path)
    }
}
