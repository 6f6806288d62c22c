//! Error types for the dw-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while registering watches, walking directory trees, and running the
//! dispatch loop.

use std::io;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use dw_core::ConfigError;

/// Errors that can occur during recursive watching.
///
/// Errors raised by [`add`] and [`remove`] are returned to the caller.
/// Errors raised inside the dispatch loop are sent on the watcher's error
/// channel and never stop the loop.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): Recoverable - the backend keeps running
/// - **I/O errors** ([`WatchError::Io`]): Recoverable - one path failed to stat
/// - **Walk errors** ([`WatchError::Walk`]): Recoverable - one subtree is partially registered
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): Recoverable - the event is skipped
/// - **Closed** ([`WatchError::Closed`]): Fatal - the watcher was closed
/// - **Config** ([`WatchError::Config`]): Fatal - the watcher could not be built
///
/// # Examples
///
/// ```
/// use dw_watcher::WatchError;
///
/// fn handle_error(err: WatchError) {
///     match err {
///         WatchError::Notify(e) => eprintln!("Backend error: {e}"),
///         WatchError::Io { path, source } => eprintln!("Cannot stat {path}: {source}"),
///         WatchError::Walk(e) => eprintln!("Walk error: {e}"),
///         WatchError::NonUtf8Path(p) => eprintln!("Invalid path: {}", p.display()),
///         WatchError::Closed => eprintln!("Watcher closed"),
///         WatchError::Config(e) => eprintln!("Bad configuration: {e}"),
///     }
/// }
/// ```
///
/// [`add`]: crate::RecursiveWatcher::add
/// [`remove`]: crate::RecursiveWatcher::remove
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The notify backend reported an error.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// Stat of a path failed.
    #[error("cannot stat {path}: {source}")]
    Io {
        /// The path that could not be inspected.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A registration or deregistration walk failed partway through.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(PathBuf),

    /// The watcher or backend has already been closed.
    #[error("watcher is closed")]
    Closed,

    /// The watcher configuration is invalid.
    #[error("invalid watcher configuration: {0}")]
    Config(#[from] ConfigError),
}

impl WatchError {
    /// Creates a new [`WatchError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`WatchError::NonUtf8Path`] error.
    #[inline]
    pub fn non_utf8_path(path: impl Into<PathBuf>) -> Self {
        Self::NonUtf8Path(path.into())
    }

    /// Returns `true` if this is a stat failure caused by a missing path.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Returns `true` if this error is recoverable (watching can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns `true` if this error is fatal (the watcher cannot be used).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed | Self::Config(_))
    }

    /// Returns the UTF-8 path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Notify(e) => e.paths.first().and_then(|p| Utf8Path::from_path(p)),
            Self::Walk(_) | Self::NonUtf8Path(_) | Self::Closed | Self::Config(_) => None,
        }
    }
}
