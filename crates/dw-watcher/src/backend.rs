//! The backend seam: one platform watch primitive, one path at a time.
//!
//! A backend registers and deregisters single paths and reports what happens
//! to them on two unbounded streams. It knows nothing about recursion; the
//! [`RecursiveWatcher`] drives it.
//!
//! # Backend Contract
//!
//! - `add` of an already-watched path is a no-op.
//! - `remove` of a path that is not watched is a no-op.
//! - After `close`, `add` and `remove` return [`WatchError::Closed`] and both
//!   streams end once the platform primitive has shut down.
//! - All methods take `&self` and are safe to call from any thread.
//!
//! [`RecursiveWatcher`]: crate::RecursiveWatcher

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::WatchError;
use crate::events::{FsEvent, Op};

/// A single-path watch primitive.
///
/// Implementations must uphold the contract described in the
/// [module documentation](self).
pub trait WatchBackend: Send + Sync + 'static {
    /// Starts watching one path (non-recursively).
    fn add(&self, path: &Utf8Path) -> Result<(), WatchError>;

    /// Stops watching one path.
    fn remove(&self, path: &Utf8Path) -> Result<(), WatchError>;

    /// Releases every OS-level watch resource held by the backend.
    fn close(&self) -> Result<(), WatchError>;
}

/// The receiving half of a backend's two output streams.
#[derive(Debug)]
pub struct BackendStreams {
    /// Translated filesystem events, in emission order.
    pub events: mpsc::UnboundedReceiver<FsEvent>,

    /// Errors reported by the platform primitive.
    pub errors: mpsc::UnboundedReceiver<WatchError>,
}

impl BackendStreams {
    /// Creates a connected sender/streams pair.
    ///
    /// Backends keep the [`BackendSender`] and hand the streams to the
    /// [`RecursiveWatcher`](crate::RecursiveWatcher).
    #[must_use]
    pub fn channel() -> (BackendSender, Self) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        (
            BackendSender { event_tx, error_tx },
            Self { events, errors },
        )
    }
}

/// The sending half of a backend's output streams.
#[derive(Debug, Clone)]
pub struct BackendSender {
    event_tx: mpsc::UnboundedSender<FsEvent>,
    error_tx: mpsc::UnboundedSender<WatchError>,
}

impl BackendSender {
    /// Emits an event. Returns `false` if the streams have been dropped.
    pub fn send_event(&self, event: FsEvent) -> bool {
        self.event_tx.send(event).is_ok()
    }

    /// Emits an error. Returns `false` if the streams have been dropped.
    pub fn send_error(&self, error: WatchError) -> bool {
        self.error_tx.send(error).is_ok()
    }

    /// Translates a raw `notify` event and emits the result.
    ///
    /// One [`FsEvent`] is emitted per path carried by the raw event. Kinds
    /// outside the event model are dropped. Non-UTF-8 paths are reported on
    /// the error stream instead.
    pub fn send_notify_event(&self, event: notify::Event) {
        let Some(op) = translate_kind(event.kind) else {
            tracing::trace!(kind = ?event.kind, "Ignoring notify event kind");
            return;
        };

        for path in event.paths {
            match Utf8PathBuf::try_from(path) {
                Ok(path) => {
                    self.send_event(FsEvent::new(path, op));
                }
                Err(e) => {
                    let invalid_path = e.into_path_buf();
                    tracing::warn!(
                        path = %invalid_path.display(),
                        "Skipping non-UTF-8 path in file event"
                    );
                    self.send_error(WatchError::non_utf8_path(invalid_path));
                }
            }
        }
    }
}

/// Maps a `notify` event kind onto the event model.
///
/// A move into a watched directory is reported as [`Op::Create`] so that
/// moved-in directories get registered. The combined rename event is dropped
/// because inotify also reports its two halves separately.
fn translate_kind(kind: EventKind) -> Option<Op> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            Some(Op::Create)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => None,
        EventKind::Modify(ModifyKind::Name(_)) => Some(Op::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(Op::Chmod),
        EventKind::Modify(_) => Some(Op::Write),
        EventKind::Remove(_) => Some(Op::Remove),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// A [`WatchBackend`] over the platform's recommended `notify` watcher.
///
/// Every path is watched with [`RecursiveMode::NonRecursive`]; recursion is
/// the coordinator's job.
pub struct NotifyBackend {
    /// `None` once the backend has been closed.
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend")
            .field("closed", &self.watcher.lock().is_none())
            .finish()
    }
}

impl NotifyBackend {
    /// Creates the platform watcher and its output streams.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Notify`] if the platform watcher cannot be
    /// initialised (for example when the inotify instance limit is reached).
    pub fn new() -> Result<(Self, BackendStreams), WatchError> {
        let (sender, streams) = BackendStreams::channel();

        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => sender.send_notify_event(event),
                Err(error) => {
                    sender.send_error(WatchError::Notify(error));
                }
            }
        })?;

        Ok((
            Self {
                watcher: Mutex::new(Some(watcher)),
            },
            streams,
        ))
    }
}

impl WatchBackend for NotifyBackend {
    fn add(&self, path: &Utf8Path) -> Result<(), WatchError> {
        let mut guard = self.watcher.lock();
        let watcher = guard.as_mut().ok_or(WatchError::Closed)?;
        watcher.watch(path.as_std_path(), RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn remove(&self, path: &Utf8Path) -> Result<(), WatchError> {
        let mut guard = self.watcher.lock();
        let watcher = guard.as_mut().ok_or(WatchError::Closed)?;
        match watcher.unwatch(path.as_std_path()) {
            Err(e) if matches!(e.kind, notify::ErrorKind::WatchNotFound) => Ok(()),
            other => other.map_err(WatchError::from),
        }
    }

    fn close(&self) -> Result<(), WatchError> {
        // Dropping the watcher outside the lock stops the platform event loop,
        // which in turn drops the sender and ends both streams.
        let watcher = self.watcher.lock().take();
        drop(watcher);
        Ok(())
    }
}
