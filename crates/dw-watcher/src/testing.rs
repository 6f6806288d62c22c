//! Test helpers: a recording in-memory backend and temp directory setup.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use tempfile::TempDir;

use crate::backend::{BackendSender, BackendStreams, WatchBackend};
use crate::error::WatchError;
use crate::events::FsEvent;

/// A backend that records watch calls and lets tests inject events.
#[derive(Debug)]
pub(crate) struct RecordingBackend {
    watched: Mutex<BTreeSet<Utf8PathBuf>>,
    removed: Mutex<Vec<Utf8PathBuf>>,
    fail_on: Mutex<Option<Utf8PathBuf>>,
    sender: Mutex<Option<BackendSender>>,
    closes: AtomicUsize,
}

impl RecordingBackend {
    pub(crate) fn new() -> (Self, BackendStreams) {
        let (sender, streams) = BackendStreams::channel();
        let backend = Self {
            watched: Mutex::new(BTreeSet::new()),
            removed: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            sender: Mutex::new(Some(sender)),
            closes: AtomicUsize::new(0),
        };
        (backend, streams)
    }

    pub(crate) fn watched(&self) -> BTreeSet<Utf8PathBuf> {
        self.watched.lock().clone()
    }

    pub(crate) fn removed(&self) -> Vec<Utf8PathBuf> {
        self.removed.lock().clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Makes `add` fail for exactly this path.
    pub(crate) fn fail_on(&self, path: Utf8PathBuf) {
        *self.fail_on.lock() = Some(path);
    }

    pub(crate) fn emit(&self, event: FsEvent) {
        if let Some(sender) = self.sender.lock().as_ref() {
            sender.send_event(event);
        }
    }

    pub(crate) fn emit_error(&self, error: WatchError) {
        if let Some(sender) = self.sender.lock().as_ref() {
            sender.send_error(error);
        }
    }
}

impl WatchBackend for RecordingBackend {
    fn add(&self, path: &Utf8Path) -> Result<(), WatchError> {
        if self.fail_on.lock().as_deref() == Some(path) {
            return Err(WatchError::from(notify::Error::generic("injected failure")));
        }
        self.watched.lock().insert(path.to_owned());
        Ok(())
    }

    fn remove(&self, path: &Utf8Path) -> Result<(), WatchError> {
        self.watched.lock().remove(path);
        self.removed.lock().push(path.to_owned());
        Ok(())
    }

    fn close(&self) -> Result<(), WatchError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.sender.lock().take();
        Ok(())
    }
}

/// Creates a temp directory and returns it with its canonical UTF-8 path.
pub(crate) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir
        .path()
        .canonicalize()
        .expect("Failed to canonicalize temp directory");
    let path = Utf8PathBuf::from_path_buf(path).expect("Temp directory is not UTF-8");
    (dir, path)
}
