//! The recursive watcher and its dispatch loop.
//!
//! This module provides [`RecursiveWatcher`], which keeps a non-recursive
//! backend's watch set in step with a live directory tree and streams the
//! backend's events to an async consumer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      Backend (notify thread)                     │
//! │  ┌────────────────────┐    ┌───────────────────────────────┐     │
//! │  │ RecommendedWatcher │ -> │ BackendSender (translate)     │     │
//! │  │ (one watch per dir)│    │ events / errors (unbounded)   │     │
//! │  └────────────────────┘    └──────────────┬────────────────┘     │
//! └───────────────────────────────────────────│──────────────────────┘
//!                                             ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Dispatch loop (tokio task)                    │
//! │  select { event, error, shutdown }                               │
//! │    create  -> register subtree (spawn_blocking walk)             │
//! │    remove  -> deregister subtree                                 │
//! │    then    -> filter -> events channel (bounded)                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dw_watcher::{ExcludePathFilter, RecursiveWatcher};
//! use dw_core::WatchConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut watcher = RecursiveWatcher::new(&WatchConfig::default()).await?;
//!     watcher.set_filter(ExcludePathFilter::new(&[".tmp"]));
//!     watcher.add("/tmp/w")?;
//!
//!     loop {
//!         tokio::select! {
//!             Some(event) = watcher.events.recv() => println!("{event}"),
//!             Some(error) = watcher.errors.recv() => eprintln!("{error}"),
//!             else => break,
//!         }
//!     }
//!
//!     watcher.close().await?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use camino::Utf8Path;
use dw_core::{OverflowPolicy, WatchConfig};
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendStreams, NotifyBackend, WatchBackend};
use crate::error::WatchError;
use crate::events::{FsEvent, Op};
use crate::filter::EventFilter;
use crate::registrar::Registrar;
use crate::stats::{StatsSnapshot, WatcherStats};

/// The currently installed filter, shared with the dispatch loop.
type FilterSlot = RwLock<Option<Arc<dyn EventFilter>>>;

/// A watcher that follows a directory tree as it changes.
///
/// # Lifecycle
///
/// 1. **Creation**: [`RecursiveWatcher::new`] (or [`with_backend`]) creates
///    the channels and spawns the dispatch loop. Nothing is watched yet.
///
/// 2. **Registration**: [`add`] walks a directory tree and registers every
///    directory with the backend. Directories created later are registered
///    by the dispatch loop when their create event arrives.
///
/// 3. **Reception**: read [`events`](Self::events) and
///    [`errors`](Self::errors). Errors raised inside the loop arrive on the
///    error channel; they never stop the loop.
///
/// 4. **Shutdown**: [`close`] stops the loop, closes the backend, and ends
///    both channels. Dropping the watcher also stops the loop.
///
/// # Backpressure
///
/// Both channels are bounded. With [`OverflowPolicy::Block`] the consumer
/// must keep draining `events`, or the dispatch loop (and with it watch
/// registration for new directories) stalls. The error channel never blocks:
/// errors that do not fit are dropped and counted in [`stats`].
///
/// # Concurrency
///
/// [`add`] and [`remove`] are synchronous and block on filesystem walks.
/// They may run concurrently with the dispatch loop; the backend tolerates
/// the duplicate registrations this can cause.
///
/// [`with_backend`]: Self::with_backend
/// [`add`]: Self::add
/// [`remove`]: Self::remove
/// [`close`]: Self::close
/// [`stats`]: Self::stats
pub struct RecursiveWatcher<B: WatchBackend = NotifyBackend> {
    /// Events that passed the filter, in backend emission order.
    pub events: mpsc::Receiver<FsEvent>,

    /// Errors from the backend and from registration bookkeeping.
    pub errors: mpsc::Receiver<WatchError>,

    registrar: Arc<Registrar<B>>,
    filter: Arc<FilterSlot>,
    stats: Arc<WatcherStats>,
    shutdown: CancellationToken,
    closed: AtomicBool,

    /// Handle to the dispatch task, taken by the first `close`.
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<B: WatchBackend + fmt::Debug> fmt::Debug for RecursiveWatcher<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveWatcher")
            .field("backend", self.registrar.backend())
            .field("is_running", &self.is_running())
            .field("has_filter", &self.filter.read().is_some())
            .finish_non_exhaustive()
    }
}

impl RecursiveWatcher<NotifyBackend> {
    /// Creates a watcher over the platform's `notify` backend.
    ///
    /// Must be called from within a tokio runtime; the dispatch loop is
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] if the configuration is invalid and
    /// [`WatchError::Notify`] if the platform watcher cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dw_watcher::RecursiveWatcher;
    /// use dw_core::WatchConfig;
    ///
    /// # async fn example() -> Result<(), dw_watcher::WatchError> {
    /// let watcher = RecursiveWatcher::new(&WatchConfig::default()).await?;
    /// watcher.add("./src")?;
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::unused_async)] // Async for API consistency with close()
    pub async fn new(config: &WatchConfig) -> Result<Self, WatchError> {
        config.validate()?;
        let (backend, streams) = NotifyBackend::new()?;
        Self::with_backend(backend, streams, config)
    }
}

impl<B: WatchBackend> RecursiveWatcher<B> {
    /// Creates a watcher over any [`WatchBackend`].
    ///
    /// `streams` must be the output streams belonging to `backend`. Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] if the configuration is invalid.
    pub fn with_backend(
        backend: B,
        streams: BackendStreams,
        config: &WatchConfig,
    ) -> Result<Self, WatchError> {
        config.validate()?;

        let (event_tx, events) = mpsc::channel(config.event_capacity);
        let (error_tx, errors) = mpsc::channel(config.error_capacity);

        let stats = Arc::new(WatcherStats::new());
        let registrar = Arc::new(Registrar::new(
            backend,
            config.follow_symlinks,
            Arc::clone(&stats),
        ));
        let filter: Arc<FilterSlot> = Arc::new(RwLock::new(None));
        let shutdown = CancellationToken::new();

        let dispatch = DispatchLoop {
            registrar: Arc::clone(&registrar),
            filter: Arc::clone(&filter),
            stats: Arc::clone(&stats),
            overflow: config.overflow,
            event_tx,
            error_tx,
            shutdown: shutdown.clone(),
        };
        let task_handle = tokio::spawn(dispatch.run(streams));

        Ok(Self {
            events,
            errors,
            registrar,
            filter,
            stats,
            shutdown,
            closed: AtomicBool::new(false),
            task_handle: Mutex::new(Some(task_handle)),
        })
    }

    /// Starts watching a path.
    ///
    /// A directory is watched together with every directory beneath it; a
    /// file is watched on its own. This call blocks while the tree is walked.
    ///
    /// # Errors
    ///
    /// - [`WatchError::Io`] if the path cannot be stat'ed (including when it
    ///   does not exist).
    /// - [`WatchError::Walk`], [`WatchError::Notify`], or
    ///   [`WatchError::NonUtf8Path`] if the walk fails partway. Directories
    ///   registered before the failure stay registered.
    /// - [`WatchError::Closed`] after [`close`](Self::close).
    pub fn add(&self, path: impl AsRef<Utf8Path>) -> Result<(), WatchError> {
        self.ensure_open()?;
        self.registrar.add(path.as_ref())
    }

    /// Stops watching a path and, for a directory, everything beneath it.
    ///
    /// A path that no longer exists is not an error: there is nothing left to
    /// walk, and the backend drops watches on deleted directories by itself.
    ///
    /// # Errors
    ///
    /// - [`WatchError::Io`] if the path exists but cannot be stat'ed.
    /// - Walk and backend errors as for [`add`](Self::add).
    /// - [`WatchError::Closed`] after [`close`](Self::close).
    pub fn remove(&self, path: impl AsRef<Utf8Path>) -> Result<(), WatchError> {
        self.ensure_open()?;
        self.registrar.remove(path.as_ref())
    }

    /// Installs or replaces the event filter.
    ///
    /// Takes effect from the next event the dispatch loop processes.
    pub fn set_filter<F: EventFilter>(&self, filter: F) {
        *self.filter.write() = Some(Arc::new(filter));
    }

    /// Removes the event filter so every event is forwarded.
    pub fn clear_filter(&self) {
        *self.filter.write() = None;
    }

    /// Receives the next event, or `None` once the watcher is closed and
    /// every buffered event has been read.
    pub async fn recv(&mut self) -> Option<FsEvent> {
        self.events.recv().await
    }

    /// Receives the next error, or `None` once the watcher is closed.
    pub async fn recv_error(&mut self) -> Option<WatchError> {
        self.errors.recv().await
    }

    /// Returns `true` while the dispatch loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
            && self
                .task_handle
                .lock()
                .as_ref()
                .is_some_and(|h| !h.is_finished())
    }

    /// Returns a snapshot of the watcher's counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the backend this watcher drives.
    #[must_use]
    pub fn backend(&self) -> &B {
        self.registrar.backend()
    }

    /// Stops the dispatch loop and closes the backend.
    ///
    /// Backend events not yet processed are discarded. Events already in the
    /// [`events`](Self::events) channel can still be read; after that both
    /// channels report closed. Calling `close` again does nothing.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if closing it failed.
    pub async fn close(&self) -> Result<(), WatchError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.shutdown.cancel();
        let backend_result = self.registrar.backend().close();

        let handle = self.task_handle.lock().take();
        if let Some(handle) = handle {
            if let Err(join_error) = handle.await {
                tracing::error!(error = %join_error, "Dispatch loop terminated abnormally");
            }
        }

        backend_result
    }

    fn ensure_open(&self) -> Result<(), WatchError> {
        if self.closed.load(Ordering::Acquire) {
            Err(WatchError::Closed)
        } else {
            Ok(())
        }
    }
}

impl<B: WatchBackend> Drop for RecursiveWatcher<B> {
    fn drop(&mut self) {
        // The task exits on its own once cancelled; Drop cannot await it.
        self.shutdown.cancel();
    }
}

/// State owned by the dispatch task.
struct DispatchLoop<B> {
    registrar: Arc<Registrar<B>>,
    filter: Arc<FilterSlot>,
    stats: Arc<WatcherStats>,
    overflow: OverflowPolicy,
    event_tx: mpsc::Sender<FsEvent>,
    error_tx: mpsc::Sender<WatchError>,
    shutdown: CancellationToken,
}

impl<B: WatchBackend> DispatchLoop<B> {
    async fn run(self, mut streams: BackendStreams) {
        tracing::info!("Dispatch loop started");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                Some(event) = streams.events.recv() => {
                    if self.handle_event(event).await.is_break() {
                        break;
                    }
                }
                Some(error) = streams.errors.recv() => self.forward_error(error),
            }
        }

        tracing::info!("Dispatch loop stopped");
    }

    async fn handle_event(&self, event: FsEvent) -> ControlFlow<()> {
        match event.op {
            Op::Create => {
                let registrar = Arc::clone(&self.registrar);
                let path = event.path.clone();
                self.run_bookkeeping(move || registrar.register_created(&path))
                    .await;
            }
            Op::Remove => {
                let registrar = Arc::clone(&self.registrar);
                let path = event.path.clone();
                self.run_bookkeeping(move || registrar.remove(&path)).await;
            }
            Op::Write | Op::Rename | Op::Chmod => {}
        }

        let filter = self.filter.read().clone();
        if filter.is_some_and(|f| !f.accept(&event)) {
            tracing::trace!(path = %event.path, op = %event.op, "Filtered out event");
            self.stats.increment_filtered();
            return ControlFlow::Continue(());
        }

        self.forward_event(event).await
    }

    /// Runs a walk on the blocking pool and forwards its error, if any.
    async fn run_bookkeeping<F>(&self, work: F)
    where
        F: FnOnce() -> Result<(), WatchError> + Send + 'static,
    {
        match tokio::task::spawn_blocking(work).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => self.forward_error(error),
            Err(join_error) => {
                tracing::error!(error = %join_error, "Registration walk terminated abnormally");
            }
        }
    }

    async fn forward_event(&self, event: FsEvent) -> ControlFlow<()> {
        tracing::trace!(path = %event.path, op = %event.op, "Forwarding event");

        match self.overflow {
            OverflowPolicy::Block => {
                tokio::select! {
                    () = self.shutdown.cancelled() => return ControlFlow::Break(()),
                    result = self.event_tx.send(event) => {
                        if result.is_ok() {
                            self.stats.increment_forwarded();
                        }
                    }
                }
            }
            OverflowPolicy::DropNewest => match self.event_tx.try_send(event) {
                Ok(()) => self.stats.increment_forwarded(),
                Err(TrySendError::Full(event)) => {
                    tracing::warn!(path = %event.path, op = %event.op, "Event channel full, dropping event");
                    self.stats.increment_dropped_events();
                }
                Err(TrySendError::Closed(_)) => {}
            },
        }

        ControlFlow::Continue(())
    }

    fn forward_error(&self, error: WatchError) {
        match self.error_tx.try_send(error) {
            Ok(()) => {}
            Err(TrySendError::Full(error)) => {
                tracing::warn!(%error, "Error channel full, dropping error");
                self.stats.increment_dropped_errors();
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AcceptAllFilter, ExcludePathFilter, RejectAllFilter};
    use crate::testing::{utf8_tempdir, RecordingBackend};
    use camino::Utf8PathBuf;
    use std::fs;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);
    const QUIET: Duration = Duration::from_millis(200);

    fn paths(events: &[FsEvent]) -> Vec<Utf8PathBuf> {
        events.iter().map(|e| e.path.clone()).collect()
    }

    fn watcher_with(config: &WatchConfig) -> RecursiveWatcher<RecordingBackend> {
        let (backend, streams) = RecordingBackend::new();
        RecursiveWatcher::with_backend(backend, streams, config).expect("Failed to create watcher")
    }

    fn watcher() -> RecursiveWatcher<RecordingBackend> {
        watcher_with(&WatchConfig::default())
    }

    async fn next_event(watcher: &mut RecursiveWatcher<RecordingBackend>) -> FsEvent {
        timeout(WAIT, watcher.recv())
            .await
            .expect("Timed out waiting for event")
            .expect("Event channel closed")
    }

    async fn next_error(watcher: &mut RecursiveWatcher<RecordingBackend>) -> WatchError {
        timeout(WAIT, watcher.recv_error())
            .await
            .expect("Timed out waiting for error")
            .expect("Error channel closed")
    }

    #[tokio::test]
    async fn test_add_registers_whole_tree() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("a/b")).unwrap();

        let watcher = watcher();
        watcher.add(&root).unwrap();

        let watched = watcher.backend().watched();
        assert!(watched.contains(&root));
        assert!(watched.contains(&root.join("a")));
        assert!(watched.contains(&root.join("a/b")));
        assert!(watcher.is_running());
    }

    #[tokio::test]
    async fn test_create_event_registers_new_directory() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir(root.join("a")).unwrap();

        let mut watcher = watcher();
        watcher.add(&root).unwrap();

        fs::create_dir_all(root.join("a/b/c")).unwrap();
        watcher
            .backend()
            .emit(FsEvent::new(root.join("a/b"), Op::Create));

        let event = next_event(&mut watcher).await;
        assert_eq!(event, FsEvent::new(root.join("a/b"), Op::Create));

        // Registration happens before the event is forwarded.
        let watched = watcher.backend().watched();
        assert!(watched.contains(&root.join("a/b")));
        assert!(watched.contains(&root.join("a/b/c")));
    }

    #[tokio::test]
    async fn test_create_event_for_vanished_path_reports_error() {
        let (_guard, root) = utf8_tempdir();
        let mut watcher = watcher();

        let gone = root.join("gone");
        watcher.backend().emit(FsEvent::new(gone.clone(), Op::Create));

        let error = next_error(&mut watcher).await;
        assert!(error.is_not_found());
        assert_eq!(error.path(), Some(gone.as_path()));

        // The event is still forwarded, and the loop keeps going.
        assert_eq!(next_event(&mut watcher).await.path, gone);
        watcher.backend().emit(FsEvent::new(root.join("x"), Op::Write));
        assert_eq!(next_event(&mut watcher).await.op, Op::Write);
    }

    #[tokio::test]
    async fn test_remove_event_for_deleted_directory_is_forwarded() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir(root.join("a")).unwrap();

        let mut watcher = watcher();
        watcher.add(&root).unwrap();
        fs::remove_dir(root.join("a")).unwrap();

        watcher.backend().emit(FsEvent::new(root.join("a"), Op::Remove));
        let event = next_event(&mut watcher).await;
        assert_eq!(event, FsEvent::new(root.join("a"), Op::Remove));

        // Nothing left on disk to walk, so no error and no backend call.
        assert!(watcher.errors.try_recv().is_err());
        assert!(watcher.backend().removed().is_empty());
    }

    #[tokio::test]
    async fn test_remove_event_for_existing_directory_deregisters_it() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("a/b")).unwrap();

        let mut watcher = watcher();
        watcher.add(&root).unwrap();

        watcher.backend().emit(FsEvent::new(root.join("a"), Op::Remove));
        next_event(&mut watcher).await;

        let watched = watcher.backend().watched();
        assert!(!watched.contains(&root.join("a")));
        assert!(!watched.contains(&root.join("a/b")));
        assert!(watched.contains(&root));
    }

    #[tokio::test]
    async fn test_backend_errors_are_forwarded() {
        let mut watcher = watcher();
        watcher
            .backend()
            .emit_error(WatchError::from(notify::Error::generic("queue overflow")));

        let error = next_error(&mut watcher).await;
        assert!(matches!(error, WatchError::Notify(_)));
    }

    #[tokio::test]
    async fn test_reject_all_filter_suppresses_everything() {
        let (_guard, root) = utf8_tempdir();
        let mut watcher = watcher();
        watcher.set_filter(RejectAllFilter);

        fs::create_dir(root.join("new")).unwrap();
        watcher.backend().emit(FsEvent::new(root.join("new"), Op::Create));
        watcher.backend().emit(FsEvent::new(root.join("f"), Op::Write));

        assert!(timeout(QUIET, watcher.recv()).await.is_err(), "no event expected");
        // Filtered events still drive registration.
        assert!(watcher.backend().watched().contains(&root.join("new")));
        assert_eq!(watcher.stats().filtered, 2);

        watcher.clear_filter();
        watcher.backend().emit(FsEvent::new(root.join("marker"), Op::Write));
        assert_eq!(next_event(&mut watcher).await.path, root.join("marker"));
    }

    #[tokio::test]
    async fn test_closure_filter() {
        let mut watcher = watcher();
        watcher.set_filter(|event: &FsEvent| event.op != Op::Chmod);

        watcher.backend().emit(FsEvent::new("/w/a", Op::Chmod));
        watcher.backend().emit(FsEvent::new("/w/a", Op::Write));

        assert_eq!(next_event(&mut watcher).await.op, Op::Write);
    }

    #[tokio::test]
    async fn test_accept_all_filter_is_transparent() {
        let mut watcher = watcher();
        watcher.set_filter(AcceptAllFilter);

        let sent = vec![
            FsEvent::new("/w/a", Op::Write),
            FsEvent::new("/w/b", Op::Chmod),
            FsEvent::new("/w/c", Op::Rename),
        ];
        for event in &sent {
            watcher.backend().emit(event.clone());
        }

        let mut received = Vec::new();
        for _ in 0..sent.len() {
            received.push(next_event(&mut watcher).await);
        }
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn test_exclude_filter_drops_matching_paths() {
        let mut watcher = watcher();
        watcher.set_filter(ExcludePathFilter::new(&[".tmp"]));

        watcher.backend().emit(FsEvent::new("/tmp/w/x.tmp", Op::Write));
        watcher.backend().emit(FsEvent::new("/tmp/w/x.go", Op::Write));

        let event = next_event(&mut watcher).await;
        assert_eq!(event.path.as_str(), "/tmp/w/x.go");
    }

    #[tokio::test]
    async fn test_events_preserve_backend_order() {
        let mut watcher = watcher();
        let sent: Vec<FsEvent> = (0..20)
            .map(|i| FsEvent::new(format!("/w/file-{i}"), Op::Write))
            .collect();
        for event in &sent {
            watcher.backend().emit(event.clone());
        }

        let mut received = Vec::new();
        for _ in 0..sent.len() {
            received.push(next_event(&mut watcher).await);
        }
        assert_eq!(paths(&received), paths(&sent));
    }

    #[tokio::test]
    async fn test_drop_newest_policy_counts_dropped_events() {
        let config = WatchConfig::default()
            .with_event_capacity(1)
            .with_overflow(OverflowPolicy::DropNewest);
        let mut watcher = watcher_with(&config);

        for i in 0..3 {
            watcher
                .backend()
                .emit(FsEvent::new(format!("/w/{i}"), Op::Write));
        }
        // Let the loop process all three without anyone draining.
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(next_event(&mut watcher).await.path.as_str(), "/w/0");
        let stats = watcher.stats();
        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.dropped_events, 2);
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_ends_streams() {
        let mut watcher = watcher();

        watcher.close().await.unwrap();
        watcher.close().await.unwrap();

        assert!(!watcher.is_running());
        assert_eq!(watcher.backend().close_count(), 1);
        assert!(watcher.recv().await.is_none());
        assert!(watcher.recv_error().await.is_none());
    }

    #[tokio::test]
    async fn test_close_unblocks_a_full_event_channel() {
        let config = WatchConfig::default().with_event_capacity(1);
        let watcher = watcher_with(&config);

        for i in 0..5 {
            watcher
                .backend()
                .emit(FsEvent::new(format!("/w/{i}"), Op::Write));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        timeout(WAIT, watcher.close())
            .await
            .expect("close must not hang on a full channel")
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_and_remove_after_close_fail() {
        let (_guard, root) = utf8_tempdir();
        let watcher = watcher();
        watcher.close().await.unwrap();

        assert!(matches!(watcher.add(&root), Err(WatchError::Closed)));
        assert!(matches!(watcher.remove(&root), Err(WatchError::Closed)));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let (backend, streams) = RecordingBackend::new();
        let config = WatchConfig::default().with_event_capacity(0);

        let result = RecursiveWatcher::with_backend(backend, streams, &config);
        assert!(matches!(result, Err(WatchError::Config(_))));
    }
}
