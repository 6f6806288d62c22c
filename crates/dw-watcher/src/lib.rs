//! Recursive file watching on top of a non-recursive backend.
//!
//! This crate watches whole directory trees using a platform primitive that
//! only watches single directories. It registers every directory under a
//! watched root, registers directories created later as their create events
//! arrive, and deregisters subtrees as they are removed.
//!
//! # Overview
//!
//! - [`RecursiveWatcher`] is the coordinator: it owns the dispatch loop and
//!   exposes the consumer-facing event and error channels.
//! - [`WatchBackend`] is the seam to the platform; [`NotifyBackend`] is the
//!   implementation over `notify`'s recommended watcher.
//! - [`EventFilter`] decides which events reach the consumer. Filtering never
//!   affects watch registration.
//!
//! # Crate Dependencies
//!
//! ```text
//! dw-cli ──► dw-watcher ──► dw-core
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dw_watcher::{CompositeFilter, ExcludePathFilter, ExtensionFilter, RecursiveWatcher};
//! use dw_core::WatchConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut watcher = RecursiveWatcher::new(&WatchConfig::default()).await?;
//!
//!     watcher.set_filter(
//!         CompositeFilter::new()
//!             .and(ExtensionFilter::new(&["rs"]))
//!             .and(ExcludePathFilter::new(&["/target/"])),
//!     );
//!     watcher.add("./")?;
//!
//!     while let Some(event) = watcher.recv().await {
//!         println!("{event}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Errors from [`RecursiveWatcher::add`] and [`RecursiveWatcher::remove`] are
//! returned to the caller. Errors that happen inside the dispatch loop, such
//! as a directory vanishing before it could be registered, are delivered on
//! [`RecursiveWatcher::errors`] and never stop the loop:
//!
//! ```
//! use dw_watcher::WatchError;
//!
//! fn handle_watch_error(err: &WatchError) {
//!     if err.is_fatal() {
//!         eprintln!("Watcher unusable: {err}");
//!     } else {
//!         eprintln!("Warning: {err}");
//!     }
//! }
//! ```
//!
//! # Limitations
//!
//! - A directory created and populated between its create event and its
//!   registration walk may miss events for its contents; the walk still
//!   registers every subdirectory it finds.
//! - Events are not coalesced. A save that touches a file several times
//!   produces several events.

pub mod backend;
pub mod error;
pub mod events;
pub mod filter;
mod registrar;
pub mod stats;
pub mod watcher;

#[cfg(test)]
mod testing;

// Re-export backend types
pub use backend::{BackendSender, BackendStreams, NotifyBackend, WatchBackend};

// Re-export error types
pub use error::WatchError;

// Re-export event types
pub use events::{FsEvent, Op};

// Re-export filter types
pub use filter::{
    AcceptAllFilter, CompositeFilter, EventFilter, ExcludePathFilter, ExtensionFilter, OpFilter,
    RejectAllFilter,
};

// Re-export stats types
pub use stats::{StatsSnapshot, WatcherStats};

// Re-export watcher types
pub use watcher::RecursiveWatcher;
