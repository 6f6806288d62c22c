//! Event filtering for the dispatch loop.
//!
//! This module provides the [`EventFilter`] trait and a handful of
//! implementations. The dispatch loop consults the installed filter after it
//! has done its registration bookkeeping, so a filter only decides what the
//! consumer sees, never what gets watched.
//!
//! # Examples
//!
//! ```
//! use dw_watcher::{EventFilter, ExcludePathFilter, FsEvent, Op};
//!
//! let filter = ExcludePathFilter::new(&[".tmp"]);
//!
//! assert!(!filter.accept(&FsEvent::new("/tmp/w/x.tmp", Op::Create)));
//! assert!(filter.accept(&FsEvent::new("/tmp/w/x.go", Op::Create)));
//! ```

use smallvec::SmallVec;

use crate::events::{FsEvent, Op};

/// A predicate deciding whether an event reaches the consumer.
///
/// Events for which [`accept`] returns `false` are dropped silently.
///
/// # Thread Safety
///
/// Filters must be [`Send`] and [`Sync`] because they are read from the
/// dispatch task while the owner may replace them from any thread.
///
/// Closures implement this trait directly:
///
/// ```
/// use dw_watcher::{EventFilter, FsEvent, Op};
///
/// let only_writes = |event: &FsEvent| event.op == Op::Write;
/// assert!(only_writes.accept(&FsEvent::new("a.txt", Op::Write)));
/// assert!(!only_writes.accept(&FsEvent::new("a.txt", Op::Chmod)));
/// ```
///
/// [`accept`]: EventFilter::accept
pub trait EventFilter: Send + Sync + 'static {
    /// Returns `true` if the event should be forwarded to the consumer.
    fn accept(&self, event: &FsEvent) -> bool;
}

impl<F> EventFilter for F
where
    F: Fn(&FsEvent) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn accept(&self, event: &FsEvent) -> bool {
        self(event)
    }
}

/// A filter that accepts every event.
///
/// Installing it is observably the same as installing no filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl EventFilter for AcceptAllFilter {
    #[inline]
    fn accept(&self, _event: &FsEvent) -> bool {
        true
    }
}

/// A filter that rejects every event.
///
/// Watches are still maintained; the consumer just never hears about it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllFilter;

impl EventFilter for RejectAllFilter {
    #[inline]
    fn accept(&self, _event: &FsEvent) -> bool {
        false
    }
}

/// A filter based on file extensions.
///
/// # Examples
///
/// ```
/// use dw_watcher::{EventFilter, ExtensionFilter, FsEvent, Op};
///
/// let filter = ExtensionFilter::new(&["go", "rs"]);
/// assert!(filter.accept(&FsEvent::new("src/lib.rs", Op::Write)));
/// assert!(!filter.accept(&FsEvent::new("notes.md", Op::Write)));
/// ```
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: SmallVec<[String; 8]>,
}

impl ExtensionFilter {
    /// Creates a new extension filter.
    ///
    /// Extensions are given without the leading dot.
    #[must_use]
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Creates an extension filter from owned strings.
    ///
    /// A leading dot on any entry is ignored.
    #[must_use]
    pub fn from_owned(extensions: Vec<String>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_owned())
                .collect(),
        }
    }
}

impl EventFilter for ExtensionFilter {
    fn accept(&self, event: &FsEvent) -> bool {
        event
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// A filter that rejects events whose path contains any of a set of substrings.
#[derive(Debug, Clone, Default)]
pub struct ExcludePathFilter {
    patterns: SmallVec<[String; 4]>,
}

impl ExcludePathFilter {
    /// Creates a filter excluding the given substrings.
    #[must_use]
    pub fn new(patterns: &[&str]) -> Self {
        Self {
            patterns: patterns.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Creates a filter from owned substrings.
    #[must_use]
    pub fn from_owned(patterns: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Adds another substring to exclude.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }
}

impl EventFilter for ExcludePathFilter {
    fn accept(&self, event: &FsEvent) -> bool {
        let path = event.path.as_str();
        !self.patterns.iter().any(|p| path.contains(p.as_str()))
    }
}

/// A filter that accepts only the listed operations.
///
/// # Examples
///
/// ```
/// use dw_watcher::{EventFilter, FsEvent, Op, OpFilter};
///
/// let filter = OpFilter::new(&[Op::Create, Op::Remove]);
/// assert!(filter.accept(&FsEvent::new("a", Op::Remove)));
/// assert!(!filter.accept(&FsEvent::new("a", Op::Write)));
/// ```
#[derive(Debug, Clone)]
pub struct OpFilter {
    ops: SmallVec<[Op; 5]>,
}

impl OpFilter {
    /// Creates a filter accepting the given operations.
    #[must_use]
    pub fn new(ops: &[Op]) -> Self {
        Self {
            ops: SmallVec::from_slice(ops),
        }
    }
}

impl EventFilter for OpFilter {
    #[inline]
    fn accept(&self, event: &FsEvent) -> bool {
        self.ops.contains(&event.op)
    }
}

/// A composite filter that combines multiple filters with AND logic.
///
/// An empty composite accepts everything.
///
/// # Examples
///
/// ```
/// use dw_watcher::{CompositeFilter, EventFilter, ExcludePathFilter, ExtensionFilter, FsEvent, Op};
///
/// let filter = CompositeFilter::new()
///     .and(ExtensionFilter::new(&["go"]))
///     .and(ExcludePathFilter::new(&["vendor/"]));
///
/// assert!(filter.accept(&FsEvent::new("cmd/main.go", Op::Write)));
/// assert!(!filter.accept(&FsEvent::new("vendor/x/y.go", Op::Write)));
/// ```
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn EventFilter>>,
}

impl CompositeFilter {
    /// Creates a new empty composite filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter to the composite.
    #[must_use]
    pub fn and<F: EventFilter>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Returns `true` if no filters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl EventFilter for CompositeFilter {
    fn accept(&self, event: &FsEvent) -> bool {
        self.filters.iter().all(|f| f.accept(event))
    }
}
