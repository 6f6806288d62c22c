//! Watch registration and deregistration over whole directory trees.
//!
//! The [`Registrar`] translates "watch this path" into one backend call per
//! directory. It keeps no record of what it registered: the backend's watch
//! set is the only source of truth.
//!
//! # Walk Semantics
//!
//! - Only directories are registered during a walk; files inside them are
//!   covered by their directory's watch.
//! - The walk ignores `.gitignore`, hidden-file, and other standard filters.
//! - The first failure (unreadable directory, backend error, non-UTF-8 path)
//!   aborts the walk. Directories handled before the failure stay registered.

use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use ignore::WalkBuilder;

use crate::backend::WatchBackend;
use crate::error::WatchError;
use crate::stats::WatcherStats;

/// Issues backend add/remove calls for single paths and whole trees.
#[derive(Debug)]
pub(crate) struct Registrar<B> {
    backend: B,
    follow_symlinks: bool,
    stats: Arc<WatcherStats>,
}

impl<B: WatchBackend> Registrar<B> {
    pub(crate) const fn new(backend: B, follow_symlinks: bool, stats: Arc<WatcherStats>) -> Self {
        Self {
            backend,
            follow_symlinks,
            stats,
        }
    }

    pub(crate) const fn backend(&self) -> &B {
        &self.backend
    }

    /// Registers a path: the whole tree for a directory, the path itself otherwise.
    pub(crate) fn add(&self, path: &Utf8Path) -> Result<(), WatchError> {
        let metadata = std::fs::metadata(path).map_err(|e| WatchError::io(path, e))?;

        if metadata.is_dir() {
            self.add_tree(path)
        } else {
            self.backend.add(path)?;
            self.stats.add_registered(1);
            Ok(())
        }
    }

    /// Deregisters a path. A path that no longer exists is not an error.
    pub(crate) fn remove(&self, path: &Utf8Path) -> Result<(), WatchError> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::trace!(%path, "Path already gone, nothing to deregister");
                return Ok(());
            }
            Err(e) => return Err(WatchError::io(path, e)),
        };

        if metadata.is_dir() {
            self.remove_tree(path)
        } else {
            self.backend.remove(path)
        }
    }

    /// Handles a create event: registers the new subtree if it is a directory.
    pub(crate) fn register_created(&self, path: &Utf8Path) -> Result<(), WatchError> {
        let metadata = std::fs::metadata(path).map_err(|e| WatchError::io(path, e))?;

        if metadata.is_dir() {
            // Already known to be a directory, so skip the extra stat in `add`.
            self.add_tree(path)?;
        }
        Ok(())
    }

    /// Registers `root` and every directory beneath it.
    ///
    /// `root` must be a directory.
    pub(crate) fn add_tree(&self, root: &Utf8Path) -> Result<(), WatchError> {
        let count = self.for_each_dir(root, |dir| self.backend.add(dir))?;
        self.stats.add_registered(count);
        tracing::debug!(%root, directories = count, "Registered directory tree");
        Ok(())
    }

    /// Deregisters `root` and every directory beneath it that can still be enumerated.
    pub(crate) fn remove_tree(&self, root: &Utf8Path) -> Result<(), WatchError> {
        let count = self.for_each_dir(root, |dir| self.backend.remove(dir))?;
        tracing::debug!(%root, directories = count, "Deregistered directory tree");
        Ok(())
    }

    /// Walks `root` and calls `visit` for each directory, returning how many were visited.
    fn for_each_dir<F>(&self, root: &Utf8Path, mut visit: F) -> Result<u64, WatchError>
    where
        F: FnMut(&Utf8Path) -> Result<(), WatchError>,
    {
        let walker = WalkBuilder::new(root)
            // Every directory is a watch target, ignored or hidden or not
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .build();

        let mut count = 0;
        for result in walker {
            let entry = result?;

            // The root is a directory even when it was reached through a symlink.
            let is_dir = entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                continue;
            }

            let path = entry.path();
            let dir = Utf8Path::from_path(path)
                .ok_or_else(|| WatchError::non_utf8_path(path.to_owned()))?;
            visit(dir)?;
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{utf8_tempdir, RecordingBackend};
    use std::fs;

    fn registrar() -> Registrar<RecordingBackend> {
        let (backend, _streams) = RecordingBackend::new();
        Registrar::new(backend, false, Arc::new(WatcherStats::new()))
    }

    #[test]
    fn test_add_registers_every_directory() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("d")).unwrap();
        fs::write(root.join("a/file.txt"), "x").unwrap();
        fs::write(root.join(".hidden"), "x").unwrap();
        fs::create_dir(root.join(".git")).unwrap();

        let registrar = registrar();
        registrar.add(&root).unwrap();

        let watched = registrar.backend().watched();
        for dir in ["", "a", "a/b", "a/b/c", "d", ".git"] {
            let expected = if dir.is_empty() {
                root.clone()
            } else {
                root.join(dir)
            };
            assert!(watched.contains(&expected), "{expected} not watched");
        }
        assert!(!watched.contains(&root.join("a/file.txt")));
        assert_eq!(watched.len(), 6);
        assert_eq!(registrar.stats.snapshot().registered, 6);
    }

    #[test]
    fn test_add_file_registers_only_that_file() {
        let (_guard, root) = utf8_tempdir();
        let file = root.join("notes.txt");
        fs::write(&file, "x").unwrap();

        let registrar = registrar();
        registrar.add(&file).unwrap();

        assert_eq!(registrar.backend().watched().into_iter().collect::<Vec<_>>(), vec![file]);
    }

    #[test]
    fn test_add_missing_path_returns_stat_error() {
        let (_guard, root) = utf8_tempdir();
        let registrar = registrar();

        let err = registrar.add(&root.join("missing")).unwrap_err();
        assert!(err.is_not_found());
        assert!(registrar.backend().watched().is_empty());
    }

    #[test]
    fn test_add_aborts_on_backend_failure_without_rollback() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("a/b")).unwrap();

        let registrar = registrar();
        registrar.backend().fail_on(root.join("a"));

        assert!(registrar.add(&root).is_err());
        let watched = registrar.backend().watched();
        assert!(watched.contains(&root), "root stays registered");
        assert!(!watched.contains(&root.join("a/b")), "walk stopped at the failure");
    }

    #[test]
    fn test_remove_missing_path_is_ok() {
        let (_guard, root) = utf8_tempdir();
        let registrar = registrar();

        registrar.remove(&root.join("never-existed")).unwrap();
        assert!(registrar.backend().removed().is_empty());
    }

    #[test]
    fn test_remove_tree_deregisters_every_directory() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("a/b")).unwrap();

        let registrar = registrar();
        registrar.add(&root).unwrap();
        registrar.remove(&root.join("a")).unwrap();

        let watched = registrar.backend().watched();
        assert!(watched.contains(&root));
        assert!(!watched.contains(&root.join("a")));
        assert!(!watched.contains(&root.join("a/b")));
    }

    #[test]
    fn test_register_created_ignores_files() {
        let (_guard, root) = utf8_tempdir();
        let file = root.join("x.go");
        fs::write(&file, "package main").unwrap();

        let registrar = registrar();
        registrar.register_created(&file).unwrap();
        assert!(registrar.backend().watched().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed_by_default() {
        let (_guard, root) = utf8_tempdir();
        let (_other_guard, other) = utf8_tempdir();
        fs::create_dir(other.join("inner")).unwrap();
        std::os::unix::fs::symlink(&other, root.join("link")).unwrap();

        let registrar = registrar();
        registrar.add(&root).unwrap();
        assert!(!registrar.backend().watched().contains(&root.join("link")));

        let (backend, _streams) = RecordingBackend::new();
        let following = Registrar::new(backend, true, Arc::new(WatcherStats::new()));
        following.add(&root).unwrap();
        let watched = following.backend().watched();
        assert!(watched.contains(&root.join("link")));
        assert!(watched.contains(&root.join("link/inner")));
    }
}
