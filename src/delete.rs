//! Deletion of selected trees with live progress.
//!
//! Each root is walked and its regular files removed one by one, publishing a
//! running count to a shared [`ProgressCounter`]. A final sweep removes
//! whatever the walk left behind (directories, symlinks, entries that
//! vanished or reappeared mid-walk). Failures are recorded and the walk goes
//! on; the caller always gets the count back with the error.

use crate::error::{AggregateError, EngineError};
use crate::progress::ProgressCounter;

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a deletion job.
///
/// `files_deleted > 0` together with an `error` means the job partially
/// succeeded. Neither half should be dropped.
#[derive(Debug, Default)]
#[must_use]
pub struct DeletionResult {
    /// Regular files actually removed. Directories and symlinks removed by the
    /// final sweep are not counted.
    pub files_deleted: u64,
    pub error: Option<EngineError>,
}

impl DeletionResult {
    /// Everything selected is gone.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Some files were removed but something failed.
    pub fn is_partial(&self) -> bool {
        self.files_deleted > 0 && self.error.is_some()
    }
}

/// Delete one tree, publishing the running file count to `counter`.
///
/// A missing `root` is success with a count of zero.
pub fn delete_path(root: &Path, counter: Option<&ProgressCounter>) -> DeletionResult {
    let (files_deleted, error) = delete_tree(root, counter, 0, &[]);
    DeletionResult {
        files_deleted,
        error,
    }
}

/// Delete every path in `paths`, deepest first.
///
/// Ordering by depth means a selected descendant is handled before its selected
/// ancestor is walked. A descendant that could not be fully removed keeps its
/// recorded failure and is left out of the ancestor's walk and sweep, so
/// nothing is counted or reported twice. The counter carries the total across
/// the whole batch and never goes backwards. Every path is attempted; the
/// error, if any, summarises the paths that failed.
pub fn delete_paths<P: AsRef<Path>>(
    paths: &[P],
    counter: Option<&ProgressCounter>,
) -> DeletionResult {
    let mut ordered: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    ordered.sort_by_key(|p| std::cmp::Reverse(depth(p)));

    let mut total = 0u64;
    let mut failures = AggregateError::new();
    // Selected roots that failed and still exist
    let mut unresolved: Vec<PathBuf> = Vec::new();

    for path in &ordered {
        let (count, error) = delete_tree(path, counter, total, &unresolved);
        total += count;
        if let Some(err) = error {
            failures.push(err.to_string());
            if fs::symlink_metadata(path).is_ok() {
                unresolved.push(path.clone());
            }
        }
    }

    DeletionResult {
        files_deleted: total,
        error: failures.into_error(),
    }
}

/// Number of components in `path`.
fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Remove `root`, returning the files removed and the first failure.
///
/// `base` is what the counter already shows for earlier roots of the same job.
/// Subtrees in `keep` already had their failure recorded and are not touched.
fn delete_tree(
    root: &Path,
    counter: Option<&ProgressCounter>,
    base: u64,
    keep: &[PathBuf],
) -> (u64, Option<EngineError>) {
    let mut count = 0u64;
    let mut first_err: Option<EngineError> = None;

    let mut record = |err: Option<EngineError>| {
        if first_err.is_none() {
            first_err = err;
        }
    };

    match fs::symlink_metadata(root) {
        // walkdir would follow a symlinked root into its target; only the link goes
        Ok(metadata) if metadata.file_type().is_symlink() => {
            if let Err(err) = fs::remove_file(root) {
                record(EngineError::from_io(root, err));
            }
            return (0, first_err);
        }
        Ok(_) => {}
        Err(err) => return (0, EngineError::from_io(root, err)),
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !keep.iter().any(|k| k.as_path() == entry.path()));

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                // An unreadable directory is not descended into; keep walking
                // its siblings.
                record(EngineError::from_walk(root, err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                count += 1;
                if let Some(counter) = counter {
                    counter.publish(base + count);
                }
            }
            Err(err) => record(EngineError::from_io(entry.path(), err)),
        }
    }

    record(sweep(root, keep));

    (count, first_err)
}

/// Remove `path` and everything under it except the subtrees in `keep`.
///
/// Directories on the way to a kept subtree are emptied but left in place.
fn sweep(path: &Path, keep: &[PathBuf]) -> Option<EngineError> {
    if keep.iter().any(|k| k.as_path() == path) {
        return None;
    }
    if !keep.iter().any(|k| k.starts_with(path)) {
        return fs::remove_dir_all(path)
            .err()
            .and_then(|err| EngineError::from_io(path, err));
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => return EngineError::from_io(path, err),
    };

    let mut first_err = None;
    for entry in entries {
        let err = match entry {
            Ok(entry) => {
                let child = entry.path();
                if entry.file_type().is_ok_and(|ft| ft.is_dir()) {
                    sweep(&child, keep)
                } else {
                    fs::remove_file(&child)
                        .err()
                        .and_then(|err| EngineError::from_io(&child, err))
                }
            }
            Err(err) => EngineError::from_io(path, err),
        };
        if first_err.is_none() {
            first_err = err;
        }
    }
    first_err
}
