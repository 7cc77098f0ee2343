//! Logical size of a directory tree.

use crate::error::EngineError;

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Bytes counted under a root, plus the first entry that could not be read.
///
/// `bytes` is meaningful even when `error` is set: unreadable entries are
/// skipped, not fatal.
#[derive(Debug, Default)]
pub struct SizeReport {
    pub bytes: u64,
    pub error: Option<EngineError>,
}

/// Sum the sizes of every regular file under `root`.
///
/// When `exclude` is set and lies inside `root`, that whole subtree is skipped.
/// An empty `exclude` is the same as `None`. Symlinks are never followed and
/// contribute nothing. A missing `root` is zero bytes, not an error.
pub fn logical_size(root: &Path, exclude: Option<&Path>) -> SizeReport {
    let exclude = exclude.filter(|p| !p.as_os_str().is_empty());

    if exclude == Some(root) {
        return SizeReport::default();
    }

    let mut report = SizeReport::default();

    // walkdir always follows a symlinked root; a link owns no bytes of its own
    match fs::symlink_metadata(root) {
        Ok(metadata) if metadata.file_type().is_symlink() => return report,
        Ok(_) => {}
        Err(err) => {
            report.error = EngineError::from_io(root, err);
            return report;
        }
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| Some(entry.path()) != exclude);

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                // walkdir does not descend into a directory it failed to read
                if report.error.is_none() {
                    report.error = EngineError::from_walk(root, err);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // Use symlink metadata (walkdir's default without follow_links) so
        // only the entry itself is measured
        match entry.metadata() {
            Ok(metadata) => report.bytes += metadata.len(),
            Err(err) => {
                if report.error.is_none() {
                    report.error = EngineError::from_walk(entry.path(), err);
                }
            }
        }
    }

    report
}
