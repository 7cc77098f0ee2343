//! Discovery of reclaimable directories under a set of roots.

use crate::classify::{classify, Classification};
use crate::error::EngineError;
use crate::size::{logical_size, SizeReport};

use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// VCS internal directories that are never traversed.
pub const VCS_INTERNALS: &[&str] = &[
    ".git", ".jj", ".svn", ".hg", ".bzr", "_darcs", ".pijul", "CVS", ".fossil",
];

/// Options controlling scan behavior
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    pub verbose: bool,
    /// Directory names never descended into
    pub exclude: Vec<String>,
}

/// A directory offered for removal
#[derive(Debug)]
pub struct Candidate {
    pub path: PathBuf,
    pub size: u64,
    /// First entry that could not be measured; `size` excludes it.
    pub size_error: Option<EngineError>,
}

/// Result of scanning one or more roots
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Largest first
    pub candidates: Vec<Candidate>,
    pub total_bytes: u64,
    /// Entries the walk could not access
    pub warnings: usize,
}

impl ScanReport {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.candidates.iter().map(|c| c.path.clone()).collect()
    }
}

/// Check if a path should be excluded based on directory name matching
pub fn should_exclude_path(path: &Path, excludes: &[String]) -> bool {
    if excludes.is_empty() {
        return false;
    }

    path.components().any(|component| {
        if let std::path::Component::Normal(name) = component {
            let dir_name = name.to_string_lossy();
            excludes.iter().any(|exclude| exclude == dir_name.as_ref())
        } else {
            false
        }
    })
}

/// Find the cleanable directories under `root`.
///
/// A directory classified as a project dependency is reported and not
/// descended into; everything under it belongs to that candidate. Paths
/// owned by the system purge routine are skipped entirely.
fn discover_candidates(root: &Path, options: &ScanOptions) -> (Vec<PathBuf>, usize) {
    let found = Arc::new(Mutex::new(HashSet::<PathBuf>::new()));
    let found_clone = Arc::clone(&found);
    let exclude = options.exclude.clone();
    let root_clone = root.to_path_buf();
    let verbose = options.verbose;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        // Ignore files say nothing about what is safe to delete
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if VCS_INTERNALS.contains(&name) {
                    return false;
                }
            }

            let mut found = found_clone.lock().unwrap();

            // Candidates are never descended into, so only direct children
            // of one can reach this point
            if path.parent().is_some_and(|parent| found.contains(parent)) {
                return false;
            }

            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            // Match names below the root only
            let relative = path.strip_prefix(&root_clone).unwrap_or(path);
            if should_exclude_path(relative, &exclude) {
                if verbose {
                    println!("DEBUG: Skipping excluded directory: {}", path.display());
                }
                return false;
            }

            match classify(path) {
                Classification::OsManaged => {
                    if verbose {
                        println!("DEBUG: Skipping OS-managed path: {}", path.display());
                    }
                    false
                }
                Classification::ProjectDependency => {
                    found.insert(path.to_path_buf());
                    true
                }
                Classification::Unclassified => true,
            }
        })
        .build();

    let mut candidates = Vec::new();
    let mut warnings = 0;

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: Failed to access entry: {}", err);
                warnings += 1;
                continue;
            }
        };

        let path = entry.path();
        if verbose {
            println!("DEBUG: Checking path: {}", path.display());
        }

        if found.lock().unwrap().contains(path) {
            if verbose {
                println!("DEBUG: Found cleanable directory: {}", path.display());
            }
            candidates.push(path.to_path_buf());
        }
    }

    (candidates, warnings)
}

/// Scan `roots` for cleanable directories and measure each one.
pub fn scan_roots(roots: &[PathBuf], options: &ScanOptions) -> ScanReport {
    let mut paths = Vec::new();
    let mut warnings = 0;

    for root in roots {
        let root = root.canonicalize().unwrap_or_else(|_| root.clone());
        if options.verbose {
            println!("DEBUG: Scanning directory {}", root.display());
        }
        let (found, root_warnings) = discover_candidates(&root, options);
        paths.extend(found);
        warnings += root_warnings;
    }

    // Overlapping roots find the same directories twice
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));

    let mut candidates: Vec<Candidate> = paths
        .into_par_iter()
        .map(|path| {
            let SizeReport { bytes, error } = logical_size(&path, None);
            Candidate {
                path,
                size: bytes,
                size_error: error,
            }
        })
        .collect();

    for candidate in &candidates {
        if let Some(err) = &candidate.size_error {
            eprintln!(
                "Warning: Could not fully measure {}: {}",
                candidate.path.display(),
                err
            );
            warnings += 1;
        }
    }

    candidates.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    let total_bytes = candidates.iter().map(|c| c.size).sum();

    ScanReport {
        candidates,
        total_bytes,
        warnings,
    }
}

/// Size of `root` without `sub`, and of `sub` on its own.
///
/// The two add up to the whole tree, and `sub` is only walked once.
pub fn separate_usage(root: &Path, sub: &Path) -> (SizeReport, SizeReport) {
    rayon::join(
        || logical_size(root, Some(sub)),
        || logical_size(sub, None),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn exclude_matches_whole_components() {
        let excludes = vec!["archive".to_string()];
        assert!(should_exclude_path(Path::new("/w/archive/app"), &excludes));
        assert!(!should_exclude_path(Path::new("/w/archives/app"), &excludes));
        assert!(!should_exclude_path(Path::new("/w/archive/app"), &[]));
    }

    #[test]
    fn finds_candidates_without_descending() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(app.join("node_modules/pkg/node_modules")).unwrap();
        fs::write(app.join("node_modules/pkg/index.js"), "x".repeat(10)).unwrap();
        fs::write(app.join("node_modules/pkg/node_modules/dep.js"), "y".repeat(5)).unwrap();
        fs::create_dir_all(app.join("src")).unwrap();
        fs::write(app.join("src/main.js"), "z").unwrap();

        let report = scan_roots(&[dir.path().to_path_buf()], &ScanOptions::default());
        assert_eq!(report.candidates.len(), 1);
        assert!(report.candidates[0].path.ends_with("app/node_modules"));
        assert_eq!(report.candidates[0].size, 15);
        assert_eq!(report.total_bytes, 15);
    }

    #[test]
    fn vcs_internals_and_excludes_are_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/build")).unwrap();
        fs::create_dir_all(dir.path().join("archive/dist")).unwrap();
        fs::create_dir_all(dir.path().join("live/dist")).unwrap();

        let options = ScanOptions {
            exclude: vec!["archive".to_string()],
            ..ScanOptions::default()
        };
        let report = scan_roots(&[dir.path().to_path_buf()], &options);
        let paths = report.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("live/dist"));
    }

    #[test]
    fn os_managed_locations_are_never_offered() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Library/Caches/tool/node_modules")).unwrap();
        fs::create_dir_all(dir.path().join(".Trash/old/target")).unwrap();
        fs::create_dir_all(dir.path().join("code/target")).unwrap();

        let report = scan_roots(&[dir.path().to_path_buf()], &ScanOptions::default());
        let paths = report.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("code/target"));
    }

    #[test]
    fn candidates_are_sorted_largest_first() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/build")).unwrap();
        fs::create_dir_all(dir.path().join("b/.venv")).unwrap();
        fs::write(dir.path().join("a/build/out.o"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("b/.venv/lib.so"), vec![0u8; 100]).unwrap();

        let report = scan_roots(&[dir.path().to_path_buf()], &ScanOptions::default());
        assert_eq!(report.candidates.len(), 2);
        assert!(report.candidates[0].path.ends_with("b/.venv"));
        assert_eq!(report.total_bytes, 110);
    }

    #[test]
    fn overlapping_roots_report_once() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app/dist")).unwrap();

        let roots = vec![dir.path().to_path_buf(), dir.path().join("app")];
        let report = scan_roots(&roots, &ScanOptions::default());
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn separate_usage_splits_the_tree() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Library")).unwrap();
        fs::write(dir.path().join("top"), vec![0u8; 30]).unwrap();
        fs::write(dir.path().join("Library/inner"), vec![0u8; 70]).unwrap();

        let (rest, sub) = separate_usage(dir.path(), &dir.path().join("Library"));
        assert_eq!(rest.bytes, 30);
        assert_eq!(sub.bytes, 70);
    }
}
