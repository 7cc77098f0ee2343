//! Classification of candidate directories as safe to bulk-delete.
//!
//! A directory is offered for removal only when its name is on a curated
//! allowlist of dependency and build-output directories, and it does not live
//! under a location that the system cache/log purge already empties.
//! Classification looks at the path text only; it never touches the filesystem.

use std::path::{Path, PathBuf};

/// Directory names that are recreatable from a manifest, lockfile or build.
pub const PROJECT_DEPENDENCY_DIRS: &[&str] = &[
    // JavaScript/Node.js
    "node_modules",
    "bower_components",
    ".yarn",
    ".pnpm-store",
    // Python
    "venv",
    ".venv",
    "virtualenv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".tox",
    ".eggs",
    "htmlcov",
    ".ipynb_checkpoints",
    // Ruby
    "vendor",
    ".bundle",
    // Java/Kotlin/Scala
    ".gradle",
    "out",
    // General build outputs
    "build",
    "dist",
    "target",
    ".next",
    ".nuxt",
    ".output",
    ".parcel-cache",
    ".turbo",
    ".vite",
    ".nx",
    "coverage",
    ".coverage",
    ".nyc_output",
    // Frontend frameworks
    ".angular",
    ".svelte-kit",
    ".astro",
    ".docusaurus",
    // Apple toolchains
    "DerivedData",
    "Pods",
    ".build",
    "Carthage",
    ".dart_tool",
    // Infrastructure as code
    ".terraform",
];

/// Locations emptied by the separate cache/log purge routine.
///
/// Matched as substrings of the full path, not as path prefixes. A user
/// directory whose name happens to contain one of these markers is therefore
/// treated as OS-managed too.
pub const OS_MANAGED_MARKERS: &[&str] = &[
    "/Library/Caches/",
    "/Library/Logs/",
    "/Library/Saved Application State/",
    "/.Trash/",
    "/Library/DiagnosticReports/",
];

/// Why a path is or is not offered for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Dependency or build-output directory, safe to bulk-delete.
    ProjectDependency,
    /// Owned by the system purge routine; never offered here.
    OsManaged,
    Unclassified,
}

impl Classification {
    pub fn is_safe(self) -> bool {
        self == Classification::ProjectDependency
    }
}

/// A path together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    pub path: PathBuf,
    pub base_name: String,
    pub classification: Classification,
}

impl CandidatePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_name = base_name(&path);
        let classification = classify(&path);
        CandidatePath {
            path,
            base_name,
            classification,
        }
    }
}

/// Last component of `path`, or an empty string for roots and `..`.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Classify a path. An OS-managed match wins over an allowlisted name.
pub fn classify(path: &Path) -> Classification {
    if path.as_os_str().is_empty() {
        return Classification::Unclassified;
    }

    if is_os_managed(path) {
        return Classification::OsManaged;
    }

    let name = base_name(path);
    if PROJECT_DEPENDENCY_DIRS.contains(&name.as_str()) {
        Classification::ProjectDependency
    } else {
        Classification::Unclassified
    }
}

/// True when `path` is safe to offer for bulk deletion.
pub fn is_cleanable_dir(path: &Path) -> bool {
    classify(path).is_safe()
}

/// True when `path` contains one of the [`OS_MANAGED_MARKERS`].
pub fn is_os_managed(path: &Path) -> bool {
    let text = path.to_string_lossy();
    OS_MANAGED_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}
