//! Reclaim - Dependency and Build Output Cleaner
//!
//! Reclaim finds directories that are safe to delete because they are rebuilt
//! from a manifest or build (node_modules, target, .venv, DerivedData, ...),
//! reports how much space they use, and removes the ones the user selects.
//!
//! ## Architecture
//!
//! - `classify`: allowlist of dependency directory names, minus anything
//!   under a location the system cache/log purge already owns
//! - `size`: logical size of a tree, optionally leaving out one subtree
//! - `delete`: deepest-first batch deletion with an atomic progress counter
//!   and partial-failure reporting
//! - `scanner`: walks user roots and measures the candidates it finds

pub mod classify;
pub mod config;
pub mod delete;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod size;

// Re-export commonly used items
pub use classify::{
    classify, is_cleanable_dir, is_os_managed, CandidatePath, Classification,
    OS_MANAGED_MARKERS, PROJECT_DEPENDENCY_DIRS,
};
pub use config::Config;
pub use delete::{delete_path, delete_paths, DeletionResult};
pub use error::{AggregateError, EngineError};
pub use progress::ProgressCounter;
pub use scanner::{scan_roots, separate_usage, Candidate, ScanOptions, ScanReport};
pub use size::{logical_size, SizeReport};
