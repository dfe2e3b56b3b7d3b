//! CLI command implementations.
//!
//! Each command returns `Ok(true)` on full success and `Ok(false)` when
//! it completed but found problems; the caller maps that to the process
//! exit code.

pub mod clean;
pub mod dedup;
pub mod filenames;
pub mod normalize;
pub mod organize;
pub mod verify;

use crate::utils::fs as fsutil;
use crate::Result;
use std::path::{Path, PathBuf};

/// Validate every target up front so a typo fails fast instead of
/// halfway through a multi-directory run.
pub fn validate_directories(directories: &[PathBuf]) -> Result<Vec<PathBuf>> {
    for dir in directories {
        fsutil::ensure_directory(dir)?;
    }
    Ok(directories.to_vec())
}

/// Resolve a path for display, falling back to the raw path when
/// canonicalization fails.
pub fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
