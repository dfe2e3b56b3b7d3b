//! Candidate directory and duplicate group models.

use crate::models::Tag;
use std::path::PathBuf;

/// One line of a cached directory-contents preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLine {
    /// A top-level file.
    File(String),
    /// Roll-up count of top-level files not listed.
    MoreFiles(usize),
    /// A top-level subdirectory.
    Dir(String),
    /// A file one level down.
    SubFile(String),
    /// A subdirectory one level down.
    SubDir(String),
    /// Roll-up count of child items not listed.
    MoreSubItems(usize),
    /// Listing failed for this entry.
    Error(String),
}

/// One candidate directory found under a scan root.
///
/// Created empty during grouping (name, path and source root only) and
/// fully populated exactly once by the background scanner. The relative
/// size-score component is patched into `video_score` by the resolver
/// just before display.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Display name as found on disk.
    pub name: String,
    /// Absolute path.
    pub path: PathBuf,
    /// The input root this directory was found under.
    pub source_root: PathBuf,
    /// Total size in bytes (recursive).
    pub size_bytes: u64,
    /// Total size in megabytes.
    pub size_mb: f64,
    /// Size scaled by the encoding-efficiency multiplier.
    pub adjusted_size_mb: f64,
    /// Detected quality tags, in detection priority order.
    pub tags: Vec<Tag>,
    /// Tag-score sum, later augmented with the group-relative size score.
    pub video_score: u32,
    /// Formatted summary of discovered subtitle languages, or empty.
    pub subtitle_summary: String,
    /// Capped directory listing for display.
    pub preview: Vec<ContentLine>,
}

impl DirectoryEntry {
    /// Create an unscanned entry.
    pub fn new(name: String, path: PathBuf, source_root: PathBuf) -> Self {
        Self {
            name,
            path,
            source_root,
            size_bytes: 0,
            size_mb: 0.0,
            adjusted_size_mb: 0.0,
            tags: Vec::new(),
            video_score: 0,
            subtitle_summary: String::new(),
            preview: Vec::new(),
        }
    }
}

/// A detected duplicate set: at least two directories inferred to be the
/// same title+year release. Membership is fixed after creation; only
/// fields of the contained entries mutate.
#[derive(Debug)]
pub struct DuplicateGroup {
    /// Display prefix ("Title Year"), casing from the first member found.
    pub key: String,
    /// Group members. Always two or more.
    pub members: Vec<DirectoryEntry>,
}

impl DuplicateGroup {
    /// Smallest and largest member sizes in bytes, used for display
    /// coloring only.
    pub fn size_bounds(&self) -> (u64, u64) {
        let min = self.members.iter().map(|m| m.size_bytes).min().unwrap_or(0);
        let max = self.members.iter().map(|m| m.size_bytes).max().unwrap_or(0);
        (min, max)
    }
}
