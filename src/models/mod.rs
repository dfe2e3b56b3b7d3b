//! Data models.

pub mod entry;
pub mod tag;

pub use entry::{ContentLine, DirectoryEntry, DuplicateGroup};
pub use tag::Tag;
