//! Shared utilities.

pub mod fs;
pub mod ui;
