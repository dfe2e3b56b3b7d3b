//! TidyFlix Library
//!
//! A library for tidying movie collections: duplicate detection with
//! quality scoring, directory name normalization and file cleanup.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
