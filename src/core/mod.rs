//! Core business logic modules.

pub mod deletion;
pub mod grouper;
pub mod normalize;
pub mod resolver;
pub mod scanner;
pub mod scoring;
pub mod subtitles;
