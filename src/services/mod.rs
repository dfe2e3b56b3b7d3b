//! External service integrations.

pub mod mediainfo;
