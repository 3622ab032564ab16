//! Shared helpers: dates, hashing, MIME types.

pub mod date;
pub mod hash;
pub mod mime;
