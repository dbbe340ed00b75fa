//! Posting sink adapters.

pub mod poster;

pub use poster::XPoster;
