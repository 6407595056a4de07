//! finder-projection
//!
//! Turns finder configuration and caller queries into backend requests and
//! maps raw hits back into typed entities. See `finder` for the operations
//! and `request` for how request fields are merged.

pub mod finder;
pub mod request;
mod response;

pub use finder::{ProjectionFinder, ScrollSettings, DEFAULT_KEEP_ALIVE, DEFAULT_PAGE_SIZE};
