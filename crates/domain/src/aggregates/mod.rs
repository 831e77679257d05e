//! Aggregate roots.

mod story;

pub use story::{Story, DEFAULT_PRIMARY_TONE, DEFAULT_UNIVERSE, DRAFT_TAG};
