//! Value objects for the story domain.

mod generation;
mod story_laws;
mod version_log;

pub use generation::GenerationAction;
pub use story_laws::{Reference, StoryLaws};
pub use version_log::VersionLog;
