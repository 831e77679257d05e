//! User story orchestration.

pub mod generation;
pub mod library;
pub mod writing;

pub use library::{LibraryError, StoryLibrary};
pub use writing::{
    EditBlock, GenerationResult, RegenerateBlock, Submit, SwitchVersion, WritingError,
    WritingOutcome, WritingUseCases,
};
