//! Entities owned by the story aggregate.

mod block;
mod character;

pub use block::{last_user_text, AuthorKind, StoryBlock};
pub use character::Character;
