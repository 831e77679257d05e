//! Fabula domain model.
//!
//! The story aggregate and its invariants: an append/truncate-only block
//! sequence where every block carries an append-only version log with a
//! single active pointer. All mutations take injected time so the model
//! stays deterministic under test; nothing here performs I/O.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Story, DEFAULT_PRIMARY_TONE, DEFAULT_UNIVERSE, DRAFT_TAG};
pub use entities::{last_user_text, AuthorKind, Character, StoryBlock};
pub use error::DomainError;
pub use ids::{BlockId, CharacterId, StoryId};
pub use value_objects::{GenerationAction, Reference, StoryLaws, VersionLog};
