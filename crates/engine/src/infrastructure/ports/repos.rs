//! Persistence port for the story collection.

use async_trait::async_trait;
use fabula_domain::Story;

use super::error::StoreError;

/// Whole-collection blob store for stories.
///
/// The collection is read and written as one unit under a fixed namespace;
/// last write wins. There are no partial updates and no schema migration
/// guarantees - a malformed blob surfaces as a serialization error for the
/// caller to tolerate or reject.
#[async_trait]
pub trait StoryStorePort: Send + Sync {
    /// Load the full story collection. A missing blob yields an empty list.
    async fn load(&self) -> Result<Vec<Story>, StoreError>;

    /// Replace the full story collection.
    async fn save(&self, stories: &[Story]) -> Result<(), StoreError>;
}
