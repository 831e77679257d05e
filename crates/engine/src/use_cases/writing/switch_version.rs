//! Switch the displayed version of a block.

use std::sync::Arc;

use fabula_domain::{BlockId, DomainError, Story, StoryId};

use crate::infrastructure::ports::{ClockPort, StoryStorePort};

use super::helpers::{load_collection, persist_snapshot};
use super::WritingError;

/// Flip which version of a block is canonical.
///
/// A pure pointer update: no gateway call and no gate, so it is permitted
/// even while a generation is in flight. Out-of-range indices clamp to the
/// nearest bound, and repeating the same switch is a no-op.
pub struct SwitchVersion {
    store: Arc<dyn StoryStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl SwitchVersion {
    pub fn new(store: Arc<dyn StoryStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        story_id: StoryId,
        block_id: BlockId,
        version_index: usize,
    ) -> Result<Story, WritingError> {
        let (mut stories, index) = load_collection(self.store.as_ref(), story_id).await?;
        let mut story = stories[index].clone();

        story
            .set_active_version(block_id, version_index, self.clock.now())
            .map_err(|e| match e {
                DomainError::NotFound { .. } => WritingError::BlockNotFound(block_id),
                other => WritingError::Domain(other),
            })?;

        persist_snapshot(self.store.as_ref(), &mut stories, index, &story).await?;
        tracing::debug!(
            story_id = %story_id,
            block_id = %block_id,
            version = version_index,
            "switched active version"
        );
        Ok(story)
    }
}
