//! Regenerate use case: an alternative text for one AI turn, in place.

use std::sync::Arc;

use fabula_domain::{last_user_text, BlockId, GenerationAction, StoryId};

use crate::infrastructure::ports::{ClockPort, LlmPort, StoryStorePort};
use crate::stores::GenerationGate;
use crate::use_cases::generation::prompt_builder;

use super::helpers::{load_collection, persist_snapshot};
use super::{GenerationResult, WritingError, WritingOutcome};

/// Regenerate an AI block without disturbing the rest of the sequence.
///
/// The prompt is rebuilt from the blocks strictly before the target (the
/// target's own versions are not part of it), driven by the most recent user
/// instruction in that prefix. The result is appended as a new version on
/// the target block - not a new block - and later blocks stay as they are.
/// If those later blocks referenced the replaced text they become
/// narratively stale; the engine does not detect or flag that.
pub struct RegenerateBlock {
    llm: Arc<dyn LlmPort>,
    store: Arc<dyn StoryStorePort>,
    clock: Arc<dyn ClockPort>,
    gate: GenerationGate,
}

impl RegenerateBlock {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        store: Arc<dyn StoryStorePort>,
        clock: Arc<dyn ClockPort>,
        gate: GenerationGate,
    ) -> Self {
        Self {
            llm,
            store,
            clock,
            gate,
        }
    }

    pub async fn execute(
        &self,
        story_id: StoryId,
        block_id: BlockId,
    ) -> Result<WritingOutcome, WritingError> {
        let _slot = self.gate.acquire(story_id)?;

        let (mut stories, index) = load_collection(self.store.as_ref(), story_id).await?;
        let mut story = stories[index].clone();

        let position = story
            .block_position(block_id)
            .ok_or(WritingError::BlockNotFound(block_id))?;
        if !story.blocks()[position].author().is_ai() {
            return Err(WritingError::NotAnAiBlock(block_id));
        }

        let context = &story.blocks()[..position];
        let prompt = last_user_text(context)
            .unwrap_or(prompt_builder::REGENERATE_FALLBACK_PROMPT)
            .to_string();
        let request =
            prompt_builder::build_request(&story, context, GenerationAction::Continue, &prompt);
        tracing::info!(
            story_id = %story_id,
            block_id = %block_id,
            context_blocks = position,
            "regenerating block in place"
        );

        match self.llm.generate(request).await {
            Ok(response) if !response.text.is_empty() => {
                story.regenerate_ai_block(block_id, response.text, self.clock.now())?;
                persist_snapshot(self.store.as_ref(), &mut stories, index, &story).await?;
                tracing::info!(story_id = %story_id, block_id = %block_id, "appended regenerated version");
                Ok(WritingOutcome {
                    story,
                    result: GenerationResult::Completed { block_id },
                })
            }
            Ok(_) => {
                tracing::warn!(story_id = %story_id, "generator returned empty text");
                Ok(WritingOutcome {
                    story,
                    result: GenerationResult::NoText,
                })
            }
            Err(e) => {
                tracing::warn!(story_id = %story_id, error = %e, "generation request failed");
                Ok(WritingOutcome {
                    story,
                    result: GenerationResult::NoText,
                })
            }
        }
    }
}
