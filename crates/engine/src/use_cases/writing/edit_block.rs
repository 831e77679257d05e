//! Edit use case: rewrite a past instruction and regenerate downstream.

use std::sync::Arc;

use fabula_domain::{BlockId, GenerationAction, StoryId};

use crate::infrastructure::ports::{ClockPort, LlmPort, StoryStorePort};
use crate::stores::GenerationGate;
use crate::use_cases::generation::prompt_builder;

use super::helpers::{load_collection, persist_snapshot, request_continuation};
use super::{WritingError, WritingOutcome};

/// Rewrite a past user instruction.
///
/// Everything authored after the edited block was conditioned on the old
/// instruction, so the sequence is truncated to the edit point and a fresh
/// continuation is requested. The replaced text stays in the block's version
/// history; the discarded blocks do not.
pub struct EditBlock {
    llm: Arc<dyn LlmPort>,
    store: Arc<dyn StoryStorePort>,
    clock: Arc<dyn ClockPort>,
    gate: GenerationGate,
}

impl EditBlock {
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
        edited_text: &str,
        action: GenerationAction,
    ) -> Result<WritingOutcome, WritingError> {
        let _slot = self.gate.acquire(story_id)?;

        let (mut stories, index) = load_collection(self.store.as_ref(), story_id).await?;
        let mut story = stories[index].clone();

        let target = story
            .block(block_id)
            .ok_or(WritingError::BlockNotFound(block_id))?;
        if !target.author().is_user() {
            return Err(WritingError::NotAUserBlock(block_id));
        }

        let trimmed = edited_text.trim();
        let prompt = if trimmed.is_empty() {
            prompt_builder::CONTINUE_SENTINEL.to_string()
        } else {
            trimmed.to_string()
        };

        story.edit_user_block(block_id, prompt.clone(), self.clock.now())?;
        persist_snapshot(self.store.as_ref(), &mut stories, index, &story).await?;

        let request = prompt_builder::build_request(&story, story.blocks(), action, &prompt);
        tracing::info!(
            story_id = %story_id,
            block_id = %block_id,
            action = %action,
            truncated_to = story.blocks().len(),
            "edited instruction, regenerating downstream"
        );

        request_continuation(
            self.llm.as_ref(),
            self.store.as_ref(),
            self.clock.as_ref(),
            &mut stories,
            index,
            story,
            request,
        )
        .await
    }
}
