//! Submit use case: one new turn of the narrative exchange.

use std::sync::Arc;

use fabula_domain::{GenerationAction, StoryId};

use crate::infrastructure::ports::{ClockPort, LlmPort, StoryStorePort};
use crate::stores::GenerationGate;
use crate::use_cases::generation::prompt_builder;

use super::helpers::{load_collection, persist_snapshot, request_continuation};
use super::{WritingError, WritingOutcome};

/// Submit a new instruction (or an empty "keep going") and request the next
/// passage.
pub struct Submit {
    llm: Arc<dyn LlmPort>,
    store: Arc<dyn StoryStorePort>,
    clock: Arc<dyn ClockPort>,
    gate: GenerationGate,
}

impl Submit {
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

    /// Run one turn.
    ///
    /// Non-empty input becomes a new user block before the gateway call;
    /// empty input sends the "continue" sentinel without creating a block.
    /// The extended sequence is persisted before the gateway is involved, so
    /// a failed generation leaves a dangling user turn the writer can
    /// resubmit against - never a lost instruction.
    pub async fn execute(
        &self,
        story_id: StoryId,
        action: GenerationAction,
        input: &str,
    ) -> Result<WritingOutcome, WritingError> {
        let _slot = self.gate.acquire(story_id)?;

        let (mut stories, index) = load_collection(self.store.as_ref(), story_id).await?;
        let mut story = stories[index].clone();

        let trimmed = input.trim();
        let prompt = if trimmed.is_empty() {
            prompt_builder::CONTINUE_SENTINEL.to_string()
        } else {
            trimmed.to_string()
        };

        if !trimmed.is_empty() {
            story.append_user_block(prompt.clone(), self.clock.now());
        }
        persist_snapshot(self.store.as_ref(), &mut stories, index, &story).await?;

        let request = prompt_builder::build_request(&story, story.blocks(), action, &prompt);
        tracing::info!(
            story_id = %story_id,
            action = %action,
            blocks = story.blocks().len(),
            "requesting narrative continuation"
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
