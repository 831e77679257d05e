//! Shared plumbing for the writing use cases.

use fabula_domain::{Story, StoryId};

use crate::infrastructure::ports::{ClockPort, LlmPort, LlmRequest, StoryStorePort};

use super::{GenerationResult, WritingError, WritingOutcome};

/// Load the whole collection and locate the target story.
pub(super) async fn load_collection(
    store: &dyn StoryStorePort,
    story_id: StoryId,
) -> Result<(Vec<Story>, usize), WritingError> {
    let stories = store.load().await?;
    let index = stories
        .iter()
        .position(|s| s.id() == story_id)
        .ok_or(WritingError::StoryNotFound(story_id))?;
    Ok((stories, index))
}

/// Replace the story in the collection and persist the whole snapshot.
pub(super) async fn persist_snapshot(
    store: &dyn StoryStorePort,
    stories: &mut [Story],
    index: usize,
    story: &Story,
) -> Result<(), WritingError> {
    stories[index] = story.clone();
    store.save(stories).await?;
    Ok(())
}

/// Call the gateway and, on text, append it as a new AI block.
///
/// Failures and empty responses resolve to [`GenerationResult::NoText`]
/// without persisting anything further: the pre-call snapshot (with the
/// writer's turn already saved) stays the source of truth.
pub(super) async fn request_continuation(
    llm: &dyn LlmPort,
    store: &dyn StoryStorePort,
    clock: &dyn ClockPort,
    stories: &mut [Story],
    index: usize,
    mut story: Story,
    request: LlmRequest,
) -> Result<WritingOutcome, WritingError> {
    match llm.generate(request).await {
        Ok(response) if !response.text.is_empty() => {
            let block_id = story.append_ai_block(response.text, clock.now());
            persist_snapshot(store, stories, index, &story).await?;
            tracing::info!(story_id = %story.id(), block_id = %block_id, "appended generated block");
            Ok(WritingOutcome {
                story,
                result: GenerationResult::Completed { block_id },
            })
        }
        Ok(_) => {
            tracing::warn!(story_id = %story.id(), "generator returned empty text");
            Ok(WritingOutcome {
                story,
                result: GenerationResult::NoText,
            })
        }
        Err(e) => {
            tracing::warn!(story_id = %story.id(), error = %e, "generation request failed");
            Ok(WritingOutcome {
                story,
                result: GenerationResult::NoText,
            })
        }
    }
}
