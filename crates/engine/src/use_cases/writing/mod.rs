//! Writing use cases: the edit/regenerate turn protocol.
//!
//! One story advances through alternating user and AI blocks:
//! 1. The writer submits an instruction (Submit) or rewrites a past one
//!    (EditBlock, discarding everything downstream)
//! 2. The context assembler serializes the resulting sequence
//! 3. The generation gateway produces the next passage, appended as a new
//!    block (Submit/Edit) or as a new version on an existing AI block
//!    (RegenerateBlock)
//! 4. The snapshot is persisted; SwitchVersion flips between a block's
//!    versions without touching the gateway.
//!
//! Submit, EditBlock and RegenerateBlock hold the session's generation gate
//! across the gateway call; a second mutation during that window is rejected
//! as busy, never queued.

use std::sync::Arc;

use fabula_domain::{BlockId, DomainError, Story, StoryId};

use crate::infrastructure::ports::{ClockPort, LlmPort, StoreError, StoryStorePort};
use crate::stores::{GateBusy, GenerationGate};

mod edit_block;
mod helpers;
mod regenerate_block;
mod submit;
mod switch_version;

pub use edit_block::EditBlock;
pub use regenerate_block::RegenerateBlock;
pub use submit::Submit;
pub use switch_version::SwitchVersion;


/// Result of a generation-backed writing operation.
#[derive(Debug)]
pub struct WritingOutcome {
    /// The story snapshot after the operation; already persisted.
    pub story: Story,
    pub result: GenerationResult,
}

/// Whether the gateway produced text for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationResult {
    /// New AI text was appended (a new block, or a new version on the
    /// regenerated block).
    Completed { block_id: BlockId },
    /// The gateway produced nothing. The story keeps any pre-call mutation
    /// (a submitted or edited user turn is never lost) and the writer may
    /// try again.
    NoText,
}

#[derive(Debug, thiserror::Error)]
pub enum WritingError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Generation already in flight for story {0}")]
    Busy(StoryId),
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("Block {0} is not user-authored")]
    NotAUserBlock(BlockId),
    #[error("Block {0} is not AI-authored")]
    NotAnAiBlock(BlockId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<GateBusy> for WritingError {
    fn from(err: GateBusy) -> Self {
        Self::Busy(err.occupant)
    }
}

/// Container for writing use cases.
pub struct WritingUseCases {
    pub submit: Arc<Submit>,
    pub edit_block: Arc<EditBlock>,
    pub regenerate_block: Arc<RegenerateBlock>,
    pub switch_version: Arc<SwitchVersion>,
}

impl WritingUseCases {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        store: Arc<dyn StoryStorePort>,
        clock: Arc<dyn ClockPort>,
        gate: GenerationGate,
    ) -> Self {
        Self {
            submit: Arc::new(Submit::new(
                llm.clone(),
                store.clone(),
                clock.clone(),
                gate.clone(),
            )),
            edit_block: Arc::new(EditBlock::new(
                llm.clone(),
                store.clone(),
                clock.clone(),
                gate.clone(),
            )),
            regenerate_block: Arc::new(RegenerateBlock::new(
                llm,
                store.clone(),
                clock.clone(),
                gate,
            )),
            switch_version: Arc::new(SwitchVersion::new(store, clock)),
        }
    }
}
