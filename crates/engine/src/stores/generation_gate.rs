//! Single-flight gate for generation requests.

use std::sync::{Arc, Mutex};

use fabula_domain::StoryId;

/// The gate is held by another generation request.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Generation already in flight for story {occupant}")]
pub struct GateBusy {
    /// Story whose generation currently holds the gate.
    pub occupant: StoryId,
}

/// In-process gate allowing one in-flight generation per session.
///
/// Submit/Edit/Regenerate acquire the gate for their story before touching
/// the block sequence; a second request while the slot is taken is rejected
/// with [`GateBusy`], never queued. Version switching does not go through
/// the gate. The slot releases when the returned [`GenerationSlot`] drops,
/// which covers the success and failure paths alike.
#[derive(Clone, Default)]
pub struct GenerationGate {
    active: Arc<Mutex<Option<StoryId>>>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for a story.
    pub fn acquire(&self, story_id: StoryId) -> Result<GenerationSlot, GateBusy> {
        let mut active = self.lock();
        if let Some(occupant) = *active {
            return Err(GateBusy { occupant });
        }
        *active = Some(story_id);
        Ok(GenerationSlot {
            active: Arc::clone(&self.active),
        })
    }

    /// Story currently awaiting generation, if any.
    pub fn current(&self) -> Option<StoryId> {
        *self.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.current().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoryId>> {
        // The slot stays coherent across panics; recover from poisoning.
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// RAII claim on the generation gate; dropping it frees the slot.
#[derive(Debug)]
pub struct GenerationSlot {
    active: Arc<Mutex<Option<StoryId>>>,
}

impl Drop for GenerationSlot {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        *active = None;
    }
}
