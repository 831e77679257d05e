//! Test doubles for use-case tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use fabula_domain::Story;

use crate::infrastructure::ports::{
    LlmError, LlmPort, LlmRequest, LlmResponse, StoreError, StoryStorePort,
};

/// Gateway fake that replays a queued script of replies and records every
/// request it receives, so tests can assert on the assembled prompts.
#[derive(Default)]
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn reply(self, text: &str) -> Self {
        self.script
            .lock()
            .expect("script lock")
            .push_back(Ok(text.to_string()));
        self
    }

    /// Queue a failed request.
    pub fn fail(self, message: &str) -> Self {
        self.script
            .lock()
            .expect("script lock")
            .push_back(Err(LlmError::RequestFailed(message.to_string())));
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::RequestFailed("script exhausted".to_string())))
            .map(|text| LlmResponse { text })
    }
}

/// In-memory whole-collection store with a save counter.
#[derive(Default)]
pub struct MemoryStoryStore {
    stories: Mutex<Vec<Story>>,
    saves: Mutex<usize>,
}

impl MemoryStoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given collection.
    pub fn with_stories(stories: Vec<Story>) -> Self {
        Self {
            stories: Mutex::new(stories),
            saves: Mutex::new(0),
        }
    }

    /// Number of save calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().expect("saves lock")
    }

    /// Current stored collection.
    pub fn snapshot(&self) -> Vec<Story> {
        self.stories.lock().expect("stories lock").clone()
    }
}

#[async_trait]
impl StoryStorePort for MemoryStoryStore {
    async fn load(&self) -> Result<Vec<Story>, StoreError> {
        Ok(self.stories.lock().expect("stories lock").clone())
    }

    async fn save(&self, stories: &[Story]) -> Result<(), StoreError> {
        *self.stories.lock().expect("stories lock") = stories.to_vec();
        *self.saves.lock().expect("saves lock") += 1;
        Ok(())
    }
}
