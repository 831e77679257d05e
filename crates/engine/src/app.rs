//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::ports::{ClockPort, LlmPort, StoryStorePort};
use crate::stores::GenerationGate;
use crate::use_cases::{StoryLibrary, WritingUseCases};

/// Main application state.
///
/// Holds the use-case containers and the shared ports. The surrounding shell
/// constructs one `App` per session and drives it from its event loop.
pub struct App {
    pub use_cases: UseCases,
    pub llm: Arc<dyn LlmPort>,
    pub store: Arc<dyn StoryStorePort>,
    pub gate: GenerationGate,
}

/// Container for all use cases.
pub struct UseCases {
    pub writing: WritingUseCases,
    pub library: Arc<StoryLibrary>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(llm: Arc<dyn LlmPort>, store: Arc<dyn StoryStorePort>) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let gate = GenerationGate::new();

        let writing = WritingUseCases::new(
            llm.clone(),
            store.clone(),
            clock.clone(),
            gate.clone(),
        );
        let library = Arc::new(StoryLibrary::new(store.clone(), clock));

        Self {
            use_cases: UseCases { writing, library },
            llm,
            store,
            gate,
        }
    }
}
