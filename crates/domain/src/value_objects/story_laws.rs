//! The fixed narrative metadata a story is written under.

use serde::{Deserialize, Serialize};

/// Relationship between a story and an existing work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "work", rename_all = "snake_case")]
pub enum Reference {
    /// Fully original material.
    #[default]
    None,
    /// Set inside an existing work; its official facts are binding.
    BasedOn(String),
    /// Borrows only the aesthetic of an existing work, not its chronology.
    InspiredBy(String),
}

impl Reference {
    /// Name of the referenced work, if any.
    pub fn work(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::BasedOn(work) | Self::InspiredBy(work) => Some(work),
        }
    }
}

/// The "laws of the story": era, universe, tone, and reference work.
///
/// Supplied to the generator as binding context; free text throughout, with
/// empty fields standing for "writer left it open".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryLaws {
    /// Era or point in time the narrative is set in.
    pub temporal_context: String,
    /// Rules of the fictional universe.
    pub universe: String,
    /// Dominant tone of the narration.
    pub primary_tone: String,
    /// Supporting tones, in priority order.
    pub secondary_tones: Vec<String>,
    /// Relationship to an existing work.
    pub reference: Reference,
}
