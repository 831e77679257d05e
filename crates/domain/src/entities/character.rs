//! Character sheets owned by a story.

use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// A character sheet: free-text facets the generator narrates from.
///
/// Owned exclusively by its story; created and removed by the writer. All
/// facets are free text and may be empty (the generator fills gaps as it
/// narrates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    id: CharacterId,
    name: String,
    appearance: String,
    personality: String,
    dynamics: String,
    relations: String,
    image: Option<String>,
}

impl Character {
    /// Create a character with the given display name and empty facets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn appearance(&self) -> &str {
        &self.appearance
    }

    #[inline]
    pub fn personality(&self) -> &str {
        &self.personality
    }

    #[inline]
    pub fn dynamics(&self) -> &str {
        &self.dynamics
    }

    #[inline]
    pub fn relations(&self) -> &str {
        &self.relations
    }

    /// Reference to the character's portrait, if one was attached.
    #[inline]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_appearance(&mut self, appearance: impl Into<String>) {
        self.appearance = appearance.into();
    }

    pub fn set_personality(&mut self, personality: impl Into<String>) {
        self.personality = personality.into();
    }

    pub fn set_dynamics(&mut self, dynamics: impl Into<String>) {
        self.dynamics = dynamics.into();
    }

    pub fn set_relations(&mut self, relations: impl Into<String>) {
        self.relations = relations.into();
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
    }

    // Builder-style helpers for construction sites.

    pub fn with_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.appearance = appearance.into();
        self
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_dynamics(mut self, dynamics: impl Into<String>) -> Self {
        self.dynamics = dynamics.into();
        self
    }

    pub fn with_relations(mut self, relations: impl Into<String>) -> Self {
        self.relations = relations.into();
        self
    }
}
