//! Story library: collection-level CRUD and bible edits.
//!
//! Everything here is synchronous bookkeeping over the whole-collection
//! store; none of it touches the generation gateway or the gate.

use std::sync::Arc;

use fabula_domain::{
    Character, CharacterId, DomainError, Story, StoryId, StoryLaws,
};

use crate::infrastructure::ports::{ClockPort, StoreError, StoryStorePort};

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Collection-level operations on the story library.
pub struct StoryLibrary {
    store: Arc<dyn StoryStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl StoryLibrary {
    pub fn new(store: Arc<dyn StoryStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Create a fresh draft story and prepend it to the collection.
    pub async fn create(&self) -> Result<Story, LibraryError> {
        let story = Story::new(self.clock.now());
        let mut stories = self.store.load().await?;
        stories.insert(0, story.clone());
        self.store.save(&stories).await?;
        tracing::info!(story_id = %story.id(), "created story");
        Ok(story)
    }

    /// The whole collection in stored order (newest creations first).
    pub async fn list(&self) -> Result<Vec<Story>, LibraryError> {
        Ok(self.store.load().await?)
    }

    pub async fn get(&self, story_id: StoryId) -> Result<Story, LibraryError> {
        let stories = self.store.load().await?;
        stories
            .into_iter()
            .find(|s| s.id() == story_id)
            .ok_or(LibraryError::StoryNotFound(story_id))
    }

    pub async fn rename(&self, story_id: StoryId, title: &str) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.set_title(title, now);
            Ok(())
        })
        .await
    }

    pub async fn set_rules(&self, story_id: StoryId, rules: &str) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.set_rules(rules, now);
            Ok(())
        })
        .await
    }

    pub async fn set_key_events(
        &self,
        story_id: StoryId,
        key_events: &str,
    ) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.set_key_events(key_events, now);
            Ok(())
        })
        .await
    }

    pub async fn set_laws(&self, story_id: StoryId, laws: StoryLaws) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.set_laws(laws, now);
            Ok(())
        })
        .await
    }

    pub async fn set_tags(
        &self,
        story_id: StoryId,
        tags: Vec<String>,
    ) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.set_tags(tags, now);
            Ok(())
        })
        .await
    }

    /// Add a character to the roster and return its id.
    pub async fn add_character(
        &self,
        story_id: StoryId,
        name: &str,
    ) -> Result<(Story, CharacterId), LibraryError> {
        let character = Character::new(name);
        let character_id = character.id();
        let story = self
            .mutate(story_id, |story, now| {
                story.add_character(character, now);
                Ok(())
            })
            .await?;
        Ok((story, character_id))
    }

    /// Apply an update to one character sheet.
    pub async fn update_character(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
        update: impl FnOnce(&mut Character),
    ) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.update_character(character_id, update, now)
        })
        .await
    }

    pub async fn remove_character(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
    ) -> Result<Story, LibraryError> {
        self.mutate(story_id, |story, now| {
            story.remove_character(character_id, now)
        })
        .await
    }

    /// Load, mutate, and persist one story as a whole snapshot.
    async fn mutate(
        &self,
        story_id: StoryId,
        apply: impl FnOnce(&mut Story, chrono::DateTime<chrono::Utc>) -> Result<(), DomainError>,
    ) -> Result<Story, LibraryError> {
        let mut stories = self.store.load().await?;
        let index = stories
            .iter()
            .position(|s| s.id() == story_id)
            .ok_or(LibraryError::StoryNotFound(story_id))?;

        let mut story = stories[index].clone();
        apply(&mut story, self.clock.now())?;
        stories[index] = story.clone();
        self.store.save(&stories).await?;
        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fabula_domain::DRAFT_TAG;

    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::test_fixtures::MemoryStoryStore;

    fn library() -> (Arc<MemoryStoryStore>, StoryLibrary) {
        let store = Arc::new(MemoryStoryStore::new());
        let clock = Arc::new(FixedClock(
            Utc.timestamp_opt(1_000, 0).single().unwrap(),
        ));
        let library = StoryLibrary::new(store.clone(), clock);
        (store, library)
    }

    #[tokio::test]
    async fn create_prepends_a_draft() {
        let (store, library) = library();
        let first = library.create().await.unwrap();
        let second = library.create().await.unwrap();

        let listed = library.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), second.id());
        assert_eq!(listed[1].id(), first.id());
        assert_eq!(listed[0].tags(), &[DRAFT_TAG.to_string()]);
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn bible_edits_persist_through_the_store() {
        let (store, library) = library();
        let story = library.create().await.unwrap();

        library.rename(story.id(), "A Floresta").await.unwrap();
        library
            .set_rules(story.id(), "Sem redenção.")
            .await
            .unwrap();

        let reloaded = library.get(story.id()).await.unwrap();
        assert_eq!(reloaded.title(), "A Floresta");
        assert_eq!(reloaded.rules(), "Sem redenção.");
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn character_roster_round_trips() {
        let (_store, library) = library();
        let story = library.create().await.unwrap();

        let (_, character_id) = library
            .add_character(story.id(), "Helena")
            .await
            .unwrap();
        library
            .update_character(story.id(), character_id, |c| {
                c.set_personality("obstinada");
            })
            .await
            .unwrap();

        let reloaded = library.get(story.id()).await.unwrap();
        assert_eq!(reloaded.characters().len(), 1);
        assert_eq!(reloaded.characters()[0].personality(), "obstinada");

        library
            .remove_character(story.id(), character_id)
            .await
            .unwrap();
        assert!(library
            .get(story.id())
            .await
            .unwrap()
            .characters()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_story_is_reported() {
        let (_store, library) = library();
        let err = library.get(StoryId::new()).await.unwrap_err();
        assert!(matches!(err, LibraryError::StoryNotFound(_)));
    }
}
