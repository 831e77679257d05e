//! Story aggregate - a narrative and everything written under its laws.
//!
//! # Rustic DDD Design
//!
//! This aggregate follows Rustic DDD principles:
//! - **Private fields**: All fields are encapsulated
//! - **Valid by construction**: blocks only enter the sequence through the
//!   transitions below
//! - **Injected time**: every mutation takes `now` from the caller so the
//!   aggregate stays deterministic under test

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AuthorKind, Character, StoryBlock};
use crate::error::DomainError;
use crate::ids::{BlockId, CharacterId, StoryId};
use crate::value_objects::StoryLaws;

/// Universe a fresh story starts in.
pub const DEFAULT_UNIVERSE: &str = "Realista";

/// Primary tone a fresh story starts with.
pub const DEFAULT_PRIMARY_TONE: &str = "Literário";

/// Tag applied to a fresh story until the writer files it.
pub const DRAFT_TAG: &str = "Rascunho";

/// A story: block sequence, character roster, and law-of-the-story metadata.
///
/// # Invariants
///
/// - Block order is monotonic creation order. Blocks are only ever appended,
///   or removed by the truncation inside [`Story::edit_user_block`]; nothing
///   is inserted mid-sequence.
/// - `last_edited` is refreshed by every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    title: String,
    /// Absolute behavioral rules for the generator.
    rules: String,
    /// Permanent narrative memory: events the generator must not forget.
    key_events: String,
    laws: StoryLaws,
    blocks: Vec<StoryBlock>,
    characters: Vec<Character>,
    tags: Vec<String>,
    last_edited: DateTime<Utc>,
}

impl Story {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create an empty story with the default laws and the draft tag.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: StoryId::new(),
            title: String::new(),
            rules: String::new(),
            key_events: String::new(),
            laws: StoryLaws {
                universe: DEFAULT_UNIVERSE.to_string(),
                primary_tone: DEFAULT_PRIMARY_TONE.to_string(),
                ..StoryLaws::default()
            },
            blocks: Vec::new(),
            characters: Vec::new(),
            tags: vec![DRAFT_TAG.to_string()],
            last_edited: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> StoryId {
        self.id
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn rules(&self) -> &str {
        &self.rules
    }

    #[inline]
    pub fn key_events(&self) -> &str {
        &self.key_events
    }

    #[inline]
    pub fn laws(&self) -> &StoryLaws {
        &self.laws
    }

    /// The narrative history, oldest block first.
    #[inline]
    pub fn blocks(&self) -> &[StoryBlock] {
        &self.blocks
    }

    /// Character roster in insertion order.
    #[inline]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    #[inline]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[inline]
    pub fn last_edited(&self) -> DateTime<Utc> {
        self.last_edited
    }

    /// Look up a block by id.
    pub fn block(&self, block_id: BlockId) -> Option<&StoryBlock> {
        self.blocks.iter().find(|b| b.id() == block_id)
    }

    /// Position of a block in the sequence.
    pub fn block_position(&self, block_id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == block_id)
    }

    /// Blocks strictly before the given one: the context a regeneration of
    /// that block is conditioned on.
    pub fn blocks_before(&self, block_id: BlockId) -> Option<&[StoryBlock]> {
        self.block_position(block_id).map(|pos| &self.blocks[..pos])
    }

    // =========================================================================
    // Block sequence transitions
    // =========================================================================

    /// Append a user-authored block with a single version.
    pub fn append_user_block(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> BlockId {
        let block = StoryBlock::user(text, now);
        let id = block.id();
        self.blocks.push(block);
        self.touch(now);
        id
    }

    /// Append an AI-authored block with a single version.
    pub fn append_ai_block(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> BlockId {
        let block = StoryBlock::ai(text, now);
        let id = block.id();
        self.blocks.push(block);
        self.touch(now);
        id
    }

    /// Rewrite a past user instruction.
    ///
    /// Appends `text` as a new active version on the target (the original
    /// text stays in its history) and truncates the sequence so it ends at
    /// the target inclusively: everything authored after it was conditioned
    /// on the old instruction and is discarded, unrecoverably.
    pub fn edit_user_block(
        &mut self,
        block_id: BlockId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let pos = self
            .block_position(block_id)
            .ok_or_else(|| DomainError::not_found("StoryBlock", block_id.to_string()))?;
        if self.blocks[pos].author() != AuthorKind::User {
            return Err(DomainError::constraint(
                "only user-authored blocks can be edited",
            ));
        }
        self.blocks[pos].push_version(text);
        self.blocks.truncate(pos + 1);
        self.touch(now);
        Ok(())
    }

    /// Offer an alternative text for an AI turn, in place.
    ///
    /// Appends `text` as a new active version on the target. The sequence
    /// length and every other block are untouched; blocks after the target
    /// are NOT revisited even if they referenced the replaced text.
    pub fn regenerate_ai_block(
        &mut self,
        block_id: BlockId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let pos = self
            .block_position(block_id)
            .ok_or_else(|| DomainError::not_found("StoryBlock", block_id.to_string()))?;
        if self.blocks[pos].author() != AuthorKind::Ai {
            return Err(DomainError::constraint(
                "only AI-authored blocks can be regenerated",
            ));
        }
        self.blocks[pos].push_version(text);
        self.touch(now);
        Ok(())
    }

    /// Move a block's active-version pointer; out-of-range indices clamp.
    pub fn set_active_version(
        &mut self,
        block_id: BlockId,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let pos = self
            .block_position(block_id)
            .ok_or_else(|| DomainError::not_found("StoryBlock", block_id.to_string()))?;
        self.blocks[pos].set_active_version(index);
        self.touch(now);
        Ok(())
    }

    // =========================================================================
    // Character roster
    // =========================================================================

    pub fn add_character(&mut self, character: Character, now: DateTime<Utc>) {
        self.characters.push(character);
        self.touch(now);
    }

    /// Apply `update` to the character with the given id.
    pub fn update_character(
        &mut self,
        character_id: CharacterId,
        update: impl FnOnce(&mut Character),
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let character = self
            .characters
            .iter_mut()
            .find(|c| c.id() == character_id)
            .ok_or_else(|| DomainError::not_found("Character", character_id.to_string()))?;
        update(character);
        self.touch(now);
        Ok(())
    }

    pub fn remove_character(
        &mut self,
        character_id: CharacterId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let pos = self
            .characters
            .iter()
            .position(|c| c.id() == character_id)
            .ok_or_else(|| DomainError::not_found("Character", character_id.to_string()))?;
        self.characters.remove(pos);
        self.touch(now);
        Ok(())
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn set_title(&mut self, title: impl Into<String>, now: DateTime<Utc>) {
        self.title = title.into();
        self.touch(now);
    }

    pub fn set_rules(&mut self, rules: impl Into<String>, now: DateTime<Utc>) {
        self.rules = rules.into();
        self.touch(now);
    }

    pub fn set_key_events(&mut self, key_events: impl Into<String>, now: DateTime<Utc>) {
        self.key_events = key_events.into();
        self.touch(now);
    }

    pub fn set_laws(&mut self, laws: StoryLaws, now: DateTime<Utc>) {
        self.laws = laws;
        self.touch(now);
    }

    pub fn set_tags(&mut self, tags: Vec<String>, now: DateTime<Utc>) {
        self.tags = tags;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_edited = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    fn story_with_turns(turns: &[(AuthorKind, &str)]) -> Story {
        let mut story = Story::new(t(0));
        for (author, text) in turns {
            match author {
                AuthorKind::User => story.append_user_block(*text, t(1)),
                AuthorKind::Ai => story.append_ai_block(*text, t(1)),
            };
        }
        story
    }

    #[test]
    fn new_story_has_draft_defaults() {
        let story = Story::new(t(0));
        assert!(story.blocks().is_empty());
        assert!(story.title().is_empty());
        assert_eq!(story.laws().universe, DEFAULT_UNIVERSE);
        assert_eq!(story.laws().primary_tone, DEFAULT_PRIMARY_TONE);
        assert_eq!(story.tags(), &[DRAFT_TAG.to_string()]);
    }

    #[test]
    fn appends_preserve_creation_order() {
        let story = story_with_turns(&[
            (AuthorKind::User, "a"),
            (AuthorKind::Ai, "b"),
            (AuthorKind::User, "c"),
        ]);
        let authors: Vec<_> = story.blocks().iter().map(|b| b.author()).collect();
        assert_eq!(
            authors,
            vec![AuthorKind::User, AuthorKind::Ai, AuthorKind::User]
        );
    }

    #[test]
    fn edit_truncates_everything_after_the_target() {
        let mut story = story_with_turns(&[
            (AuthorKind::User, "go north"),
            (AuthorKind::Ai, "They went north."),
            (AuthorKind::User, "go south"),
            (AuthorKind::Ai, "They turned south."),
        ]);
        let first = story.blocks()[0].id();

        story.edit_user_block(first, "go east", t(2)).expect("edit");

        assert_eq!(story.blocks().len(), 1);
        let block = &story.blocks()[0];
        assert_eq!(block.log().len(), 2);
        assert_eq!(block.log().active_index(), 1);
        assert_eq!(block.active_text(), "go east");
        assert_eq!(block.log().versions()[0], "go north");
    }

    #[test]
    fn edit_of_last_block_truncates_nothing_extra() {
        let mut story = story_with_turns(&[(AuthorKind::User, "go north")]);
        let id = story.blocks()[0].id();
        story.edit_user_block(id, "go west", t(2)).expect("edit");
        assert_eq!(story.blocks().len(), 1);
    }

    #[test]
    fn edit_rejects_ai_blocks_and_unknown_ids() {
        let mut story =
            story_with_turns(&[(AuthorKind::User, "go"), (AuthorKind::Ai, "They went.")]);
        let ai = story.blocks()[1].id();
        assert!(matches!(
            story.edit_user_block(ai, "x", t(2)),
            Err(DomainError::Constraint(_))
        ));
        assert!(matches!(
            story.edit_user_block(BlockId::new(), "x", t(2)),
            Err(DomainError::NotFound { .. })
        ));
        // Failed edits leave the sequence alone.
        assert_eq!(story.blocks().len(), 2);
    }

    #[test]
    fn regenerate_keeps_length_and_siblings() {
        let mut story = story_with_turns(&[
            (AuthorKind::User, "go"),
            (AuthorKind::Ai, "Texto A"),
            (AuthorKind::User, "more"),
            (AuthorKind::Ai, "ending"),
        ]);
        let target = story.blocks()[1].id();
        let siblings_before: Vec<_> = [0, 2, 3]
            .iter()
            .map(|&i| story.blocks()[i].clone())
            .collect();

        story
            .regenerate_ai_block(target, "Texto B", t(2))
            .expect("regenerate");

        assert_eq!(story.blocks().len(), 4);
        let block = &story.blocks()[1];
        assert_eq!(block.log().len(), 2);
        assert_eq!(block.active_text(), "Texto B");
        for (i, idx) in [0usize, 2, 3].iter().enumerate() {
            assert_eq!(&story.blocks()[*idx], &siblings_before[i]);
        }
    }

    #[test]
    fn regenerate_rejects_user_blocks() {
        let mut story = story_with_turns(&[(AuthorKind::User, "go")]);
        let id = story.blocks()[0].id();
        assert!(matches!(
            story.regenerate_ai_block(id, "x", t(2)),
            Err(DomainError::Constraint(_))
        ));
    }

    #[test]
    fn set_active_version_clamps_and_is_idempotent() {
        let mut story = story_with_turns(&[(AuthorKind::Ai, "a")]);
        let id = story.blocks()[0].id();
        story.regenerate_ai_block(id, "b", t(2)).expect("regenerate");

        story.set_active_version(id, 99, t(3)).expect("switch");
        assert_eq!(story.blocks()[0].log().active_index(), 1);

        story.set_active_version(id, 0, t(4)).expect("switch");
        let snapshot = story.blocks()[0].clone();
        story.set_active_version(id, 0, t(5)).expect("switch");
        assert_eq!(&story.blocks()[0], &snapshot);
    }

    #[test]
    fn blocks_before_excludes_the_target() {
        let story = story_with_turns(&[
            (AuthorKind::User, "go"),
            (AuthorKind::Ai, "prose"),
            (AuthorKind::Ai, "more"),
        ]);
        let target = story.blocks()[2].id();
        let before = story.blocks_before(target).expect("known block");
        assert_eq!(before.len(), 2);
        assert_eq!(before[1].active_text(), "prose");
        assert!(story.blocks_before(BlockId::new()).is_none());
    }

    #[test]
    fn roster_preserves_insertion_order() {
        let mut story = Story::new(t(0));
        story.add_character(Character::new("Ana"), t(1));
        story.add_character(Character::new("Bruno"), t(2));
        let ana = story.characters()[0].id();

        story
            .update_character(ana, |c| c.set_personality("fierce"), t(3))
            .expect("update");
        assert_eq!(story.characters()[0].personality(), "fierce");

        story.remove_character(ana, t(4)).expect("remove");
        assert_eq!(story.characters().len(), 1);
        assert_eq!(story.characters()[0].name(), "Bruno");
    }

    #[test]
    fn every_mutation_refreshes_last_edited() {
        let mut story = Story::new(t(0));
        story.append_user_block("go", t(10));
        assert_eq!(story.last_edited(), t(10));

        story.set_title("Floresta", t(20));
        assert_eq!(story.last_edited(), t(20));

        let id = story.blocks()[0].id();
        story.set_active_version(id, 0, t(30)).expect("switch");
        assert_eq!(story.last_edited(), t(30));
    }

    #[test]
    fn serde_round_trip_preserves_the_aggregate() {
        let mut story = story_with_turns(&[
            (AuthorKind::User, "go"),
            (AuthorKind::Ai, "They went."),
        ]);
        story.add_character(Character::new("Ana").with_appearance("tall"), t(2));

        let json = serde_json::to_string(&story).expect("serialize");
        let back: Story = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, story);
    }
}
