//! One turn in the narrative exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::BlockId;
use crate::value_objects::VersionLog;

/// Who authored a block. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorKind {
    /// Written by the writer: an instruction or a passage of their own.
    User,
    /// Produced by the generation backend.
    Ai,
}

impl AuthorKind {
    #[inline]
    pub fn is_user(self) -> bool {
        matches!(self, AuthorKind::User)
    }

    #[inline]
    pub fn is_ai(self) -> bool {
        matches!(self, AuthorKind::Ai)
    }
}

/// One turn in the narrative exchange, user- or AI-authored.
///
/// # Invariants
///
/// - `author` never changes after creation.
/// - The version log is never empty and its active pointer is always in
///   bounds (enforced by [`VersionLog`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryBlock {
    id: BlockId,
    author: AuthorKind,
    log: VersionLog,
    created_at: DateTime<Utc>,
}

impl StoryBlock {
    /// Create a user-authored block with a single version.
    pub fn user(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: BlockId::new(),
            author: AuthorKind::User,
            log: VersionLog::new(text),
            created_at: now,
        }
    }

    /// Create an AI-authored block with a single version.
    pub fn ai(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: BlockId::new(),
            author: AuthorKind::Ai,
            log: VersionLog::new(text),
            created_at: now,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn author(&self) -> AuthorKind {
        self.author
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The version log backing this block.
    #[inline]
    pub fn log(&self) -> &VersionLog {
        &self.log
    }

    /// Text of the currently active version.
    #[inline]
    pub fn active_text(&self) -> &str {
        self.log.active_text()
    }

    /// Push a new version and make it active.
    pub(crate) fn push_version(&mut self, text: impl Into<String>) -> usize {
        self.log.append(text)
    }

    /// Move the active pointer; out-of-range indices are clamped.
    pub(crate) fn set_active_version(&mut self, index: usize) {
        self.log.set_active(index);
    }
}

/// Active text of the most recent user-authored block in `blocks`, if any.
///
/// Used to recover the driving instruction when regenerating an AI turn.
pub fn last_user_text(blocks: &[StoryBlock]) -> Option<&str> {
    blocks
        .iter()
        .rev()
        .find(|b| b.author().is_user())
        .map(StoryBlock::active_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn constructors_fix_author_kind() {
        let user = StoryBlock::user("go north", now());
        let ai = StoryBlock::ai("They went north.", now());
        assert!(user.author().is_user());
        assert!(ai.author().is_ai());
        assert_eq!(user.active_text(), "go north");
        assert_eq!(ai.log().len(), 1);
    }

    #[test]
    fn last_user_text_finds_most_recent_instruction() {
        let blocks = vec![
            StoryBlock::user("first", now()),
            StoryBlock::ai("prose", now()),
            StoryBlock::user("second", now()),
            StoryBlock::ai("more prose", now()),
        ];
        assert_eq!(last_user_text(&blocks), Some("second"));
        assert_eq!(last_user_text(&blocks[..1]), Some("first"));
    }

    #[test]
    fn last_user_text_none_without_user_blocks() {
        let blocks = vec![StoryBlock::ai("prose", now())];
        assert_eq!(last_user_text(&blocks), None);
        assert_eq!(last_user_text(&[]), None);
    }
}
