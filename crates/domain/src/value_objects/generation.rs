//! Generation action requested for a turn.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// What the writer asked the generator to do with the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationAction {
    /// Extend the current scene.
    Continue,
    /// Rewrite the last passage to the writer's instruction.
    Rewrite,
    /// Open a new chapter or shift the scene drastically.
    NewChapter,
}

impl std::fmt::Display for GenerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationAction::Continue => write!(f, "continue"),
            GenerationAction::Rewrite => write!(f, "rewrite"),
            GenerationAction::NewChapter => write!(f, "new_chapter"),
        }
    }
}

impl std::str::FromStr for GenerationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(GenerationAction::Continue),
            "rewrite" => Ok(GenerationAction::Rewrite),
            "new_chapter" | "newchapter" => Ok(GenerationAction::NewChapter),
            other => Err(DomainError::parse(format!(
                "Unknown generation action: {other}"
            ))),
        }
    }
}
