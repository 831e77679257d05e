//! Append-only variant log with a single active pointer.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Ordered log of text variants for one narrative block.
///
/// # Invariants
///
/// - The variant list is never empty.
/// - `active` always indexes a valid variant.
///
/// Variants are append-only: existing entries are never truncated or
/// reordered. The only mutable pointer is `active`, and appending a new
/// variant always makes it the active one. Both invariants are enforced at
/// construction, including deserialization of persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVersionLog", into = "RawVersionLog")]
pub struct VersionLog {
    versions: Vec<String>,
    active: usize,
}

impl VersionLog {
    /// Create a log with a single variant, which is active.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            versions: vec![text.into()],
            active: 0,
        }
    }

    /// Validated constructor for pre-existing variant lists.
    ///
    /// Refuses an empty list or an out-of-range active pointer.
    pub fn try_new(versions: Vec<String>, active: usize) -> Result<Self, DomainError> {
        if versions.is_empty() {
            return Err(DomainError::validation(
                "version log must contain at least one variant",
            ));
        }
        if active >= versions.len() {
            return Err(DomainError::validation(format!(
                "active version {} out of range (have {} variants)",
                active,
                versions.len()
            )));
        }
        Ok(Self { versions, active })
    }

    /// Push a new variant and make it active.
    ///
    /// Returns the index of the new variant.
    pub fn append(&mut self, text: impl Into<String>) -> usize {
        self.versions.push(text.into());
        self.active = self.versions.len() - 1;
        self.active
    }

    /// Move the active pointer.
    ///
    /// Out-of-range indices are clamped to the nearest valid bound rather
    /// than rejected, matching the bounded navigation the caller exposes.
    pub fn set_active(&mut self, index: usize) {
        self.active = index.min(self.versions.len() - 1);
    }

    /// Text of the currently active variant.
    pub fn active_text(&self) -> &str {
        &self.versions[self.active]
    }

    /// Index of the currently active variant.
    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// All variants, oldest first.
    #[inline]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Number of variants. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; present to satisfy the `len`/`is_empty` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Serde shadow for [`VersionLog`]; exists so deserialization goes through
/// the validating constructor.
#[derive(Serialize, Deserialize)]
struct RawVersionLog {
    versions: Vec<String>,
    active: usize,
}

impl TryFrom<RawVersionLog> for VersionLog {
    type Error = DomainError;

    fn try_from(raw: RawVersionLog) -> Result<Self, Self::Error> {
        Self::try_new(raw.versions, raw.active)
    }
}

impl From<VersionLog> for RawVersionLog {
    fn from(log: VersionLog) -> Self {
        Self {
            versions: log.versions,
            active: log.active,
        }
    }
}
