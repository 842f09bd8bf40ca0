//! Habit records
//!
//! A habit is created by `HabitStore::add`, bumped by `mark_done` and lives
//! until deleted. Nothing renames or resets it.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Opaque habit identifier
///
/// New ids are random v4 UUIDs, but anything read back from storage is kept
/// verbatim (older builds fell back to millisecond timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Draw a fresh v4 UUID from `rng`
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Self(uuid.hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HabitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    /// Trimmed, never empty
    pub name: String,
    /// Number of completions since creation
    pub count: u32,
    /// Time of the latest completion; `None` until the first one
    #[serde(rename = "lastDone", default)]
    pub last_done: Option<DateTime<Utc>>,
}

impl Habit {
    /// Fresh habit with no completions. `name` must already be trimmed.
    pub fn new(id: HabitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            count: 0,
            last_done: None,
        }
    }

    /// The next version of this habit after one more completion at `now`.
    ///
    /// `last_done` never moves backwards, even if the wall clock does.
    pub fn completed(&self, now: DateTime<Utc>) -> Self {
        let last_done = match self.last_done {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            count: self.count.saturating_add(1),
            last_done: Some(last_done),
        }
    }

    /// Whether the record upholds the model invariants
    pub fn is_consistent(&self) -> bool {
        let name_ok = !self.name.trim().is_empty();
        let done_ok = self.last_done.is_some() == (self.count > 0);
        name_ok && done_ok
    }

    /// Bring a record read from storage back in line with the invariants,
    /// losing as little as possible. Returns whether anything changed.
    ///
    /// A blank name becomes [`UNTITLED`]. A completion time with no count
    /// counts as one completion; a count with no time is stamped `now`.
    pub fn repair(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            self.name = UNTITLED.to_string();
            changed = true;
        } else if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
            changed = true;
        }

        match (self.count, self.last_done) {
            (0, Some(_)) => {
                self.count = 1;
                changed = true;
            }
            (n, None) if n > 0 => {
                self.last_done = Some(now);
                changed = true;
            }
            _ => {}
        }
        changed
    }
}

/// Name given to a stored habit whose name was blank
pub const UNTITLED: &str = "Untitled habit";
