//! The habit store
//!
//! Owns the authoritative habit list and mirrors it to a [`Backend`] after
//! every change. All operations go through one async mutex, so a save can
//! never interleave with another mutation even when the backend suspends.
//!
//! Storage failures never reach the caller as errors. Loads degrade to an
//! empty list and saves degrade to "kept in memory only"; both are reported
//! through [`LoadOutcome`] / [`SaveOutcome`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::lock::Mutex;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::celebrate::milestone;
use crate::clock::{Clock, SystemClock};
use crate::habit::{Habit, HabitId};
use crate::persistence::{Backend, StorageError};

/// Result of [`HabitStore::load`]
#[derive(Debug)]
pub enum LoadOutcome {
    /// Number of habits now in memory
    Loaded(usize),
    /// Backend failed or held garbage; the list is now empty
    Degraded(StorageError),
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Degraded(_))
    }
}

/// Result of persisting the list
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    /// Write failed; memory still holds the change for this session
    Degraded(StorageError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// A change to the list. Receiving one means the UI should re-render.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub saved: SaveOutcome,
}

/// Result of marking a habit done
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The habit after the completion
    pub habit: Habit,
    /// Celebration text when the new count is a milestone
    pub milestone: Option<String>,
}

struct State {
    habits: Vec<Habit>,
    rng: Pcg32,
}

pub struct HabitStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    state: Mutex<State>,
}

impl<B: Backend> HabitStore<B> {
    /// Empty store over `backend`. Call [`HabitStore::load`] before use.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock, rand::random())
    }
}

impl<B: Backend, C: Clock> HabitStore<B, C> {
    /// Store with an explicit clock and id seed
    pub fn with_clock(backend: B, clock: C, seed: u64) -> Self {
        Self {
            backend,
            clock,
            state: Mutex::new(State {
                habits: Vec::new(),
                rng: Pcg32::seed_from_u64(seed),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the in-memory list with what the backend holds
    pub async fn load(&self) -> LoadOutcome {
        let mut state = self.state.lock().await;
        match self.backend.read_all().await {
            Ok(records) => {
                let now = self.clock.now();
                sanitize(&mut state, records, now);
                log::info!("Loaded {} habits", state.habits.len());
                LoadOutcome::Loaded(state.habits.len())
            }
            Err(e) => {
                log::warn!("Could not load habits, starting empty: {e}");
                state.habits.clear();
                LoadOutcome::Degraded(e)
            }
        }
    }

    /// Write the current list to the backend
    pub async fn save(&self) -> SaveOutcome {
        let state = self.state.lock().await;
        self.persist(&state.habits).await
    }

    /// Add a habit named `raw_name` (trimmed) at the front of the list.
    ///
    /// Blank names are ignored and nothing is written.
    pub async fn add(&self, raw_name: &str) -> Option<Mutation<Habit>> {
        let name = raw_name.trim();
        if name.is_empty() {
            return None;
        }

        let mut state = self.state.lock().await;
        let id = fresh_id(&mut state);
        let habit = Habit::new(id, name);
        state.habits.insert(0, habit.clone());
        log::debug!("Added habit {} ({})", habit.id, habit.name);

        let saved = self.persist(&state.habits).await;
        Some(Mutation {
            value: habit,
            saved,
        })
    }

    /// Record one completion of habit `id`. Unknown ids are ignored.
    pub async fn mark_done(&self, id: &str) -> Option<Mutation<Completion>> {
        let mut state = self.state.lock().await;
        let index = state.habits.iter().position(|h| h.id.as_str() == id)?;

        let updated = state.habits[index].completed(self.clock.now());
        state.habits[index] = updated.clone();
        log::debug!("Habit {} done {} times", updated.id, updated.count);

        let saved = self.persist(&state.habits).await;
        Some(Mutation {
            value: Completion {
                milestone: milestone(updated.count),
                habit: updated,
            },
            saved,
        })
    }

    /// Remove habit `id`. Unknown ids are ignored and nothing is written.
    pub async fn delete(&self, id: &str) -> Option<Mutation<Habit>> {
        let mut state = self.state.lock().await;
        let index = state.habits.iter().position(|h| h.id.as_str() == id)?;
        let removed = state.habits.remove(index);
        log::debug!("Deleted habit {} ({})", removed.id, removed.name);

        let saved = self.persist(&state.habits).await;
        Some(Mutation {
            value: removed,
            saved,
        })
    }

    /// Snapshot of the list in display order
    pub async fn habits(&self) -> Vec<Habit> {
        self.state.lock().await.habits.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Habit> {
        let state = self.state.lock().await;
        state.habits.iter().find(|h| h.id.as_str() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.habits.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.habits.is_empty()
    }

    /// Caller must hold the state lock
    async fn persist(&self, habits: &[Habit]) -> SaveOutcome {
        match self.backend.write_all(habits).await {
            Ok(()) => {
                log::debug!("Saved {} habits", habits.len());
                SaveOutcome::Saved
            }
            Err(e) => {
                log::warn!("Habits kept in memory only, save failed: {e}");
                SaveOutcome::Degraded(e)
            }
        }
    }
}

/// Id not already present in the list
fn fresh_id(state: &mut State) -> HabitId {
    loop {
        let id = HabitId::generate(&mut state.rng);
        if !state.habits.iter().any(|h| h.id == id) {
            return id;
        }
    }
}

/// Install `records` as the list, repairing broken ones instead of losing
/// them. A repeated id gets a fresh one so both habits survive.
fn sanitize(state: &mut State, records: Vec<Habit>, now: DateTime<Utc>) {
    state.habits.clear();
    let mut seen = HashSet::new();
    let mut repaired = 0;
    for mut habit in records {
        let mut changed = habit.repair(now);
        if !seen.insert(habit.id.clone()) {
            habit.id = fresh_id(state);
            seen.insert(habit.id.clone());
            changed = true;
        }
        if changed {
            log::warn!("Repaired stored habit {} ({:?})", habit.id, habit.name);
            repaired += 1;
        }
        state.habits.push(habit);
    }
    if repaired > 0 {
        log::warn!("Repaired {repaired} of {} habit records", state.habits.len());
    }
}
