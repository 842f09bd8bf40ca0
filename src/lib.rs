//! Daily Habits - A local-first habit tracker
//!
//! Core modules:
//! - `habit`: Habit records and ids
//! - `store`: The habit list, its persistence and mutation entry points
//! - `persistence`: Storage backends (LocalStorage on web, JSON file on native)
//! - `platform`: Install-hint platform classification
//! - `celebrate`: Milestone messages and confetti
//! - `view`: Render model consumed by the front ends
//! - `offline`: Versioned asset cache for the service worker

pub mod celebrate;
pub mod clock;
pub mod habit;
pub mod offline;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod store;
pub mod view;

pub use habit::{Habit, HabitId};
pub use settings::Theme;
pub use store::{Completion, HabitStore, LoadOutcome, Mutation, SaveOutcome};

/// Storage keys shared with earlier releases of the web app
pub mod consts {
    /// Key holding the JSON array of habits
    pub const HABITS_KEY: &str = "daily-habits-v1";
    /// Key holding the install hint dismissal flag
    pub const HINT_DISMISSED_KEY: &str = "install-hint-dismissed";
    /// Key holding the saved theme ("light" / "dark")
    pub const THEME_KEY: &str = "theme";
}
