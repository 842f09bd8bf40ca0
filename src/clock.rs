use chrono::{DateTime, Utc};

/// Source of wall-clock time for completions. Swappable so tests can control
/// the timestamps written into habits.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
