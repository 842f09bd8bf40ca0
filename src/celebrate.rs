//! Milestone messages and confetti
//!
//! Purely cosmetic feedback for completions. Milestones depend only on the
//! new completion count.

use rand::Rng;

/// How long a confetti burst stays on screen (ms)
pub const CONFETTI_LIFETIME_MS: i32 = 700;

/// Emoji a confetti burst can pick from
pub const CONFETTI_EMOJI: [&str; 4] = ["✨", "🌱", "🔥", "💪"];

/// Celebration text for reaching `count` completions, if it is a milestone.
///
/// Milestones are 1, 3, 5, 10 and every multiple of 20.
pub fn milestone(count: u32) -> Option<String> {
    match count {
        0 => None,
        1 => Some("Great start! 🌱".to_string()),
        3 => Some("You're building momentum! 💡".to_string()),
        5 => Some("Habit forming! 🔥".to_string()),
        10 => Some("Double digits! Amazing work! 💪".to_string()),
        n if n % 20 == 0 => Some(format!("🔥 {n} completions! You're unstoppable.")),
        _ => None,
    }
}

/// A single confetti burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confetti {
    pub emoji: &'static str,
    /// Horizontal position, percent of viewport width
    pub left_percent: f32,
}

impl Confetti {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let emoji = CONFETTI_EMOJI[rng.random_range(0..CONFETTI_EMOJI.len())];
        // Keep clear of the screen edges
        let left_percent = rng.random_range(10.0..90.0);
        Self {
            emoji,
            left_percent,
        }
    }
}
