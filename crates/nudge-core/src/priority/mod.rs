//! Notification priority scoring.
//!
//! Turns domain signals (overdue contacts, goal deadlines, streaks at risk,
//! activity suggestions) into a [`NotificationPriority`]: a level, a clamped
//! score, the factor breakdown behind it and an expiry.

mod factor;
mod frequency;
mod level;
mod notification;
mod scorer;

pub use factor::{PriorityFactor, PriorityFactorScore};
pub use frequency::ContactFrequency;
pub use level::{InterruptLevel, PriorityLevel, SoundLevel};
pub use notification::NotificationPriority;
pub use scorer::{
    score_contact, score_contact_at, score_goal, score_goal_at, score_streak, score_streak_at,
    score_suggestion, score_suggestion_at,
};

/// Clamp a probability-like value to [0, 1]; NaN maps to 0.
pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
