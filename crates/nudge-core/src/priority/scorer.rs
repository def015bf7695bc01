//! Priority scoring for each kind of domain event.
//!
//! Every scorer follows the same recipe:
//! 1. Build the list of [`PriorityFactorScore`]s for the event
//! 2. Sum their contributions into the raw score
//! 3. Map the event's inputs to a [`PriorityLevel`] with fixed thresholds
//! 4. Attach an expiry
//!
//! Scorers are free functions with no state. The plain variants stamp the
//! result with `Utc::now()`; the `_at` variants take the clock explicitly so
//! results are reproducible.

use chrono::{DateTime, Duration, Utc};

use super::factor::{PriorityFactor, PriorityFactorScore};
use super::frequency::ContactFrequency;
use super::level::PriorityLevel;
use super::notification::NotificationPriority;

/// Overdue days at which the overdue factor saturates.
const OVERDUE_SATURATION_DAYS: f64 = 14.0;
/// Streak length at which the streak factor saturates.
const STREAK_SATURATION_DAYS: f64 = 30.0;
/// Hours since last shown at which a suggestion counts as fully fresh.
const SUGGESTION_FRESHNESS_HOURS: f64 = 24.0;

const CONTACT_TTL_HOURS: i64 = 24;
const GOAL_TTL_HOURS: i64 = 24;
const SUGGESTION_TTL_HOURS: i64 = 2;

fn total(factors: &[PriorityFactorScore]) -> f64 {
    factors.iter().map(PriorityFactorScore::contribution).sum()
}

/// `now + hours`, saturating: an unrepresentable future means no expiry and
/// an unrepresentable past means already expired.
fn expiry_after(now: DateTime<Utc>, hours: i64) -> Option<DateTime<Utc>> {
    match Duration::try_hours(hours).and_then(|d| now.checked_add_signed(d)) {
        Some(expiry) => Some(expiry),
        None if hours > 0 => None,
        None => Some(now),
    }
}

/// Score an overdue-contact reminder.
pub fn score_contact(
    is_vip: bool,
    days_overdue: i64,
    frequency: ContactFrequency,
    last_engagement: f64,
) -> NotificationPriority {
    score_contact_at(is_vip, days_overdue, frequency, last_engagement, Utc::now())
}

/// Score an overdue-contact reminder at `now`.
///
/// Level:
/// - VIP and more than 7 days overdue, or more than 10 days overdue: high
/// - More than 5 days overdue: normal
/// - Otherwise: low
///
/// Valid for 24 hours.
pub fn score_contact_at(
    is_vip: bool,
    days_overdue: i64,
    frequency: ContactFrequency,
    last_engagement: f64,
    now: DateTime<Utc>,
) -> NotificationPriority {
    let mut factors = Vec::with_capacity(4);

    if is_vip {
        factors.push(PriorityFactorScore::new(PriorityFactor::VipContact, 1.0));
    }
    factors.push(PriorityFactorScore::new(
        PriorityFactor::DaysOverdue,
        (days_overdue as f64 / OVERDUE_SATURATION_DAYS).min(1.0),
    ));
    factors.push(PriorityFactorScore::new(
        PriorityFactor::ContactFrequency,
        frequency.priority_score(),
    ));
    factors.push(PriorityFactorScore::new(
        PriorityFactor::UserEngagement,
        last_engagement,
    ));

    let level = if (is_vip && days_overdue > 7) || days_overdue > 10 {
        PriorityLevel::High
    } else if days_overdue > 5 {
        PriorityLevel::Normal
    } else {
        PriorityLevel::Low
    };

    let score = total(&factors);
    NotificationPriority::created_at(
        level,
        score,
        factors,
        expiry_after(now, CONTACT_TTL_HOURS),
        now,
    )
}

/// Score a goal-deadline reminder.
pub fn score_goal(days_until_deadline: i64, progress: f64, is_important: bool) -> NotificationPriority {
    score_goal_at(days_until_deadline, progress, is_important, Utc::now())
}

/// Score a goal-deadline reminder at `now`.
///
/// Deadline factor: 1.0 within 3 days, 0.7 within 7, 0.5 within 14, else 0.3.
/// Level: high within 3 days, normal within 7, else low. Valid for 24 hours.
///
/// `is_important` is accepted for callers that track it but does not change
/// the result.
pub fn score_goal_at(
    days_until_deadline: i64,
    progress: f64,
    _is_important: bool,
    now: DateTime<Utc>,
) -> NotificationPriority {
    let deadline_value = if days_until_deadline <= 3 {
        1.0
    } else if days_until_deadline <= 7 {
        0.7
    } else if days_until_deadline <= 14 {
        0.5
    } else {
        0.3
    };

    let factors = vec![
        PriorityFactorScore::new(PriorityFactor::Deadline, deadline_value),
        PriorityFactorScore::new(PriorityFactor::GoalProgress, progress),
    ];

    let level = if days_until_deadline <= 3 {
        PriorityLevel::High
    } else if days_until_deadline <= 7 {
        PriorityLevel::Normal
    } else {
        PriorityLevel::Low
    };

    let score = total(&factors);
    NotificationPriority::created_at(
        level,
        score,
        factors,
        expiry_after(now, GOAL_TTL_HOURS),
        now,
    )
}

/// Score a habit streak that is about to break.
pub fn score_streak(current_streak: i64, hours_remaining: i64) -> NotificationPriority {
    score_streak_at(current_streak, hours_remaining, Utc::now())
}

/// Score a habit streak at risk at `now`.
///
/// Streaks longer than a week are critical, all others high. The warning
/// expires when the streak would break.
pub fn score_streak_at(
    current_streak: i64,
    hours_remaining: i64,
    now: DateTime<Utc>,
) -> NotificationPriority {
    let urgency = if hours_remaining <= 3 { 1.0 } else { 0.6 };
    let factors = vec![
        PriorityFactorScore::new(
            PriorityFactor::HabitStreak,
            (current_streak as f64 / STREAK_SATURATION_DAYS).min(1.0),
        ),
        PriorityFactorScore::new(PriorityFactor::TimeSensitive, urgency),
    ];

    let level = if current_streak > 7 {
        PriorityLevel::Critical
    } else {
        PriorityLevel::High
    };

    let score = total(&factors);
    NotificationPriority::created_at(
        level,
        score,
        factors,
        expiry_after(now, hours_remaining),
        now,
    )
}

/// Score an activity suggestion.
pub fn score_suggestion(context_score: f64, last_shown_hours_ago: i64) -> NotificationPriority {
    score_suggestion_at(context_score, last_shown_hours_ago, Utc::now())
}

/// Score an activity suggestion at `now`. Suggestions are always low and
/// valid for 2 hours.
pub fn score_suggestion_at(
    context_score: f64,
    last_shown_hours_ago: i64,
    now: DateTime<Utc>,
) -> NotificationPriority {
    let factors = vec![
        PriorityFactorScore::new(PriorityFactor::ContextAppropriate, context_score),
        PriorityFactorScore::new(
            PriorityFactor::OptimalTime,
            (last_shown_hours_ago as f64 / SUGGESTION_FRESHNESS_HOURS).min(1.0),
        ),
    ];

    let score = total(&factors);
    NotificationPriority::created_at(
        PriorityLevel::Low,
        score,
        factors,
        expiry_after(now, SUGGESTION_TTL_HOURS),
        now,
    )
}
