//! Admission decision for a context snapshot.
//!
//! The notification score starts at 1.0 and is multiplied by one penalty
//! per context dimension (focus, calendar, activity, time of day, battery),
//! then clamped to [0, 1]. Regular and low-priority admission are score
//! thresholds; critical admission only depends on not driving.

use serde::Serialize;

use super::user::{ActivityContext, BatteryContext, FocusMode, UserContext};
use crate::priority::{unit, PriorityLevel};

const BUSY_MULTIPLIER: f64 = 0.3;
const LOW_BATTERY_MULTIPLIER: f64 = 0.7;
const LOW_BATTERY_LEVEL: f64 = 0.1;

/// Score above which normal and high notifications may be sent.
pub const REGULAR_THRESHOLD: f64 = 0.3;
/// Score above which low and minimal notifications may be sent.
pub const LOW_PRIORITY_THRESHOLD: f64 = 0.6;

fn focus_multiplier(mode: FocusMode) -> f64 {
    match mode {
        FocusMode::DoNotDisturb => 0.0,
        FocusMode::Work | FocusMode::Sleep | FocusMode::Personal | FocusMode::Driving => 0.2,
        FocusMode::Custom => 0.5,
        FocusMode::None => 1.0,
    }
}

fn activity_multiplier(activity: ActivityContext) -> f64 {
    match activity {
        ActivityContext::Driving => 0.0,
        ActivityContext::Walking | ActivityContext::Running | ActivityContext::Cycling => 0.5,
        ActivityContext::Stationary => 1.0,
        ActivityContext::Unknown => 0.8,
    }
}

fn battery_multiplier(battery: Option<&BatteryContext>) -> f64 {
    match battery {
        Some(b) if b.level() < LOW_BATTERY_LEVEL && !b.is_charging() => LOW_BATTERY_MULTIPLIER,
        _ => 1.0,
    }
}

/// Minimum notification score for a category to be sent now.
///
/// Unknown categories need 0.5.
pub fn category_minimum_score(category: &str) -> f64 {
    match category.to_lowercase().as_str() {
        "contact" | "contact_reminder" => 0.5,
        "goal" | "goal_reminder" => 0.6,
        "habit" | "habit_reminder" => 0.5,
        "activity" | "activity_suggestion" => 0.7,
        "motivation" => 0.6,
        "streak" | "streak_warning" => 0.3,
        _ => 0.5,
    }
}

/// Outcome of gating one context snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub notification_score: f64,
    pub can_send_critical: bool,
    pub can_send_regular: bool,
    pub can_send_low_priority: bool,
}

impl GateDecision {
    fn from_score(score: f64, can_send_critical: bool) -> Self {
        let score = unit(score);
        Self {
            notification_score: score,
            can_send_critical,
            can_send_regular: score > REGULAR_THRESHOLD,
            can_send_low_priority: score > LOW_PRIORITY_THRESHOLD,
        }
    }

    /// Scale the score by a throttle factor and recompute the thresholds.
    /// Critical admission is unaffected.
    pub fn throttled(self, factor: f64) -> Self {
        Self::from_score(self.notification_score * unit(factor), self.can_send_critical)
    }

    /// Whether a notification of `level` passes this decision.
    pub fn admits(&self, level: PriorityLevel) -> bool {
        match level {
            PriorityLevel::Critical => self.can_send_critical,
            PriorityLevel::High | PriorityLevel::Normal => self.can_send_regular,
            PriorityLevel::Low | PriorityLevel::Minimal => self.can_send_low_priority,
        }
    }
}

/// Stateless context gate.
pub struct ContextGate;

impl ContextGate {
    pub fn notification_score(context: &UserContext) -> f64 {
        let mut score = 1.0;
        score *= focus_multiplier(context.focus.mode);
        if context.is_calendar_busy() {
            score *= BUSY_MULTIPLIER;
        }
        score *= activity_multiplier(context.activity);
        score *= context.time_of_day.appropriateness();
        score *= battery_multiplier(context.battery.as_ref());
        unit(score)
    }

    pub fn evaluate(context: &UserContext) -> GateDecision {
        GateDecision::from_score(
            Self::notification_score(context),
            context.activity != ActivityContext::Driving,
        )
    }

    /// Whether the context is good enough for a notification of `category`.
    pub fn is_appropriate_for(context: &UserContext, category: &str) -> bool {
        Self::notification_score(context) >= category_minimum_score(category)
    }
}

impl UserContext {
    pub fn notification_score(&self) -> f64 {
        ContextGate::notification_score(self)
    }

    pub fn gate(&self) -> GateDecision {
        ContextGate::evaluate(self)
    }
}
