//! User context: what the user is doing right now and whether that leaves
//! room for a notification.

mod gate;
mod history;
mod rules;
mod user;

pub use gate::{
    category_minimum_score, ContextGate, GateDecision, LOW_PRIORITY_THRESHOLD, REGULAR_THRESHOLD,
};
pub use history::{ContextHistory, DEFAULT_MAX_ENTRIES};
pub use rules::{Condition, ContextRule, ContextRuleSet, RuleAction};
pub use user::{
    ActivityContext, BatteryContext, CalendarContext, CalendarEvent, DayPeriod, FocusContext,
    FocusMode, LocationContext, LocationType, TimeOfDayContext, UserContext,
};
