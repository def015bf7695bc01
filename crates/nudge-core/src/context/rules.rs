//! Declarative context rules.
//!
//! A rule pairs a [`Condition`] on the user context with a [`RuleAction`].
//! When several rules match, the set resolves to the strictest action:
//! `BlockAll` > `AllowOnlyCritical` > `BlockLowPriority` > `Defer` (longer
//! first) > `Throttle` (smaller factor first).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{ActivityContext, DayPeriod, FocusMode, LocationType, UserContext};
use crate::priority::PriorityLevel;

/// What a rule looks at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Condition {
    #[serde(rename = "Location")]
    Location { location: LocationType },

    #[serde(rename = "TimeOfDay")]
    TimeOfDay { period: DayPeriod },

    #[serde(rename = "Activity")]
    Activity { activity: ActivityContext },

    #[serde(rename = "Focus")]
    Focus { mode: FocusMode },

    /// Battery present and below 20%
    #[serde(rename = "BatteryLow")]
    BatteryLow,

    #[serde(rename = "CalendarBusy")]
    CalendarBusy,
}

impl Condition {
    pub fn matches(&self, context: &UserContext) -> bool {
        match self {
            Condition::Location { location } => context
                .location
                .as_ref()
                .is_some_and(|l| l.location_type == *location),
            Condition::TimeOfDay { period } => context.time_of_day.period == *period,
            Condition::Activity { activity } => context.activity == *activity,
            Condition::Focus { mode } => context.focus.mode == *mode,
            Condition::BatteryLow => context.is_battery_low(),
            Condition::CalendarBusy => context.is_calendar_busy(),
        }
    }
}

/// What a matching rule asks for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RuleAction {
    #[serde(rename = "BlockAll")]
    BlockAll,

    #[serde(rename = "AllowOnlyCritical")]
    AllowOnlyCritical,

    #[serde(rename = "BlockLowPriority")]
    BlockLowPriority,

    #[serde(rename = "Defer")]
    Defer { minutes: u32 },

    /// Multiply the notification score by `factor` before thresholds apply
    #[serde(rename = "Throttle")]
    Throttle { factor: f64 },
}

impl RuleAction {
    fn rank(&self) -> u8 {
        match self {
            RuleAction::BlockAll => 4,
            RuleAction::AllowOnlyCritical => 3,
            RuleAction::BlockLowPriority => 2,
            RuleAction::Defer { .. } => 1,
            RuleAction::Throttle { .. } => 0,
        }
    }

    /// `Greater` means `self` is stricter than `other`.
    pub fn strictness_cmp(&self, other: &RuleAction) -> Ordering {
        match (self, other) {
            (RuleAction::Defer { minutes: a }, RuleAction::Defer { minutes: b }) => a.cmp(b),
            (RuleAction::Throttle { factor: a }, RuleAction::Throttle { factor: b }) => {
                b.total_cmp(a)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Whether this action lets a notification of `level` through at all.
    /// Deferral and throttling never block a level outright.
    pub fn permits(&self, level: PriorityLevel) -> bool {
        match self {
            RuleAction::BlockAll => false,
            RuleAction::AllowOnlyCritical => level == PriorityLevel::Critical,
            RuleAction::BlockLowPriority => {
                !matches!(level, PriorityLevel::Low | PriorityLevel::Minimal)
            }
            RuleAction::Defer { .. } | RuleAction::Throttle { .. } => true,
        }
    }

    pub fn description(&self) -> String {
        match self {
            RuleAction::BlockAll => "block all notifications".to_string(),
            RuleAction::AllowOnlyCritical => "allow only critical notifications".to_string(),
            RuleAction::BlockLowPriority => "block low priority notifications".to_string(),
            RuleAction::Defer { minutes } => format!("defer by {minutes} minutes"),
            RuleAction::Throttle { factor } => format!("throttle score by x{factor}"),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextRule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub condition: Condition,
    pub action: RuleAction,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

impl ContextRule {
    pub fn new(name: impl Into<String>, condition: Condition, action: RuleAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            condition,
            action,
            is_enabled: true,
        }
    }

    /// The rule's action, if it is enabled and its condition holds.
    pub fn evaluate(&self, context: &UserContext) -> Option<&RuleAction> {
        (self.is_enabled && self.condition.matches(context)).then_some(&self.action)
    }
}

/// Ordered collection of rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextRuleSet {
    rules: Vec<ContextRule>,
}

impl ContextRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do-not-disturb, driving, busy calendar and low battery rules.
    pub fn with_defaults() -> Self {
        Self::from_rules(vec![
            ContextRule::new(
                "Block during do not disturb",
                Condition::Focus {
                    mode: FocusMode::DoNotDisturb,
                },
                RuleAction::BlockAll,
            ),
            ContextRule::new(
                "Only critical while driving",
                Condition::Activity {
                    activity: ActivityContext::Driving,
                },
                RuleAction::AllowOnlyCritical,
            ),
            ContextRule::new(
                "Hold low priority in meetings",
                Condition::CalendarBusy,
                RuleAction::BlockLowPriority,
            ),
            ContextRule::new(
                "Throttle on low battery",
                Condition::BatteryLow,
                RuleAction::Throttle { factor: 0.5 },
            ),
        ])
    }

    pub fn from_rules(rules: Vec<ContextRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ContextRule] {
        &self.rules
    }

    pub fn add(&mut self, rule: ContextRule) {
        self.rules.push(rule);
    }

    /// Returns true if a rule with `id` was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() != before
    }

    /// Returns true if a rule with `id` exists.
    pub fn set_enabled(&mut self, id: Uuid, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.is_enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Every matching rule with its action, in rule order.
    pub fn evaluate_all<'a>(
        &'a self,
        context: &UserContext,
    ) -> Vec<(&'a ContextRule, &'a RuleAction)> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(context).map(|action| (rule, action)))
            .collect()
    }

    /// The strictest matching action. Among equally strict actions the
    /// first rule wins.
    pub fn resolve(&self, context: &UserContext) -> Option<RuleAction> {
        let mut strictest: Option<&RuleAction> = None;
        for (_, action) in self.evaluate_all(context) {
            match strictest {
                Some(current) if action.strictness_cmp(current) != Ordering::Greater => {}
                _ => strictest = Some(action),
            }
        }
        strictest.cloned()
    }
}
