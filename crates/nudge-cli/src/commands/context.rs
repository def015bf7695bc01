//! Context evaluation: gate score, matching rules and per-level admission.

use clap::Subcommand;
use serde_json::json;

use nudge_core::context::{
    category_minimum_score, ActivityContext, BatteryContext, CalendarContext, ContextRuleSet,
    FocusContext, FocusMode, LocationContext, LocationType, RuleAction, UserContext,
};
use nudge_core::priority::PriorityLevel;
use nudge_core::Config;

use super::{parse_at, parse_name, print_json};

#[derive(Subcommand)]
pub enum ContextAction {
    /// Evaluate a context snapshot
    Evaluate {
        /// Moment to evaluate (RFC 3339, default now)
        #[arg(long)]
        at: Option<String>,
        /// Focus mode (none, do_not_disturb, sleep, work, personal, driving, custom)
        #[arg(long, value_parser = parse_name::<FocusMode>)]
        focus: Option<FocusMode>,
        /// Motion activity (stationary, walking, running, cycling, driving, unknown)
        #[arg(long, value_parser = parse_name::<ActivityContext>)]
        activity: Option<ActivityContext>,
        /// Location type (home, work, gym, restaurant, outdoor, transit, unknown)
        #[arg(long, value_parser = parse_name::<LocationType>)]
        location: Option<LocationType>,
        /// Calendar reports the user as busy
        #[arg(long)]
        busy: bool,
        /// Battery level (0-1)
        #[arg(long)]
        battery: Option<f64>,
        #[arg(long)]
        charging: bool,
        #[arg(long)]
        low_power: bool,
        /// Also check appropriateness for this category
        #[arg(long)]
        category: Option<String>,
        /// Ignore configured rules and use the built-in set
        #[arg(long)]
        builtin_rules: bool,
    },
    /// List the active context rules
    Rules {
        /// Ignore configured rules and use the built-in set
        #[arg(long)]
        builtin_rules: bool,
    },
}

pub fn run(action: ContextAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ContextAction::Evaluate {
            at,
            focus,
            activity,
            location,
            busy,
            battery,
            charging,
            low_power,
            category,
            builtin_rules,
        } => {
            let mut context = UserContext::at(&parse_at(at.as_deref())?);
            if let Some(mode) = focus {
                context = context.with_focus(FocusContext::new(mode));
            }
            if let Some(activity) = activity {
                context = context.with_activity(activity);
            }
            if let Some(location) = location {
                context = context.with_location(LocationContext::new(location));
            }
            if busy {
                context = context.with_calendar(CalendarContext::busy());
            }
            if let Some(level) = battery {
                context = context.with_battery(BatteryContext::new(level, charging, low_power));
            }
            print_json(&evaluate(&context, &rule_set(builtin_rules), category.as_deref()))
        }
        ContextAction::Rules { builtin_rules } => print_json(rule_set(builtin_rules).rules()),
    }
}

fn rule_set(builtin: bool) -> ContextRuleSet {
    if builtin {
        ContextRuleSet::with_defaults()
    } else {
        Config::load_or_default().rule_set()
    }
}

fn evaluate(
    context: &UserContext,
    rules: &ContextRuleSet,
    category: Option<&str>,
) -> serde_json::Value {
    let action = rules.resolve(context);
    let mut gate = context.gate();
    if let Some(RuleAction::Throttle { factor }) = action {
        gate = gate.throttled(factor);
    }

    let admits: serde_json::Map<String, serde_json::Value> = PriorityLevel::ALL
        .iter()
        .map(|&level| {
            let allowed = action.as_ref().map_or(true, |a| a.permits(level))
                && context.focus.should_allow(level)
                && gate.admits(level);
            (level.as_str().to_string(), allowed.into())
        })
        .collect();

    let matched: Vec<&str> = rules
        .evaluate_all(context)
        .into_iter()
        .map(|(rule, _)| rule.name.as_str())
        .collect();

    let time = &context.time_of_day;
    let mut report = json!({
        "timeOfDay": {
            "hour": time.hour,
            "weekday": time.weekday,
            "isWeekend": time.is_weekend,
            "period": time.period,
            "appropriateness": time.appropriateness(),
        },
        "quietHours": time.is_quiet_hours(),
        "gate": gate,
        "matchedRules": matched,
        "action": action.as_ref().map(RuleAction::description),
        "admits": admits,
    });
    if let Some(category) = category {
        report["category"] = json!({
            "name": category,
            "minimumScore": category_minimum_score(category),
            "appropriate": gate.notification_score >= category_minimum_score(category),
        });
    }
    report
}
