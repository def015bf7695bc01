//! Priority scoring for the four notification families.

use clap::Subcommand;
use serde_json::json;

use nudge_core::priority::{
    score_contact, score_goal, score_streak, score_suggestion, ContactFrequency,
    NotificationPriority,
};

use super::print_json;

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Overdue contact reminder
    Contact {
        /// Contact is marked VIP
        #[arg(long)]
        vip: bool,
        /// Days past the desired contact cadence
        #[arg(long, allow_negative_numbers = true)]
        days_overdue: i64,
        /// Desired cadence (daily, twoDays, weekly, monthly, ...)
        #[arg(long, default_value = "weekly")]
        frequency: String,
        /// Engagement with the last reminder (0-1)
        #[arg(long, default_value_t = 0.5)]
        engagement: f64,
    },
    /// Goal deadline reminder
    Goal {
        /// Days until the deadline (negative when overdue)
        #[arg(long, allow_negative_numbers = true)]
        days_until_deadline: i64,
        /// Completed share of the goal (0-1)
        #[arg(long, default_value_t = 0.0)]
        progress: f64,
        #[arg(long)]
        important: bool,
    },
    /// Streak-at-risk warning
    Streak {
        /// Current streak length in days
        #[arg(long)]
        streak: i64,
        /// Hours left before the streak breaks
        #[arg(long, allow_negative_numbers = true)]
        hours_remaining: i64,
    },
    /// Activity suggestion
    Suggestion {
        /// How well the suggestion fits the current context (0-1)
        #[arg(long)]
        context_score: f64,
        /// Hours since the suggestion was last shown
        #[arg(long, default_value_t = 24)]
        last_shown_hours_ago: i64,
    },
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let priority = match action {
        ScoreAction::Contact {
            vip,
            days_overdue,
            frequency,
            engagement,
        } => score_contact(
            vip,
            days_overdue,
            ContactFrequency::parse_lossy(&frequency),
            engagement,
        ),
        ScoreAction::Goal {
            days_until_deadline,
            progress,
            important,
        } => score_goal(days_until_deadline, progress, important),
        ScoreAction::Streak {
            streak,
            hours_remaining,
        } => score_streak(streak, hours_remaining),
        ScoreAction::Suggestion {
            context_score,
            last_shown_hours_ago,
        } => score_suggestion(context_score, last_shown_hours_ago),
    };
    print_json(&report(&priority))
}

fn report(priority: &NotificationPriority) -> serde_json::Value {
    let level = priority.level();
    json!({
        "priority": priority,
        "priorityScore": priority.priority_score(),
        "weightedScore": priority.weighted_score(),
        "interruptLevel": level.interrupt_level(),
        "soundLevel": level.sound_level(),
        "factors": priority
            .factors()
            .iter()
            .map(|f| f.describe())
            .collect::<Vec<_>>(),
    })
}
