//! Named priority signals and their fixed weights.

use serde::{Deserialize, Serialize};

use super::unit;

/// A named signal contributing to a notification's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityFactor {
    // Contact
    VipContact,
    DaysOverdue,
    RelationshipImportance,
    ContactFrequency,

    // Time
    TimeSensitive,
    Deadline,
    StreakAtRisk,

    // User
    UserEngagement,
    HistoricalResponse,
    UserPreference,

    // Context
    OptimalTime,
    LocationRelevant,
    ContextAppropriate,

    // Achievement
    MilestoneAchieved,
    GoalProgress,
    HabitStreak,
}

impl PriorityFactor {
    /// Fixed weight of the factor.
    pub fn weight(self) -> f64 {
        match self {
            PriorityFactor::VipContact => 0.3,
            PriorityFactor::DaysOverdue => 0.25,
            PriorityFactor::RelationshipImportance => 0.2,
            PriorityFactor::ContactFrequency => 0.15,

            PriorityFactor::TimeSensitive => 0.35,
            PriorityFactor::Deadline => 0.3,
            PriorityFactor::StreakAtRisk => 0.35,

            PriorityFactor::UserEngagement => 0.25,
            PriorityFactor::HistoricalResponse => 0.2,
            PriorityFactor::UserPreference => 0.25,

            PriorityFactor::OptimalTime => 0.2,
            PriorityFactor::LocationRelevant => 0.15,
            PriorityFactor::ContextAppropriate => 0.15,

            PriorityFactor::MilestoneAchieved => 0.3,
            PriorityFactor::GoalProgress => 0.2,
            PriorityFactor::HabitStreak => 0.25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityFactor::VipContact => "vipContact",
            PriorityFactor::DaysOverdue => "daysOverdue",
            PriorityFactor::RelationshipImportance => "relationshipImportance",
            PriorityFactor::ContactFrequency => "contactFrequency",
            PriorityFactor::TimeSensitive => "timeSensitive",
            PriorityFactor::Deadline => "deadline",
            PriorityFactor::StreakAtRisk => "streakAtRisk",
            PriorityFactor::UserEngagement => "userEngagement",
            PriorityFactor::HistoricalResponse => "historicalResponse",
            PriorityFactor::UserPreference => "userPreference",
            PriorityFactor::OptimalTime => "optimalTime",
            PriorityFactor::LocationRelevant => "locationRelevant",
            PriorityFactor::ContextAppropriate => "contextAppropriate",
            PriorityFactor::MilestoneAchieved => "milestoneAchieved",
            PriorityFactor::GoalProgress => "goalProgress",
            PriorityFactor::HabitStreak => "habitStreak",
        }
    }
}

/// One factor's observed value and the weight it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityFactorScore {
    pub factor: PriorityFactor,
    /// Observed value (0.0-1.0)
    pub value: f64,
    pub weight: f64,
}

impl PriorityFactorScore {
    /// Score `factor` at `value` using the factor's fixed weight.
    /// The value is clamped to [0, 1]; NaN becomes 0.
    pub fn new(factor: PriorityFactor, value: f64) -> Self {
        Self {
            factor,
            value: unit(value),
            weight: factor.weight(),
        }
    }

    pub fn contribution(&self) -> f64 {
        self.value * self.weight
    }

    /// e.g. `daysOverdue: 71.43%`
    pub fn describe(&self) -> String {
        format!("{}: {:.2}%", self.factor.as_str(), self.value * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_within_documented_band() {
        let all = [
            PriorityFactor::VipContact,
            PriorityFactor::DaysOverdue,
            PriorityFactor::RelationshipImportance,
            PriorityFactor::ContactFrequency,
            PriorityFactor::TimeSensitive,
            PriorityFactor::Deadline,
            PriorityFactor::StreakAtRisk,
            PriorityFactor::UserEngagement,
            PriorityFactor::HistoricalResponse,
            PriorityFactor::UserPreference,
            PriorityFactor::OptimalTime,
            PriorityFactor::LocationRelevant,
            PriorityFactor::ContextAppropriate,
            PriorityFactor::MilestoneAchieved,
            PriorityFactor::GoalProgress,
            PriorityFactor::HabitStreak,
        ];
        for factor in all {
            let w = factor.weight();
            assert!((0.1..=0.35).contains(&w), "{} has weight {w}", factor.as_str());
        }
    }

    #[test]
    fn value_is_clamped() {
        assert_eq!(PriorityFactorScore::new(PriorityFactor::DaysOverdue, -2.0).value, 0.0);
        assert_eq!(PriorityFactorScore::new(PriorityFactor::DaysOverdue, 3.0).value, 1.0);
        assert_eq!(PriorityFactorScore::new(PriorityFactor::DaysOverdue, f64::NAN).value, 0.0);
    }

    #[test]
    fn contribution_and_description() {
        let score = PriorityFactorScore::new(PriorityFactor::VipContact, 0.5);
        assert!((score.contribution() - 0.15).abs() < 1e-12);
        assert_eq!(score.describe(), "vipContact: 50.00%");
    }
}
