//! How often the user wants to keep in touch with a contact.

use serde::{Deserialize, Serialize};

/// Desired contact cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactFrequency {
    Daily,
    TwoDays,
    ThreeDays,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Priority value per cadence, indexed by [`ContactFrequency::index`].
const PRIORITY_TABLE: [f64; 8] = [1.0, 0.95, 0.9, 0.8, 0.6, 0.4, 0.2, 0.1];

impl ContactFrequency {
    /// Cadence used when a stored value cannot be recognised.
    pub const FALLBACK: ContactFrequency = ContactFrequency::Yearly;

    fn index(self) -> usize {
        match self {
            ContactFrequency::Daily => 0,
            ContactFrequency::TwoDays => 1,
            ContactFrequency::ThreeDays => 2,
            ContactFrequency::Weekly => 3,
            ContactFrequency::Biweekly => 4,
            ContactFrequency::Monthly => 5,
            ContactFrequency::Quarterly => 6,
            ContactFrequency::Yearly => 7,
        }
    }

    /// Priority value of the cadence (daily = 1.0 ... yearly = 0.1).
    pub fn priority_score(self) -> f64 {
        PRIORITY_TABLE[self.index()]
    }

    /// Parse a persisted cadence name, falling back to [`Self::FALLBACK`].
    ///
    /// Accepts camelCase (`twoDays`), snake_case (`two_days`) and kebab-case.
    pub fn parse_lossy(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "daily" => ContactFrequency::Daily,
            "twodays" => ContactFrequency::TwoDays,
            "threedays" => ContactFrequency::ThreeDays,
            "weekly" => ContactFrequency::Weekly,
            "biweekly" => ContactFrequency::Biweekly,
            "monthly" => ContactFrequency::Monthly,
            "quarterly" => ContactFrequency::Quarterly,
            "yearly" => ContactFrequency::Yearly,
            _ => Self::FALLBACK,
        }
    }
}
