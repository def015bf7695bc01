//! Priority tiers and their delivery presentation.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered importance tier for a notification candidate.
///
/// Ordering follows [`PriorityLevel::score`]: `Critical` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    /// Streak warnings, urgent reminders
    Critical,
    /// VIP contacts, close deadlines
    High,
    /// Regular reminders
    Normal,
    /// Suggestions and motivation
    Low,
    /// Background updates
    Minimal,
}

/// How strongly the OS is asked to interrupt the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterruptLevel {
    TimeSensitive,
    Active,
    Passive,
}

/// Sound profile requested for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundLevel {
    /// Plays even when the device is muted
    Critical,
    Loud,
    Normal,
    Soft,
    Silent,
}

impl PriorityLevel {
    /// All levels, most important first.
    pub const ALL: [PriorityLevel; 5] = [
        PriorityLevel::Critical,
        PriorityLevel::High,
        PriorityLevel::Normal,
        PriorityLevel::Low,
        PriorityLevel::Minimal,
    ];

    /// Fixed base score of the level (0.1-1.0).
    pub fn score(self) -> f64 {
        match self {
            PriorityLevel::Critical => 1.0,
            PriorityLevel::High => 0.75,
            PriorityLevel::Normal => 0.5,
            PriorityLevel::Low => 0.25,
            PriorityLevel::Minimal => 0.1,
        }
    }

    pub fn interrupt_level(self) -> InterruptLevel {
        match self {
            PriorityLevel::Critical => InterruptLevel::TimeSensitive,
            PriorityLevel::High | PriorityLevel::Normal => InterruptLevel::Active,
            PriorityLevel::Low | PriorityLevel::Minimal => InterruptLevel::Passive,
        }
    }

    pub fn sound_level(self) -> SoundLevel {
        match self {
            PriorityLevel::Critical => SoundLevel::Critical,
            PriorityLevel::High => SoundLevel::Loud,
            PriorityLevel::Normal => SoundLevel::Normal,
            PriorityLevel::Low => SoundLevel::Soft,
            PriorityLevel::Minimal => SoundLevel::Silent,
        }
    }

    /// Rank consistent with `score` (Minimal = 0, Critical = 4).
    fn rank(self) -> u8 {
        match self {
            PriorityLevel::Critical => 4,
            PriorityLevel::High => 3,
            PriorityLevel::Normal => 2,
            PriorityLevel::Low => 1,
            PriorityLevel::Minimal => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::Critical => "critical",
            PriorityLevel::High => "high",
            PriorityLevel::Normal => "normal",
            PriorityLevel::Low => "low",
            PriorityLevel::Minimal => "minimal",
        }
    }
}

impl Ord for PriorityLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for PriorityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
