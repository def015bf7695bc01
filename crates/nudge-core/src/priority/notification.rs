//! Immutable priority verdict attached to a notification candidate.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::factor::PriorityFactorScore;
use super::level::PriorityLevel;
use super::unit;

/// Share of the raw score in [`NotificationPriority::weighted_score`].
const RAW_SCORE_SHARE: f64 = 0.6;
/// Share of the summed factor contributions in the weighted score.
const FACTOR_SHARE: f64 = 0.4;

/// Level, score and factor breakdown for one candidate notification.
///
/// Fields are private: the score is clamped to [0, 1] on construction and
/// the value never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPriority {
    level: PriorityLevel,
    score: f64,
    factors: Vec<PriorityFactorScore>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl NotificationPriority {
    /// Build a priority stamped with the current time.
    pub fn new(
        level: PriorityLevel,
        score: f64,
        factors: Vec<PriorityFactorScore>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self::created_at(level, score, factors, expires_at, Utc::now())
    }

    /// Build a priority with an explicit creation time.
    pub fn created_at(
        level: PriorityLevel,
        score: f64,
        factors: Vec<PriorityFactorScore>,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            score: unit(score),
            factors,
            expires_at,
            created_at,
        }
    }

    pub fn level(&self) -> PriorityLevel {
        self.level
    }

    /// Raw score (0.0-1.0)
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn factors(&self) -> &[PriorityFactorScore] {
        &self.factors
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Score on a 0-100 scale.
    pub fn priority_score(&self) -> f64 {
        self.score * 100.0
    }

    /// Sum of every factor's `value * weight`.
    pub fn factor_total(&self) -> f64 {
        self.factors.iter().map(PriorityFactorScore::contribution).sum()
    }

    /// `score * 0.6 + sum(contribution) * 0.4`, kept within [0, 1].
    pub fn weighted_score(&self) -> f64 {
        unit(self.score * RAW_SCORE_SHARE + self.factor_total() * FACTOR_SHARE)
    }

    /// True while `now` is before the expiry; priorities without expiry never lapse.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}
