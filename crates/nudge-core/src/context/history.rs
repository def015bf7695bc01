//! Bounded history of recent context snapshots.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};

use super::gate::ContextGate;
use super::user::{LocationType, UserContext};

pub const DEFAULT_MAX_ENTRIES: usize = 100;

const MOST_ACTIVE_HOURS: usize = 4;
const MOST_FREQUENT_LOCATIONS: usize = 3;

/// Newest snapshot first; the oldest falls off past `max_entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextHistory {
    entries: VecDeque<UserContext>,
    max_entries: usize,
}

impl Default for ContextHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ContextHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn add(&mut self, context: UserContext) {
        self.entries.push_front(context);
        self.entries.truncate(self.max_entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &UserContext> {
        self.entries.iter()
    }

    /// Mean notification score of snapshots newer than `minutes` before
    /// `now`; 0.5 when there are none. A window reaching past the
    /// representable range covers every snapshot.
    pub fn average_score<Tz: TimeZone>(&self, minutes: i64, now: &DateTime<Tz>) -> f64 {
        let cutoff = Duration::try_minutes(minutes)
            .and_then(|window| now.fixed_offset().checked_sub_signed(window));
        let scores: Vec<f64> = self
            .entries
            .iter()
            .filter(|c| cutoff.map_or(true, |cutoff| c.timestamp > cutoff))
            .map(ContextGate::notification_score)
            .collect();

        if scores.is_empty() {
            return 0.5;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    /// The four hours seen most often, ascending.
    pub fn most_active_hours(&self) -> Vec<u8> {
        let mut hours = top_by_count(
            self.entries.iter().map(|c| c.time_of_day.hour),
            MOST_ACTIVE_HOURS,
        );
        hours.sort_unstable();
        hours
    }

    /// The three most visited location types, most frequent first.
    pub fn most_frequent_locations(&self) -> Vec<LocationType> {
        top_by_count(
            self.entries
                .iter()
                .filter_map(|c| c.location.as_ref().map(|l| l.location_type)),
            MOST_FREQUENT_LOCATIONS,
        )
    }
}

/// Most frequent values, highest count first. Equal counts keep the order
/// in which values were first seen.
fn top_by_count<T: Copy + Eq + Hash>(values: impl Iterator<Item = T>, n: usize) -> Vec<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (seen, value) in values.enumerate() {
        counts.entry(value).or_insert((0, seen)).0 += 1;
    }
    let mut ranked: Vec<(T, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked.into_iter().take(n).map(|(value, _)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::user::{ActivityContext, FocusContext, FocusMode, LocationContext};
    use chrono::Utc;

    fn at(day: u32, hour: u32) -> UserContext {
        UserContext::at(&Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap())
            .with_activity(ActivityContext::Stationary)
    }

    #[test]
    fn keeps_newest_first_and_bounded() {
        let mut history = ContextHistory::new(3);
        for hour in 8..13 {
            history.add(at(2, hour));
        }
        assert_eq!(history.len(), 3);
        let hours: Vec<u8> = history.entries().map(|c| c.time_of_day.hour).collect();
        assert_eq!(hours, vec![12, 11, 10]);
    }

    #[test]
    fn average_score_is_neutral_without_recent_entries() {
        let history = ContextHistory::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(history.average_score(30, &now), 0.5);
    }

    #[test]
    fn average_score_only_counts_the_window() {
        let mut history = ContextHistory::default();
        history.add(at(2, 8)); // too old
        history.add(at(2, 10)); // 1.0
        history.add(at(2, 11).with_focus(FocusContext::new(FocusMode::DoNotDisturb))); // 0.0

        let now = Utc.with_ymd_and_hms(2026, 3, 2, 11, 30, 0).unwrap();
        assert!((history.average_score(120, &now) - 0.5).abs() < 1e-9);
        assert_eq!(history.average_score(60, &now), 0.0);
    }

    #[test]
    fn average_score_with_unbounded_window_counts_everything() {
        let mut history = ContextHistory::default();
        history.add(at(2, 8));
        history.add(at(2, 10));
        history.add(at(2, 11).with_focus(FocusContext::new(FocusMode::DoNotDisturb)));

        let now = Utc.with_ymd_and_hms(2026, 3, 2, 11, 30, 0).unwrap();
        for minutes in [i64::MAX, i64::MIN, i64::MAX / 60] {
            assert!((history.average_score(minutes, &now) - 2.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn most_active_hours_are_sorted() {
        let mut history = ContextHistory::default();
        for (hour, times) in [(21, 3), (7, 2), (12, 4), (9, 1), (15, 5)] {
            for day in 0..times {
                history.add(at(2 + day, hour));
            }
        }
        assert_eq!(history.most_active_hours(), vec![7, 12, 15, 21]);
    }

    #[test]
    fn most_frequent_locations() {
        let mut history = ContextHistory::default();
        let places = [
            LocationType::Home,
            LocationType::Work,
            LocationType::Home,
            LocationType::Gym,
            LocationType::Home,
            LocationType::Work,
            LocationType::Transit,
        ];
        for place in places {
            history.add(at(2, 10).with_location(LocationContext::new(place)));
        }
        history.add(at(2, 10));

        assert_eq!(
            history.most_frequent_locations(),
            vec![LocationType::Home, LocationType::Work, LocationType::Transit]
        );
    }
}
