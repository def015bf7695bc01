//! Property tests for scoring, queue ordering and timing model bounds.

use std::cmp::Ordering;

use chrono::{Duration, TimeZone, Utc};
use nudge_core::priority::{
    score_contact_at, score_goal_at, score_streak_at, score_suggestion_at, ContactFrequency,
    NotificationPriority, PriorityLevel,
};
use nudge_core::{PriorityQueue, PriorityQueueItem, TimingModel};
use proptest::prelude::*;

fn frequency() -> impl Strategy<Value = ContactFrequency> {
    prop_oneof![
        Just(ContactFrequency::Daily),
        Just(ContactFrequency::TwoDays),
        Just(ContactFrequency::ThreeDays),
        Just(ContactFrequency::Weekly),
        Just(ContactFrequency::Biweekly),
        Just(ContactFrequency::Monthly),
        Just(ContactFrequency::Quarterly),
        Just(ContactFrequency::Yearly),
    ]
}

fn level() -> impl Strategy<Value = PriorityLevel> {
    prop_oneof![
        Just(PriorityLevel::Critical),
        Just(PriorityLevel::High),
        Just(PriorityLevel::Normal),
        Just(PriorityLevel::Low),
        Just(PriorityLevel::Minimal),
    ]
}

fn in_unit(p: &NotificationPriority) -> bool {
    (0.0..=1.0).contains(&p.score()) && (0.0..=1.0).contains(&p.weighted_score())
}

proptest! {
    #[test]
    fn contact_scores_stay_in_unit_range(
        vip in any::<bool>(),
        overdue in any::<i64>(),
        freq in frequency(),
        engagement in any::<f64>(),
    ) {
        let now = Utc::now();
        prop_assert!(in_unit(&score_contact_at(vip, overdue, freq, engagement, now)));
    }

    #[test]
    fn goal_scores_stay_in_unit_range(
        days in any::<i64>(),
        progress in any::<f64>(),
        important in any::<bool>(),
    ) {
        prop_assert!(in_unit(&score_goal_at(days, progress, important, Utc::now())));
    }

    #[test]
    fn streak_scores_stay_in_unit_range(streak in any::<i64>(), hours in any::<i64>()) {
        prop_assert!(in_unit(&score_streak_at(streak, hours, Utc::now())));
    }

    #[test]
    fn suggestion_scores_stay_in_unit_range(context in any::<f64>(), hours in any::<i64>()) {
        prop_assert!(in_unit(&score_suggestion_at(context, hours, Utc::now())));
    }

    #[test]
    fn importance_never_changes_a_goal(days in -30i64..60, progress in 0.0f64..1.0) {
        let now = Utc::now();
        prop_assert_eq!(
            score_goal_at(days, progress, true, now),
            score_goal_at(days, progress, false, now)
        );
    }

    #[test]
    fn queue_pops_in_non_increasing_order(
        items in prop::collection::vec((level(), 0.0f64..1.0, 0i64..120), 1..40),
    ) {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut queue = PriorityQueue::new();
        for (i, (lvl, score, minute)) in items.iter().enumerate() {
            let priority = NotificationPriority::created_at(*lvl, *score, Vec::new(), None, base);
            queue.push(PriorityQueueItem::new(
                format!("n-{i}"),
                "contact",
                priority,
                base + Duration::minutes(*minute),
            ));
        }

        let later = base + Duration::hours(3);
        let mut popped = Vec::new();
        while let Some(item) = queue.pop(later) {
            popped.push(item);
        }
        prop_assert_eq!(popped.len(), items.len());
        for pair in popped.windows(2) {
            prop_assert_ne!(pair[0].dispatch_cmp(&pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn engagement_stays_in_unit_range(
        events in prop::collection::vec((any::<bool>(), 0u32..24, 1u32..29), 0..80),
        decay in 0.0f64..1.0,
    ) {
        let mut model = TimingModel::new("habit");
        for (opened, hour, day) in events {
            let at = Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap();
            model.record_sent_at(at);
            if opened {
                model.record_opened(&at, &at);
            } else {
                model.record_dismissed(&at, &at);
            }
        }
        model.apply_decay(decay);

        let all = model.hourly_engagement().iter().chain(model.weekday_engagement().iter());
        for v in all {
            prop_assert!((0.0..=1.0).contains(v));
        }
        prop_assert!((0.0..=1.0).contains(&model.confidence_score()));
        prop_assert!((0.0..=100.0).contains(&model.engagement_score()));
    }
}
