use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::priority::NotificationPriority;

/// A scored candidate waiting for delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityQueueItem {
    pub id: Uuid,
    pub notification_id: String,
    pub priority: NotificationPriority,
    /// Earliest moment the item should be delivered
    pub scheduled_time: DateTime<Utc>,
    pub category: String,
}

impl PriorityQueueItem {
    pub fn new(
        notification_id: impl Into<String>,
        category: impl Into<String>,
        priority: NotificationPriority,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_id: notification_id.into(),
            priority,
            scheduled_time,
            category: category.into(),
        }
    }

    /// Dispatch order: `Greater` goes first.
    ///
    /// Level descending, then weighted score descending, then scheduled
    /// time ascending.
    pub fn dispatch_cmp(&self, other: &Self) -> Ordering {
        self.priority
            .level()
            .cmp(&other.priority.level())
            .then_with(|| {
                self.priority
                    .weighted_score()
                    .total_cmp(&other.priority.weighted_score())
            })
            .then_with(|| other.scheduled_time.cmp(&self.scheduled_time))
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_time <= now
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.priority.is_valid_at(now)
    }
}
