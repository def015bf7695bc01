use std::collections::BTreeMap;

use serde::Serialize;

use super::PriorityQueue;
use crate::priority::PriorityLevel;

/// Snapshot of queue contents and today's delivery budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatistics {
    pub total_in_queue: usize,
    pub sent_today: u32,
    pub daily_limit: u32,
    pub remaining_quota: u32,
    pub is_throttling: bool,
    pub level_distribution: BTreeMap<PriorityLevel, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    /// `sent_today / daily_limit`, or 0 when nothing is queued
    pub utilization_rate: f64,
}

impl QueueStatistics {
    pub fn collect(
        queue: &PriorityQueue,
        sent_today: u32,
        daily_limit: u32,
        is_throttling: bool,
    ) -> Self {
        let total_in_queue = queue.len();
        let utilization_rate = if total_in_queue == 0 || daily_limit == 0 {
            0.0
        } else {
            f64::from(sent_today) / f64::from(daily_limit)
        };
        Self {
            total_in_queue,
            sent_today,
            daily_limit,
            remaining_quota: daily_limit.saturating_sub(sent_today),
            is_throttling,
            level_distribution: queue.level_distribution(),
            category_distribution: queue.category_distribution(),
            utilization_rate,
        }
    }
}
