//! Scheduler glue between scoring, timing, context and the queue.
//!
//! The [`Dispatcher`] schedules candidates at their category's predicted
//! best time, hands out at most one notification per `dispatch` call, and
//! enforces the daily limit and the minimum interval between deliveries.
//! Delivery feedback flows back into the [`TimingCoordinator`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::context::{
    ContextGate, ContextRuleSet, FocusMode, GateDecision, RuleAction, UserContext,
};
use crate::error::Result;
use crate::events::DeliveryEvent;
use crate::priority::{NotificationPriority, PriorityLevel};
use crate::queue::{PriorityQueue, PriorityQueueItem, QueueStatistics};
use crate::storage::{Config, DispatchConfig, TimingConfig};
use crate::timing::TimingCoordinator;

/// Why an item was kept in the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum HoldReason {
    /// A context rule refuses the item's level
    Rule { action: RuleAction },
    /// The focus mode refuses the item's level
    Focus { mode: FocusMode },
    /// The context score is too low for the item's level
    Context { notification_score: f64 },
}

/// Result of one [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome")]
pub enum DispatchOutcome {
    /// Today's delivery budget is spent
    QuotaExhausted,
    /// The previous delivery was too recent
    Throttled { retry_after: DateTime<Utc> },
    /// Nothing is due
    Idle,
    /// A defer rule pushed the item back; it is queued again at `until`
    Deferred {
        item: PriorityQueueItem,
        until: DateTime<Utc>,
    },
    /// No due item may be delivered now; this is the first one refused
    Held {
        item: PriorityQueueItem,
        reason: HoldReason,
    },
    Delivered(PriorityQueueItem),
}

#[derive(Debug)]
struct DailyLedger {
    day: NaiveDate,
    sent_today: u32,
    last_sent: Option<DateTime<Utc>>,
}

impl DailyLedger {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            day: now.date_naive(),
            sent_today: 0,
            last_sent: None,
        }
    }

    fn roll(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if today != self.day {
            tracing::info!(previous = %self.day, sent = self.sent_today, "daily quota reset");
            self.day = today;
            self.sent_today = 0;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Dispatcher {
    queue: Mutex<PriorityQueue>,
    ledger: Mutex<DailyLedger>,
    timing: Arc<TimingCoordinator>,
    rules: ContextRuleSet,
    policy: DispatchConfig,
    timing_config: TimingConfig,
}

impl Dispatcher {
    pub fn new(config: &Config, timing: Arc<TimingCoordinator>) -> Self {
        Self {
            queue: Mutex::new(PriorityQueue::new()),
            ledger: Mutex::new(DailyLedger::new(Utc::now())),
            timing,
            rules: config.rule_set(),
            policy: config.dispatch.clone(),
            timing_config: config.timing.clone(),
        }
    }

    pub fn with_rules(mut self, rules: ContextRuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &ContextRuleSet {
        &self.rules
    }

    pub fn timing(&self) -> &Arc<TimingCoordinator> {
        &self.timing
    }

    pub fn daily_limit(&self) -> u32 {
        self.policy.effective_daily_limit()
    }

    /// Earliest moment the next delivery may happen after one at `last`.
    fn retry_after(&self, last: DateTime<Utc>) -> DateTime<Utc> {
        i64::try_from(self.policy.minimum_interval_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|interval| last.checked_add_signed(interval))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// When a candidate should go out.
    ///
    /// Critical items go now when timing bypass is on. Otherwise the
    /// category's model picks the best hour before the item expires, falling
    /// back to `now` while the model is not ready.
    pub fn schedule_for<Tz: TimeZone>(
        &self,
        category: &str,
        priority: &NotificationPriority,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<Utc>> {
        let now_utc = now.with_timezone(&Utc);
        if priority.level() == PriorityLevel::Critical && self.policy.bypass_timing_for_critical {
            return Ok(now_utc);
        }
        if !self.timing_config.adaptive_scheduling {
            return Ok(now_utc);
        }

        let mut window = self.timing_config.prediction_window_hours;
        if let Some(expires_at) = priority.expires_at() {
            let hours_left = (expires_at - now_utc).num_hours().max(0);
            window = window.min(u32::try_from(hours_left).unwrap_or(u32::MAX));
        }

        let best = self.timing.predict_best_time(category, now, window)?;
        Ok(best.map_or(now_utc, |t| t.with_timezone(&Utc)))
    }

    /// Score-to-queue step: schedule the candidate and queue it.
    pub fn enqueue<Tz: TimeZone>(
        &self,
        notification_id: impl Into<String>,
        category: impl Into<String>,
        priority: NotificationPriority,
        now: &DateTime<Tz>,
    ) -> Result<PriorityQueueItem> {
        let category = category.into();
        let scheduled = self.schedule_for(&category, &priority, now)?;
        let item = PriorityQueueItem::new(notification_id, category, priority, scheduled);
        lock(&self.queue).push(item.clone());
        Ok(item)
    }

    /// Hand out the best admissible notification, if any.
    ///
    /// Counts a delivery against the daily limit and records it on the
    /// category's timing model. A failure to record is logged; the item is
    /// still reported as delivered.
    pub fn dispatch<Tz: TimeZone>(
        &self,
        context: &UserContext,
        now: &DateTime<Tz>,
    ) -> Result<DispatchOutcome> {
        let now = now.with_timezone(&Utc);
        let mut ledger = lock(&self.ledger);
        ledger.roll(now);

        if ledger.sent_today >= self.daily_limit() {
            return Ok(DispatchOutcome::QuotaExhausted);
        }
        if let Some(last) = ledger.last_sent {
            let retry_after = self.retry_after(last);
            if now < retry_after {
                return Ok(DispatchOutcome::Throttled { retry_after });
            }
        }

        let action = self.rules.resolve(context);
        let mut gate = ContextGate::evaluate(context);
        if let Some(RuleAction::Throttle { factor }) = action {
            gate = gate.throttled(factor);
        }

        let mut queue = lock(&self.queue);

        if let Some(RuleAction::Defer { minutes }) = action {
            let Some(mut item) = queue.pop_due(now) else {
                return Ok(DispatchOutcome::Idle);
            };
            let until = now
                .checked_add_signed(Duration::minutes(i64::from(minutes)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            item.scheduled_time = until;
            tracing::info!(
                id = %item.id,
                category = %item.category,
                %until,
                "deferred notification"
            );
            queue.push(item.clone());
            return Ok(DispatchOutcome::Deferred { item, until });
        }

        let mut held: Vec<(PriorityQueueItem, HoldReason)> = Vec::new();
        let mut delivered = None;
        while let Some(item) = queue.pop_due(now) {
            match refusal(&item, action.as_ref(), &gate, context) {
                Some(reason) => held.push((item, reason)),
                None => {
                    delivered = Some(item);
                    break;
                }
            }
        }

        let first_held = held.first().cloned();
        for (item, _) in held {
            queue.push(item);
        }

        let Some(item) = delivered else {
            return Ok(match first_held {
                Some((item, reason)) => DispatchOutcome::Held { item, reason },
                None => DispatchOutcome::Idle,
            });
        };

        ledger.sent_today += 1;
        ledger.last_sent = Some(now);
        tracing::info!(
            id = %item.id,
            category = %item.category,
            level = %item.priority.level(),
            sent_today = ledger.sent_today,
            "delivered notification"
        );
        if let Err(e) = self.timing.record_sent(&item.category, now) {
            tracing::warn!(
                id = %item.id,
                category = %item.category,
                error = %e,
                "delivery not recorded on timing model"
            );
        }
        Ok(DispatchOutcome::Delivered(item))
    }

    pub fn record_opened<Tz: TimeZone>(
        &self,
        category: &str,
        sent_at: &DateTime<Tz>,
        opened_at: &DateTime<Tz>,
    ) -> Result<()> {
        self.timing.record_opened(category, sent_at, opened_at)
    }

    pub fn record_dismissed<Tz: TimeZone>(
        &self,
        category: &str,
        sent_at: &DateTime<Tz>,
        dismissed_at: &DateTime<Tz>,
    ) -> Result<()> {
        self.timing.record_dismissed(category, sent_at, dismissed_at)
    }

    /// Feed a delivery outcome back into timing.
    pub fn apply(&self, event: &DeliveryEvent) -> Result<()> {
        self.timing.apply(event)
    }

    /// Age every timing model by the configured decay factor.
    pub fn apply_decay(&self) -> Result<()> {
        self.timing.apply_decay_all(self.timing_config.decay_factor)
    }

    pub fn remaining_quota(&self, now: DateTime<Utc>) -> u32 {
        let mut ledger = lock(&self.ledger);
        ledger.roll(now);
        self.daily_limit().saturating_sub(ledger.sent_today)
    }

    pub fn is_throttling(&self, now: DateTime<Utc>) -> bool {
        lock(&self.ledger)
            .last_sent
            .is_some_and(|last| now < self.retry_after(last))
    }

    pub fn statistics(&self, now: DateTime<Utc>) -> QueueStatistics {
        let throttling = self.is_throttling(now);
        let sent_today = {
            let mut ledger = lock(&self.ledger);
            ledger.roll(now);
            ledger.sent_today
        };
        QueueStatistics::collect(&lock(&self.queue), sent_today, self.daily_limit(), throttling)
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Queued items in dispatch order.
    pub fn pending(&self) -> Vec<PriorityQueueItem> {
        lock(&self.queue).items_sorted().into_iter().cloned().collect()
    }

    pub fn clear(&self) {
        lock(&self.queue).clear();
    }

    pub fn clear_category(&self, category: &str) -> usize {
        let removed = lock(&self.queue).remove_category(category);
        tracing::info!(category, removed, "cleared queued notifications");
        removed
    }

    pub fn reprioritize(&self, category: &str, priority: &NotificationPriority) -> usize {
        lock(&self.queue).reprioritize(category, priority)
    }

    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        lock(&self.queue).sweep_expired(now)
    }
}

/// Why `item` may not go out now, or `None` when it may.
fn refusal(
    item: &PriorityQueueItem,
    action: Option<&RuleAction>,
    gate: &GateDecision,
    context: &UserContext,
) -> Option<HoldReason> {
    let level = item.priority.level();
    if let Some(action) = action.filter(|a| !a.permits(level)) {
        return Some(HoldReason::Rule {
            action: action.clone(),
        });
    }
    if !context.focus.should_allow(level) {
        return Some(HoldReason::Focus {
            mode: context.focus.mode,
        });
    }
    if !gate.admits(level) {
        return Some(HoldReason::Context {
            notification_score: gate.notification_score,
        });
    }
    None
}
