//! Per-category engagement model.
//!
//! Learns at which hours of the day and days of the week the user opens
//! notifications of one category, using an exponential moving average per
//! hour and per weekday. Weekdays are indexed 0-6 with Sunday = 0.

use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::priority::unit;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// EMA learning rate applied to every engagement update.
pub const LEARNING_RATE: f64 = 0.1;
/// Neutral engagement all slots start from and decay towards.
pub const NEUTRAL_ENGAGEMENT: f64 = 0.5;
/// Decay factor used when none is configured.
pub const DEFAULT_DECAY_FACTOR: f64 = 0.95;

/// Samples needed before predictions are trusted.
const MIN_SAMPLES_FOR_READY: u64 = 10;
const MIN_CONFIDENCE_FOR_READY: f64 = 0.3;
/// Sample count at which the sample factor of confidence saturates.
const CONFIDENCE_SAMPLE_SATURATION: f64 = 50.0;
/// Both the hour and the weekday must be above this for "optimal now".
const OPTIMAL_THRESHOLD: f64 = 0.6;
/// Action rate is not tracked on its own; it is this share of the open rate.
const ACTION_RATE_PROXY: f64 = 0.3;

const HOUR_WEIGHT: f64 = 0.7;
const DAY_WEIGHT: f64 = 0.3;

const OPEN_WEIGHT: f64 = 0.4;
const ACTION_WEIGHT: f64 = 0.3;
const DISMISS_WEIGHT: f64 = 0.3;

const DEFAULT_OPTIMAL_HOURS: [u8; 4] = [9, 12, 15, 18];
const DEFAULT_OPTIMAL_DAYS: [u8; 5] = [1, 2, 3, 4, 5];

/// Online timing model for one notification category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingModel {
    category: String,

    hourly_engagement: [f64; HOURS_PER_DAY],
    weekday_engagement: [f64; DAYS_PER_WEEK],
    optimal_hours: [u8; 4],
    optimal_days: [u8; 5],

    total_samples: u64,
    confidence_score: f64,

    total_sent: u64,
    total_opened: u64,
    total_dismissed: u64,
    average_open_rate: f64,
    average_action_rate: f64,
    /// Seconds between delivery and open
    average_time_to_open: Option<f64>,

    last_notification_time: Option<DateTime<Utc>>,
    last_updated: DateTime<Utc>,
}

impl TimingModel {
    /// Create a model with every slot at neutral engagement.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            hourly_engagement: [NEUTRAL_ENGAGEMENT; HOURS_PER_DAY],
            weekday_engagement: [NEUTRAL_ENGAGEMENT; DAYS_PER_WEEK],
            optimal_hours: DEFAULT_OPTIMAL_HOURS,
            optimal_days: DEFAULT_OPTIMAL_DAYS,
            total_samples: 0,
            confidence_score: 0.0,
            total_sent: 0,
            total_opened: 0,
            total_dismissed: 0,
            average_open_rate: 0.0,
            average_action_rate: 0.0,
            average_time_to_open: None,
            last_notification_time: None,
            last_updated: Utc::now(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn hourly_engagement(&self) -> &[f64; HOURS_PER_DAY] {
        &self.hourly_engagement
    }

    pub fn weekday_engagement(&self) -> &[f64; DAYS_PER_WEEK] {
        &self.weekday_engagement
    }

    /// Four best hours, ascending.
    pub fn optimal_hours(&self) -> &[u8; 4] {
        &self.optimal_hours
    }

    /// Five best weekdays, ascending.
    pub fn optimal_days(&self) -> &[u8; 5] {
        &self.optimal_days
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn total_sent(&self) -> u64 {
        self.total_sent
    }

    pub fn total_opened(&self) -> u64 {
        self.total_opened
    }

    pub fn total_dismissed(&self) -> u64 {
        self.total_dismissed
    }

    pub fn average_open_rate(&self) -> f64 {
        self.average_open_rate
    }

    pub fn average_action_rate(&self) -> f64 {
        self.average_action_rate
    }

    pub fn average_time_to_open(&self) -> Option<f64> {
        self.average_time_to_open
    }

    pub fn last_notification_time(&self) -> Option<DateTime<Utc>> {
        self.last_notification_time
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    // ---- learning ----

    /// A notification of this category was delivered now.
    pub fn record_sent(&mut self) {
        self.record_sent_at(Utc::now());
    }

    pub fn record_sent_at(&mut self, at: DateTime<Utc>) {
        self.total_sent += 1;
        self.last_notification_time = Some(at);
        self.last_updated = at;
    }

    /// The user opened a notification. Hour and weekday are read in the
    /// time zone of `opened_at`.
    pub fn record_opened<Tz: TimeZone>(&mut self, sent_at: &DateTime<Tz>, opened_at: &DateTime<Tz>) {
        self.total_opened += 1;

        let time_to_open = opened_at
            .clone()
            .signed_duration_since(sent_at.clone())
            .num_milliseconds() as f64
            / 1000.0;
        self.average_time_to_open = Some(match self.average_time_to_open {
            Some(current) => (current + time_to_open) / 2.0,
            None => time_to_open,
        });

        self.learn(opened_at, 1.0);
    }

    /// The user dismissed a notification without opening it.
    pub fn record_dismissed<Tz: TimeZone>(
        &mut self,
        _sent_at: &DateTime<Tz>,
        dismissed_at: &DateTime<Tz>,
    ) {
        self.total_dismissed += 1;
        self.learn(dismissed_at, 0.0);
    }

    /// The user acted on a notification; only refreshes the derived metrics.
    pub fn record_action(&mut self) {
        self.update_metrics();
    }

    fn learn<Tz: TimeZone>(&mut self, at: &DateTime<Tz>, target: f64) {
        let hour = at.hour() as usize;
        let day = at.weekday().num_days_from_sunday() as usize;

        self.hourly_engagement[hour] = ema(self.hourly_engagement[hour], target);
        self.weekday_engagement[day] = ema(self.weekday_engagement[day], target);
        tracing::debug!(
            category = %self.category,
            hour,
            day,
            target,
            hourly = self.hourly_engagement[hour],
            weekday = self.weekday_engagement[day],
            "timing model updated"
        );

        self.update_metrics();
        self.total_samples += 1;
        self.last_updated = at.with_timezone(&Utc);
    }

    fn update_metrics(&mut self) {
        if self.total_sent > 0 {
            self.average_open_rate = self.total_opened as f64 / self.total_sent as f64;
        }
        self.average_action_rate = self.average_open_rate * ACTION_RATE_PROXY;

        let sample_factor =
            (self.total_samples as f64 / CONFIDENCE_SAMPLE_SATURATION).min(1.0);
        let engagement_factor = self.engagement_score() / 100.0;
        self.confidence_score = unit((sample_factor + engagement_factor) / 2.0);

        self.optimal_hours = top_indices(&self.hourly_engagement);
        self.optimal_days = top_indices(&self.weekday_engagement);
    }

    // ---- derived ----

    /// Overall engagement (0-100). Zero until something was sent.
    pub fn engagement_score(&self) -> f64 {
        if self.total_sent == 0 {
            return 0.0;
        }
        let sent = self.total_sent as f64;
        let open_rate = self.total_opened as f64 / sent;
        let action_rate = self.total_opened as f64 / sent * self.average_action_rate;
        let dismiss_rate = self.total_dismissed as f64 / sent;

        let score =
            (open_rate * OPEN_WEIGHT + action_rate * ACTION_WEIGHT - dismiss_rate * DISMISS_WEIGHT)
                * 100.0;
        score.clamp(0.0, 100.0)
    }

    /// Enough samples and confidence to trust predictions.
    pub fn is_model_ready(&self) -> bool {
        self.total_samples >= MIN_SAMPLES_FOR_READY
            && self.confidence_score > MIN_CONFIDENCE_FOR_READY
    }

    /// Engagement for an hour of the day; 0.5 for an out-of-range hour.
    pub fn engagement_for_hour(&self, hour: usize) -> f64 {
        self.hourly_engagement
            .get(hour)
            .copied()
            .unwrap_or(NEUTRAL_ENGAGEMENT)
    }

    /// Engagement for a weekday (Sunday = 0); 0.5 when out of range.
    pub fn engagement_for_weekday(&self, weekday: usize) -> f64 {
        self.weekday_engagement
            .get(weekday)
            .copied()
            .unwrap_or(NEUTRAL_ENGAGEMENT)
    }

    /// Combined engagement at a moment: `hour * 0.7 + weekday * 0.3`.
    pub fn engagement_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> f64 {
        let hour_score = self.engagement_for_hour(at.hour() as usize);
        let day_score = self.engagement_for_weekday(at.weekday().num_days_from_sunday() as usize);
        hour_score * HOUR_WEIGHT + day_score * DAY_WEIGHT
    }

    pub fn is_optimal_time_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        self.engagement_for_hour(at.hour() as usize) > OPTIMAL_THRESHOLD
            && self.engagement_for_weekday(at.weekday().num_days_from_sunday() as usize)
                > OPTIMAL_THRESHOLD
    }

    /// Whether the current local hour and weekday both engage well.
    pub fn is_optimal_time_now(&self) -> bool {
        self.is_optimal_time_at(&Local::now())
    }

    /// Best moment among `now`, `now + 1h`, ... for `within_hours` steps.
    ///
    /// The first candidate with the highest score wins. The scan stops at
    /// the end of the representable time range. `None` while the model is
    /// not ready.
    pub fn predict_best_time<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        within_hours: u32,
    ) -> Option<DateTime<Tz>> {
        if !self.is_model_ready() {
            return None;
        }

        let mut best: Option<DateTime<Tz>> = None;
        let mut best_score = 0.0;
        for step in 0..within_hours {
            let Some(candidate) = now
                .clone()
                .checked_add_signed(Duration::hours(i64::from(step)))
            else {
                break;
            };
            let score = self.engagement_at(&candidate);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
        }
        best
    }

    /// Best hour of the day in `start_hour..=end_hour`.
    ///
    /// Each candidate is taken modulo 24 and at most one full day is
    /// scanned, so `22..=2` scans 22, 23, 0, 1, 2 and `9..=33` scans every
    /// hour starting at 9. `None` while the model is not ready.
    pub fn predict_best_hour_between(&self, start_hour: u32, end_hour: u32) -> Option<u8> {
        if !self.is_model_ready() {
            return None;
        }

        let start = u64::from(start_hour);
        let mut end = u64::from(end_hour);
        if end < start {
            end += HOURS_PER_DAY as u64;
        }
        let span = end.saturating_sub(start).min(HOURS_PER_DAY as u64 - 1);

        let mut best_hour = (start % HOURS_PER_DAY as u64) as u8;
        let mut best_score = 0.0;
        for offset in 0..=span {
            let hour = ((start + offset) % HOURS_PER_DAY as u64) as u8;
            let score = self.engagement_for_hour(hour as usize);
            if score > best_score {
                best_score = score;
                best_hour = hour;
            }
        }
        Some(best_hour)
    }

    // ---- maintenance ----

    /// Pull every slot toward neutral: `v * factor + 0.5 * (1 - factor)`.
    /// Confidence decays by the same factor.
    pub fn apply_decay(&mut self, factor: f64) {
        let factor = unit(factor);
        let pull = NEUTRAL_ENGAGEMENT * (1.0 - factor);
        for v in self.hourly_engagement.iter_mut() {
            *v = *v * factor + pull;
        }
        for v in self.weekday_engagement.iter_mut() {
            *v = *v * factor + pull;
        }
        self.confidence_score *= factor;
    }

    /// Forget everything learned. Delivery counters are kept.
    pub fn reset(&mut self) {
        self.hourly_engagement = [NEUTRAL_ENGAGEMENT; HOURS_PER_DAY];
        self.weekday_engagement = [NEUTRAL_ENGAGEMENT; DAYS_PER_WEEK];
        self.total_samples = 0;
        self.confidence_score = 0.0;
        self.last_updated = Utc::now();
        tracing::info!(category = %self.category, "timing model reset");
    }

    /// Re-clamp values that may have been read from storage.
    ///
    /// Returns true when anything had to be corrected.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        let mut fix = |v: &mut f64| {
            let clamped = unit(*v);
            if clamped != *v {
                *v = clamped;
                changed = true;
            }
        };
        self.hourly_engagement.iter_mut().for_each(&mut fix);
        self.weekday_engagement.iter_mut().for_each(&mut fix);
        fix(&mut self.confidence_score);
        fix(&mut self.average_open_rate);
        fix(&mut self.average_action_rate);

        if self.optimal_hours.iter().any(|h| usize::from(*h) >= HOURS_PER_DAY)
            || self.optimal_days.iter().any(|d| usize::from(*d) >= DAYS_PER_WEEK)
        {
            self.optimal_hours = top_indices(&self.hourly_engagement);
            self.optimal_days = top_indices(&self.weekday_engagement);
            changed = true;
        }
        changed
    }
}

fn ema(current: f64, target: f64) -> f64 {
    current + LEARNING_RATE * (target - current)
}

/// Indices of the `K` highest values, returned ascending. Ties keep the
/// lower index.
fn top_indices<const N: usize, const K: usize>(values: &[f64; N]) -> [u8; K] {
    let mut ranked: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut top: Vec<u8> = ranked.iter().take(K).map(|(i, _)| *i as u8).collect();
    top.sort_unstable();

    let mut out = [0u8; K];
    out.copy_from_slice(&top);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    /// Monday 2026-03-02 at `hour`:00 UTC.
    fn monday_at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn new_model_is_neutral() {
        let model = TimingModel::new("contact");
        assert!(model.hourly_engagement().iter().all(|v| *v == 0.5));
        assert!(model.weekday_engagement().iter().all(|v| *v == 0.5));
        assert_eq!(model.optimal_hours(), &[9, 12, 15, 18]);
        assert_eq!(model.optimal_days(), &[1, 2, 3, 4, 5]);
        assert!(!model.is_model_ready());
        assert_eq!(model.engagement_score(), 0.0);
    }

    #[test]
    fn open_moves_hour_towards_one() {
        let mut model = TimingModel::new("contact");
        let at = monday_at(9);
        model.record_sent_at(at);
        model.record_opened(&at, &at);
        assert!((model.hourly_engagement()[9] - 0.55).abs() < 1e-9);
        assert!((model.weekday_engagement()[1] - 0.55).abs() < 1e-9);

        model.record_opened(&at, &at);
        assert!((model.hourly_engagement()[9] - 0.595).abs() < 1e-9);
        assert_eq!(model.total_samples(), 2);
    }

    #[test]
    fn dismiss_moves_hour_towards_zero() {
        let mut model = TimingModel::new("goal");
        let at = monday_at(22);
        model.record_dismissed(&at, &at);
        assert!((model.hourly_engagement()[22] - 0.45).abs() < 1e-9);
        assert_eq!(model.total_dismissed(), 1);
        assert_eq!(model.total_samples(), 1);
    }

    #[test]
    fn hour_is_read_in_the_timestamp_zone() {
        let mut model = TimingModel::new("habit");
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        // 07:00 UTC is 09:00 at +02:00
        let at = monday_at(7).with_timezone(&plus_two);
        model.record_opened(&at, &at);
        assert!(model.hourly_engagement()[9] > 0.5);
        assert_eq!(model.hourly_engagement()[7], 0.5);
    }

    #[test]
    fn time_to_open_is_a_two_point_average() {
        let mut model = TimingModel::new("contact");
        let sent = monday_at(9);
        model.record_opened(&sent, &(sent + Duration::seconds(60)));
        assert_eq!(model.average_time_to_open(), Some(60.0));
        model.record_opened(&sent, &(sent + Duration::seconds(120)));
        assert_eq!(model.average_time_to_open(), Some(90.0));
        model.record_opened(&sent, &(sent + Duration::seconds(30)));
        assert_eq!(model.average_time_to_open(), Some(60.0));
    }

    #[test]
    fn metrics_follow_counters() {
        let mut model = TimingModel::new("contact");
        let at = monday_at(10);
        for _ in 0..4 {
            model.record_sent_at(at);
        }
        model.record_opened(&at, &at);
        model.record_dismissed(&at, &at);

        assert!((model.average_open_rate() - 0.25).abs() < 1e-12);
        assert!((model.average_action_rate() - 0.075).abs() < 1e-12);
        // open 0.25*0.4 + action 0.25*0.075*0.3 - dismiss 0.25*0.3
        let expected = (0.1 + 0.25 * 0.075 * 0.3 - 0.075) * 100.0;
        assert!((model.engagement_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn engagement_score_is_clamped_at_zero() {
        let mut model = TimingModel::new("suggestion");
        let at = monday_at(10);
        model.record_sent_at(at);
        model.record_dismissed(&at, &at);
        assert_eq!(model.engagement_score(), 0.0);
    }

    #[test]
    fn optimal_hours_track_engagement() {
        let mut model = TimingModel::new("contact");
        for hour in [7, 13, 20, 21] {
            let at = monday_at(hour);
            model.record_sent_at(at);
            model.record_opened(&at, &at);
        }
        assert_eq!(model.optimal_hours(), &[7, 13, 20, 21]);
    }

    #[test]
    fn optimal_hours_ties_prefer_lower_index() {
        let mut model = TimingModel::new("contact");
        let at = monday_at(23);
        model.record_sent_at(at);
        model.record_opened(&at, &at);
        // 23 leads, then hours 0, 1, 2 tie at neutral
        assert_eq!(model.optimal_hours(), &[0, 1, 2, 23]);
    }

    #[test]
    fn readiness_needs_samples_and_confidence() {
        let mut model = TimingModel::new("contact");
        let at = monday_at(9);
        for _ in 0..12 {
            model.record_sent_at(at);
        }
        for _ in 0..10 {
            model.record_opened(&at, &at);
        }
        // ten samples, but confidence still below 0.3
        assert_eq!(model.total_samples(), 10);
        assert!(model.confidence_score() < 0.3);
        assert!(!model.is_model_ready());

        model.record_opened(&at, &at);
        model.record_opened(&at, &at);
        assert!(model.is_model_ready());
    }

    fn ready_model() -> TimingModel {
        let mut model = TimingModel::new("contact");
        let good = monday_at(18);
        for _ in 0..12 {
            model.record_sent_at(good);
        }
        for _ in 0..12 {
            model.record_opened(&good, &good);
        }
        assert!(model.is_model_ready());
        model
    }

    #[test]
    fn predict_best_time_requires_readiness() {
        let model = TimingModel::new("contact");
        assert!(model.predict_best_time(&monday_at(8), 24).is_none());
        assert!(model.predict_best_hour_between(8, 20).is_none());
    }

    #[test]
    fn predict_best_time_finds_learned_hour() {
        let model = ready_model();
        let now = monday_at(8);
        let best = model.predict_best_time(&now, 24).unwrap();
        assert_eq!(best, monday_at(18));
    }

    #[test]
    fn predict_best_time_outside_window_takes_first_candidate() {
        let model = ready_model();
        let now = monday_at(8);
        // 18:00 is out of reach; all hours tie, the first wins
        assert_eq!(model.predict_best_time(&now, 4), Some(now));
        assert_eq!(model.predict_best_time(&now, 0), None);
    }

    #[test]
    fn predict_best_hour_between_wraps() {
        let model = ready_model();
        assert_eq!(model.predict_best_hour_between(12, 20), Some(18));
        assert_eq!(model.predict_best_hour_between(20, 2), Some(20));
        assert_eq!(model.predict_best_hour_between(17, 43), Some(18));
    }

    #[test]
    fn predict_best_hour_between_scans_ranges_past_midnight() {
        let model = ready_model();
        assert_eq!(model.predict_best_hour_between(9, 33), Some(18));
        assert_eq!(model.predict_best_hour_between(0, 24), Some(18));
        assert_eq!(model.predict_best_hour_between(19, 42), Some(18));
        // 19..=41 stops one hour short of 18 on the next day
        assert_eq!(model.predict_best_hour_between(19, 41), Some(19));
        assert!(model.predict_best_hour_between(u32::MAX, 3).is_some());
    }

    #[test]
    fn predict_best_time_stops_at_the_end_of_time() {
        let model = ready_model();
        let now = DateTime::<Utc>::MAX_UTC - Duration::hours(2);
        let best = model.predict_best_time(&now, 5).unwrap();
        assert!(best >= now);
        assert!(best <= DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn engagement_at_weights_hour_and_weekday() {
        let mut model = TimingModel::new("contact");
        model.hourly_engagement[9] = 0.8;
        model.weekday_engagement[1] = 0.4;
        // 0.8 * 0.7 + 0.4 * 0.3
        assert!((model.engagement_at(&monday_at(9)) - 0.68).abs() < 1e-12);
        // untouched hour on the same day: 0.5 * 0.7 + 0.4 * 0.3
        assert!((model.engagement_at(&monday_at(10)) - 0.47).abs() < 1e-12);
    }

    #[test]
    fn optimal_time_needs_both_axes_strictly_above_threshold() {
        let mut model = TimingModel::new("contact");
        model.hourly_engagement[9] = 0.7;
        model.weekday_engagement[1] = 0.6;
        assert!(!model.is_optimal_time_at(&monday_at(9)));

        model.hourly_engagement[9] = 0.6;
        model.weekday_engagement[1] = 0.7;
        assert!(!model.is_optimal_time_at(&monday_at(9)));

        model.hourly_engagement[9] = 0.61;
        assert!(model.is_optimal_time_at(&monday_at(9)));
        assert!(!model.is_optimal_time_at(&monday_at(10)));
    }

    #[test]
    fn optimal_time_now_reads_the_local_clock() {
        let mut model = TimingModel::new("contact");
        assert!(!model.is_optimal_time_now());

        model.hourly_engagement = [0.9; HOURS_PER_DAY];
        model.weekday_engagement = [0.9; DAYS_PER_WEEK];
        assert!(model.is_optimal_time_now());
    }

    #[test]
    fn decay_pulls_towards_neutral() {
        let mut model = TimingModel::new("contact");
        model.hourly_engagement[5] = 1.0;
        model.weekday_engagement[0] = 0.0;
        model.confidence_score = 0.8;

        model.apply_decay(DEFAULT_DECAY_FACTOR);
        assert!((model.hourly_engagement()[5] - 0.975).abs() < 1e-12);
        assert!((model.weekday_engagement()[0] - 0.025).abs() < 1e-12);
        assert!((model.hourly_engagement()[6] - 0.5).abs() < 1e-12);
        assert!((model.confidence_score() - 0.76).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_learning_but_keeps_counters() {
        let mut model = ready_model();
        model.reset();
        assert!(model.hourly_engagement().iter().all(|v| *v == 0.5));
        assert_eq!(model.total_samples(), 0);
        assert_eq!(model.confidence_score(), 0.0);
        assert_eq!(model.total_sent(), 12);
        assert!(!model.is_model_ready());
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut model = TimingModel::new("contact");
        model.hourly_engagement[3] = 1.7;
        model.weekday_engagement[2] = f64::NAN;
        model.optimal_hours = [9, 12, 15, 99];
        assert!(model.sanitize());
        assert_eq!(model.hourly_engagement()[3], 1.0);
        assert_eq!(model.weekday_engagement()[2], 0.0);
        assert!(model.optimal_hours().iter().all(|h| *h < 24));
        assert!(!model.sanitize());
    }

    #[test]
    fn engagement_lookups_tolerate_bad_indices() {
        let model = TimingModel::new("contact");
        assert_eq!(model.engagement_for_hour(24), 0.5);
        assert_eq!(model.engagement_for_weekday(9), 0.5);
    }
}
