//! Snapshot of the user's situation at one moment.

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::priority::{unit, PriorityLevel};

/// Where the user currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Home,
    Work,
    Gym,
    Restaurant,
    Outdoor,
    Transit,
    Unknown,
}

impl LocationType {
    /// How welcome a notification is at this kind of place (0-1).
    pub fn friendliness(self) -> f64 {
        match self {
            LocationType::Home => 1.0,
            LocationType::Work => 0.6,
            LocationType::Gym => 0.4,
            LocationType::Restaurant => 0.5,
            LocationType::Outdoor => 0.7,
            LocationType::Transit => 0.3,
            LocationType::Unknown => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub location_type: LocationType,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub is_moving: bool,
}

impl LocationContext {
    pub fn new(location_type: LocationType) -> Self {
        Self {
            location_type,
            place_name: None,
            is_moving: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub is_all_day: bool,
}

impl CalendarEvent {
    pub fn is_happening_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }
}

/// Calendar state as reported by the calendar provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarContext {
    pub is_busy: bool,
    #[serde(default)]
    pub current_event: Option<CalendarEvent>,
    #[serde(default)]
    pub next_event: Option<CalendarEvent>,
    #[serde(default)]
    pub minutes_until_next_event: Option<i64>,
}

/// Next event counts as upcoming within this many minutes.
const UPCOMING_EVENT_MINUTES: i64 = 15;

impl CalendarContext {
    pub fn busy() -> Self {
        Self {
            is_busy: true,
            ..Self::default()
        }
    }

    pub fn has_upcoming_event(&self) -> bool {
        self.minutes_until_next_event
            .is_some_and(|m| m <= UPCOMING_EVENT_MINUTES)
    }

    /// Whole minutes until the current event ends; `None` without one.
    pub fn minutes_until_free(&self, now: DateTime<Utc>) -> Option<i64> {
        self.current_event
            .as_ref()
            .map(|event| (event.end - now).num_minutes().max(0))
    }
}

/// Detected motion activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityContext {
    Stationary,
    Walking,
    Running,
    Cycling,
    Driving,
    #[default]
    Unknown,
}

/// OS focus mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    #[default]
    None,
    DoNotDisturb,
    Sleep,
    Work,
    Personal,
    Driving,
    Custom,
}

impl FocusMode {
    pub fn allows_time_sensitive_by_default(self) -> bool {
        !matches!(
            self,
            FocusMode::DoNotDisturb | FocusMode::Sleep | FocusMode::Driving
        )
    }

    /// Critical alerts pass every focus mode unless the user says otherwise.
    pub fn allows_critical_by_default(self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusContext {
    pub mode: FocusMode,
    pub allows_time_sensitive: bool,
    pub allows_critical: bool,
}

impl FocusContext {
    /// Focus mode with its default allowances.
    pub fn new(mode: FocusMode) -> Self {
        Self {
            mode,
            allows_time_sensitive: mode.allows_time_sensitive_by_default(),
            allows_critical: mode.allows_critical_by_default(),
        }
    }

    /// Whether the focus mode itself lets a notification of `level` through.
    pub fn should_allow(&self, level: PriorityLevel) -> bool {
        match level {
            PriorityLevel::Critical => self.allows_critical,
            PriorityLevel::High => self.allows_time_sensitive || self.mode == FocusMode::None,
            PriorityLevel::Normal => matches!(
                self.mode,
                FocusMode::None | FocusMode::Work | FocusMode::Personal
            ),
            PriorityLevel::Low | PriorityLevel::Minimal => self.mode == FocusMode::None,
        }
    }
}

impl Default for FocusContext {
    fn default() -> Self {
        Self::new(FocusMode::None)
    }
}

/// Coarse part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    /// 05:00-08:00
    EarlyMorning,
    /// 08:00-12:00
    Morning,
    /// 12:00-17:00
    Afternoon,
    /// 17:00-21:00
    Evening,
    /// 21:00-24:00
    Night,
    /// 00:00-05:00
    LateNight,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=7 => DayPeriod::EarlyMorning,
            8..=11 => DayPeriod::Morning,
            12..=16 => DayPeriod::Afternoon,
            17..=20 => DayPeriod::Evening,
            21..=23 => DayPeriod::Night,
            _ => DayPeriod::LateNight,
        }
    }

    /// Base appropriateness of notifying during this period.
    pub fn friendliness(self) -> f64 {
        match self {
            DayPeriod::EarlyMorning => 0.3,
            DayPeriod::Morning => 1.0,
            DayPeriod::Afternoon => 0.9,
            DayPeriod::Evening => 0.8,
            DayPeriod::Night => 0.4,
            DayPeriod::LateNight => 0.1,
        }
    }
}

const WEEKEND_BONUS: f64 = 1.1;
const QUIET_HOURS_END: u8 = 8;
const QUIET_HOURS_START: u8 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayContext {
    /// 0-23
    pub hour: u8,
    /// 0-6, Sunday = 0
    pub weekday: u8,
    pub is_weekend: bool,
    pub period: DayPeriod,
}

impl TimeOfDayContext {
    /// Hour and weekday are wrapped into range.
    pub fn new(hour: u32, weekday: u32) -> Self {
        let hour = hour % 24;
        let weekday = weekday % 7;
        Self {
            hour: hour as u8,
            weekday: weekday as u8,
            is_weekend: weekday == 0 || weekday == 6,
            period: DayPeriod::from_hour(hour),
        }
    }

    /// Read hour and weekday in the time zone of `at`.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::new(at.hour(), at.weekday().num_days_from_sunday())
    }

    /// Period friendliness with the weekend bonus, capped at 1.0.
    pub fn appropriateness(&self) -> f64 {
        let mut score = self.period.friendliness();
        if self.is_weekend {
            score *= WEEKEND_BONUS;
        }
        score.min(1.0)
    }

    /// 22:00-08:00
    pub fn is_quiet_hours(&self) -> bool {
        self.hour < QUIET_HOURS_END || self.hour >= QUIET_HOURS_START
    }
}

const THROTTLE_LEVEL: f64 = 0.2;
const AGGRESSIVE_THROTTLE_LEVEL: f64 = 0.1;

/// Battery state. The level is clamped to [0, 1] on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BatteryReading")]
pub struct BatteryContext {
    level: f64,
    is_charging: bool,
    is_low_power_mode: bool,
}

#[derive(Deserialize)]
struct BatteryReading {
    level: f64,
    #[serde(default)]
    is_charging: bool,
    #[serde(default)]
    is_low_power_mode: bool,
}

impl From<BatteryReading> for BatteryContext {
    fn from(r: BatteryReading) -> Self {
        Self::new(r.level, r.is_charging, r.is_low_power_mode)
    }
}

impl BatteryContext {
    pub fn new(level: f64, is_charging: bool, is_low_power_mode: bool) -> Self {
        Self {
            level: unit(level),
            is_charging,
            is_low_power_mode,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn is_low_power_mode(&self) -> bool {
        self.is_low_power_mode
    }

    pub fn is_low(&self) -> bool {
        self.level < THROTTLE_LEVEL
    }

    pub fn should_throttle(&self) -> bool {
        self.is_low() && !self.is_charging
    }

    pub fn should_aggressively_throttle(&self) -> bool {
        (self.level < AGGRESSIVE_THROTTLE_LEVEL || self.is_low_power_mode) && !self.is_charging
    }
}

/// Everything the gate looks at, captured once per evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default)]
    pub location: Option<LocationContext>,
    #[serde(default)]
    pub calendar: Option<CalendarContext>,
    #[serde(default)]
    pub activity: ActivityContext,
    #[serde(default)]
    pub focus: FocusContext,
    pub time_of_day: TimeOfDayContext,
    #[serde(default)]
    pub battery: Option<BatteryContext>,
}

impl UserContext {
    /// Context at `timestamp` with nothing known besides the time.
    pub fn at<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self {
            timestamp: timestamp.fixed_offset(),
            location: None,
            calendar: None,
            activity: ActivityContext::default(),
            focus: FocusContext::default(),
            time_of_day: TimeOfDayContext::from_datetime(timestamp),
            battery: None,
        }
    }

    /// Context at the current local time.
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn with_location(mut self, location: LocationContext) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarContext) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_activity(mut self, activity: ActivityContext) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_focus(mut self, focus: FocusContext) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_battery(mut self, battery: BatteryContext) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn is_calendar_busy(&self) -> bool {
        self.calendar.as_ref().is_some_and(|c| c.is_busy)
    }

    pub fn is_battery_low(&self) -> bool {
        self.battery.as_ref().is_some_and(BatteryContext::is_low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn day_periods_cover_the_clock() {
        assert_eq!(DayPeriod::from_hour(4), DayPeriod::LateNight);
        assert_eq!(DayPeriod::from_hour(5), DayPeriod::EarlyMorning);
        assert_eq!(DayPeriod::from_hour(8), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(17), DayPeriod::Evening);
        assert_eq!(DayPeriod::from_hour(21), DayPeriod::Night);
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::LateNight);
    }

    #[test]
    fn weekend_bonus_is_capped() {
        // 2026-03-01 is a Sunday
        let sunday_morning = TimeOfDayContext::from_datetime(&utc(2026, 3, 1, 9));
        assert!(sunday_morning.is_weekend);
        assert_eq!(sunday_morning.weekday, 0);
        assert_eq!(sunday_morning.appropriateness(), 1.0);

        let saturday_evening = TimeOfDayContext::new(18, 6);
        assert!((saturday_evening.appropriateness() - 0.88).abs() < 1e-9);

        let monday_evening = TimeOfDayContext::new(18, 1);
        assert!(!monday_evening.is_weekend);
        assert!((monday_evening.appropriateness() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn time_of_day_uses_the_timestamp_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        // 23:00 UTC on Saturday is 08:00 Sunday in Tokyo
        let at = utc(2026, 2, 28, 23).with_timezone(&tokyo);
        let tod = TimeOfDayContext::from_datetime(&at);
        assert_eq!(tod.hour, 8);
        assert_eq!(tod.weekday, 0);
        assert_eq!(tod.period, DayPeriod::Morning);
    }

    #[test]
    fn quiet_hours() {
        assert!(TimeOfDayContext::new(7, 1).is_quiet_hours());
        assert!(!TimeOfDayContext::new(8, 1).is_quiet_hours());
        assert!(!TimeOfDayContext::new(21, 1).is_quiet_hours());
        assert!(TimeOfDayContext::new(22, 1).is_quiet_hours());
    }

    #[test]
    fn focus_allowances() {
        let dnd = FocusContext::new(FocusMode::DoNotDisturb);
        assert!(dnd.should_allow(PriorityLevel::Critical));
        assert!(!dnd.should_allow(PriorityLevel::High));
        assert!(!dnd.should_allow(PriorityLevel::Normal));

        let work = FocusContext::new(FocusMode::Work);
        assert!(work.should_allow(PriorityLevel::High));
        assert!(work.should_allow(PriorityLevel::Normal));
        assert!(!work.should_allow(PriorityLevel::Low));

        let none = FocusContext::default();
        assert!(PriorityLevel::ALL.iter().all(|l| none.should_allow(*l)));
    }

    #[test]
    fn battery_thresholds() {
        let low = BatteryContext::new(0.15, false, false);
        assert!(low.should_throttle());
        assert!(!low.should_aggressively_throttle());

        let plugged = BatteryContext::new(0.05, true, true);
        assert!(!plugged.should_throttle());
        assert!(!plugged.should_aggressively_throttle());

        let saver = BatteryContext::new(0.8, false, true);
        assert!(saver.should_aggressively_throttle());
    }

    #[test]
    fn battery_level_is_clamped_when_deserialized() {
        let battery: BatteryContext = serde_json::from_str(r#"{"level": 3.0}"#).unwrap();
        assert_eq!(battery.level(), 1.0);
        assert!(!battery.is_charging());
    }

    #[test]
    fn calendar_helpers() {
        let now = utc(2026, 3, 2, 10);
        let calendar = CalendarContext {
            is_busy: true,
            current_event: Some(CalendarEvent {
                title: "standup".into(),
                start: utc(2026, 3, 2, 9),
                end: now + chrono::Duration::minutes(25),
                is_all_day: false,
            }),
            next_event: None,
            minutes_until_next_event: Some(15),
        };
        assert!(calendar.has_upcoming_event());
        assert_eq!(calendar.minutes_until_free(now), Some(25));
        assert!(calendar.current_event.as_ref().unwrap().is_happening_at(now));
        assert_eq!(CalendarContext::default().minutes_until_free(now), None);
        assert!(!CalendarContext::default().has_upcoming_event());
    }
}
