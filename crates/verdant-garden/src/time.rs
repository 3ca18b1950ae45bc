//! In-game clock.
//!
//! This module provides game time management for the garden:
//! - Real time accumulates and converts to whole in-game hours
//!   (60 accumulated real seconds = 1 in-game hour at scale 1.0)
//! - Time, hour, and day change notifications
//! - Direct time jumps for fast-forward and tests
//! - Opaque save/restore of the clock state
//!
//! The calendar is a fixed 365-day year starting on January 1st.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use verdant_common::{BlobResult, MagicBytes, SchemaVersion};

use crate::config::ClockConfig;
use crate::save;

/// Accumulated real seconds (after scaling) that make one in-game hour.
pub const REAL_SECONDS_PER_GAME_HOUR: f64 = 60.0;
/// Smallest accepted time scale.
pub const MIN_TIME_SCALE: f32 = 0.1;

/// Minutes in a game hour.
const MINUTES_PER_HOUR: i64 = 60;
/// Minutes in a game day.
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;
/// Days in a calendar year.
const DAYS_PER_YEAR: i64 = 365;

const MONTH_LENGTHS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A point in game time, stored as whole minutes since January 1st 00:00
/// of the first game year.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GameTimestamp(i64);

impl GameTimestamp {
    /// Create a timestamp from raw minutes.
    #[must_use]
    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Create a timestamp on a given day (1-based) at a time of day.
    ///
    /// Hour and minute are clamped to 23 and 59.
    #[must_use]
    pub fn from_day_time(day: u32, hour: u32, minute: u32) -> Self {
        let day = i64::from(day.max(1)) - 1;
        let hour = i64::from(hour.min(23));
        let minute = i64::from(minute.min(59));
        Self(day * MINUTES_PER_DAY + hour * MINUTES_PER_HOUR + minute)
    }

    /// Raw minutes since the calendar origin.
    #[must_use]
    pub const fn minutes(self) -> i64 {
        self.0
    }

    /// Hour component (0-23).
    #[must_use]
    pub fn hour(self) -> u32 {
        (self.0.rem_euclid(MINUTES_PER_DAY) / MINUTES_PER_HOUR) as u32
    }

    /// Minute component (0-59).
    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.rem_euclid(MINUTES_PER_HOUR) as u32
    }

    /// Whole days elapsed since the calendar origin.
    #[must_use]
    pub fn day_index(self) -> i64 {
        self.0.div_euclid(MINUTES_PER_DAY)
    }

    /// Day of the year (1-365).
    #[must_use]
    pub fn day_of_year(self) -> u32 {
        (self.day_index().rem_euclid(DAYS_PER_YEAR) + 1) as u32
    }

    /// Return this timestamp moved forward by whole hours.
    #[must_use]
    pub const fn add_hours(self, hours: i64) -> Self {
        Self(self.0.saturating_add(hours.saturating_mul(MINUTES_PER_HOUR)))
    }

    /// Fractional hours between `past` and this timestamp.
    ///
    /// Negative if `past` lies in the future.
    #[must_use]
    pub fn hours_since(self, past: Self) -> f64 {
        self.0.saturating_sub(past.0) as f64 / MINUTES_PER_HOUR as f64
    }

    /// Format as "HH:MM".
    #[must_use]
    pub fn time_string(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Format as "Mon DD" (e.g. "Jan 01").
    #[must_use]
    pub fn date_string(self) -> String {
        let mut remaining = i64::from(self.day_of_year()) - 1;
        for (len, name) in MONTH_LENGTHS.iter().zip(MONTH_NAMES) {
            if remaining < *len {
                return format!("{name} {:02}", remaining + 1);
            }
            remaining -= len;
        }
        // day_of_year is always within the 365-day table
        format!("Dec {:02}", remaining + 1)
    }
}

/// Notifications emitted by the clock, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeEvent {
    /// The current time changed.
    TimeChanged(GameTimestamp),
    /// A new hour started (carries the new hour, 0-23).
    HourChanged(u32),
    /// A new day started (carries the new day of year).
    DayChanged(u32),
}

impl TimeEvent {
    /// Get a description of this event.
    #[must_use]
    pub fn description(self) -> String {
        match self {
            Self::TimeChanged(ts) => format!("{} {}", ts.date_string(), ts.time_string()),
            Self::HourChanged(h) => format!("It's {h:02}:00"),
            Self::DayChanged(day) => format!("Day {day} has begun"),
        }
    }
}

/// Serializable clock state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    /// Current game time.
    pub timestamp: GameTimestamp,
    /// Real seconds accumulated toward the next hour.
    pub accumulator: f64,
}

/// Monotonic in-game time source.
///
/// The clock never polls anything itself: the host calls [`Clock::update`]
/// (or [`Clock::advance`]) from its own loop with the real elapsed time.
#[derive(Debug, Clone)]
pub struct Clock {
    /// Current game time.
    now: GameTimestamp,
    /// Scaled real seconds not yet converted into hours.
    accumulator: f64,
    /// Multiplier applied to real time in [`Clock::update`].
    time_scale: f32,
    /// Whether [`Clock::update`] is suspended (e.g. a menu is open).
    paused: bool,
    /// Start time used on construction and on failed restores.
    start: GameTimestamp,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(6, 0)
    }
}

impl Clock {
    /// Create a clock starting on day 1 at the given time.
    #[must_use]
    pub fn new(start_hour: u32, start_minute: u32) -> Self {
        let start = GameTimestamp::from_day_time(1, start_hour, start_minute);
        Self {
            now: start,
            accumulator: 0.0,
            time_scale: 1.0,
            paused: false,
            start,
        }
    }

    /// Create a clock from configuration.
    #[must_use]
    pub fn from_config(config: &ClockConfig) -> Self {
        let mut clock = Self::new(config.start_hour, config.start_minute);
        clock.set_time_scale(config.time_scale);
        clock
    }

    /// Current game time.
    #[must_use]
    pub fn now(&self) -> GameTimestamp {
        self.now
    }

    /// Scaled real seconds accumulated toward the next hour.
    #[must_use]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Current hour (0-23).
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.now.hour()
    }

    /// Current minute (0-59).
    #[must_use]
    pub fn minute(&self) -> u32 {
        self.now.minute()
    }

    /// Current day of the year (1-365).
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        self.now.day_of_year()
    }

    /// Current time as "HH:MM".
    #[must_use]
    pub fn time_string(&self) -> String {
        self.now.time_string()
    }

    /// Current date as "Mon DD".
    #[must_use]
    pub fn date_string(&self) -> String {
        self.now.date_string()
    }

    /// Get the time scale.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale used by [`Clock::update`] (minimum 0.1).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() {
            scale.max(MIN_TIME_SCALE)
        } else {
            1.0
        };
    }

    /// Whether the clock is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume [`Clock::update`]. Direct jumps still work while paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advance using the clock's own time scale; no-op while paused.
    pub fn update(&mut self, dt_real_seconds: f32) -> Vec<TimeEvent> {
        if self.paused {
            return Vec::new();
        }
        self.advance(dt_real_seconds, self.time_scale)
    }

    /// Accumulate real time and convert it into whole in-game hours.
    ///
    /// Emits, in order: [`TimeEvent::TimeChanged`] when at least one hour
    /// elapsed, [`TimeEvent::HourChanged`] if the hour component differs,
    /// and [`TimeEvent::DayChanged`] if the day component differs.
    /// Non-positive or non-finite inputs are ignored.
    pub fn advance(&mut self, dt_real_seconds: f32, time_scale: f32) -> Vec<TimeEvent> {
        let scaled = f64::from(dt_real_seconds) * f64::from(time_scale);
        if !scaled.is_finite() || scaled <= 0.0 {
            return Vec::new();
        }

        self.accumulator += scaled;
        if self.accumulator < REAL_SECONDS_PER_GAME_HOUR {
            return Vec::new();
        }

        let hours = (self.accumulator / REAL_SECONDS_PER_GAME_HOUR).floor();
        self.accumulator -= hours * REAL_SECONDS_PER_GAME_HOUR;
        if !(0.0..REAL_SECONDS_PER_GAME_HOUR).contains(&self.accumulator) {
            self.accumulator = 0.0;
        }

        let previous = self.now;
        self.now = self.now.add_hours(hours as i64);
        debug!("Clock advanced {hours} h to {}", self.now.time_string());

        let mut events = vec![TimeEvent::TimeChanged(self.now)];
        if previous.hour() != self.now.hour() {
            events.push(TimeEvent::HourChanged(self.now.hour()));
        }
        if previous.day_of_year() != self.now.day_of_year() {
            events.push(TimeEvent::DayChanged(self.now.day_of_year()));
        }
        events
    }

    /// Jump forward by whole hours, bypassing the accumulator.
    ///
    /// Emits only [`TimeEvent::TimeChanged`].
    pub fn advance_by(&mut self, hours: u32) -> TimeEvent {
        self.now = self.now.add_hours(i64::from(hours));
        TimeEvent::TimeChanged(self.now)
    }

    /// Jump forward one hour.
    pub fn advance_one_hour(&mut self) -> TimeEvent {
        self.advance_by(1)
    }

    /// Jump forward one day.
    pub fn advance_one_day(&mut self) -> TimeEvent {
        self.advance_by(24)
    }

    /// Hours elapsed since a past timestamp. No side effects.
    #[must_use]
    pub fn hours_since(&self, past: GameTimestamp) -> f64 {
        self.now.hours_since(past)
    }

    /// Real seconds that correspond to the game hours since `past` at the
    /// current time scale.
    #[must_use]
    pub fn real_seconds_since(&self, past: GameTimestamp) -> f64 {
        self.hours_since(past) * REAL_SECONDS_PER_GAME_HOUR / f64::from(self.time_scale)
    }

    /// Snapshot of the serializable state.
    #[must_use]
    pub fn state(&self) -> ClockState {
        ClockState {
            timestamp: self.now,
            accumulator: self.accumulator,
        }
    }

    /// Encode the clock state as an opaque blob.
    pub fn save(&self) -> BlobResult<Vec<u8>> {
        save::encode_blob(MagicBytes::CLOCK, SchemaVersion::CLOCK_STATE, &self.state())
    }

    /// Restore the clock from a blob produced by [`Clock::save`].
    ///
    /// Returns the time-changed notification on success. A malformed blob is
    /// logged and the clock falls back to its start time; `None` is returned.
    pub fn restore(&mut self, blob: &[u8]) -> Option<TimeEvent> {
        let decoded: BlobResult<ClockState> =
            save::decode_blob(blob, MagicBytes::CLOCK, SchemaVersion::CLOCK_STATE);
        match decoded {
            Ok(state)
                if state.accumulator.is_finite()
                    && (0.0..REAL_SECONDS_PER_GAME_HOUR).contains(&state.accumulator) =>
            {
                self.now = state.timestamp;
                self.accumulator = state.accumulator;
                Some(TimeEvent::TimeChanged(self.now))
            },
            Ok(state) => {
                warn!(
                    "Failed to load time data: accumulator {} out of range",
                    state.accumulator
                );
                self.reset();
                None
            },
            Err(e) => {
                warn!("Failed to load time data: {e}");
                self.reset();
                None
            },
        }
    }

    /// Reset to the start time with an empty accumulator.
    fn reset(&mut self) {
        self.now = self.start;
        self.accumulator = 0.0;
    }
}
