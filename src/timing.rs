//! Countdown and "time together" arithmetic.
//!
//! Both calculators are pure functions of their inputs and are recomputed from
//! scratch on every 1 Hz tick; nothing here is mutated incrementally except the
//! expiry flag held by [`CountdownTracker`].

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

// --- Countdown ---------------------------------------------------------------

/// Remaining time until the countdown target. `days` is unbounded; every other
/// field stays inside its natural modulus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeLeft {
    /// Splits a positive millisecond difference by integer division (truncating).
    pub fn from_millis(diff_ms: i64) -> Self {
        let diff = diff_ms.max(0);
        Self {
            days: (diff / MS_PER_DAY) as u64,
            hours: ((diff / MS_PER_HOUR) % 24) as u8,
            minutes: ((diff / MS_PER_MINUTE) % 60) as u8,
            seconds: ((diff / MS_PER_SECOND) % 60) as u8,
        }
    }

    /// Milliseconds represented by the fields, i.e. the source difference
    /// truncated to whole seconds.
    pub fn whole_seconds_ms(&self) -> i64 {
        self.days as i64 * MS_PER_DAY
            + self.hours as i64 * MS_PER_HOUR
            + self.minutes as i64 * MS_PER_MINUTE
            + self.seconds as i64 * MS_PER_SECOND
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    Running(TimeLeft),
    Expired,
}

impl Countdown {
    pub fn is_expired(&self) -> bool {
        matches!(self, Countdown::Expired)
    }

    /// Display value; all zero once expired.
    pub fn time_left(&self) -> TimeLeft {
        match self {
            Countdown::Running(t) => *t,
            Countdown::Expired => TimeLeft::default(),
        }
    }
}

pub fn countdown(target_ms: i64, now_ms: i64) -> Countdown {
    let diff = target_ms.saturating_sub(now_ms);
    if diff <= 0 {
        Countdown::Expired
    } else {
        Countdown::Running(TimeLeft::from_millis(diff))
    }
}

/// Result of one tracker tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownTick {
    pub countdown: Countdown,
    /// True only on the first tick that observed expiry.
    pub just_expired: bool,
}

/// Countdown state owned by the reveal flow. Expiry is latched: once observed it
/// never reverts, and the transition edge is reported exactly once.
#[derive(Clone, Debug)]
pub struct CountdownTracker {
    target_ms: i64,
    expired: bool,
}

impl CountdownTracker {
    pub fn new(target_ms: i64) -> Self {
        Self {
            target_ms,
            expired: false,
        }
    }

    pub fn target_ms(&self) -> i64 {
        self.target_ms
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn tick(&mut self, now_ms: i64) -> CountdownTick {
        if self.expired {
            return CountdownTick {
                countdown: Countdown::Expired,
                just_expired: false,
            };
        }
        let countdown = countdown(self.target_ms, now_ms);
        let just_expired = countdown.is_expired();
        self.expired = just_expired;
        CountdownTick {
            countdown,
            just_expired,
        }
    }
}

// --- Calendar / elapsed time --------------------------------------------------

/// Local wall-clock fields. `month` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarInstant {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarInstant {
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn date(year: i32, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month as i32)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month` of `year`. Months outside 1..=12 roll over into the adjacent
/// years, so `days_in_month(y, 0)` is December of `y - 1`.
pub fn days_in_month(year: i32, month: i32) -> u8 {
    let zero_based = month - 1;
    let year = year + zero_based.div_euclid(12);
    match zero_based.rem_euclid(12) + 1 {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Elapsed {
    pub years: u32,
    pub months: u8,
    pub days: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Calendar-aware `now - start`, borrowing field by field from seconds upward.
///
/// A negative day count borrows the length of the month *preceding `now`*, not
/// the one preceding `start`. When the start day exceeds that month's length the
/// remainder stays negative after the borrow (Jan 31 to Mar 1 gives -2 days).
/// Field-wise counters usually print that as-is; here it is clamped to zero, so
/// the elapsed clock never shows a negative day count.
///
/// Returns all zeros when `now` is not after `start`.
pub fn elapsed_between(start: CalendarInstant, now: CalendarInstant) -> Elapsed {
    if now <= start {
        return Elapsed::default();
    }

    let mut seconds = now.second as i32 - start.second as i32;
    let mut minutes = now.minute as i32 - start.minute as i32;
    let mut hours = now.hour as i32 - start.hour as i32;
    let mut days = now.day as i32 - start.day as i32;
    let mut months = now.month as i32 - start.month as i32;
    let mut years = now.year - start.year;

    if seconds < 0 {
        minutes -= 1;
        seconds += 60;
    }
    if minutes < 0 {
        hours -= 1;
        minutes += 60;
    }
    if hours < 0 {
        days -= 1;
        hours += 24;
    }
    if days < 0 {
        months -= 1;
        days += days_in_month(now.year, now.month as i32 - 1) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Elapsed {
        years: years.max(0) as u32,
        months: months.max(0) as u8,
        days: days.max(0) as u8,
        hours: hours as u8,
        minutes: minutes as u8,
        seconds: seconds as u8,
    }
}

/// Two-digit, zero padded display value (`7` -> `"07"`, `123` -> `"123"`).
pub fn pad2(value: u64) -> String {
    format!("{value:02}")
}
