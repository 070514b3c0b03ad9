//! In-game calendar: day-of-year/year dates and hour arithmetic.
//!
//! The campaign calendar has no months and no leap years. A year is exactly
//! [`DAYS_PER_YEAR`] days; sub-day precision is not represented by dates and
//! must be tracked separately in hours.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DAYS_PER_YEAR: u32 = 365;
pub const HOURS_PER_DAY: i64 = 24;

/// Errors produced when parsing an in-game date string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("expected `YYYY-DDD`, got {0:?}")]
    Format(String),

    #[error("day of year out of range: {0}")]
    DayOutOfRange(u32),
}

/// A date on the campaign calendar.
///
/// Serialized as the fixed-width string `YYYY-DDD` (e.g. `2305-042`).
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameDate {
    year: u32,
    day: u32,
}

impl GameDate {
    /// Create a date, returning `None` if `day` is outside `1..=365`.
    pub fn new(day: u32, year: u32) -> Option<Self> {
        (1..=DAYS_PER_YEAR)
            .contains(&day)
            .then_some(Self { year, day })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * DAYS_PER_YEAR as i64 + self.day as i64
    }

    fn from_ordinal(ordinal: i64) -> Self {
        // Clamped to day 1 of year 0 and the last day of year u32::MAX.
        let days = DAYS_PER_YEAR as i64;
        let latest = (u32::MAX as i64 + 1) * days - 1;
        let zero_based = (ordinal - 1).clamp(0, latest);
        Self {
            year: u32::try_from(zero_based / days).unwrap_or(u32::MAX),
            day: (zero_based % days) as u32 + 1,
        }
    }

    /// Whole hours from `self` to `other` (negative if `other` is earlier).
    pub fn hours_until(&self, other: &GameDate) -> i64 {
        (other.ordinal() - self.ordinal()) * HOURS_PER_DAY
    }

    /// Add hours, truncated to whole days by floor division.
    pub fn add_hours(&self, hours: i64) -> GameDate {
        Self::from_ordinal(self.ordinal().saturating_add(hours.div_euclid(HOURS_PER_DAY)))
    }
}

impl std::fmt::Display for GameDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:03}", self.year, self.day)
    }
}

impl FromStr for GameDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || DateParseError::Format(s.to_string());

        let (year, day) = s.trim().split_once('-').ok_or_else(format_err)?;
        let year: u32 = year.parse().map_err(|_| format_err())?;
        let day: u32 = day.parse().map_err(|_| format_err())?;

        GameDate::new(day, year).ok_or(DateParseError::DayOutOfRange(day))
    }
}

impl TryFrom<String> for GameDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GameDate> for String {
    fn from(date: GameDate) -> Self {
        date.to_string()
    }
}

/// Parse a date string, returning `None` on malformed input.
pub fn parse_date(s: &str) -> Option<GameDate> {
    s.parse().ok()
}

/// Hours elapsed from `a` to `b`.
pub fn hours_between(a: &GameDate, b: &GameDate) -> i64 {
    a.hours_until(b)
}

/// The date `hours` after `start`, truncated to whole days.
pub fn add_hours(start: &GameDate, hours: i64) -> GameDate {
    start.add_hours(hours)
}
