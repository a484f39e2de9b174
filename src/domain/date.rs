//! Timezone-less calendar dates.
//!
//! A [`Date`] is a plain `(year, month, day)` triple. It may hold impossible
//! values such as February 30th so that user input can be reported back as a
//! validation error instead of failing to deserialize.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::validation::{FieldCode, ValidationError};

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid date pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Dates must be formatted: YYYY-MM-DD (got `{0}`)")]
pub struct DateParseError(String);

/// A (year, month, day) value ordered lexicographically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Parses `YYYY-MM-DD` without checking that the numbers form a real date.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let caps = DATE_PATTERN
            .captures(input)
            .ok_or_else(|| DateParseError(input.to_string()))?;
        let number = |idx: usize| caps[idx].parse::<u32>().map_err(|_| DateParseError(input.to_string()));
        Ok(Self {
            year: number(1)? as i32,
            month: number(2)?,
            day: number(3)?,
        })
    }

    pub fn is_zero(&self) -> bool {
        *self == Date::default()
    }

    /// Projects the triple onto the proleptic Gregorian calendar, carrying any
    /// overflow of the month or day into the next unit (Feb 30 becomes Mar 2).
    pub fn normalized(&self) -> Option<NaiveDate> {
        let months = self.month as i64 - 1;
        let year = i32::try_from(self.year as i64 + months.div_euclid(12)).ok()?;
        let month = months.rem_euclid(12) as u32 + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        first.checked_add_signed(Duration::days(self.day as i64 - 1))
    }

    /// True when the triple names a real calendar day.
    pub fn is_valid(&self) -> bool {
        self.normalized().map(Date::from_naive) == Some(*self)
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Requires a non-zero, calendar-valid date. Errors carry an empty field path
    /// so the caller can attach its own field name.
    pub fn validate_non_zero(&self) -> Result<(), ValidationError> {
        if self.is_zero() {
            Err(ValidationError::new(
                "",
                FieldCode::Missing,
                "You must provide a date.",
            ))
        } else if !self.is_valid() {
            Err(ValidationError::new(
                "",
                FieldCode::BadDate,
                "Dates must be in the format YYYY-MM-DD, and they must be valid dates.",
            ))
        } else {
            Ok(())
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.to_naive().map(|date| date.weekday())
    }

    /// Moves `n` days forward (or back when negative).
    pub fn add_days(&self, n: i64) -> Date {
        self.normalized()
            .and_then(|date| date.checked_add_signed(Duration::days(n)))
            .map(Date::from_naive)
            .unwrap_or(*self)
    }

    /// Moves `n` months, clamping the day to the length of the target month.
    pub fn add_months(&self, n: i32) -> Date {
        match self.normalized() {
            Some(date) => {
                let months = date.year() as i64 * 12 + date.month0() as i64 + n as i64;
                let year = months.div_euclid(12) as i32;
                let month = months.rem_euclid(12) as u32 + 1;
                Date::clamped(year, month, date.day())
            }
            None => *self,
        }
    }

    /// Moves `n` years; February 29th lands on the 28th in common years.
    pub fn add_years(&self, n: i32) -> Date {
        match self.normalized() {
            Some(date) => Date::clamped(date.year() + n, date.month(), date.day()),
            None => *self,
        }
    }

    /// Builds a date, pulling `day` back to the last day of the month when needed.
    pub fn clamped(year: i32, month: u32, day: u32) -> Date {
        Date::new(year, month, day.min(days_in_month(year, month)))
    }

    /// Signed number of days from `earlier` to `self`, not counting the end day.
    pub fn days_since(&self, earlier: &Date) -> i64 {
        match (self.normalized(), earlier.normalized()) {
            (Some(end), Some(start)) => (end - start).num_days(),
            _ => 0,
        }
    }

    pub fn before(&self, other: &Date) -> bool {
        self < other
    }

    pub fn after(&self, other: &Date) -> bool {
        self > other
    }

    /// Inclusive on both ends.
    pub fn between(&self, start: &Date, end: &Date) -> bool {
        start <= self && self <= end
    }
}

/// Number of days in `month` of `year`; 0 for months outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date::from_naive(date)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw).map_err(de::Error::custom)
    }
}
