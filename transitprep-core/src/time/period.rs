use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::{day_fraction_to_minutes, parse_finite};
use crate::{Error, Minutes};

/// Parse a clock string as written in schedules and time-range labels.
///
/// Accepts `"H:MM"`, `"H.MM"` (hour and minute separated by a dot, the minute
/// digits taken literally so `"8.5"` is 8:05), a bare whole hour below 24, and
/// a bare day fraction below 1. Other bare numbers are taken as minutes.
///
/// In the midnight hour `"0.MM"` with exactly two minute digits below 60 is
/// still `H.MM` (`"0.30"` is 0:30); any other `0.x` is a day fraction.
pub fn parse_clock_minutes(value: &str) -> Result<Minutes, Error> {
    let value = value.trim();
    let err = || Error::UnparseableTime(value.to_string());

    if let Some((hour, rest)) = value.split_once(':') {
        let minute = rest.split(':').next().unwrap_or_default();
        let (hour, minute) = (parse_whole(hour).ok_or_else(err)?, parse_whole(minute).ok_or_else(err)?);
        return Ok(hour * 60.0 + minute);
    }

    if let Some((hour, minute_text)) = value.split_once('.')
        && let (Some(hour), Some(minute)) = (parse_whole(hour), parse_whole(minute_text))
        && (hour >= 1.0 || (minute_text.len() == 2 && minute < 60.0))
    {
        return Ok(hour * 60.0 + minute);
    }

    let number = parse_finite(value).ok_or_else(err)?;
    Ok(match number {
        n if n < 1.0 => day_fraction_to_minutes(n),
        n if n < 24.0 => n * 60.0,
        n => n,
    })
}

fn parse_whole(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().map(f64::from)
}

/// Half-open interval of minutes since midnight, parsed from `"HH:MM-HH:MM"`.
///
/// A schedule time or a time-range label belongs to the period iff its start
/// minute `m` satisfies `start <= m < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub start: Minutes,
    pub end: Minutes,
}

impl TimePeriod {
    pub fn new(start: Minutes, end: Minutes) -> Result<Self, Error> {
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(Error::InvalidPeriod(format!("{start}-{end}")));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, minute: Minutes) -> bool {
        minute >= self.start && minute < self.end
    }

    /// Check a clock string such as a scheduled departure
    pub fn contains_clock(&self, value: &str) -> Result<bool, Error> {
        parse_clock_minutes(value).map(|minute| self.contains(minute))
    }

    /// Check a `"H:MM-H:MM"` label by its start only
    pub fn contains_range_start(&self, label: &str) -> Result<bool, Error> {
        let start = range_start(label)?;
        Ok(self.contains(start))
    }
}

/// Start minute of a `"H:MM-H:MM"` label
pub fn range_start(label: &str) -> Result<Minutes, Error> {
    let (start, _) = label
        .split_once('-')
        .ok_or_else(|| Error::UnparseableTime(label.to_string()))?;
    parse_clock_minutes(start)
}

impl FromStr for TimePeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPeriod(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = parse_clock_minutes(start).map_err(|_| invalid())?;
        let end = parse_clock_minutes(end).map_err(|_| invalid())?;
        if end <= start {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

/// Format whole minutes as `"H:MM"`
pub fn format_clock(minutes: Minutes) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = minutes.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}
