use crate::{Error, Minutes};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Parse a spreadsheet time cell into minutes since midnight.
///
/// Source sheets mix several encodings for the same instant:
///
/// - `"8:01"` / `"08:01"` / `"8:01:30"` - hour and minute fields, anything after
///   the second colon is ignored;
/// - `"0.3340277"` - a day fraction as stored by spreadsheet time cells;
/// - `"8"` - a whole hour of day;
/// - `"481"` - already minutes.
///
/// Plain numbers below 1 are day fractions, numbers in `[1, 24)` are hours and
/// everything else is taken as minutes.
///
/// # Errors
///
/// Returns [`Error::UnparseableTime`] when the cell matches none of the forms.
/// Callers skip such cells instead of aborting the sheet.
pub fn parse_time_value(value: &str) -> Result<Minutes, Error> {
    let value = value.trim();

    if value.contains(':') {
        let mut parts = value.split(':');
        let hour = parts.next().and_then(parse_finite);
        let minute = parts.next().and_then(parse_finite);
        return match (hour, minute) {
            (Some(hour), Some(minute)) => Ok(hour * 60.0 + minute),
            _ => Err(Error::UnparseableTime(value.to_string())),
        };
    }

    let number = parse_finite(value).ok_or_else(|| Error::UnparseableTime(value.to_string()))?;
    Ok(if number < 1.0 {
        day_fraction_to_minutes(number)
    } else if number < 24.0 {
        number * 60.0
    } else {
        number
    })
}

/// Day fractions are rounded to the nearest second to strip binary noise,
/// e.g. `0.375 * 1440` must land exactly on 540.
pub(crate) fn day_fraction_to_minutes(fraction: f64) -> Minutes {
    (fraction * MINUTES_PER_DAY * 60.0).round() / 60.0
}

pub(crate) fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
