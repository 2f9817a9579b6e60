//! Time encodings found in planning data.
//!
//! Spreadsheet cells, schedule entries and time-range labels all carry clock
//! times in slightly different shapes; everything is normalized to minutes
//! since midnight.

mod period;
pub mod serde_secs;
mod value;

pub use period::{TimePeriod, format_clock, parse_clock_minutes, range_start};
pub use value::parse_time_value;
pub(crate) use value::parse_finite;
