//! Workbook decoding into plain string grids

use std::io::{Cursor, Read, Seek};

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveTime, Timelike};
use log::debug;

use crate::Error;

/// One worksheet as rows of trimmed cell strings, header row first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Non-blank cells below the header in one column, ragged rows tolerated
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .skip(1)
            .filter_map(move |row| row.get(index))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }
}

/// Decode every sheet of an xlsx/xls/ods workbook held in memory.
///
/// # Errors
///
/// A malformed container fails the whole call. Individual sheets that cannot
/// be read are skipped.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Vec<Sheet>, Error> {
    read_workbook_from(Cursor::new(bytes))
}

pub fn read_workbook_from<R>(reader: R) -> Result<Vec<Sheet>, Error>
where
    R: Read + Seek + Clone,
{
    let mut workbook = open_workbook_auto_from_rs(reader)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                debug!("Skipping unreadable sheet {name:?}: {e}");
                continue;
            }
        };
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        sheets.push(Sheet { name, rows });
    }

    Ok(sheets)
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Time-formatted cells keep only their day fraction so the time parser sees
/// the same encoding a plain decimal cell would carry. ISO cells (ODS times,
/// `PT08H30M00S`, and ISO datetimes) are reduced the same way.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => match cell.as_time() {
            Some(time) => fraction_text(day_fraction(time)),
            None => s.trim().to_string(),
        },
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => fraction_text(dt.as_f64().fract()),
    }
}

/// Fixed eight digits, so `06:00` is `"0.25000000"` and never reads as the
/// clock form `"0.25"`
fn fraction_text(fraction: f64) -> String {
    format!("{fraction:.8}")
}

fn day_fraction(time: NaiveTime) -> f64 {
    let seconds = f64::from(time.num_seconds_from_midnight())
        + f64::from(time.nanosecond()) / 1_000_000_000.0;
    seconds / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_column_skips_blanks_and_ragged_rows() {
        let sheet = Sheet::new(
            "S1",
            grid(&[&["day1", "day2"], &["8:00", ""], &["8:10"], &[" ", "9:00"]]),
        );
        assert_eq!(sheet.headers(), &["day1".to_string(), "day2".to_string()]);
        assert_eq!(sheet.column(0).collect::<Vec<_>>(), vec!["8:00", "8:10"]);
        assert_eq!(sheet.column(1).collect::<Vec<_>>(), vec!["9:00"]);
        assert_eq!(sheet.column(5).count(), 0);
    }

    #[test]
    fn test_garbage_container_is_fatal() {
        let result = read_workbook(b"definitely not a workbook".to_vec());
        assert!(matches!(result, Err(Error::Workbook(_))));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(0.5)), "0.5");
        assert_eq!(cell_text(&Data::Int(8)), "8");
        assert_eq!(cell_text(&Data::String(" 8:01 ".into())), "8:01");
    }

    #[test]
    fn test_iso_cells_become_day_fractions() {
        use crate::time::parse_time_value;

        let minutes = |cell: Data| parse_time_value(&cell_text(&cell)).unwrap();
        assert_eq!(minutes(Data::DurationIso("PT08H30M00S".into())), 510.0);
        assert_eq!(minutes(Data::DurationIso("PT00H00M00S".into())), 0.0);
        assert_eq!(minutes(Data::DateTimeIso("2024-01-01T08:30:00".into())), 510.0);
        assert_eq!(minutes(Data::DateTimeIso("17:45:00".into())), 1065.0);
        assert_eq!(cell_text(&Data::DurationIso("PT06H00M00S".into())), "0.25000000");
        assert_eq!(
            crate::time::parse_clock_minutes(&cell_text(&Data::DurationIso("PT06H00M00S".into())))
                .unwrap(),
            360.0
        );
        // a bare date carries no time of day
        assert_eq!(cell_text(&Data::DateTimeIso("2024-01-01".into())), "2024-01-01");
    }
}
