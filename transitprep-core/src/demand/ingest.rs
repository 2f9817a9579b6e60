//! Passenger-event workbooks to fitting-service records.
//!
//! Layout: one sheet per station, one column per sampling day, the header
//! row holding a time-range label per column.

use std::collections::HashMap;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::derive::{HourlyBuckets, RecordIds, flat_gaps};
use super::workbook::{Sheet, read_workbook};
use crate::model::{DemandData, Item, RecordKind};
use crate::time::parse_time_value;
use crate::{Error, Minutes};

/// How column values turn into records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// Parsed event instants, one item per column
    #[default]
    Raw,
    /// Inter-event gaps, one item per column
    Flat,
    /// Inter-event gaps pooled across columns into hour-of-day items
    DayTemplate,
}

impl IngestMode {
    pub fn record_kind(self) -> RecordKind {
        match self {
            IngestMode::Raw => RecordKind::RawInstant,
            IngestMode::Flat | IngestMode::DayTemplate => RecordKind::InterEventGap,
        }
    }
}

impl FromStr for IngestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(IngestMode::Raw),
            "flat" => Ok(IngestMode::Flat),
            "day_template" | "day-template" | "template" => Ok(IngestMode::DayTemplate),
            other => Err(Error::InvalidData(format!("unknown ingest mode {other:?}"))),
        }
    }
}

/// Decode and ingest a workbook held in memory.
///
/// # Errors
///
/// Fails only when the workbook container itself is malformed.
pub fn ingest_workbook(
    bytes: Vec<u8>,
    station_ids: &HashMap<String, String>,
    mode: IngestMode,
) -> Result<DemandData, Error> {
    let sheets = read_workbook(bytes)?;
    Ok(ingest_sheets(&sheets, station_ids, mode))
}

/// Ingest already decoded sheets.
///
/// Sheet names are translated through `station_ids`; unknown names are used
/// as the station id unchanged. Cells that do not parse as a time are skipped.
pub fn ingest_sheets(
    sheets: &[Sheet],
    station_ids: &HashMap<String, String>,
    mode: IngestMode,
) -> DemandData {
    let mut output = DemandData::new(mode.record_kind());
    let mut ids = RecordIds::new();

    for sheet in sheets {
        if sheet.rows.is_empty() {
            debug!("Sheet {:?} has no rows, skipping", sheet.name);
            continue;
        }
        let sheet_key = sheet.name.trim();
        let station = station_ids
            .get(sheet_key)
            .map_or(sheet_key, String::as_str);

        let items = match mode {
            IngestMode::Raw => raw_items(sheet, station, &mut ids),
            IngestMode::Flat => flat_items(sheet, station, &mut ids),
            IngestMode::DayTemplate => template_items(sheet, station, &mut ids),
        };
        output.data.extend(items);
    }

    info!(
        "Ingested {} sheets into {} items ({} records, {:?})",
        sheets.len(),
        output.data.len(),
        output.record_count(),
        output.kind
    );
    output
}

/// Column index and trimmed label of every non-blank header
fn labelled_columns(sheet: &Sheet) -> impl Iterator<Item = (usize, &str)> {
    sheet
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, header)| (idx, header.trim()))
        .filter(|(_, header)| !header.is_empty())
}

fn column_times(sheet: &Sheet, column: usize) -> Vec<Minutes> {
    sheet
        .column(column)
        .filter_map(|cell| match parse_time_value(cell) {
            Ok(minutes) => Some(minutes),
            Err(e) => {
                debug!("Sheet {:?}: {e}, skipping cell", sheet.name);
                None
            }
        })
        .collect()
}

fn placeholder(station: &str, time_range: &str, ids: &mut RecordIds) -> Item {
    Item {
        station: station.to_string(),
        time_range: time_range.to_string(),
        records: vec![ids.record(0.0)],
    }
}

fn raw_items(sheet: &Sheet, station: &str, ids: &mut RecordIds) -> Vec<Item> {
    labelled_columns(sheet)
        .map(|(column, label)| {
            let times = column_times(sheet, column);
            if times.is_empty() {
                return placeholder(station, label, ids);
            }
            Item {
                station: station.to_string(),
                time_range: label.to_string(),
                records: times.into_iter().map(|t| ids.record(t)).collect(),
            }
        })
        .collect()
}

fn flat_items(sheet: &Sheet, station: &str, ids: &mut RecordIds) -> Vec<Item> {
    let mut items = Vec::new();
    for (column, label) in labelled_columns(sheet) {
        let gaps = flat_gaps(&column_times(sheet, column));
        if gaps.is_empty() {
            debug!("Sheet {:?} column {label:?}: not enough events", sheet.name);
            continue;
        }
        items.push(Item {
            station: station.to_string(),
            time_range: label.to_string(),
            records: gaps.into_iter().map(|g| ids.record(g)).collect(),
        });
    }

    if items.is_empty() {
        items = labelled_columns(sheet)
            .map(|(_, label)| placeholder(station, label, ids))
            .collect();
    }
    items
}

fn template_items(sheet: &Sheet, station: &str, ids: &mut RecordIds) -> Vec<Item> {
    let mut buckets = HourlyBuckets::new();
    for (column, _) in labelled_columns(sheet) {
        buckets.add_column(&column_times(sheet, column));
    }
    buckets.into_items(station, ids)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            name,
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    fn values(item: &Item) -> Vec<f64> {
        item.records.iter().map(|r| r.numeric_value).collect()
    }

    #[test]
    fn test_raw_mode_keeps_instants() {
        let sheets = [sheet(
            "Central",
            &[&["8:00-8:59", "9:00-9:59"], &["8:01", "9:30"], &["0.34375", ""], &["junk", ""]],
        )];
        let data = ingest_sheets(&sheets, &HashMap::new(), IngestMode::Raw);

        assert_eq!(data.kind, RecordKind::RawInstant);
        assert_eq!(data.data.len(), 2);
        assert_eq!(data.data[0].station, "Central");
        assert_eq!(values(&data.data[0]), vec![481.0, 495.0]);
        assert_eq!(values(&data.data[1]), vec![570.0]);
        let ids: Vec<u32> = data.data.iter().flat_map(|i| &i.records).map(|r| r.record_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_station_name_mapping() {
        let sheets = [sheet(" Central ", &[&["d1"], &["8:00"]]), sheet("North", &[&["d1"], &["8:00"]])];
        let map = HashMap::from([("Central".to_string(), "st-01".to_string())]);
        let data = ingest_sheets(&sheets, &map, IngestMode::Raw);
        assert_eq!(data.data[0].station, "st-01");
        assert_eq!(data.data[1].station, "North");
    }

    #[test]
    fn test_flat_mode_gaps_per_column() {
        let sheets = [sheet(
            "S",
            &[&["day1", "day2", "day3"], &["8:30", "9:00", "7:00"], &["8:00", "9:05", ""], &["8:40", "", ""]],
        )];
        let data = ingest_sheets(&sheets, &HashMap::new(), IngestMode::Flat);

        assert_eq!(data.kind, RecordKind::InterEventGap);
        // day3 has a single event and yields nothing
        assert_eq!(data.data.len(), 2);
        assert_eq!(data.data[0].time_range, "day1");
        assert_eq!(values(&data.data[0]), vec![30.0, 10.0]);
        assert_eq!(data.data[1].time_range, "day2");
        assert_eq!(values(&data.data[1]), vec![5.0]);
    }

    #[test]
    fn test_flat_mode_empty_sheet_placeholders() {
        let sheets = [sheet("S", &[&["day1", "", "day2"]])];
        let data = ingest_sheets(&sheets, &HashMap::new(), IngestMode::Flat);
        assert_eq!(data.data.len(), 2);
        for item in &data.data {
            assert_eq!(item.records.len(), 1);
            assert_abs_diff_eq!(item.records[0].numeric_value, 0.0);
        }
    }

    #[test]
    fn test_template_mode_buckets_across_days() {
        let sheets = [sheet(
            "S",
            &[&["mon", "tue"], &["8:00", "8:20"], &["8:30", "8:50"], &["9:10", ""]],
        )];
        let data = ingest_sheets(&sheets, &HashMap::new(), IngestMode::DayTemplate);

        assert_eq!(data.data.len(), 2);
        assert_eq!(data.data[0].time_range, "8:00-8:59");
        assert_eq!(values(&data.data[0]), vec![30.0, 30.0]);
        assert_eq!(data.data[1].time_range, "9:00-9:59");
        assert_eq!(values(&data.data[1]), vec![40.0]);
    }

    #[test]
    fn test_template_mode_placeholder_station() {
        let sheets = [sheet("S", &[&["mon"], &["8:00"]]), sheet("Empty", &[])];
        let data = ingest_sheets(&sheets, &HashMap::new(), IngestMode::DayTemplate);
        assert_eq!(data.data.len(), 1);
        assert_eq!(data.data[0].time_range, "0:00-0:59");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("template".parse::<IngestMode>().unwrap(), IngestMode::DayTemplate);
        assert_eq!("FLAT".parse::<IngestMode>().unwrap(), IngestMode::Flat);
        assert!("hourly".parse::<IngestMode>().is_err());
    }
}
