//! Departure schedule workbooks: a single sheet, one column per route.

use log::info;

use super::workbook::{Sheet, read_workbook};
use crate::Error;
use crate::model::ScheduleData;

/// Decode and ingest a schedule workbook held in memory.
pub fn ingest_schedule_workbook(bytes: Vec<u8>, project_id: &str) -> Result<Vec<ScheduleData>, Error> {
    let sheets = read_workbook(bytes)?;
    ingest_schedule_sheets(&sheets, project_id)
}

/// Build one [`ScheduleData`] per non-blank header.
///
/// Route path ids are `"{header}-{project_id}"`; departure cells are kept as
/// written, joined with commas.
///
/// # Errors
///
/// The workbook must contain exactly one sheet with at least one row below
/// the header.
pub fn ingest_schedule_sheets(sheets: &[Sheet], project_id: &str) -> Result<Vec<ScheduleData>, Error> {
    let [sheet] = sheets else {
        return Err(Error::InvalidData(format!(
            "schedule workbook must contain exactly 1 sheet, found {}",
            sheets.len()
        )));
    };
    if sheet.rows.len() < 2 {
        return Err(Error::InvalidData(format!(
            "schedule sheet {:?} has no schedule data",
            sheet.name
        )));
    }

    let schedules: Vec<ScheduleData> = sheet
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.trim().is_empty())
        .enumerate()
        .map(|(n, (column, header))| ScheduleData {
            schedule_data_id: (n + 1).to_string(),
            schedule_list: sheet.column(column).collect::<Vec<_>>().join(","),
            route_path_id: format!("{}-{project_id}", header.trim()),
        })
        .collect();

    info!("Read departure schedules for {} routes", schedules.len());
    Ok(schedules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            "Schedule",
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_one_entry_per_route_column() {
        let sheets = [sheet(&[
            &["Red", "", "Blue"],
            &["6:00", "x", "6:15"],
            &["6:30", "", ""],
            &[" 7:00 ", "", "7:15"],
        ])];
        let schedules = ingest_schedule_sheets(&sheets, "p1").unwrap();

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].schedule_data_id, "1");
        assert_eq!(schedules[0].route_path_id, "Red-p1");
        assert_eq!(schedules[0].schedule_list, "6:00,6:30,7:00");
        assert_eq!(schedules[1].schedule_data_id, "2");
        assert_eq!(schedules[1].route_path_id, "Blue-p1");
        assert_eq!(schedules[1].schedule_list, "6:15,7:15");
    }

    #[test]
    fn test_sheet_count_and_empty_sheet() {
        let two = [sheet(&[&["Red"], &["6:00"]]), sheet(&[&["Red"], &["6:00"]])];
        assert!(matches!(
            ingest_schedule_sheets(&two, "p"),
            Err(Error::InvalidData(_))
        ));
        let header_only = [sheet(&[&["Red"]])];
        assert!(ingest_schedule_sheets(&header_only, "p").is_err());
        assert!(ingest_schedule_sheets(&[], "p").is_err());
    }
}
