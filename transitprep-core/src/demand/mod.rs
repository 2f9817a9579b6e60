//! Passenger-demand ingestion.
//!
//! Workbooks of observed arrival/departure instants are decoded
//! ([`workbook`]), normalized to minutes since midnight and optionally turned
//! into inter-event gaps ([`derive`]) before they are sent to the fitting
//! service.

pub mod derive;
mod ingest;
mod schedule;
pub mod workbook;

pub use ingest::{IngestMode, ingest_sheets, ingest_workbook};
pub use schedule::{ingest_schedule_sheets, ingest_schedule_workbook};
pub use workbook::{Sheet, read_workbook};
