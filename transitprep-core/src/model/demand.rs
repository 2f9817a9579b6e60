//! Passenger-demand records exchanged with the fitting service

use serde::{Deserialize, Serialize};

/// What the numeric values of a [`DemandData`] set mean.
///
/// Both kinds share the wire shape `{Record_ID, Numeric_Value}`, so the kind
/// travels with the Rust value instead of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Event instants, minutes since midnight
    RawInstant,
    /// Minutes between consecutive events
    InterEventGap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Record_ID")]
    pub record_id: u32,
    #[serde(rename = "Numeric_Value")]
    pub numeric_value: f64,
}

/// Records of one station within one time-range label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Time_Range")]
    pub time_range: String,
    #[serde(rename = "Records")]
    pub records: Vec<Record>,
}

/// Ingestion output and fitting-service request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandData {
    #[serde(skip)]
    pub kind: RecordKind,
    #[serde(rename = "Data")]
    pub data: Vec<Item>,
}

impl DemandData {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            data: Vec::new(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.data.iter().map(|item| item.records.len()).sum()
    }

    pub fn items_for<'a>(&'a self, station: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.data.iter().filter(move |item| item.station == station)
    }
}

/// One fitted distribution as returned by the fitting service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitItem {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Time_Range")]
    pub time_range: String,
    #[serde(rename = "Distribution")]
    pub distribution: String,
    #[serde(rename = "ArgumentList")]
    pub argument_list: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFitResponse {
    #[serde(rename = "DataFitResponse", default)]
    pub items: Vec<FitItem>,
}
