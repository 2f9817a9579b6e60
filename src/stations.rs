//! Station list files: CSV with `id,name,lon,lat` columns

use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};
use transitprep_core::network::parse_station;
use transitprep_core::prelude::*;

#[derive(Debug, Deserialize)]
struct StationRow {
    id: String,
    #[serde(default)]
    name: String,
    lon: String,
    lat: String,
}

pub fn read_stations(path: &Path) -> Result<Vec<Station>, Box<dyn Error>> {
    let stations = stations_from_reader(File::open(path)?)?;
    info!(count = stations.len(), path = %path.display(), "Read stations");
    Ok(stations)
}

/// Rows with a blank id or unusable coordinates are skipped
pub fn stations_from_reader<R: Read>(reader: R) -> Result<Vec<Station>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stations = Vec::new();
    for (line, row) in reader.deserialize::<StationRow>().enumerate() {
        let row = row?;
        match parse_station(&row.id, &row.name, &row.lon, &row.lat) {
            Ok(station) => stations.push(station),
            Err(e) => warn!(row = line + 1, "Skipping station: {e}"),
        }
    }
    Ok(stations)
}
