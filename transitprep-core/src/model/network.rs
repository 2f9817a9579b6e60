//! Stations, directed station pairs and the network model built from them

use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{LonLat, Meters, Seconds};

/// GeoJSON point as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "GeoPoint::kind")]
    pub kind: String,
    pub coordinates: LonLat,
}

impl GeoPoint {
    fn kind() -> String {
        "Point".to_string()
    }

    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            kind: Self::kind(),
            coordinates: [lon, lat],
        }
    }
}

/// GeoJSON line string, coordinates in `[lon, lat]` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLineString {
    #[serde(rename = "type", default = "GeoLineString::kind")]
    pub kind: String,
    pub coordinates: Vec<LonLat>,
}

impl GeoLineString {
    fn kind() -> String {
        "LineString".to_string()
    }

    pub fn new(coordinates: Vec<LonLat>) -> Self {
        Self {
            kind: Self::kind(),
            coordinates,
        }
    }
}

/// A point served by buses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "station_detail_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub station_id_osm: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: GeoPoint::new(lon, lat),
            station_id_osm: String::new(),
        }
    }

    pub fn lon_lat(&self) -> LonLat {
        self.location.coordinates
    }

    pub fn point(&self) -> Point<f64> {
        let [lon, lat] = self.location.coordinates;
        Point::new(lon, lat)
    }
}

/// Travel time, distance and optional road geometry of one directed pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBetween {
    #[serde(rename = "RouteBetweenID")]
    pub id: String,
    /// seconds
    #[serde(rename = "TravelTime")]
    pub travel_time: Seconds,
    /// metres
    #[serde(rename = "Distance")]
    pub distance: Meters,
    #[serde(rename = "Route", default, skip_serializing_if = "Option::is_none")]
    pub route: Option<GeoLineString>,
}

/// One directed `(first, second)` station pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPair {
    #[serde(rename = "StationPairID")]
    pub id: String,
    #[serde(rename = "FstStation")]
    pub first: String,
    #[serde(rename = "SndStation")]
    pub second: String,
    #[serde(rename = "RouteBetween")]
    pub route_between: RouteBetween,
}

impl StationPair {
    pub fn pair_id(first: &str, second: &str) -> String {
        format!("{first}-{second}")
    }

    pub fn route_between_id(first: &str, second: &str) -> String {
        format!("{first}-{second}-route")
    }
}

/// Which computation produced a travel matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatrixSource {
    /// Road network values from the routing service
    Remote,
    /// Haversine distance at constant speed
    Local { reason: FallbackReason },
}

/// Why the local estimate was used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    LocalMode,
    MissingApiKey,
    TooManyStations,
    RemoteFailed,
    RemoteTimedOut,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::LocalMode => "local mode requested",
            FallbackReason::MissingApiKey => "routing API key missing",
            FallbackReason::TooManyStations => "station count above remote cap",
            FallbackReason::RemoteFailed => "remote matrix failed",
            FallbackReason::RemoteTimedOut => "remote matrix timed out",
        };
        f.write_str(text)
    }
}

/// Stations and directed pairs of one configuration.
///
/// Travel values are a snapshot taken when the matrix was built; editing the
/// station set requires rebuilding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    #[serde(default)]
    pub network_model_id: String,
    #[serde(rename = "Network_model", default)]
    pub name: String,
    #[serde(rename = "Station_detail", default)]
    pub stations: Vec<Station>,
    #[serde(rename = "StationPair", default)]
    pub station_pairs: Vec<StationPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_source: Option<MatrixSource>,
}

impl NetworkModel {
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn station_pair(&self, id: &str) -> Option<&StationPair> {
        self.station_pairs.iter().find(|p| p.id == id)
    }
}
