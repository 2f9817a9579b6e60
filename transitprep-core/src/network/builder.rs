use log::{info, warn};

use super::matrix::{GeoMatrixBuilder, TravelMatrix};
use crate::model::{NetworkModel, RouteBetween, Station, StationPair};
use crate::routing::RoutingService;
use crate::time::parse_finite;
use crate::Error;

/// Builds a [`NetworkModel`] with every directed station pair
pub struct NetworkBuilder<S> {
    matrix: GeoMatrixBuilder<S>,
}

impl<S> NetworkBuilder<S>
where
    S: RoutingService + 'static,
{
    pub fn new(matrix: GeoMatrixBuilder<S>) -> Self {
        Self { matrix }
    }

    /// Creates a network model for `stations`
    ///
    /// # Errors
    ///
    /// Returns an error if no usable station remains or the matrix build
    /// fails under a strict fallback policy
    pub async fn build(
        &self,
        network_model_id: &str,
        name: &str,
        stations: Vec<Station>,
    ) -> Result<NetworkModel, Error> {
        let stations = usable_stations(stations);
        if stations.is_empty() {
            return Err(Error::EmptyStations("network model"));
        }

        info!("Building travel matrix for {} stations", stations.len());
        let matrix = self.matrix.build(&stations).await?;
        network_from_matrix(network_model_id, name, stations, &matrix)
    }
}

/// Drops stations without an id and repeated ids, keeping the first
pub fn usable_stations(stations: Vec<Station>) -> Vec<Station> {
    let mut seen = hashbrown::HashSet::new();
    stations
        .into_iter()
        .filter(|station| {
            let id = station.id.trim();
            if id.is_empty() {
                warn!("Skipping station {:?} without an id", station.name);
                return false;
            }
            if !seen.insert(id.to_string()) {
                warn!("Skipping repeated station id {id:?}");
                return false;
            }
            true
        })
        .collect()
}

/// Assemble the model from stations and a matrix indexed the same way
///
/// # Errors
///
/// Fails when the matrix does not match the station count
pub fn network_from_matrix(
    network_model_id: &str,
    name: &str,
    stations: Vec<Station>,
    matrix: &TravelMatrix,
) -> Result<NetworkModel, Error> {
    let n = stations.len();
    let square = |grid: &Vec<Vec<f64>>| grid.len() == n && grid.iter().all(|row| row.len() == n);
    if !square(&matrix.distances) || !square(&matrix.durations) {
        return Err(Error::InvalidData(format!(
            "travel matrix is not {n}x{n}"
        )));
    }

    let mut station_pairs = Vec::with_capacity(n * n.saturating_sub(1));
    for (i, first) in stations.iter().enumerate() {
        for (j, second) in stations.iter().enumerate() {
            if i == j {
                continue;
            }
            station_pairs.push(StationPair {
                id: StationPair::pair_id(&first.id, &second.id),
                first: first.id.clone(),
                second: second.id.clone(),
                route_between: RouteBetween {
                    id: StationPair::route_between_id(&first.id, &second.id),
                    travel_time: matrix.duration(i, j),
                    distance: matrix.distance(i, j),
                    route: None,
                },
            });
        }
    }

    info!(
        "Network {name:?}: {} stations, {} station pairs ({:?})",
        n,
        station_pairs.len(),
        matrix.source
    );

    Ok(NetworkModel {
        network_model_id: network_model_id.to_string(),
        name: name.to_string(),
        stations,
        station_pairs,
        matrix_source: Some(matrix.source.clone()),
    })
}

/// Station from textual coordinate fields
///
/// # Errors
///
/// Fails on a blank id or on coordinates that are not finite numbers within
/// WGS84 bounds
pub fn parse_station(id: &str, name: &str, lon: &str, lat: &str) -> Result<Station, Error> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidData(format!("station {name:?} has no id")));
    }
    let coordinate = |text: &str, limit: f64| {
        parse_finite(text)
            .filter(|v| v.abs() <= limit)
            .ok_or_else(|| Error::InvalidData(format!("station {id:?}: bad coordinate {text:?}")))
    };
    Ok(Station::new(id, name.trim(), coordinate(lon, 180.0)?, coordinate(lat, 90.0)?))
}
