//! Closed-form travel estimate used when the routing service is unavailable

use geo::{Distance, HaversineMeasure, Point};
use rayon::prelude::*;

use super::matrix::{Grid, TravelMatrix};
use crate::model::{FallbackReason, MatrixSource, Station};
use crate::{Meters, Seconds};

pub const EARTH_RADIUS_M: Meters = 6_371_000.0;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_M);

/// Great-circle distance on a sphere of radius [`EARTH_RADIUS_M`]
pub fn haversine_meters(a: Point<f64>, b: Point<f64>) -> Meters {
    EARTH.distance(a, b)
}

/// Seconds needed to cover `distance` at `speed_kmh`; zero for a non-positive
/// speed.
pub fn duration_at_speed(distance: Meters, speed_kmh: f64) -> Seconds {
    let meters_per_second = speed_kmh * 1000.0 / 3600.0;
    if meters_per_second <= 0.0 {
        return 0.0;
    }
    distance / meters_per_second
}

/// Full N×N haversine matrix, rows computed in parallel
pub fn local_matrix(stations: &[Station], speed_kmh: f64, reason: FallbackReason) -> TravelMatrix {
    let points: Vec<Point<f64>> = stations.iter().map(Station::point).collect();

    let distances: Grid = points
        .par_iter()
        .enumerate()
        .map(|(i, from)| {
            points
                .iter()
                .enumerate()
                .map(|(j, to)| if i == j { 0.0 } else { haversine_meters(*from, *to) })
                .collect()
        })
        .collect();

    let durations: Grid = distances
        .par_iter()
        .map(|row| row.iter().map(|d| duration_at_speed(*d, speed_kmh)).collect())
        .collect();

    TravelMatrix {
        distances,
        durations,
        source: MatrixSource::Local { reason },
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_meters(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert_relative_eq!(d, 111_194.9, max_relative = 1e-4);
    }

    #[test]
    fn test_radius_is_6371_km() {
        let d = haversine_meters(Point::new(10.0, 0.0), Point::new(10.0, 1.0));
        let arc = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert_relative_eq!(d, arc, max_relative = 1e-9);
    }

    #[test]
    fn test_duration_at_speed() {
        assert_relative_eq!(duration_at_speed(30_000.0, 30.0), 3600.0);
        assert_eq!(duration_at_speed(1000.0, 0.0), 0.0);
        assert_eq!(duration_at_speed(1000.0, -5.0), 0.0);
    }

    #[test]
    fn test_local_matrix_shape() {
        let stations = vec![
            Station::new("A", "A", 100.50, 13.75),
            Station::new("B", "B", 100.52, 13.76),
            Station::new("C", "C", 100.55, 13.70),
        ];
        let matrix = local_matrix(&stations, 30.0, FallbackReason::LocalMode);

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.distances[i].len(), 3);
            assert_eq!(matrix.distances[i][i], 0.0);
            assert_eq!(matrix.durations[i][i], 0.0);
            for j in 0..3 {
                assert_relative_eq!(matrix.distances[i][j], matrix.distances[j][i]);
            }
        }
        assert!(matrix.distances[0][1] > 0.0);
        assert_eq!(
            matrix.source,
            MatrixSource::Local {
                reason: FallbackReason::LocalMode
            }
        );
    }
}
