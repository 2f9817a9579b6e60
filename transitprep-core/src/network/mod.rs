//! Station network: travel matrices, directed pairs and road geometry.

mod builder;
mod geometry;
mod local;
mod matrix;
mod to_geojson;

pub use builder::{NetworkBuilder, network_from_matrix, parse_station, usable_stations};
pub use geometry::{
    GeometryConfig, GeometrySource, RouteGeometry, RouteGeometryResolver, SegmentGeometry,
};
pub use local::{EARTH_RADIUS_M, duration_at_speed, haversine_meters, local_matrix};
pub use matrix::{FallbackPolicy, GeoMatrixBuilder, Grid, MatrixConfig, MatrixMode, TravelMatrix};
pub use to_geojson::{segments_to_geojson, segments_to_geojson_string};
