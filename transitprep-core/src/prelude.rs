// Re-export key components
pub use crate::demand::{
    IngestMode, Sheet, ingest_schedule_sheets, ingest_schedule_workbook, ingest_sheets,
    ingest_workbook, read_workbook,
};
pub use crate::network::{
    FallbackPolicy, GeoMatrixBuilder, GeometryConfig, GeometrySource, MatrixConfig, MatrixMode,
    NetworkBuilder, RouteGeometry, RouteGeometryResolver, SegmentGeometry, TravelMatrix,
    segments_to_geojson_string,
};
pub use crate::routing::{MatrixQuery, MatrixReply, OpenRouteService, RoutingConfig, RoutingService};
pub use crate::services::{FitService, ServiceConfig, SimulationService, distribution_rows};
pub use crate::time::{TimePeriod, parse_clock_minutes, parse_time_value};
pub use crate::transform::transform_simulation_request;

// Wire model
pub use crate::model::*;

pub use crate::Error;
pub use crate::{LonLat, Meters, Minutes, Seconds};
