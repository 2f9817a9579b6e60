//! Data model shared by the pipeline stages.
//!
//! Field names follow the JSON documents exchanged with the persistence layer
//! and the Python services.

mod configuration;
mod demand;
mod network;
mod scenario;
mod simulation;

pub use configuration::{ConfigurationDetail, DistributionRow};
pub use demand::{DataFitResponse, DemandData, FitItem, Item, Record, RecordKind};
pub use network::{
    FallbackReason, GeoLineString, GeoPoint, MatrixSource, NetworkModel, RouteBetween, Station,
    StationPair,
};
pub use scenario::{
    BusInformation, BusScenario, Order, RoutePath, RouteScenario, ScenarioDetail, ScheduleData,
};
pub use simulation::{
    ConfigurationData, DisRecord, RouteBusInformation, RoutePair, RouteSchedule, ScenarioData,
    SimData, SimulationRequest, StationEntry,
};
