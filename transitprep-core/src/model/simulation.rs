//! Flat request consumed by the simulation engine.
//!
//! Built fresh for every run by [`crate::transform`] and never persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub time_period: String,
    /// Length of one reporting slot in minutes
    pub time_slot: u32,
    pub configuration_data: ConfigurationData,
    pub scenario_data: Vec<ScenarioData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationData {
    pub station_list: Vec<StationEntry>,
    pub route_pair: Vec<RoutePair>,
    pub alighting_data: Vec<SimData>,
    pub interarrival_data: Vec<SimData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry {
    pub station_id: String,
    pub station_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePair {
    pub route_pair_id: String,
    pub fst_station: String,
    pub snd_station: String,
    pub travel_time: f64,
    pub distance: f64,
}

/// Distribution records sharing one time-range label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimData {
    pub time_range: String,
    // the engine reads this key for both alighting and inter-arrival data
    #[serde(rename = "alighting_records")]
    pub records: Vec<DisRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisRecord {
    pub station: String,
    #[serde(rename = "Distribution")]
    pub distribution: String,
    #[serde(rename = "ArgumentList")]
    pub argument_list: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub route_id: String,
    pub route_name: String,
    /// Station pair ids joined with `$`
    pub route_order: String,
    pub route_schedule: Vec<RouteSchedule>,
    pub bus_information: RouteBusInformation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSchedule {
    pub departure_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteBusInformation {
    pub bus_speed: f64,
    pub max_distance: f64,
    pub max_bus: u32,
    pub bus_capacity: u32,
}
