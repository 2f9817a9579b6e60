//! Route, schedule and fleet bundle of one scenario

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioDetail {
    pub scenario_detail_id: String,
    pub configuration_detail_id: String,
    pub bus_scenario: BusScenario,
    pub route_scenario: RouteScenario,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteScenario {
    pub route_scenario_id: String,
    pub route_paths: Vec<RoutePath>,
}

/// One bus route, an ordered traversal of station pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePath {
    pub route_path_id: String,
    pub name: String,
    pub color: String,
    pub orders: Vec<Order>,
}

impl RoutePath {
    /// Station pair ids sorted by their order index
    pub fn ordered_pair_ids(&self) -> Vec<&str> {
        let mut orders: Vec<&Order> = self.orders.iter().collect();
        orders.sort_by_key(|o| o.order);
        orders.iter().map(|o| o.station_pair_id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_id: String,
    pub order: i32,
    pub station_pair_id: String,
    pub route_path_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusScenario {
    pub bus_scenario_id: String,
    pub schedule_data: Vec<ScheduleData>,
    pub bus_informations: Vec<BusInformation>,
}

/// Departures of one route, comma-joined clock strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleData {
    pub schedule_data_id: String,
    pub schedule_list: String,
    pub route_path_id: String,
}

impl ScheduleData {
    pub fn departures(&self) -> impl Iterator<Item = &str> {
        self.schedule_list
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Physical bus parameters of one route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusInformation {
    pub bus_information_id: String,
    pub speed: f64,
    pub max_dis: f64,
    pub max_bus: u32,
    pub capacity: u32,
    pub route_path_id: String,
}
