//! Scenario + configuration → flat, time-filtered simulation request.

use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};

use crate::model::{
    ConfigurationData, ConfigurationDetail, DisRecord, DistributionRow, NetworkModel, RoutePair,
    RoutePath, RouteBusInformation, RouteSchedule, ScenarioData, ScenarioDetail, SimData,
    SimulationRequest, StationEntry,
};
use crate::time::{TimePeriod, range_start};
use crate::{Error, Minutes};

const STAGE: &str = "transform";

/// Flatten `scenario` and `configuration` into the request for one run.
///
/// Only station pairs referenced by some route order, and the stations they
/// connect, are emitted. Departures and distribution rows are kept when their
/// start minute falls in the half-open `time_period`.
///
/// # Errors
///
/// Malformed period, a scenario bound to another configuration, an order
/// naming a pair the network lacks, or a network without stations.
pub fn transform_simulation_request(
    scenario: &ScenarioDetail,
    configuration: &ConfigurationDetail,
    time_period: &str,
    time_slot: u32,
) -> Result<SimulationRequest, Error> {
    let period: TimePeriod = time_period.parse()?;

    if scenario.configuration_detail_id != configuration.configuration_detail_id {
        return Err(Error::ConfigurationMismatch {
            expected: configuration.configuration_detail_id.clone(),
            actual: scenario.configuration_detail_id.clone(),
        });
    }
    if configuration.network_model.stations.is_empty() {
        return Err(Error::EmptyStations("simulation request"));
    }

    let route_paths = &scenario.route_scenario.route_paths;
    let configuration_data = transform_configuration(configuration, route_paths, &period)?;
    let scenario_data = route_paths
        .iter()
        .map(|path| transform_route(scenario, path, &period))
        .collect::<Vec<_>>();

    info!(
        "Simulation request for {period}: {} routes, {} stations, {} pairs",
        scenario_data.len(),
        configuration_data.station_list.len(),
        configuration_data.route_pair.len()
    );

    Ok(SimulationRequest {
        time_period: time_period.trim().to_string(),
        time_slot,
        configuration_data,
        scenario_data,
    })
}

fn transform_route(scenario: &ScenarioDetail, path: &RoutePath, period: &TimePeriod) -> ScenarioData {
    let bus = &scenario.bus_scenario;

    let route_schedule = bus
        .schedule_data
        .iter()
        .filter(|schedule| schedule.route_path_id == path.route_path_id)
        .flat_map(|schedule| schedule.departures())
        .filter(|departure| match period.contains_clock(departure) {
            Ok(inside) => inside,
            Err(e) => {
                warn!("Route {:?}: dropping departure ({e})", path.route_path_id);
                false
            }
        })
        .map(|departure| RouteSchedule {
            departure_time: departure.to_string(),
        })
        .collect();

    let bus_information = match bus
        .bus_informations
        .iter()
        .find(|info| info.route_path_id == path.route_path_id)
    {
        Some(info) => RouteBusInformation {
            bus_speed: info.speed,
            max_distance: info.max_dis,
            max_bus: info.max_bus,
            bus_capacity: info.capacity,
        },
        None => {
            warn!(
                "Route {:?} has no bus information, using zero values",
                path.route_path_id
            );
            RouteBusInformation::default()
        }
    };

    ScenarioData {
        route_id: path.route_path_id.clone(),
        route_name: path.name.clone(),
        route_order: path.ordered_pair_ids().join("$"),
        route_schedule,
        bus_information,
    }
}

fn transform_configuration(
    configuration: &ConfigurationDetail,
    route_paths: &[RoutePath],
    period: &TimePeriod,
) -> Result<ConfigurationData, Error> {
    let network = &configuration.network_model;
    let used_pairs = used_pair_ids(network, route_paths)?;

    let mut used_stations: HashSet<&str> = HashSet::new();
    let route_pair: Vec<RoutePair> = network
        .station_pairs
        .iter()
        .filter(|pair| used_pairs.contains(pair.id.as_str()))
        .map(|pair| {
            used_stations.insert(&pair.first);
            used_stations.insert(&pair.second);
            RoutePair {
                route_pair_id: pair.id.clone(),
                fst_station: pair.first.clone(),
                snd_station: pair.second.clone(),
                travel_time: pair.route_between.travel_time,
                distance: pair.route_between.distance,
            }
        })
        .collect();

    let station_list = network
        .stations
        .iter()
        .filter(|station| used_stations.contains(station.id.as_str()))
        .map(|station| StationEntry {
            station_id: station.id.clone(),
            station_name: station.name.clone(),
        })
        .collect();

    Ok(ConfigurationData {
        station_list,
        route_pair,
        alighting_data: group_distributions(&configuration.alighting_data, period, &used_stations),
        interarrival_data: group_distributions(
            &configuration.interarrival_data,
            period,
            &used_stations,
        ),
    })
}

/// Pair ids referenced by any order, each checked against the network
fn used_pair_ids<'a>(
    network: &NetworkModel,
    route_paths: &'a [RoutePath],
) -> Result<HashSet<&'a str>, Error> {
    let known: HashSet<&str> = network.station_pairs.iter().map(|p| p.id.as_str()).collect();
    let mut used = HashSet::new();
    for order in route_paths.iter().flat_map(|path| &path.orders) {
        let id = order.station_pair_id.as_str();
        if !known.contains(id) {
            return Err(Error::MissingReference {
                stage: STAGE,
                kind: "station pair",
                id: id.to_string(),
            });
        }
        used.insert(id);
    }
    Ok(used)
}

/// Rows in the period and at a used station, grouped by label and ordered by
/// start minute
fn group_distributions(
    rows: &[DistributionRow],
    period: &TimePeriod,
    used_stations: &HashSet<&str>,
) -> Vec<SimData> {
    let mut groups: Vec<(Minutes, SimData)> = Vec::new();
    let mut by_label: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let start = match range_start(&row.time_period) {
            Ok(start) => start,
            Err(e) => {
                warn!("Station {:?}: skipping distribution row ({e})", row.station_id);
                continue;
            }
        };
        if !period.contains(start) {
            continue;
        }
        if !used_stations.contains(row.station_id.as_str()) {
            debug!("Station {:?} is not on any route", row.station_id);
            continue;
        }

        let record = DisRecord {
            station: row.station_id.clone(),
            distribution: row.distribution.clone(),
            argument_list: row.argument_list.clone(),
        };
        let slot = *by_label.entry(row.time_period.as_str()).or_insert_with(|| {
            groups.push((
                start,
                SimData {
                    time_range: row.time_period.clone(),
                    records: Vec::new(),
                },
            ));
            groups.len() - 1
        });
        groups[slot].1.records.push(record);
    }

    groups.sort_by(|(a, x), (b, y)| a.total_cmp(b).then_with(|| x.time_range.cmp(&y.time_range)));
    groups.into_iter().map(|(_, data)| data).collect()
}
