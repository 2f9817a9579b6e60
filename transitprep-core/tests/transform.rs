use serde_json::json;
use transitprep_core::prelude::*;

fn pair(first: &str, second: &str, travel_time: f64, distance: f64) -> serde_json::Value {
    json!({
        "StationPairID": format!("{first}-{second}"),
        "FstStation": first,
        "SndStation": second,
        "RouteBetween": {
            "RouteBetweenID": format!("{first}-{second}-route"),
            "TravelTime": travel_time,
            "Distance": distance,
        }
    })
}

fn station(id: &str, name: &str) -> serde_json::Value {
    json!({
        "station_detail_id": id,
        "name": name,
        "location": {"type": "Point", "coordinates": [100.5, 13.7]},
    })
}

fn abc_configuration() -> ConfigurationDetail {
    serde_json::from_value(json!({
        "configuration_detail_id": "cfg-1",
        "network_model_id": "net-1",
        "network_model": {
            "network_model_id": "net-1",
            "Network_model": "ABC",
            "Station_detail": [station("A", "Alpha"), station("B", "Beta"), station("C", "Gamma")],
            "StationPair": [
                pair("A", "B", 120.0, 900.0),
                pair("B", "C", 90.0, 700.0),
                pair("A", "C", 200.0, 1500.0),
            ],
        },
        "alighting_datas": [
            {"alighting_data_id": "1", "time_period": "8:00-8:59", "distribution": "Poisson",
             "argument_list": "lambda=3", "station_id": "B"},
            {"alighting_data_id": "2", "time_period": "9:00-9:59", "distribution": "Poisson",
             "argument_list": "lambda=4", "station_id": "B"},
        ],
        "interarrival_datas": [
            {"inter_arrival_data_id": "1", "time_period": "8:00-8:59", "distribution": "Exponential",
             "argument_list": "rate=0.2", "station_id": "A"},
        ],
    }))
    .unwrap()
}

fn abc_scenario() -> ScenarioDetail {
    serde_json::from_value(json!({
        "scenario_detail_id": "sc-1",
        "configuration_detail_id": "cfg-1",
        "route_scenario": {
            "route_scenario_id": "rs-1",
            "route_paths": [{
                "route_path_id": "R1",
                "name": "Red line",
                "color": "#ff0000",
                // stored out of order on purpose
                "orders": [
                    {"order_id": "o2", "order": 2, "station_pair_id": "B-C", "route_path_id": "R1"},
                    {"order_id": "o1", "order": 1, "station_pair_id": "A-B", "route_path_id": "R1"},
                ],
            }],
        },
        "bus_scenario": {
            "bus_scenario_id": "bs-1",
            "schedule_data": [
                {"schedule_data_id": "1", "schedule_list": "8:10,8:45", "route_path_id": "R1"},
            ],
            "bus_informations": [
                {"bus_information_id": "b1", "speed": 35.0, "max_dis": 20.0, "max_bus": 4,
                 "capacity": 60, "route_path_id": "R1"},
            ],
        },
    }))
    .unwrap()
}

#[test]
fn test_end_to_end_abc() {
    let request =
        transform_simulation_request(&abc_scenario(), &abc_configuration(), "8:00-9:00", 60)
            .unwrap();

    let pairs = &request.configuration_data.route_pair;
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].route_pair_id, "A-B");
    assert_eq!(pairs[0].travel_time, 120.0);
    assert_eq!(pairs[1].route_pair_id, "B-C");
    assert_eq!(pairs[1].travel_time, 90.0);

    let stations: Vec<&str> = request
        .configuration_data
        .station_list
        .iter()
        .map(|s| s.station_id.as_str())
        .collect();
    assert_eq!(stations, vec!["A", "B", "C"]);

    let route = &request.scenario_data[0];
    assert_eq!(route.route_id, "R1");
    assert_eq!(route.route_name, "Red line");
    assert_eq!(route.route_order, "A-B$B-C");
    assert_eq!(route.route_schedule.len(), 2);
    assert_eq!(route.route_schedule[0].departure_time, "8:10");
    assert_eq!(route.bus_information.bus_speed, 35.0);
    assert_eq!(route.bus_information.max_distance, 20.0);
    assert_eq!(route.bus_information.max_bus, 4);
    assert_eq!(route.bus_information.bus_capacity, 60);

    let alighting = &request.configuration_data.alighting_data;
    assert_eq!(alighting.len(), 1);
    assert_eq!(alighting[0].time_range, "8:00-8:59");
    assert_eq!(alighting[0].records[0].station, "B");
    assert_eq!(request.configuration_data.interarrival_data.len(), 1);

    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(wire["time_period"], "8:00-9:00");
    assert_eq!(wire["time_slot"], 60);
    assert_eq!(
        wire["configuration_data"]["alighting_data"][0]["alighting_records"][0]["Distribution"],
        "Poisson"
    );
    assert_eq!(
        wire["configuration_data"]["interarrival_data"][0]["alighting_records"][0]["ArgumentList"],
        "rate=0.2"
    );
    assert_eq!(wire["scenario_data"][0]["route_schedule"][1]["departure_time"], "8:45");
}

#[test]
fn test_only_used_stations_are_emitted() {
    let ids: Vec<String> = (0..10).map(|k| format!("S{k}")).collect();
    let mut pairs = Vec::new();
    for a in &ids {
        for b in &ids {
            if a != b {
                pairs.push(pair(a, b, 60.0, 400.0));
            }
        }
    }
    let configuration: ConfigurationDetail = serde_json::from_value(json!({
        "configuration_detail_id": "cfg",
        "network_model": {
            "Station_detail": ids.iter().map(|id| station(id, id)).collect::<Vec<_>>(),
            "StationPair": pairs,
        },
        "alighting_datas": [
            {"time_period": "8:00-8:59", "station_id": "S1", "distribution": "Poisson", "argument_list": "lambda=1"},
            {"time_period": "8:00-8:59", "station_id": "S9", "distribution": "Poisson", "argument_list": "lambda=1"},
        ],
    }))
    .unwrap();

    let scenario: ScenarioDetail = serde_json::from_value(json!({
        "configuration_detail_id": "cfg",
        "route_scenario": {"route_paths": [
            {"route_path_id": "R1", "orders": [
                {"order": 1, "station_pair_id": "S1-S4"},
                {"order": 2, "station_pair_id": "S4-S7"},
            ]},
            {"route_path_id": "R2", "orders": [
                {"order": 1, "station_pair_id": "S7-S2"},
            ]},
        ]},
    }))
    .unwrap();

    let request = transform_simulation_request(&scenario, &configuration, "8:00-9:00", 30).unwrap();

    let stations: Vec<&str> = request
        .configuration_data
        .station_list
        .iter()
        .map(|s| s.station_id.as_str())
        .collect();
    assert_eq!(stations, vec!["S1", "S2", "S4", "S7"]);
    assert_eq!(request.configuration_data.route_pair.len(), 3);

    // S9 is not on any route
    let alighting = &request.configuration_data.alighting_data;
    assert_eq!(alighting.len(), 1);
    assert_eq!(alighting[0].records.len(), 1);
    assert_eq!(alighting[0].records[0].station, "S1");

    // R2 has no schedule and no bus information
    assert!(request.scenario_data[1].route_schedule.is_empty());
    assert_eq!(request.scenario_data[1].bus_information.max_bus, 0);
}

#[test]
fn test_schedule_boundaries() {
    let mut scenario = abc_scenario();
    scenario.bus_scenario.schedule_data[0].schedule_list = "7:59,8:00,8:59,9:00".to_string();
    let request =
        transform_simulation_request(&scenario, &abc_configuration(), "8:00-9:00", 60).unwrap();
    let times: Vec<&str> = request.scenario_data[0]
        .route_schedule
        .iter()
        .map(|s| s.departure_time.as_str())
        .collect();
    assert_eq!(times, vec!["8:00", "8:59"]);
}
