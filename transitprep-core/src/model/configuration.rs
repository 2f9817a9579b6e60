use serde::{Deserialize, Serialize};

use super::{FitItem, NetworkModel};

/// Network and demand distributions of one planning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationDetail {
    pub configuration_detail_id: String,
    pub network_model_id: String,
    pub network_model: NetworkModel,
    #[serde(rename = "alighting_datas")]
    pub alighting_data: Vec<DistributionRow>,
    #[serde(rename = "interarrival_datas")]
    pub interarrival_data: Vec<DistributionRow>,
}

/// A fitted distribution for one station and time-range label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionRow {
    #[serde(alias = "alighting_data_id", alias = "inter_arrival_data_id")]
    pub row_id: String,
    pub configuration_detail_id: String,
    pub time_period: String,
    pub distribution: String,
    pub argument_list: String,
    pub station_id: String,
}

impl DistributionRow {
    /// Store a fitting-service result under a configuration
    pub fn from_fit(item: &FitItem, configuration_detail_id: &str, row_id: String) -> Self {
        Self {
            row_id,
            configuration_detail_id: configuration_detail_id.to_string(),
            time_period: item.time_range.clone(),
            distribution: item.distribution.clone(),
            argument_list: item.argument_list.clone(),
            station_id: item.station.clone(),
        }
    }
}
