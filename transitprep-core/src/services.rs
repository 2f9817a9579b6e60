//! Clients for the demand-fitting service and the simulation engine.
//!
//! Both take JSON and answer JSON; requests are shaped here and replies are
//! relayed without reinterpretation.

use std::time::Duration;

use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::{DataFitResponse, DemandData, DistributionRow, SimulationRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(with = "crate::time::serde_secs")]
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct JsonClient {
    client: Client,
    base_url: String,
    service: &'static str,
}

impl JsonClient {
    fn new(config: &ServiceConfig, service: &'static str) -> Result<Self, Error> {
        Ok(Self {
            client: Client::builder().timeout(config.request_timeout).build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Upstream {
                service: self.service,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Fits a distribution to every demand item
#[derive(Debug, Clone)]
pub struct FitService {
    inner: JsonClient,
}

impl FitService {
    pub fn new(config: &ServiceConfig) -> Result<Self, Error> {
        Ok(Self {
            inner: JsonClient::new(config, "distribution fitting")?,
        })
    }

    pub async fn fit(&self, data: &DemandData) -> Result<DataFitResponse, Error> {
        let response: DataFitResponse = self.inner.post("/api/distribution_fit", data).await?;
        info!(
            "Fitted {} distributions for {} items",
            response.items.len(),
            data.data.len()
        );
        Ok(response)
    }
}

/// Runs the discrete-event simulation
#[derive(Debug, Clone)]
pub struct SimulationService {
    inner: JsonClient,
}

impl SimulationService {
    pub fn new(config: &ServiceConfig) -> Result<Self, Error> {
        Ok(Self {
            inner: JsonClient::new(config, "simulation engine")?,
        })
    }

    /// The engine's reply, untouched
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<serde_json::Value, Error> {
        self.inner.post("/api/simulate", request).await
    }
}

/// Store fitted distributions under a configuration, ids `"{configuration}-{n}"`
/// counting from 1
pub fn distribution_rows(response: &DataFitResponse, configuration_detail_id: &str) -> Vec<DistributionRow> {
    response
        .items
        .iter()
        .enumerate()
        .map(|(n, item)| {
            DistributionRow::from_fit(
                item,
                configuration_detail_id,
                format!("{configuration_detail_id}-{}", n + 1),
            )
        })
        .collect()
}
