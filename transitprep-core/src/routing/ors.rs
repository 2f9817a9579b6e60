//! OpenRouteService-compatible HTTP client

use std::fmt;
use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{MatrixQuery, MatrixReply, RoutingService};
use crate::{Error, LonLat};

/// Connection settings for the routing service
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: String,
    pub profile: String,
    /// Sent verbatim in the `Authorization` header. Absent or blank means
    /// no routing service is available.
    pub api_key: Option<String>,
    #[serde(with = "crate::time::serde_secs")]
    pub request_timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-car".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingConfig")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

const REDACTED: &str = "<redacted>";

#[derive(Clone)]
pub struct OpenRouteService {
    client: Client,
    base_url: String,
    profile: String,
    api_key: String,
}

impl fmt::Debug for OpenRouteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouteService")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("api_key", &REDACTED)
            .finish_non_exhaustive()
    }
}

impl OpenRouteService {
    /// Build a client, or `None` when the config carries no usable key
    pub fn connect(config: &RoutingConfig) -> Result<Option<Self>, Error> {
        let Some(api_key) = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        else {
            return Ok(None);
        };

        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            api_key: api_key.to_string(),
        }))
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<String, Error> {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(Error::Upstream {
                service: "routing",
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[derive(Deserialize)]
struct OrsMatrix {
    distances: Option<Vec<Vec<Option<f64>>>>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct OrsDirections {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Deserialize)]
struct OrsFeature {
    geometry: OrsGeometry,
}

#[derive(Deserialize)]
struct OrsGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

/// Unroutable pairs come back as `null` cells
fn dense(name: &str, matrix: Option<Vec<Vec<Option<f64>>>>) -> Result<Vec<Vec<f64>>, Error> {
    let matrix = matrix.ok_or_else(|| Error::InvalidData(format!("matrix reply lacks {name}")))?;
    matrix
        .into_iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .into_iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.ok_or_else(|| {
                        Error::InvalidData(format!("no {name} value for cell ({row}, {col})"))
                    })
                })
                .collect()
        })
        .collect()
}

fn parse_matrix(body: &str) -> Result<MatrixReply, Error> {
    let raw: OrsMatrix = serde_json::from_str(body)?;
    Ok(MatrixReply {
        distances: dense("distances", raw.distances)?,
        durations: dense("durations", raw.durations)?,
    })
}

fn parse_route(body: &str) -> Result<Vec<LonLat>, Error> {
    let raw: OrsDirections = serde_json::from_str(body)?;
    let feature = raw
        .features
        .into_iter()
        .next()
        .ok_or_else(|| Error::InvalidData("directions reply has no features".to_string()))?;

    let path: Vec<LonLat> = feature
        .geometry
        .coordinates
        .iter()
        .filter_map(|c| match c.as_slice() {
            [lon, lat, ..] => Some([*lon, *lat]),
            _ => None,
        })
        .collect();
    if path.len() < 2 {
        return Err(Error::InvalidData(format!(
            "directions reply has {} usable coordinates",
            path.len()
        )));
    }
    Ok(path)
}

impl RoutingService for OpenRouteService {
    async fn matrix(&self, query: MatrixQuery) -> Result<MatrixReply, Error> {
        let body = json!({
            "locations": query.locations,
            "sources": query.sources,
            "destinations": query.destinations,
            "metrics": ["distance", "duration"],
            "units": "m",
        });
        let text = self
            .post(&format!("/v2/matrix/{}", self.profile), &body)
            .await?;
        parse_matrix(&text)
    }

    async fn route(&self, start: LonLat, end: LonLat) -> Result<Vec<LonLat>, Error> {
        let body = json!({ "coordinates": [start, end] });
        let text = self
            .post(&format!("/v2/directions/{}/geojson", self.profile), &body)
            .await?;
        parse_route(&text)
    }
}
