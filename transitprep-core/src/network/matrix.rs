//! Pairwise travel distance and duration between stations.
//!
//! The remote path splits the station list into blocks and asks the routing
//! service for one (source block, destination block) sub-matrix at a time,
//! pausing between requests to stay under the service's rate limit. The
//! local path is a haversine estimate at constant speed and is also the
//! fallback whenever the remote path is unavailable or fails.

use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::local::local_matrix;
use crate::model::{FallbackReason, MatrixSource, Station};
use crate::routing::{MatrixQuery, RoutingService, bounded};
use crate::{Error, LonLat, Meters, Seconds};

pub type Grid = Vec<Vec<f64>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMode {
    Local,
    #[default]
    Remote,
}

impl FromStr for MatrixMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(MatrixMode::Local),
            "remote" | "ors" => Ok(MatrixMode::Remote),
            other => Err(Error::InvalidData(format!("unknown matrix mode {other:?}"))),
        }
    }
}

/// What to do when the remote build fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Return the local estimate, tagged with the failure reason
    #[default]
    Degrade,
    /// Return the error
    Strict,
}

impl FromStr for FallbackPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(FallbackPolicy::Degrade),
            "strict" => Ok(FallbackPolicy::Strict),
            other => Err(Error::InvalidData(format!("unknown fallback policy {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub mode: MatrixMode,
    /// Above this many stations the local estimate is used; `None` for no cap
    pub max_remote_stations: Option<usize>,
    /// Stations per source or destination block
    pub chunk_size: usize,
    pub fallback_speed_kmh: f64,
    /// Pause between consecutive chunk requests
    #[serde(with = "crate::time::serde_secs")]
    pub chunk_delay: Duration,
    #[serde(with = "crate::time::serde_secs")]
    pub chunk_timeout: Duration,
    #[serde(with = "crate::time::serde_secs")]
    pub build_timeout: Duration,
    pub policy: FallbackPolicy,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            mode: MatrixMode::Remote,
            max_remote_stations: None,
            chunk_size: 25,
            fallback_speed_kmh: 30.0,
            chunk_delay: Duration::from_millis(1500),
            chunk_timeout: Duration::from_secs(20),
            build_timeout: Duration::from_secs(120),
            policy: FallbackPolicy::Degrade,
        }
    }
}

/// N×N matrices indexed like the station list they were built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrix {
    pub distances: Grid,
    pub durations: Grid,
    pub source: MatrixSource,
}

impl TravelMatrix {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn distance(&self, from: usize, to: usize) -> Meters {
        self.distances[from][to]
    }

    pub fn duration(&self, from: usize, to: usize) -> Seconds {
        self.durations[from][to]
    }
}

pub struct GeoMatrixBuilder<S> {
    service: Option<Arc<S>>,
    config: MatrixConfig,
}

impl<S> GeoMatrixBuilder<S>
where
    S: RoutingService + 'static,
{
    /// `service` is `None` when no routing credential is configured
    pub fn new(service: Option<Arc<S>>, config: MatrixConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Build the matrix for `stations`, in their order.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStations`] for an empty list. Under
    /// [`FallbackPolicy::Strict`] remote failures are returned as well;
    /// otherwise they degrade to the local estimate.
    pub async fn build(&self, stations: &[Station]) -> Result<TravelMatrix, Error> {
        if stations.is_empty() {
            return Err(Error::EmptyStations("travel matrix"));
        }

        let service = match self.remote_service(stations.len()) {
            Ok(service) => service,
            Err(reason) => {
                info!(
                    "Using local matrix for {} stations: {reason}",
                    stations.len()
                );
                return Ok(self.local(stations, reason));
            }
        };

        let locations: Vec<LonLat> = stations.iter().map(Station::lon_lat).collect();
        match self.remote_within_deadline(service, locations).await {
            Ok(matrix) => {
                info!("Built remote matrix for {} stations", stations.len());
                Ok(matrix)
            }
            Err(e) if self.config.policy == FallbackPolicy::Strict => Err(e),
            Err(e) => {
                let reason = if e.is_timeout() {
                    FallbackReason::RemoteTimedOut
                } else {
                    FallbackReason::RemoteFailed
                };
                warn!("Remote matrix unavailable ({e}), falling back to local estimate");
                Ok(self.local(stations, reason))
            }
        }
    }

    fn remote_service(&self, station_count: usize) -> Result<Arc<S>, FallbackReason> {
        if self.config.mode == MatrixMode::Local {
            return Err(FallbackReason::LocalMode);
        }
        let Some(service) = &self.service else {
            return Err(FallbackReason::MissingApiKey);
        };
        if let Some(cap) = self.config.max_remote_stations
            && station_count > cap
        {
            return Err(FallbackReason::TooManyStations);
        }
        Ok(Arc::clone(service))
    }

    /// Runs the chunk loop in place, so an expired deadline drops it and no
    /// further chunk is requested. Only the chunk already in flight keeps
    /// running in its own task.
    async fn remote_within_deadline(
        &self,
        service: Arc<S>,
        locations: Vec<LonLat>,
    ) -> Result<TravelMatrix, Error> {
        let deadline = self.config.build_timeout;
        let work = remote_matrix(service, locations, self.config.clone());
        match tokio::time::timeout(deadline, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Remote matrix build exceeded {deadline:?}, no further chunks requested");
                Err(Error::Timeout {
                    operation: "remote matrix build",
                    deadline,
                })
            }
        }
    }

    fn local(&self, stations: &[Station], reason: FallbackReason) -> TravelMatrix {
        local_matrix(stations, self.config.fallback_speed_kmh, reason)
    }
}

/// Consecutive index ranges of at most `size` stations
pub(crate) fn blocks(count: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..count)
        .step_by(size)
        .map(|start| start..(start + size).min(count))
        .collect()
}

/// Location list and index lists for one (source, destination) block pair.
///
/// A block paired with itself is sent once; otherwise the destination block
/// follows the source block in the location list.
fn block_query(locations: &[LonLat], sources: &Range<usize>, destinations: &Range<usize>) -> MatrixQuery {
    if sources == destinations {
        let block = locations[sources.clone()].to_vec();
        let indices: Vec<usize> = (0..block.len()).collect();
        return MatrixQuery {
            locations: block,
            sources: indices.clone(),
            destinations: indices,
        };
    }

    let mut union = locations[sources.clone()].to_vec();
    union.extend_from_slice(&locations[destinations.clone()]);
    let source_count = sources.len();
    MatrixQuery {
        locations: union,
        sources: (0..source_count).collect(),
        destinations: (source_count..source_count + destinations.len()).collect(),
    }
}

async fn remote_matrix<S>(
    service: Arc<S>,
    locations: Vec<LonLat>,
    config: MatrixConfig,
) -> Result<TravelMatrix, Error>
where
    S: RoutingService + 'static,
{
    let n = locations.len();
    let mut distances = vec![vec![0.0; n]; n];
    let mut durations = vec![vec![0.0; n]; n];

    let ranges = blocks(n, config.chunk_size);
    let pairs: Vec<_> = ranges.iter().cartesian_product(ranges.iter()).collect();
    debug!("Requesting {} matrix chunks for {n} stations", pairs.len());

    for (request, (sources, destinations)) in pairs.into_iter().enumerate() {
        if request > 0 && !config.chunk_delay.is_zero() {
            tokio::time::sleep(config.chunk_delay).await;
        }

        let query = block_query(&locations, sources, destinations);
        let chunk_service = Arc::clone(&service);
        let reply = bounded("matrix chunk", config.chunk_timeout, async move {
            let reply = chunk_service.matrix(query.clone()).await?;
            reply.validate(&query)?;
            Ok(reply)
        })
        .await
        .map_err(|cause| Error::MatrixChunk {
            source_block: sources.start,
            destination_block: destinations.start,
            cause: Box::new(cause),
        })?;

        for (r, i) in sources.clone().enumerate() {
            for (c, j) in destinations.clone().enumerate() {
                distances[i][j] = reply.distances[r][c];
                durations[i][j] = reply.durations[r][c];
            }
        }
    }

    for i in 0..n {
        distances[i][i] = 0.0;
        durations[i][i] = 0.0;
    }

    Ok(TravelMatrix {
        distances,
        durations,
        source: MatrixSource::Remote,
    })
}
