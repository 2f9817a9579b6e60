//! Road polylines between stations.
//!
//! Every routing call runs as its own task raced against a soft deadline.
//! The lenient entry points never fail: a timed out or failed call yields the
//! straight line between the endpoints, tagged [`GeometrySource::StraightLine`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::routing::{RoutingService, bounded};
use crate::{Error, LonLat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Soft deadline for a single directions request
    #[serde(with = "crate::time::serde_secs")]
    pub timeout: Duration,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometrySource {
    Road,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<LonLat>,
    pub source: GeometrySource,
}

impl RouteGeometry {
    pub fn straight(start: LonLat, end: LonLat) -> Self {
        Self {
            coordinates: vec![start, end],
            source: GeometrySource::StraightLine,
        }
    }
}

/// Geometry of the leg between `points[index]` and `points[index + 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentGeometry {
    pub index: usize,
    pub start: LonLat,
    pub end: LonLat,
    pub geometry: RouteGeometry,
}

pub struct RouteGeometryResolver<S> {
    service: Option<Arc<S>>,
    config: GeometryConfig,
}

impl<S> RouteGeometryResolver<S>
where
    S: RoutingService + 'static,
{
    /// `service` is `None` when no routing credential is configured
    pub fn new(service: Option<Arc<S>>, config: GeometryConfig) -> Self {
        Self { service, config }
    }

    /// Road geometry from `start` to `end`, or the straight line between them
    pub async fn resolve(&self, start: LonLat, end: LonLat) -> RouteGeometry {
        resolve_lenient(self.service.clone(), self.config.timeout, start, end).await
    }

    /// Road geometry without any fallback
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] past the deadline, [`Error::Upstream`] for a
    /// non-success reply, [`Error::InvalidData`] for an unusable payload or a
    /// missing routing credential.
    pub async fn resolve_strict(&self, start: LonLat, end: LonLat) -> Result<Vec<LonLat>, Error> {
        let Some(service) = self.service.clone() else {
            return Err(Error::InvalidData(
                "no routing service configured".to_string(),
            ));
        };
        fetch_route(service, self.config.timeout, start, end).await
    }

    /// Geometry for each consecutive pair of `points`, in input order.
    ///
    /// All segments are requested concurrently and degrade independently.
    ///
    /// # Errors
    ///
    /// Fewer than two points.
    pub async fn resolve_segments(&self, points: &[LonLat]) -> Result<Vec<SegmentGeometry>, Error> {
        if points.len() < 2 {
            return Err(Error::InvalidData(format!(
                "need at least 2 points for a route, got {}",
                points.len()
            )));
        }

        let legs: Vec<(LonLat, LonLat)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        let mut resolved: Vec<Option<RouteGeometry>> = vec![None; legs.len()];

        let mut tasks = JoinSet::new();
        for (index, &(start, end)) in legs.iter().enumerate() {
            let service = self.service.clone();
            let timeout = self.config.timeout;
            tasks.spawn(async move { (index, resolve_lenient(service, timeout, start, end).await) });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, geometry)) => resolved[index] = Some(geometry),
                Err(e) => warn!("Segment task failed: {e}"),
            }
        }

        let segments: Vec<SegmentGeometry> = legs
            .into_iter()
            .zip(resolved)
            .enumerate()
            .map(|(index, ((start, end), geometry))| SegmentGeometry {
                index,
                start,
                end,
                geometry: geometry.unwrap_or_else(|| RouteGeometry::straight(start, end)),
            })
            .collect();

        let on_road = segments
            .iter()
            .filter(|s| s.geometry.source == GeometrySource::Road)
            .count();
        info!("Resolved {} segments, {on_road} on road", segments.len());
        Ok(segments)
    }
}

async fn fetch_route<S>(
    service: Arc<S>,
    timeout: Duration,
    start: LonLat,
    end: LonLat,
) -> Result<Vec<LonLat>, Error>
where
    S: RoutingService + 'static,
{
    bounded("route geometry", timeout, async move {
        service.route(start, end).await
    })
    .await
}

async fn resolve_lenient<S>(
    service: Option<Arc<S>>,
    timeout: Duration,
    start: LonLat,
    end: LonLat,
) -> RouteGeometry
where
    S: RoutingService + 'static,
{
    let Some(service) = service else {
        debug!("No routing service, straight line for {start:?} -> {end:?}");
        return RouteGeometry::straight(start, end);
    };

    match fetch_route(service, timeout, start, end).await {
        Ok(coordinates) => RouteGeometry {
            coordinates,
            source: GeometrySource::Road,
        },
        Err(e) => {
            warn!("Route {start:?} -> {end:?} unavailable ({e}), using straight line");
            RouteGeometry::straight(start, end)
        }
    }
}
