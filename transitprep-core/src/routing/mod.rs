//! External routing dependency.
//!
//! The builders only see the [`RoutingService`] trait; [`OpenRouteService`] is
//! the production implementation. Every call is treated as unreliable and
//! bounded in time with [`bounded`].

mod bounded;
mod ors;

use std::future::Future;

pub use bounded::bounded;
pub use ors::{OpenRouteService, RoutingConfig};

use crate::{Error, LonLat, Meters, Seconds};

/// One matrix call: a location list plus the indices to route from and to
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixQuery {
    pub locations: Vec<LonLat>,
    pub sources: Vec<usize>,
    pub destinations: Vec<usize>,
}

/// Row per source, column per destination
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixReply {
    pub distances: Vec<Vec<Meters>>,
    pub durations: Vec<Vec<Seconds>>,
}

impl MatrixReply {
    /// Check that both matrices match the query's source/destination counts
    pub fn validate(&self, query: &MatrixQuery) -> Result<(), Error> {
        let shape_ok = |m: &Vec<Vec<f64>>| {
            m.len() == query.sources.len()
                && m.iter().all(|row| row.len() == query.destinations.len())
        };
        if shape_ok(&self.distances) && shape_ok(&self.durations) {
            Ok(())
        } else {
            Err(Error::InvalidData(format!(
                "matrix reply shape does not match {}x{} query",
                query.sources.len(),
                query.destinations.len()
            )))
        }
    }
}

/// Road routing backend
pub trait RoutingService: Send + Sync {
    /// Distances and durations between the queried sources and destinations
    fn matrix(&self, query: MatrixQuery) -> impl Future<Output = Result<MatrixReply, Error>> + Send;

    /// Road-following polyline from `start` to `end`
    fn route(
        &self,
        start: LonLat,
        end: LonLat,
    ) -> impl Future<Output = Result<Vec<LonLat>, Error>> + Send;
}
