#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use transitprep_core::prelude::*;

/// Station `k` sits at longitude `k` on the equator so the scripted service
/// can recover global indices from any location list.
pub fn stations(count: usize) -> Vec<Station> {
    (0..count)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let lon = k as f64;
            Station::new(format!("S{k}"), format!("Stop {k}"), lon, 0.0)
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index_of(location: LonLat) -> usize {
    location[0].round() as usize
}

/// Direction-dependent so a mirrored matrix would be caught
#[allow(clippy::cast_precision_loss)]
pub fn scripted_distance(from: usize, to: usize) -> f64 {
    (from * 1000 + to) as f64
}

#[allow(clippy::cast_precision_loss)]
pub fn scripted_duration(from: usize, to: usize) -> f64 {
    (from * 10 + to) as f64 + 0.5
}

/// In-memory routing service that answers from the formulas above
#[derive(Default)]
pub struct ScriptedRouting {
    pub matrix_calls: AtomicUsize,
    pub route_calls: AtomicUsize,
    pub queries: Mutex<Vec<MatrixQuery>>,
    /// Fail the matrix request with this call number (0-based)
    pub fail_matrix_call: Option<usize>,
    /// Sleep before answering every matrix request
    pub matrix_delay: Option<Duration>,
    /// Route requests starting at these station indices fail
    pub failing_route_starts: Vec<usize>,
    /// Route requests starting at these station indices hang for a minute
    pub hanging_route_starts: Vec<usize>,
    /// Sleep before answering every route request
    pub route_delay: Option<Duration>,
}

impl ScriptedRouting {
    pub fn matrix_calls(&self) -> usize {
        self.matrix_calls.load(Ordering::SeqCst)
    }
}

impl RoutingService for ScriptedRouting {
    async fn matrix(&self, query: MatrixQuery) -> Result<MatrixReply, Error> {
        let call = self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if let Some(delay) = self.matrix_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_matrix_call == Some(call) {
            return Err(Error::Upstream {
                service: "routing",
                status: 429,
                body: "rate limited".to_string(),
            });
        }

        let cell = |f: fn(usize, usize) -> f64| -> Vec<Vec<f64>> {
            query
                .sources
                .iter()
                .map(|&s| {
                    query
                        .destinations
                        .iter()
                        .map(|&d| f(index_of(query.locations[s]), index_of(query.locations[d])))
                        .collect()
                })
                .collect()
        };
        Ok(MatrixReply {
            distances: cell(scripted_distance),
            durations: cell(scripted_duration),
        })
    }

    async fn route(&self, start: LonLat, end: LonLat) -> Result<Vec<LonLat>, Error> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.route_delay {
            tokio::time::sleep(delay).await;
        }
        let from = index_of(start);
        if self.hanging_route_starts.contains(&from) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if self.failing_route_starts.contains(&from) {
            return Err(Error::Upstream {
                service: "routing",
                status: 500,
                body: "no route".to_string(),
            });
        }
        let middle = [(start[0] + end[0]) / 2.0, 0.01];
        Ok(vec![start, middle, end])
    }
}
