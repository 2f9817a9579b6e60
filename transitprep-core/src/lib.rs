//! Simulation-preparation pipeline for bus network planning.
//!
//! The crate covers three jobs that sit between the planning UI and the
//! discrete-event simulation engine:
//!
//! - building travel-time/distance matrices and road geometry for a set of
//!   stations ([`network`]), backed by an external routing service
//!   ([`routing`]) with a closed-form fallback;
//! - ingesting spreadsheet time series of passenger events and deriving
//!   inter-event gaps for distribution fitting ([`demand`]);
//! - flattening a scenario and its configuration into a time-filtered
//!   [`SimulationRequest`] ([`transform`]).

pub mod demand;
mod error;
pub mod model;
pub mod network;
pub mod prelude;
pub mod routing;
pub mod services;
pub mod time;
pub mod transform;

pub use error::Error;
pub use model::{
    ConfigurationDetail, DemandData, NetworkModel, ScenarioDetail, SimulationRequest, Station,
    StationPair,
};
pub use transform::transform_simulation_request;

/// Minutes since midnight, fractional minutes allowed
pub type Minutes = f64;

/// Travel time in seconds, as returned by the routing service
pub type Seconds = f64;

/// Distance in metres
pub type Meters = f64;

/// `[lon, lat]` pair, the coordinate order used on every wire format here
pub type LonLat = [f64; 2];
