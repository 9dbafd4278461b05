///! Shared data model for the ISS tracker
///!
///! - `types`: validated domain values (coordinates, rise times, crew records)
///! - `api`: Open Notify wire envelopes as returned over HTTP

pub mod api;
pub mod types;

pub use api::{AstrosResponse, IssNowResponse, IssPassResponse, PassPrediction, RawPosition};
pub use types::{AstronautRecord, GeoCoordinate, IssPosition, ModelError, RiseTime};
