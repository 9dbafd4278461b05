///! Open Notify response envelopes
///!
///! Only the fields the tracker reads are required; everything else the
///! service sends is optional or ignored.

use serde::{Deserialize, Serialize};

use crate::types::AstronautRecord;

/// `GET /astros.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstrosResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Headcount as claimed by the service; may lag behind `people`
    #[serde(default)]
    pub number: Option<usize>,
    pub people: Vec<AstronautRecord>,
}

/// `GET /iss-now.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssNowResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    pub iss_position: RawPosition,
}

/// Position as sent on the wire: decimal degrees encoded as strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPosition {
    pub latitude: String,
    pub longitude: String,
}

/// `GET /iss-pass.json?lat=..&lon=..`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssPassResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub response: Vec<PassPrediction>,
}

/// One predicted overhead pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassPrediction {
    /// Unix seconds
    pub risetime: i64,
    /// Seconds above the horizon
    #[serde(default)]
    pub duration: Option<u64>,
}
