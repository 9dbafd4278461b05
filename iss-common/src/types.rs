use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of C `ctime()`, e.g. "Fri Jan  1 00:00:00 2021"
pub const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("timestamp {0} cannot be represented as a date")]
    TimestampOutOfRange(i64),
}

/// One person currently in space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstronautRecord {
    pub name: String,
    pub craft: String,
}

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Unchecked form, only used to route deserialisation through `GeoCoordinate::new`
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = ModelError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoCoordinate {
    pub const LAT_MIN: f64 = -90.0;
    pub const LAT_MAX: f64 = 90.0;
    pub const LON_MIN: f64 = -180.0;
    pub const LON_MAX: f64 = 180.0;

    /// Build a coordinate, rejecting values outside the valid ranges (NaN included)
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ModelError> {
        if !(Self::LAT_MIN..=Self::LAT_MAX).contains(&latitude) {
            return Err(ModelError::LatitudeOutOfRange(latitude));
        }
        if !(Self::LON_MIN..=Self::LON_MAX).contains(&longitude) {
            return Err(ModelError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={:.2} lon={:.2}", self.latitude, self.longitude)
    }
}

/// ISS ground position together with the server time it was sampled at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssPosition {
    pub coordinate: GeoCoordinate,
    /// Unix seconds, as reported by `iss-now.json`
    pub timestamp: i64,
}

/// Next moment the ISS rises above the horizon for some location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiseTime {
    at: DateTime<Utc>,
}

impl RiseTime {
    pub fn from_unix(seconds: i64) -> Result<Self, ModelError> {
        DateTime::from_timestamp(seconds, 0)
            .map(|at| Self { at })
            .ok_or(ModelError::TimestampOutOfRange(seconds))
    }

    pub fn unix_seconds(&self) -> i64 {
        self.at.timestamp()
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.at
    }

    /// Format in `ctime` layout for the given time zone
    pub fn format_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.at.with_timezone(tz).format(CTIME_FORMAT).to_string()
    }

    /// Format in `ctime` layout for the machine's local time zone
    pub fn to_local_string(&self) -> String {
        self.format_in(&chrono::Local)
    }
}

impl fmt::Display for RiseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_local_string())
    }
}
