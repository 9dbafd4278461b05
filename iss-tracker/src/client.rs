///! Open Notify API client
///!
///! One GET per call, no retries. A non-success status or an unexpected body
///! is returned as an [`ApiError`] wrapped in `anyhow`.
use crate::error::ApiError;
use anyhow::{Context, Result};
use iss_common::{
    AstronautRecord, AstrosResponse, GeoCoordinate, IssNowResponse, IssPassResponse,
    IssPosition, PassPrediction, RawPosition, RiseTime,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "http://api.open-notify.org";

const ASTROS_ENDPOINT: &str = "/astros.json";
const ISS_NOW_ENDPOINT: &str = "/iss-now.json";
const ISS_PASS_ENDPOINT: &str = "/iss-pass.json";

/// `iss-pass.json` lists upcoming passes; the rise time we report is the second one
const RISE_TIME_PASS_INDEX: usize = 1;

pub struct OpenNotifyClient {
    client: Client,
    base_url: String,
}

impl OpenNotifyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("iss-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// People currently in space, in the order the service lists them
    pub async fn get_astronaut_info(&self) -> Result<Vec<AstronautRecord>> {
        let data: AstrosResponse = self.get_json(ASTROS_ENDPOINT).await?;

        if let Some(number) = data.number {
            if number != data.people.len() {
                tracing::warn!(
                    "astros.json claims {} people but lists {}",
                    number,
                    data.people.len()
                );
            }
        }

        tracing::debug!("Fetched {} astronauts", data.people.len());
        Ok(data.people)
    }

    /// Current ground position of the ISS
    pub async fn locate_iss(&self) -> Result<GeoCoordinate> {
        Ok(self.locate_with_timestamp().await?.coordinate)
    }

    /// Current ground position of the ISS and the server time it was sampled
    pub async fn locate_with_timestamp(&self) -> Result<IssPosition> {
        let data: IssNowResponse = self.get_json(ISS_NOW_ENDPOINT).await?;
        let coordinate = parse_position(&data.iss_position, ISS_NOW_ENDPOINT)?;

        tracing::debug!("ISS at {} (timestamp {})", coordinate, data.timestamp);
        Ok(IssPosition {
            coordinate,
            timestamp: data.timestamp,
        })
    }

    /// Upcoming passes over `location`
    pub async fn pass_predictions(&self, location: GeoCoordinate) -> Result<Vec<PassPrediction>> {
        let endpoint = format!(
            "{}?lat={}&lon={}",
            ISS_PASS_ENDPOINT,
            location.latitude(),
            location.longitude()
        );
        let data: IssPassResponse = self.get_json(&endpoint).await?;
        Ok(data.response)
    }

    /// Next horizon rise time of the ISS over `location`
    pub async fn compute_rise_time(&self, location: GeoCoordinate) -> Result<RiseTime> {
        let passes = self.pass_predictions(location).await?;

        let pass = passes.get(RISE_TIME_PASS_INDEX).ok_or_else(|| ApiError::MissingPass {
            endpoint: ISS_PASS_ENDPOINT.to_string(),
            found: passes.len(),
            needed: RISE_TIME_PASS_INDEX + 1,
        })?;

        let rise = RiseTime::from_unix(pass.risetime).map_err(|source| ApiError::OutOfRange {
            endpoint: ISS_PASS_ENDPOINT.to_string(),
            source,
        })?;

        tracing::debug!("Next rise over {} at unix {}", location, rise.unix_seconds());
        Ok(rise)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context(format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            }
            .into());
        }

        let data = response.json::<T>().await.map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(data)
    }
}

/// Parse the string-encoded wire position into a validated coordinate
fn parse_position(raw: &RawPosition, endpoint: &str) -> Result<GeoCoordinate, ApiError> {
    let parse = |field: &'static str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::InvalidCoordinate {
                endpoint: endpoint.to_string(),
                field,
                value: value.to_string(),
            })
    };

    let latitude = parse("latitude", &raw.latitude)?;
    let longitude = parse("longitude", &raw.longitude)?;

    GeoCoordinate::new(latitude, longitude).map_err(|source| ApiError::OutOfRange {
        endpoint: endpoint.to_string(),
        source,
    })
}
