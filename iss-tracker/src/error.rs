use std::path::PathBuf;

use iss_common::ModelError;
use reqwest::StatusCode;

/// Failures talking to the Open Notify API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error {status} for {endpoint}")]
    Status { endpoint: String, status: StatusCode },

    #[error("unexpected response shape from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {field} '{value}' from {endpoint}")]
    InvalidCoordinate {
        endpoint: String,
        field: &'static str,
        value: String,
    },

    #[error("value out of range from {endpoint}: {source}")]
    OutOfRange {
        endpoint: String,
        #[source]
        source: ModelError,
    },

    #[error("{endpoint} returned {found} pass(es), need at least {needed}")]
    MissingPass {
        endpoint: String,
        found: usize,
        needed: usize,
    },
}

/// Anything that goes wrong while drawing or rasterising the map
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("image asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("failed to read image asset {}: {source}", .path.display())]
    UnreadableAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image asset {} is not a usable PNG, JPEG or GIF: {detail}", .path.display())]
    UndecodableAsset { path: PathBuf, detail: String },

    #[error("failed to parse map SVG: {0}")]
    Svg(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("failed to write map image {}: {detail}", .path.display())]
    Output { path: PathBuf, detail: String },
}
