//! API error types.

use thiserror::Error;

/// Errors from talking to the service's HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered outside the 200–299 range.
    #[error("API error {status} for {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Endpoint the request targeted.
        endpoint: String,
    },
    /// The response body was not the expected JSON shape.
    #[error("response parse error: {0}")]
    Decode(#[source] serde_json::Error),
    /// A request body could not be encoded as JSON.
    #[error("request encode error: {0}")]
    Encode(#[source] serde_json::Error),
    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The base URL's scheme has no WebSocket counterpart.
    #[error("cannot derive a WebSocket URL from {0}")]
    WsScheme(String),
}
