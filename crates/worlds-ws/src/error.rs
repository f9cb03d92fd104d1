//! WebSocket client error types.

use thiserror::Error;

/// Errors surfaced by the WebSocket layer.
///
/// Only connection establishment produces an error value. Failures on a
/// live connection (network drop, protocol error, peer close) are not
/// distinguished from a graceful close: they all end the connection and
/// drive the reconnect policy instead of propagating.
#[derive(Debug, Error)]
pub enum WsError {
    /// The initial connect handshake failed.
    #[error("connect failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),
}
