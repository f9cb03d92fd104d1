//! Transport wrapper over `tokio-tungstenite`.
//!
//! Owns exactly one stream per connection. The reader collapses peer
//! close, protocol errors, and network drops into `None` — upper layers
//! only ever observe "a text frame arrived" or "the connection is gone".

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::warn;

use crate::error::WsError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a live connection.
#[derive(Debug)]
pub(crate) struct TransportWriter {
    sink: SplitSink<WsStream, Message>,
}

/// Read half of a live connection.
#[derive(Debug)]
pub(crate) struct TransportReader {
    stream: SplitStream<WsStream>,
}

/// Open one socket to `uri`.
pub(crate) async fn connect(uri: &str) -> Result<(TransportWriter, TransportReader), WsError> {
    let (ws, _) = connect_async(uri).await.map_err(WsError::Connect)?;
    let (sink, stream) = ws.split();
    Ok((
        TransportWriter { sink },
        TransportReader { stream },
    ))
}

impl TransportWriter {
    /// Write one text frame. An error means the connection is gone.
    pub(crate) async fn send_text(&mut self, text: String) -> Result<(), WsError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(WsError::Connect)
    }

    /// Request closure. Completion is observed by the reader draining.
    pub(crate) async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

impl TransportReader {
    /// Next inbound text frame, or `None` once the connection is closed.
    ///
    /// Control frames are handled by tungstenite; binary frames are not
    /// part of this protocol and are skipped.
    pub(crate) async fn next_text(&mut self) -> Option<String> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(text.to_string()),
                Ok(Message::Binary(_)) => {
                    warn!("ignoring unexpected binary frame");
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => {} // ping/pong/raw frames
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        // port 1 is unassigned and closed on loopback
        let err = connect("ws://127.0.0.1:1/ws").await.unwrap_err();
        assert_matches!(err, WsError::Connect(_));
    }

    #[tokio::test]
    async fn unparseable_uri_is_a_connect_error() {
        let err = connect("not a uri").await.unwrap_err();
        assert_matches!(err, WsError::Connect(_));
    }
}
