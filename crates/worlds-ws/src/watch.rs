//! Scoped subscription to a server-push socket.
//!
//! The service's watch endpoints only ever push state snapshots — the
//! client never owes a response. [`PayloadWatch`] wraps a [`WsClient`]
//! whose handler decodes each push into `T` and publishes it through a
//! `tokio::sync::watch` channel. Dropping the watch stops the client, so
//! the connection lives exactly as long as the consumer.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::{WsClient, WsClientOptions};
use crate::handler::handler_fn;

/// Live view of the latest payload pushed by the server.
pub struct PayloadWatch<T> {
    client: WsClient,
    rx: watch::Receiver<Option<T>>,
}

impl<T> PayloadWatch<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Connect to `uri` and keep the latest pushed payload available.
    ///
    /// Starts reconnecting immediately; `latest` stays `None` until the
    /// first payload arrives. A push that does not decode as `T` is
    /// logged and skipped, keeping the previous value.
    pub fn subscribe(uri: impl Into<String>) -> Self {
        let (tx, rx) = watch::channel(None);
        let client = WsClient::new(WsClientOptions {
            uri: uri.into(),
            request_handler: handler_fn(move |value| {
                let result = serde_json::from_value::<T>(value);
                let tx = tx.clone();
                async move {
                    match result {
                        Ok(payload) => {
                            let _ = tx.send(Some(payload));
                        }
                        Err(err) => {
                            warn!(error = %err, "watch payload did not match expected shape");
                        }
                    }
                    None
                }
            }),
            status_listener: Arc::new(|| debug!("watch connection status changed")),
        });
        client.start();
        Self { client, rx }
    }

    /// The most recently pushed payload, if any arrived yet.
    pub fn latest(&self) -> Option<T>
    where
        T: Clone,
    {
        self.rx.borrow().clone()
    }

    /// A receiver for awaiting payload changes independently.
    pub fn receiver(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    /// Wait for the next payload change. Returns `false` once the watch
    /// has been stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Whether the underlying connection is currently live.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }
}

impl<T> Drop for PayloadWatch<T> {
    fn drop(&mut self) {
        self.client.stop();
    }
}
