//! Reconnection controller, dispatcher, and status notifier.
//!
//! One [`WsClient`] supervises at most one live connection. On any close —
//! graceful, network drop, or failed connect attempt — it notifies the
//! status listener and schedules exactly one new attempt after
//! [`RECONNECT_DELAY`], forever, until [`WsClient::stop`] latches the
//! client into its terminal state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::handler::RequestHandler;
use crate::transport::{self, TransportReader, TransportWriter};

/// Fixed delay between a close and the next connection attempt.
///
/// No backoff: the client is bound to a view of a transient local service,
/// so retrying at a constant rate recovers fastest.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Zero-argument callback fired after every connect/disconnect transition.
///
/// Carries no payload; call [`WsClient::is_connected`] for the new status.
pub type StatusListener = Arc<dyn Fn() + Send + Sync>;

/// Connection lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientState {
    /// Created, never started.
    Idle,
    /// Between attempts or handshaking.
    Connecting,
    /// A live connection holds the handle slot.
    Connected,
    /// Terminal: [`WsClient::stop`] was called. Never leaves this state.
    Stopped,
}

/// Construction parameters for [`WsClient`].
pub struct WsClientOptions {
    /// WebSocket address to keep a connection to.
    pub uri: String,
    /// Handler invoked for every inbound request.
    pub request_handler: Arc<dyn RequestHandler>,
    /// Callback fired on every status transition.
    pub status_listener: StatusListener,
}

/// Self-healing WebSocket client.
///
/// `start` spawns the supervising loop; `stop` is the only way out of it.
/// A stopped client cannot be restarted — create a new one.
pub struct WsClient {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    uri: String,
    request_handler: Arc<dyn RequestHandler>,
    status_listener: StatusListener,
    /// Latched by `stop`; never reset.
    stopped: AtomicBool,
    /// Exclusive handle slot: the outbound sender of the one live
    /// connection, `None` while disconnected. Mutated only by the
    /// controller; the dispatcher reads it to decide whether to send.
    handle: Mutex<Option<mpsc::UnboundedSender<String>>>,
    state: Mutex<ClientState>,
    shutdown: Notify,
}

impl WsClient {
    /// Create a client. No connection is made until [`WsClient::start`].
    pub fn new(options: WsClientOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                uri: options.uri,
                request_handler: options.request_handler,
                status_listener: options.status_listener,
                stopped: AtomicBool::new(false),
                handle: Mutex::new(None),
                state: Mutex::new(ClientState::Idle),
                shutdown: Notify::new(),
            }),
            task: Mutex::new(None),
        }
    }

    /// Spawn the supervising loop.
    ///
    /// At most one loop runs per client: a second `start` while the first
    /// loop is alive is logged and ignored, so no extra handles can be
    /// created no matter how quickly `start` is called twice.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            error!("already started, refusing to spawn a second loop");
            return;
        }
        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(run(inner)));
    }

    /// Stop the client permanently.
    ///
    /// Latches the stopped flag, clears the handle slot immediately (so
    /// [`WsClient::is_connected`] reports `false` the instant this
    /// returns), and signals the loop to close the socket. Does not wait
    /// for the close handshake and does not cancel an in-flight handler —
    /// a response produced after this point is dropped.
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        drop(self.inner.handle.lock().take());
        self.inner.set_state(ClientState::Stopped);
        self.inner.shutdown.notify_one();
    }

    /// Whether a live connection currently holds the handle slot.
    pub fn is_connected(&self) -> bool {
        self.inner.handle.lock().is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        *self.inner.state.lock()
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn set_state(&self, next: ClientState) {
        let mut state = self.state.lock();
        if *state != next {
            debug!(from = ?*state, to = ?next, "state transition");
            *state = next;
        }
    }

    fn notify_status(&self) {
        (self.status_listener)();
    }
}

/// Supervising loop: connect, serve, and reschedule until stopped.
async fn run(inner: Arc<Inner>) {
    loop {
        // stop() may have latched while we were waiting to reconnect
        if inner.is_stopped() {
            break;
        }
        if inner.handle.lock().is_some() {
            error!("already connected, refusing to open a second connection");
            return;
        }

        inner.set_state(ClientState::Connecting);
        info!(uri = %inner.uri, "connecting");
        match transport::connect(&inner.uri).await {
            Ok((writer, reader)) => serve_connection(&inner, writer, reader).await,
            Err(err) => {
                // a failed attempt surfaces the same way a close does,
                // unless stop() already latched during the attempt
                warn!(error = %err, "connection attempt failed");
                if !inner.is_stopped() {
                    inner.notify_status();
                }
            }
        }

        if inner.is_stopped() {
            break;
        }
        info!("reconnecting in {}ms", RECONNECT_DELAY.as_millis());
        tokio::select! {
            () = tokio::time::sleep(RECONNECT_DELAY) => {}
            () = inner.shutdown.notified() => break,
        }
    }
    inner.set_state(ClientState::Stopped);
}

/// Serve one live connection until it closes or the client stops.
async fn serve_connection(
    inner: &Arc<Inner>,
    mut writer: TransportWriter,
    mut reader: TransportReader,
) {
    // stop() may have latched while the handshake was in flight: the
    // client is terminal, so the late socket is closed without ever
    // publishing a handle or touching the status listener
    if inner.is_stopped() {
        writer.close().await;
        return;
    }

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    *inner.handle.lock() = Some(out_tx);
    inner.set_state(ClientState::Connected);
    info!("connected");
    inner.notify_status();

    loop {
        tokio::select! {
            () = inner.shutdown.notified() => break,
            outbound = out_rx.recv() => {
                match outbound {
                    Some(text) => {
                        if writer.send_text(text).await.is_err() {
                            break;
                        }
                    }
                    // slot was cleared by stop(); the last sender is gone
                    None => break,
                }
            }
            inbound = reader.next_text() => {
                match inbound {
                    Some(text) => dispatch(inner, &text).await,
                    None => break,
                }
            }
        }
    }

    writer.close().await;
    drop(inner.handle.lock().take());
    info!("closed");
    inner.notify_status();
}

/// Dispatch one inbound frame: decode, run the handler, send the optional
/// response back if the connection is still live at send time.
///
/// Awaited inline in the connection loop, so requests are handled strictly
/// one at a time in arrival order.
async fn dispatch(inner: &Arc<Inner>, text: &str) {
    debug!(payload = %text, "received");
    let request: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            // fatal for this message only; the connection is unaffected
            error!(error = %err, "malformed inbound payload");
            return;
        }
    };

    let Some(response) = inner.request_handler.handle(request).await else {
        debug!("response not requested");
        return;
    };

    let serialized = response.to_string();
    let sender = inner.handle.lock().clone();
    match sender {
        Some(tx) => {
            debug!(payload = %serialized, "sending response");
            let _ = tx.send(serialized);
        }
        // the socket closed while the handler was running
        None => warn!("failed to answer, socket closed"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::handler::handler_fn;

    fn make_client(uri: &str) -> WsClient {
        WsClient::new(WsClientOptions {
            uri: uri.to_string(),
            request_handler: handler_fn(|_| async { None }),
            status_listener: Arc::new(|| {}),
        })
    }

    #[test]
    fn new_client_is_idle_and_disconnected() {
        let client = make_client("ws://127.0.0.1:1/ws");
        assert_eq!(client.state(), ClientState::Idle);
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn stop_latches_terminal_state() {
        let client = make_client("ws://127.0.0.1:1/ws");
        client.stop();
        assert_eq!(client.state(), ClientState::Stopped);
        assert!(!client.is_connected());

        // a start after stop must not leave the terminal state
        client.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(client.state(), ClientState::Stopped);
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let client = make_client("ws://127.0.0.1:1/ws");
        client.stop();
        client.stop();
        assert_eq!(client.state(), ClientState::Stopped);
    }

    #[tokio::test]
    async fn status_listener_is_shared_state_free() {
        // two clients with the same listener must not interfere
        let calls = Arc::new(AtomicUsize::new(0));
        let listener: StatusListener = {
            let calls = Arc::clone(&calls);
            Arc::new(move || {
                let _ = calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let a = WsClient::new(WsClientOptions {
            uri: "ws://127.0.0.1:1/ws".into(),
            request_handler: handler_fn(|_| async { None }),
            status_listener: Arc::clone(&listener),
        });
        let b = WsClient::new(WsClientOptions {
            uri: "ws://127.0.0.1:1/ws".into(),
            request_handler: handler_fn(|_| async { None }),
            status_listener: listener,
        });
        a.stop();
        b.stop();
        // stop without a live connection fires no status change
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
