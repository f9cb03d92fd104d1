//! # worlds-ws
//!
//! Self-healing WebSocket client for the worlds simulation service.
//!
//! The service pushes application-level requests over a persistent socket;
//! this crate keeps that socket alive. The pieces:
//!
//! - **Transport** ([`transport`]): one `tokio-tungstenite` stream at a
//!   time; every failure mode collapses into a single "closed" outcome.
//! - **Reconnection controller** ([`WsClient`]): supervises the transport,
//!   retrying forever on a fixed delay until explicitly stopped.
//! - **Dispatcher**: decodes each inbound frame as JSON, awaits the
//!   registered [`RequestHandler`], and writes the optional response back
//!   over the same connection.
//! - **Status notifier**: a zero-argument callback fired on every
//!   connect/disconnect transition; callers query [`WsClient::is_connected`].
//! - **Watch adapter** ([`PayloadWatch`]): scoped subscription that exposes
//!   the latest pushed payload and tears the client down on drop.

#![deny(unsafe_code)]

mod client;
mod error;
mod handler;
mod transport;
mod watch;

pub use client::{ClientState, StatusListener, WsClient, WsClientOptions, RECONNECT_DELAY};
pub use error::WsError;
pub use handler::{handler_fn, RequestHandler};
pub use watch::PayloadWatch;
