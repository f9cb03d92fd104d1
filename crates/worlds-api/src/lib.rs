//! # worlds-api
//!
//! HTTP collaborator for the worlds simulation service: a generic JSON
//! request helper ([`ApiClient`]) plus the typed world/step operations
//! ([`WorldApi`]), including the live status watch over the WebSocket
//! channel.

#![deny(unsafe_code)]

mod client;
mod error;
mod worlds;

pub use client::{ApiClient, ApiRequest, FilterQuery, Page};
pub use error::ApiError;
pub use worlds::WorldApi;
