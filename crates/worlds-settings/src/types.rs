//! Settings type definitions.
//!
//! Field names are camelCase to match the JSON settings file; missing
//! fields get their default value during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings for the worlds client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Base address of the service's HTTP API.
    pub api_base_url: String,
    /// Default `tracing` filter directive.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            log_filter: "info".to_string(),
        }
    }
}
