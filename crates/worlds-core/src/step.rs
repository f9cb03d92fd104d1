//! Decoding of the JSON payloads a [`Step`] carries as opaque strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dto::{Step, WorldAction};

/// A log line emitted by a world's plugin during one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Severity as the plugin reported it.
    pub level: String,
    /// Log text.
    pub message: String,
}

/// The decoded `logs` and `actions` payloads of a step.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedStep {
    /// Log entries emitted during the step.
    pub logs: Vec<LogEntry>,
    /// Actions applied during the step.
    pub actions: Vec<WorldAction>,
}

/// Errors from decoding step payloads.
#[derive(Debug, Error)]
pub enum StepParseError {
    /// The `logs` column is not a valid JSON list of log entries.
    #[error("invalid step logs payload: {0}")]
    Logs(#[source] serde_json::Error),
    /// The `actions` column is not a valid JSON list of actions.
    #[error("invalid step actions payload: {0}")]
    Actions(#[source] serde_json::Error),
}

impl ParsedStep {
    /// Decode the `logs` and `actions` payloads of a step.
    ///
    /// Empty strings decode to empty lists; the service stores `""` for
    /// steps that produced no output.
    pub fn from_step(step: &Step) -> Result<Self, StepParseError> {
        let logs = if step.logs.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&step.logs).map_err(StepParseError::Logs)?
        };
        let actions = if step.actions.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&step.actions).map_err(StepParseError::Actions)?
        };
        Ok(Self { logs, actions })
    }
}
