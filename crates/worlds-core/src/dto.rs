//! DTOs exchanged with the simulation service.
//!
//! Field names on the wire are camelCase; identifiers are plain integers
//! assigned by the service.

use serde::{Deserialize, Serialize};

/// A simulated world as stored by the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    /// Service-assigned identifier.
    pub id: i64,
    /// Human-readable title.
    pub title: String,
    /// Name of the plugin implementing the world's rules.
    pub plugin: String,
    /// Plugin-specific configuration blob, if any.
    #[serde(default)]
    pub config: Option<String>,
}

/// Payload for creating a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldCreate {
    /// Human-readable title.
    pub title: String,
    /// Plugin to instantiate the world with.
    pub plugin: String,
}

/// Payload for updating a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldUpdate {
    /// Human-readable title.
    pub title: String,
    /// Plugin-specific configuration blob.
    pub config: String,
}

/// A world plus its live runtime state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedWorld {
    /// The stored world.
    #[serde(flatten)]
    pub world: World,
    /// Whether the world has been loaded into the service runtime.
    pub initialized: bool,
    /// Whether the simulation loop is currently advancing steps.
    pub running: bool,
}

/// A stage within a world's progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Service-assigned identifier.
    pub id: i64,
    /// Human-readable title.
    pub title: String,
    /// Owning world.
    pub world_id: i64,
}

/// Reference to one step inside a status snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStatusStep {
    /// Step identifier.
    pub id: i64,
    /// Stage the step belongs to.
    pub stage_id: i64,
}

/// Live status snapshot of a world, also pushed over the watch socket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStatus {
    /// Whether the simulation loop is running.
    pub is_running: bool,
    /// Most recent steps, newest last.
    pub steps: Vec<WorldStatusStep>,
}

/// Definition of an action a world's plugin accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldActionDef {
    /// Machine name, sent back in [`WorldAction`].
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Keyboard shortcut hint, if the plugin declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

/// An action submitted to a running world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldAction {
    /// Machine name from the action schema.
    pub name: String,
}

/// One discrete step of a world's simulation.
///
/// `state`, `actions`, `logs`, and `interactions` are stored by the service
/// as opaque strings; `actions` and `logs` are JSON documents that
/// [`crate::step::ParsedStep`] decodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stage the step belongs to.
    pub stage_id: i64,
    /// Plugin-defined state snapshot.
    pub state: String,
    /// JSON-encoded list of actions applied during this step.
    pub actions: String,
    /// JSON-encoded list of log entries emitted during this step.
    pub logs: String,
    /// Plugin-defined interaction record.
    pub interactions: String,
}
