//! Typed operations on the world and step endpoints.

use std::collections::HashMap;

use worlds_core::{
    ExtendedWorld, Stage, Step, World, WorldAction, WorldActionDef, WorldCreate, WorldStatus,
    WorldUpdate,
};
use worlds_ws::PayloadWatch;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;

/// Typed view of the service's world and step endpoints.
pub struct WorldApi {
    client: ApiClient,
}

impl WorldApi {
    /// Wrap an [`ApiClient`].
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All stored worlds.
    pub async fn worlds(&self) -> Result<Vec<World>, ApiError> {
        self.client.request(ApiRequest::get("worlds")).await
    }

    /// All stored worlds plus their live runtime state.
    pub async fn worlds_extended(&self) -> Result<Vec<ExtendedWorld>, ApiError> {
        self.client
            .request(ApiRequest::get("worlds/extended"))
            .await
    }

    /// One world by id.
    pub async fn world(&self, id: i64) -> Result<World, ApiError> {
        self.client
            .request(ApiRequest::get(format!("worlds/{id}")))
            .await
    }

    /// Create a world.
    pub async fn create_world(&self, payload: &WorldCreate) -> Result<World, ApiError> {
        self.client
            .request(ApiRequest::post("worlds").body(payload)?)
            .await
    }

    /// Update a world's title and configuration.
    pub async fn update_world(&self, id: i64, payload: &WorldUpdate) -> Result<World, ApiError> {
        self.client
            .request(ApiRequest::patch(format!("worlds/{id}")).body(payload)?)
            .await
    }

    /// Delete a world. Returns the remaining worlds.
    pub async fn delete_world(&self, id: i64) -> Result<Vec<World>, ApiError> {
        self.client
            .request(ApiRequest::delete(format!("worlds/{id}")))
            .await
    }

    /// Clear a world's accumulated stages and steps. Returns the remaining
    /// worlds.
    pub async fn clear_world(&self, id: i64) -> Result<Vec<World>, ApiError> {
        self.client
            .request(ApiRequest::post(format!("worlds/{id}/clear")))
            .await
    }

    /// Stages of a world.
    pub async fn stages(&self, id: i64) -> Result<Vec<Stage>, ApiError> {
        self.client
            .request(ApiRequest::get(format!("worlds/{id}/stages")))
            .await
    }

    /// Current status snapshot of a world.
    pub async fn status(&self, id: i64) -> Result<WorldStatus, ApiError> {
        self.client
            .request(ApiRequest::get(format!("worlds/{id}/status")))
            .await
    }

    /// Actions the world's plugin accepts.
    pub async fn action_schema(&self, id: i64) -> Result<Vec<WorldActionDef>, ApiError> {
        self.client
            .request(ApiRequest::get(format!("worlds/{id}/actions/schema")))
            .await
    }

    /// Queue an action for a running world.
    pub async fn send_action(&self, id: i64, action: &WorldAction) -> Result<(), ApiError> {
        self.client
            .request(ApiRequest::post(format!("worlds/{id}/actions/add")).body(action)?)
            .await
    }

    /// Start a world's simulation loop, optionally bounded to `max_steps`.
    pub async fn start_world(&self, id: i64, max_steps: Option<u32>) -> Result<(), ApiError> {
        let mut request = ApiRequest::post(format!("worlds/{id}/start"));
        if let Some(max_steps) = max_steps {
            request = request.query("maxSteps", max_steps);
        }
        self.client.request(request).await
    }

    /// Stop a world's simulation loop.
    pub async fn stop_world(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .request(ApiRequest::post(format!("worlds/{id}/stop")))
            .await
    }

    /// One step by id.
    pub async fn step(&self, id: i64) -> Result<Step, ApiError> {
        self.client
            .request(ApiRequest::get(format!("steps/{id}")))
            .await
    }

    /// Human-readable description of a step's state.
    pub async fn describe_step(&self, id: i64) -> Result<HashMap<String, String>, ApiError> {
        self.client
            .request(ApiRequest::get(format!("steps/{id}/describe")))
            .await
    }

    /// Address of the PNG rendering of a step's state.
    pub fn step_render_url(&self, id: i64) -> String {
        self.client.url_for(&format!("steps/{id}/render"))
    }

    /// Subscribe to live status pushes for a world.
    ///
    /// The returned watch reconnects on its own and stops on drop.
    pub fn watch_status(&self, id: i64) -> Result<PayloadWatch<WorldStatus>, ApiError> {
        let uri = self
            .client
            .ws_url_for(&format!("worlds/ws/{id}/watch-status"))?;
        Ok(PayloadWatch::subscribe(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_render_url_points_at_the_render_endpoint() {
        let api = WorldApi::new(ApiClient::new("http://host/api"));
        assert_eq!(api.step_render_url(12), "http://host/api/steps/12/render");
    }
}
