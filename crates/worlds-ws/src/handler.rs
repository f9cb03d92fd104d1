//! Application-supplied request handler.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Converts an inbound request into an optional response.
///
/// Returning `None` means no response is owed for this request; `Some`
/// values are serialized and sent back over the same connection.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle one decoded request.
    async fn handle(&self, request: Value) -> Option<Value>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Option<Value>> + Send,
{
    async fn handle(&self, request: Value) -> Option<Value> {
        (self.0)(request).await
    }
}

/// Wrap an async closure as a [`RequestHandler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn RequestHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Value>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn closure_handler_echoes() {
        let handler = handler_fn(|request| async move { Some(json!({ "echo": request })) });
        let response = handler.handle(json!({"v": 1})).await;
        assert_eq!(response, Some(json!({"echo": {"v": 1}})));
    }

    #[tokio::test]
    async fn closure_handler_may_decline_to_respond() {
        let handler = handler_fn(|_| async { None });
        assert!(handler.handle(json!(null)).await.is_none());
    }
}
